//! Mints a Renoun token recording a pull request's contribution statistics.
//!
//! The whole flow is [`renoun::submit_contribution_mint`]: read a [`Config`],
//! pull the recipient out of the PR body, connect, sign and broadcast.

pub mod config;
pub mod error;
pub mod renoun;
pub mod transport;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, MintError};
pub use renoun::{MintParams, TARGET_CHAIN_ID, submit_and_confirm_mint, submit_contribution_mint};
