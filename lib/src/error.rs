use std::error::Error as StdError;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::transport::Transport;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No valid ETH address found in PR body")]
    InvalidInput,

    #[error("Unable to connect to {url} ({})", format_failures(.failures))]
    Connectivity {
        url: String,
        failures: Vec<(Transport, String)>,
    },

    #[error("{context}")]
    Chain {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Mint transaction {0} reverted")]
    Reverted(TxHash),
}

impl MintError {
    /// Wraps an RPC or signing failure, for use with `map_err`.
    pub(crate) fn chain<E>(context: &'static str) -> impl FnOnce(E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        move |source| Self::Chain {
            context,
            source: Box::new(source),
        }
    }
}

fn format_failures(failures: &[(Transport, String)]) -> String {
    failures
        .iter()
        .map(|(transport, reason)| format!("{transport}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}
