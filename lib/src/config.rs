use std::{env, fmt};

use crate::error::ConfigError;

pub const RPC_URL: &str = "RPC_URL";
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const RENOUN_DEPLOYMENT_ADDRESS: &str = "RENOUN_DEPLOYMENT_ADDRESS";
pub const PULL_REQUEST_BODY: &str = "PULL_REQUEST_BODY";
pub const PULL_REQUEST_ID: &str = "PULL_REQUEST_ID";
pub const PULL_REQUEST_TITLE: &str = "PULL_REQUEST_TITLE";
pub const PULL_REQUEST_CREATOR_USERNAME: &str = "PULL_REQUEST_CREATOR_USERNAME";
pub const PULL_REQUEST_CREATOR_PICTURE_URL: &str = "PULL_REQUEST_CREATOR_PICTURE_URL";
pub const ADDITIONS: &str = "ADDITIONS";
pub const DELETIONS: &str = "DELETIONS";
pub const COMMIT_HASH: &str = "COMMIT_HASH";
pub const REPOSITORY_STARS: &str = "REPOSITORY_STARS";
pub const REPOSITORY_CONTRIBUTORS: &str = "REPOSITORY_CONTRIBUTORS";

/// Everything a mint needs, as read from the CI job's environment.
///
/// Values are kept exactly as provided; numeric fields are only coerced when
/// [`MintParams`](crate::renoun::MintParams) are derived.
#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
    pub contract_address: String,
    pub pull_request_body: String,
    pub pull_request_id: String,
    pub pull_request_title: String,
    pub creator_username: String,
    pub creator_picture_url: String,
    pub additions: String,
    pub deletions: String,
    pub commit_hash: String,
    pub repository_stars: String,
    pub repository_contributors: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Load configuration through `lookup`, which behaves like [`env::var`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let require = |key: &'static str| {
            lookup(key).map_err(|e| match e {
                env::VarError::NotPresent => ConfigError::Missing(key),
                env::VarError::NotUnicode(_) => ConfigError::Invalid(key),
            })
        };

        Ok(Config {
            rpc_url: require(RPC_URL)?,
            private_key: require(PRIVATE_KEY)?,
            contract_address: require(RENOUN_DEPLOYMENT_ADDRESS)?,
            pull_request_body: require(PULL_REQUEST_BODY)?,
            pull_request_id: require(PULL_REQUEST_ID)?,
            pull_request_title: require(PULL_REQUEST_TITLE)?,
            creator_username: require(PULL_REQUEST_CREATOR_USERNAME)?,
            creator_picture_url: require(PULL_REQUEST_CREATOR_PICTURE_URL)?,
            additions: require(ADDITIONS)?,
            deletions: require(DELETIONS)?,
            commit_hash: require(COMMIT_HASH)?,
            repository_stars: require(REPOSITORY_STARS)?,
            repository_contributors: require(REPOSITORY_CONTRIBUTORS)?,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("pull_request_body", &self.pull_request_body)
            .field("pull_request_id", &self.pull_request_id)
            .field("pull_request_title", &self.pull_request_title)
            .field("creator_username", &self.creator_username)
            .field("creator_picture_url", &self.creator_picture_url)
            .field("additions", &self.additions)
            .field("deletions", &self.deletions)
            .field("commit_hash", &self.commit_hash)
            .field("repository_stars", &self.repository_stars)
            .field("repository_contributors", &self.repository_contributors)
            .finish()
    }
}
