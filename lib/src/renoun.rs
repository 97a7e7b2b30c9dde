use alloy::{
    consensus::TxEnvelope,
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol,
    sol_types::SolCall,
};
use tracing::{debug, info};

use crate::{
    config::{self, Config},
    error::{ConfigError, MintError},
    transport,
    utils::{coerce_count, extract_address, parse_address, sanitize_title},
};

sol!(
    #[allow(clippy::too_many_arguments)]
    Renoun,
    "abi/Renoun.json"
);

/// Renoun is deployed on OP Mainnet.
pub const TARGET_CHAIN_ID: u64 = 10;

/// Arguments of `Renoun.mint`, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    pub to: Address,
    pub pull_request_id: U256,
    pub title: String,
    pub additions: U256,
    pub deletions: U256,
    pub creator_picture_url: String,
    pub creator_username: String,
    pub commit_hash: String,
    pub repository_stars: U256,
    pub repository_contributors: U256,
}

impl MintParams {
    /// Derives the mint arguments, failing with [`MintError::InvalidInput`]
    /// when the PR body names no address. Performs no I/O.
    pub fn from_config(config: &Config) -> Result<Self, MintError> {
        let to = extract_address(&config.pull_request_body)?;
        let to = parse_address(to, config::PULL_REQUEST_BODY)?;
        let count = |raw: &str, var: &'static str| {
            coerce_count(raw).ok_or(MintError::Config(ConfigError::Invalid(var)))
        };

        Ok(MintParams {
            to,
            pull_request_id: count(&config.pull_request_id, config::PULL_REQUEST_ID)?,
            title: sanitize_title(&config.pull_request_title),
            additions: count(&config.additions, config::ADDITIONS)?,
            deletions: count(&config.deletions, config::DELETIONS)?,
            creator_picture_url: config.creator_picture_url.clone(),
            creator_username: config.creator_username.clone(),
            commit_hash: config.commit_hash.clone(),
            repository_stars: count(&config.repository_stars, config::REPOSITORY_STARS)?,
            repository_contributors: count(
                &config.repository_contributors,
                config::REPOSITORY_CONTRIBUTORS,
            )?,
        })
    }

    pub fn into_call(self) -> Renoun::mintCall {
        Renoun::mintCall::new((
            self.to,
            self.pull_request_id,
            self.title,
            self.additions,
            self.deletions,
            self.creator_picture_url,
            self.creator_username,
            self.commit_hash,
            self.repository_stars,
            self.repository_contributors,
        ))
    }

    /// ABI-encoded `mint` calldata, selector included.
    pub fn calldata(&self) -> Bytes {
        self.clone().into_call().abi_encode().into()
    }
}

pub fn get_contract_address(config: &Config) -> Result<Address, ConfigError> {
    parse_address(&config.contract_address, config::RENOUN_DEPLOYMENT_ADDRESS)
}

pub fn get_signer(config: &Config) -> Result<PrivateKeySigner, ConfigError> {
    config
        .private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|_| ConfigError::Invalid(config::PRIVATE_KEY))
}

/// Builds, signs and broadcasts the mint transaction described by `config`,
/// returning its hash without waiting for inclusion.
pub async fn submit_contribution_mint(config: &Config) -> Result<TxHash, MintError> {
    let pending = send_mint(config).await?;
    Ok(*pending.tx_hash())
}

/// Like [`submit_contribution_mint`], but waits for the receipt and fails if
/// the transaction reverted.
pub async fn submit_and_confirm_mint(config: &Config) -> Result<TxHash, MintError> {
    let receipt = send_mint(config)
        .await?
        .get_receipt()
        .await
        .map_err(MintError::chain("Mint transaction was not confirmed"))?;

    if !receipt.status() {
        return Err(MintError::Reverted(receipt.transaction_hash));
    }
    info!(tx_hash = %receipt.transaction_hash, block = ?receipt.block_number, "mint confirmed");
    Ok(receipt.transaction_hash)
}

async fn send_mint(config: &Config) -> Result<PendingTransactionBuilder<Ethereum>, MintError> {
    // everything derivable offline is checked before touching the network
    let params = MintParams::from_config(config)?;
    let contract = get_contract_address(config)?;
    let signer = get_signer(config)?;
    info!(to = %params.to, %contract, sender = %signer.address(), "minting Renoun token");

    let (_, provider) = transport::connect(&config.rpc_url).await?;
    let envelope = sign_mint(&provider, contract, signer, &params).await?;
    broadcast(&provider, envelope).await
}

/// Builds the legacy `mint` transaction from the sender's live nonce and the
/// current gas price, and signs it locally for [`TARGET_CHAIN_ID`].
pub async fn sign_mint(
    provider: &DynProvider,
    contract: Address,
    signer: PrivateKeySigner,
    params: &MintParams,
) -> Result<TxEnvelope, MintError> {
    let sender = signer.address();
    let nonce = provider
        .get_transaction_count(sender)
        .await
        .map_err(MintError::chain("Failed to get nonce"))?;
    let gas_price = provider
        .get_gas_price()
        .await
        .map_err(MintError::chain("Failed to get gas price"))?;

    let request = TransactionRequest::default()
        .with_from(sender)
        .with_to(contract)
        .with_input(params.calldata())
        .with_nonce(nonce)
        .with_gas_price(gas_price)
        .with_chain_id(TARGET_CHAIN_ID);
    let gas_limit = provider
        .estimate_gas(request.clone())
        .await
        .map_err(MintError::chain("Failed to estimate gas for mint"))?;
    debug!(nonce, gas_price, gas_limit, "mint transaction prepared");

    request
        .with_gas_limit(gas_limit)
        .build(&EthereumWallet::from(signer))
        .await
        .map_err(MintError::chain("Failed to sign mint transaction"))
}

pub async fn broadcast(
    provider: &DynProvider,
    envelope: TxEnvelope,
) -> Result<PendingTransactionBuilder<Ethereum>, MintError> {
    let pending = provider
        .send_tx_envelope(envelope)
        .await
        .map_err(MintError::chain("Failed to send mint transaction"))?;
    info!(tx_hash = %pending.tx_hash(), "mint transaction broadcast");
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use std::env;

    use alloy::{
        primitives::{TxKind, address, keccak256},
        providers::{ProviderBuilder, mock::Asserter},
    };

    use super::*;
    use crate::config::tests::{TEST_PRIVATE_KEY, config_from, test_env};
    use anyhow::Result;

    fn mocked_provider() -> (Asserter, DynProvider) {
        let asserter = Asserter::default();
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        (asserter, provider)
    }

    #[test]
    fn test_mint_params_from_config() -> Result<()> {
        let params = MintParams::from_config(&config_from(&test_env())?)?;
        assert_eq!(
            params,
            MintParams {
                to: address!("0x590b78eaF98053eFBa4107Eed2e0F70D2B90A45d"),
                pull_request_id: U256::from(17),
                title: "docs fix typo in READMEmd".to_string(),
                additions: U256::from(42),
                deletions: U256::ZERO,
                creator_picture_url: "https://avatars.githubusercontent.com/u/583231?v=4"
                    .to_string(),
                creator_username: "octocat".to_string(),
                commit_hash: "9fceb02d0ae598e95dc970b74767f19372d61af8".to_string(),
                repository_stars: U256::from(1337),
                repository_contributors: U256::ZERO,
            }
        );
        Ok(())
    }

    #[test]
    fn test_mint_params_without_address() -> Result<()> {
        let mut vars = test_env();
        vars.insert(config::PULL_REQUEST_BODY, "LGTM, no wallet".to_string());
        let config = config_from(&vars)?;
        assert!(matches!(
            MintParams::from_config(&config),
            Err(MintError::InvalidInput)
        ));
        Ok(())
    }

    #[test]
    fn test_mint_params_overflowing_count() -> Result<()> {
        let mut vars = test_env();
        vars.insert(config::ADDITIONS, "9".repeat(90));
        let config = config_from(&vars)?;
        assert!(matches!(
            MintParams::from_config(&config),
            Err(MintError::Config(ConfigError::Invalid("ADDITIONS")))
        ));
        Ok(())
    }

    #[test]
    fn test_mint_selector() {
        let signature =
            "mint(address,uint256,string,uint256,uint256,string,string,string,uint256,uint256)";
        assert_eq!(Renoun::mintCall::SIGNATURE, signature);
        assert_eq!(Renoun::mintCall::SELECTOR, keccak256(signature)[..4]);
    }

    #[test]
    fn test_calldata_round_trips_params() -> Result<()> {
        let params = MintParams::from_config(&config_from(&test_env())?)?;
        let calldata = params.calldata();
        assert_eq!(calldata[..4], Renoun::mintCall::SELECTOR);

        let decoded = Renoun::mintCall::abi_decode(&calldata)?;
        assert_eq!(decoded._to, params.to);
        assert_eq!(decoded._pullRequestTitle, params.title);
        assert_eq!(decoded._additions, params.additions);
        assert_eq!(decoded._repositoryContributors, params.repository_contributors);
        Ok(())
    }

    #[test]
    fn test_get_signer() -> Result<()> {
        let config = config_from(&test_env())?;
        assert_eq!(
            get_signer(&config)?.address(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );

        let mut vars = test_env();
        vars.insert(config::PRIVATE_KEY, "0xnope".to_string());
        assert!(matches!(
            get_signer(&config_from(&vars)?),
            Err(ConfigError::Invalid("PRIVATE_KEY"))
        ));
        // unprefixed keys are accepted too
        vars.insert(config::PRIVATE_KEY, TEST_PRIVATE_KEY[2..].to_string());
        assert!(get_signer(&config_from(&vars)?).is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_address_fails_before_connecting() -> Result<()> {
        let mut vars = test_env();
        vars.insert(config::PULL_REQUEST_BODY, "thanks!".to_string());
        // unroutable: reaching the network would surface as a connectivity error
        vars.insert(config::RPC_URL, "http://127.0.0.1:1".to_string());
        let result = submit_contribution_mint(&config_from(&vars)?).await;
        assert!(matches!(result, Err(MintError::InvalidInput)));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_rpc_sends_nothing() -> Result<()> {
        let config = config_from(&test_env())?;
        let result = submit_contribution_mint(&config).await;
        assert!(matches!(result, Err(MintError::Connectivity { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_mint_and_broadcast() -> Result<()> {
        let config = config_from(&test_env())?;
        let params = MintParams::from_config(&config)?;
        let contract = get_contract_address(&config)?;
        let signer = get_signer(&config)?;
        let sender = signer.address();

        let (asserter, provider) = mocked_provider();
        asserter.push_success(&U256::from(7)); // eth_getTransactionCount
        asserter.push_success(&U256::from(1_000_000u64)); // eth_gasPrice
        asserter.push_success(&U256::from(180_000u64)); // eth_estimateGas

        let envelope = sign_mint(&provider, contract, signer, &params).await?;
        let Some(signed) = envelope.as_legacy() else {
            panic!("mint should be signed as a legacy transaction");
        };
        let tx = signed.tx();
        assert_eq!(tx.chain_id, Some(TARGET_CHAIN_ID));
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.gas_price, 1_000_000);
        assert_eq!(tx.gas_limit, 180_000);
        assert_eq!(tx.to, TxKind::Call(contract));
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.input, params.calldata());
        assert_eq!(
            signed
                .signature()
                .recover_address_from_prehash(&signed.signature_hash())?,
            sender
        );

        let tx_hash = *envelope.tx_hash();
        asserter.push_success(&tx_hash); // eth_sendRawTransaction
        let pending = broadcast(&provider, envelope).await?;
        assert_eq!(*pending.tx_hash(), tx_hash);
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_mint_nonce_failure() -> Result<()> {
        let config = config_from(&test_env())?;
        let params = MintParams::from_config(&config)?;

        let (asserter, provider) = mocked_provider();
        asserter.push_failure_msg("header not found");

        let result = sign_mint(
            &provider,
            get_contract_address(&config)?,
            get_signer(&config)?,
            &params,
        )
        .await;
        assert!(matches!(
            result,
            Err(MintError::Chain {
                context: "Failed to get nonce",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_broadcast_rejected() -> Result<()> {
        let config = config_from(&test_env())?;
        let params = MintParams::from_config(&config)?;

        let (asserter, provider) = mocked_provider();
        asserter.push_success(&U256::ZERO);
        asserter.push_success(&U256::from(1_000_000u64));
        asserter.push_success(&U256::from(180_000u64));
        let envelope = sign_mint(
            &provider,
            get_contract_address(&config)?,
            get_signer(&config)?,
            &params,
        )
        .await?;

        asserter.push_failure_msg("insufficient funds for gas * price + value");
        let result = broadcast(&provider, envelope).await;
        assert!(matches!(
            result,
            Err(MintError::Chain {
                context: "Failed to send mint transaction",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_contribution_mint_live() -> Result<()> {
        // mints a real token, so it needs an explicit opt-in on top of the CI variables
        let (Ok(_), Ok(config)) = (env::var("RENOUN_LIVE_MINT"), Config::from_env()) else {
            eprintln!(
                "RENOUN_LIVE_MINT or mint environment variables not set\nSkipping test_submit_contribution_mint_live"
            );
            return Ok(());
        };
        let tx_hash = submit_and_confirm_mint(&config).await?;
        eprintln!("Mint transaction: {tx_hash}");
        Ok(())
    }
}
