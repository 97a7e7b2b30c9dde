use std::fmt;

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    transports::ws::WsConnect,
};
use tracing::{debug, info, warn};

use crate::{error::MintError, utils::parse_rpc_url};

/// The ways of reaching an RPC endpoint, in the order they are attempted.
pub const TRANSPORT_ORDER: [Transport; 2] = [Transport::Http, Transport::Ws];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Ws,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Http => f.write_str("http"),
            Transport::Ws => f.write_str("ws"),
        }
    }
}

impl Transport {
    // Builds a provider for `rpc_url` and checks that it answers eth_chainId
    async fn connect(self, rpc_url: &str) -> Result<DynProvider, String> {
        let provider = match self {
            Transport::Http => {
                let url = parse_rpc_url(rpc_url).map_err(|e| e.to_string())?;
                ProviderBuilder::new().connect_http(url).erased()
            }
            Transport::Ws => ProviderBuilder::new()
                .connect_ws(WsConnect::new(rpc_url))
                .await
                .map_err(|e| e.to_string())?
                .erased(),
        };
        let chain_id = provider.get_chain_id().await.map_err(|e| e.to_string())?;
        debug!(transport = %self, chain_id, "RPC endpoint answered");
        Ok(provider)
    }
}

/// Connects to `rpc_url` with the first transport in [`TRANSPORT_ORDER`] that
/// works. Each transport is tried once.
pub async fn connect(rpc_url: &str) -> Result<(Transport, DynProvider), MintError> {
    connect_in_order(rpc_url, &TRANSPORT_ORDER, |transport| {
        transport.connect(rpc_url)
    })
    .await
}

// Runs `attempt` for each transport in `order` until one yields a provider
async fn connect_in_order<F, Fut>(
    rpc_url: &str,
    order: &[Transport],
    mut attempt: F,
) -> Result<(Transport, DynProvider), MintError>
where
    F: FnMut(Transport) -> Fut,
    Fut: Future<Output = Result<DynProvider, String>>,
{
    let mut failures = Vec::with_capacity(order.len());
    for &transport in order {
        match attempt(transport).await {
            Ok(provider) => {
                info!(%transport, "connected to RPC endpoint");
                return Ok((transport, provider));
            }
            Err(reason) => {
                warn!(%transport, %reason, "RPC transport unavailable");
                failures.push((transport, reason));
            }
        }
    }
    Err(MintError::Connectivity {
        url: rpc_url.to_string(),
        failures,
    })
}
