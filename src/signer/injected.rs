//! Injected provider signer implementation
//!
//! Speaks EIP-1193 JSON-RPC (`eth_requestAccounts`, `personal_sign`) to a wallet
//! provider endpoint, the way a page talks to `window.ethereum`.

use super::WalletProvider;
use alloy::hex;
use alloy::network::Ethereum;
use alloy::primitives::{Address, Signature};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::transports::http::reqwest::Url;
use eyre::{Context, Result};
use std::sync::Arc;

/// Signer backed by an injected EIP-1193 provider
pub struct InjectedSigner {
    /// Provider without fillers, only raw wallet methods are used
    provider: Arc<RootProvider<Ethereum>>,
    /// Accounts granted by the last `eth_requestAccounts`
    accounts: Vec<Address>,
}

impl InjectedSigner {
    /// Create a signer for the provider at `rpc_url`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut signer = InjectedSigner::new("http://127.0.0.1:1248")?;
    /// signer.connect().await?;
    /// ```
    pub fn new(rpc_url: impl AsRef<str>) -> Result<Self> {
        let url: Url = rpc_url.as_ref().parse().context("Invalid wallet RPC URL")?;

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Ok(Self {
            provider: Arc::new(provider),
            accounts: Vec::new(),
        })
    }
}

impl WalletProvider for InjectedSigner {
    async fn connect(&mut self) -> Result<()> {
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .context("Wallet rejected eth_requestAccounts")?;

        tracing::info!("Injected wallet granted {} account(s)", accounts.len());
        self.accounts = accounts;
        Ok(())
    }

    async fn request_addresses(&self) -> Result<Vec<Address>> {
        if !self.accounts.is_empty() {
            return Ok(self.accounts.clone());
        }

        self.provider
            .raw_request("eth_accounts".into(), ())
            .await
            .context("Failed to read wallet accounts")
    }

    async fn sign_message(&self, address: Address, message: &[u8]) -> Result<Signature> {
        let data = hex::encode_prefixed(message);

        let signature: String = self
            .provider
            .raw_request("personal_sign".into(), (data, address))
            .await
            .context("Wallet failed to sign message")?;

        signature
            .parse()
            .with_context(|| format!("Invalid signature from wallet: {}", signature))
    }

    async fn disconnect(&mut self) -> Result<()> {
        // EIP-1193 has no logout; forget the granted accounts
        self.accounts.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.accounts.is_empty()
    }
}
