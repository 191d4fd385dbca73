//! Hosted login signer implementation
//!
//! The hosted flow hands the session a key after the user completes a login
//! (modal, redirect, or exported session). The key is scoped to one chain and
//! only lives in memory for the duration of the session.

use super::WalletProvider;
use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use eyre::{Context, Result};

/// Settings of the hosted authentication service
#[derive(Debug, Clone)]
pub struct HostedAuthConfig {
    /// Client id registered with the auth provider
    pub client_id: String,
    /// Auth network (e.g. "sapphire_mainnet")
    pub network: String,
    /// Chain the obtained signer is scoped to
    pub chain_id: u64,
}

impl HostedAuthConfig {
    pub fn new(client_id: impl Into<String>, chain_id: u64) -> Self {
        Self {
            client_id: client_id.into(),
            network: "sapphire_mainnet".to_string(),
            chain_id,
        }
    }
}

/// A login flow that yields the session key
pub trait LoginFlow: Send + Sync {
    /// Restore a session that is still active, without user interaction
    fn restore(
        &self,
        config: &HostedAuthConfig,
    ) -> impl std::future::Future<Output = Result<Option<PrivateKeySigner>>> + Send;

    /// Run the interactive login; `None` means the user closed it
    fn login(
        &self,
        config: &HostedAuthConfig,
    ) -> impl std::future::Future<Output = Result<Option<PrivateKeySigner>>> + Send;

    /// End the session on the auth provider side
    fn logout(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Login flow reading an exported session key from an environment variable
#[derive(Debug, Clone)]
pub struct EnvKeyLogin {
    var: String,
}

impl EnvKeyLogin {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    fn read_key(&self) -> Result<Option<PrivateKeySigner>> {
        let Ok(key) = std::env::var(&self.var) else {
            return Ok(None);
        };
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        if key.is_empty() {
            return Ok(None);
        }

        let signer: PrivateKeySigner = key
            .parse()
            .with_context(|| format!("Failed to parse session key from {}", self.var))?;
        Ok(Some(signer))
    }
}

impl LoginFlow for EnvKeyLogin {
    async fn restore(&self, _config: &HostedAuthConfig) -> Result<Option<PrivateKeySigner>> {
        self.read_key()
    }

    async fn login(&self, _config: &HostedAuthConfig) -> Result<Option<PrivateKeySigner>> {
        self.read_key()
    }

    async fn logout(&self) -> Result<()> {
        Ok(())
    }
}

/// Signer obtained through a hosted login flow
pub struct HostedSigner<L: LoginFlow> {
    config: HostedAuthConfig,
    flow: L,
    initialized: bool,
    signer: Option<PrivateKeySigner>,
}

impl<L: LoginFlow> HostedSigner<L> {
    /// Create a new HostedSigner; call [`HostedSigner::init_modal`] before connecting
    pub fn new(config: HostedAuthConfig, flow: L) -> Self {
        Self {
            config,
            flow,
            initialized: false,
            signer: None,
        }
    }

    /// Initialize the login flow once, restoring an active session if there is one
    pub async fn init_modal(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;

        let restored = self.flow.restore(&self.config).await?;
        if let Some(signer) = restored {
            tracing::info!("Restored hosted session for {}", signer.address());
            self.signer = Some(self.scope(signer));
        }
        Ok(())
    }

    /// Whether `init_modal` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn scope(&self, signer: PrivateKeySigner) -> PrivateKeySigner {
        signer.with_chain_id(Some(self.config.chain_id))
    }

    fn active(&self, address: Address) -> Result<&PrivateKeySigner> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| eyre::eyre!("Hosted signer is not connected"))?;
        eyre::ensure!(
            signer.address() == address,
            "Hosted session is for {}, not {}",
            signer.address(),
            address
        );
        Ok(signer)
    }
}

impl<L: LoginFlow> WalletProvider for HostedSigner<L> {
    async fn connect(&mut self) -> Result<()> {
        eyre::ensure!(self.initialized, "Login modal not initialized");

        let session = self.flow.login(&self.config).await?;
        match session {
            Some(signer) => {
                tracing::info!("Hosted login completed for {}", signer.address());
                self.signer = Some(self.scope(signer));
            }
            None => tracing::info!("Hosted login closed without a session"),
        }
        Ok(())
    }

    async fn request_addresses(&self) -> Result<Vec<Address>> {
        Ok(self.signer.iter().map(|s| s.address()).collect())
    }

    async fn sign_message(&self, address: Address, message: &[u8]) -> Result<Signature> {
        self.active(address)?
            .sign_message(message)
            .await
            .context("Failed to sign message")
    }

    async fn disconnect(&mut self) -> Result<()> {
        // The key is dropped even when the provider side logout fails
        self.signer = None;
        self.flow.logout().await.context("Hosted logout failed")
    }

    fn is_connected(&self) -> bool {
        self.signer.is_some()
    }
}
