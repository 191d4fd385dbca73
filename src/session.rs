//! SwapSession - the connect, resolve, quote and execute workflow
//!
//! A session owns one wallet provider and one API client and moves through
//! [`SessionState`] one user action at a time. Every step reports a
//! [`StepOutcome`]; a failed step never touches the state.

use crate::client::NotusClient;
use crate::signer::WalletProvider;
use crate::types::SwapQuote;
use alloy::primitives::Address;
use eyre::Report;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where the session is in the workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    SignerAcquired {
        signer: Address,
    },
    WalletResolved {
        signer: Address,
        smart_wallet: Address,
    },
    QuoteObtained {
        signer: Address,
        smart_wallet: Address,
        quote: SwapQuote,
    },
    Executed {
        signer: Address,
        smart_wallet: Address,
        quote: SwapQuote,
        user_op_hash: String,
    },
}

impl SessionState {
    pub fn signer(&self) -> Option<Address> {
        match self {
            Self::Disconnected => None,
            Self::SignerAcquired { signer }
            | Self::WalletResolved { signer, .. }
            | Self::QuoteObtained { signer, .. }
            | Self::Executed { signer, .. } => Some(*signer),
        }
    }

    pub fn smart_wallet(&self) -> Option<Address> {
        match self {
            Self::Disconnected | Self::SignerAcquired { .. } => None,
            Self::WalletResolved { smart_wallet, .. }
            | Self::QuoteObtained { smart_wallet, .. }
            | Self::Executed { smart_wallet, .. } => Some(*smart_wallet),
        }
    }

    pub fn quote(&self) -> Option<&SwapQuote> {
        match self {
            Self::QuoteObtained { quote, .. } | Self::Executed { quote, .. } => Some(quote),
            _ => None,
        }
    }

    pub fn user_op_hash(&self) -> Option<&str> {
        match self {
            Self::Executed { user_op_hash, .. } => Some(user_op_hash),
            _ => None,
        }
    }
}

/// Result of a single session step
#[derive(Debug)]
pub enum StepOutcome {
    /// The state moved forward
    Advanced,
    /// The step's precondition was not met; nothing was called
    Skipped,
    /// An external call failed; the state is unchanged
    Failed(Report),
}

impl StepOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Convert a step error into a logged `Failed` outcome
fn failed(step: &str, err: Report) -> StepOutcome {
    tracing::warn!("{} failed: {:#}", step, err);
    StepOutcome::Failed(err)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// One user's swap session
pub struct SwapSession<W: WalletProvider> {
    wallet: W,
    client: NotusClient,
    state: SessionState,
    logged_in: bool,
    enforce_expiry: bool,
}

impl<W: WalletProvider> SwapSession<W> {
    /// Create a disconnected session
    pub fn new(wallet: W, client: NotusClient) -> Self {
        Self {
            wallet,
            client,
            state: SessionState::Disconnected,
            logged_in: false,
            enforce_expiry: false,
        }
    }

    /// Refuse to execute quotes past their `expiresAt`
    ///
    /// Off by default: quotes are executed regardless of expiry and the API decides.
    pub fn with_expiry_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_expiry = enforce;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the wallet reported itself connected when the signer was acquired
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Mutable access to the wallet, e.g. for adapter-specific initialization
    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn client(&self) -> &NotusClient {
        &self.client
    }

    /// Pick up a signer from a wallet that is already connected, without prompting
    ///
    /// Errors are logged and the session stays disconnected.
    pub async fn restore(&mut self) -> StepOutcome {
        if self.state != SessionState::Disconnected {
            return StepOutcome::Skipped;
        }
        if !self.wallet.is_connected() {
            return StepOutcome::Skipped;
        }

        match self.acquire_signer().await {
            Ok(outcome) => outcome,
            Err(err) => failed("Session restore", err),
        }
    }

    /// Connect the wallet and take its first address as signer
    pub async fn connect(&mut self) -> StepOutcome {
        if self.state != SessionState::Disconnected {
            return StepOutcome::Skipped;
        }

        if let Err(err) = self.wallet.connect().await {
            return failed("Wallet connect", err);
        }

        match self.acquire_signer().await {
            Ok(outcome) => outcome,
            Err(err) => failed("Wallet connect", err),
        }
    }

    async fn acquire_signer(&mut self) -> eyre::Result<StepOutcome> {
        let addresses = self.wallet.request_addresses().await?;
        let Some(signer) = addresses.first().copied() else {
            tracing::info!("Wallet returned no addresses");
            return Ok(StepOutcome::Skipped);
        };

        tracing::info!("Signer acquired: {}", signer);
        self.state = SessionState::SignerAcquired { signer };
        if self.wallet.is_connected() {
            self.logged_in = true;
        }
        Ok(StepOutcome::Advanced)
    }

    /// Resolve the smart wallet of the signer
    ///
    /// Only runs once per session; later calls are skipped and keep the cached address.
    pub async fn resolve_smart_wallet(&mut self) -> StepOutcome {
        let SessionState::SignerAcquired { signer } = self.state else {
            return StepOutcome::Skipped;
        };

        match self.client.resolve_smart_wallet(signer).await {
            Ok(smart_wallet) => {
                self.state = SessionState::WalletResolved {
                    signer,
                    smart_wallet,
                };
                StepOutcome::Advanced
            }
            Err(err) => failed("Smart wallet resolution", err),
        }
    }

    /// Request a quote for the configured swap, replacing any previous quote
    pub async fn request_quote(&mut self) -> StepOutcome {
        let (Some(signer), Some(smart_wallet)) = (self.state.signer(), self.state.smart_wallet())
        else {
            return StepOutcome::Skipped;
        };

        let params = self.client.config().swap.params_for(smart_wallet, signer);
        match self.client.request_swap_quote(&params).await {
            Ok(quote) => {
                if let Some(previous) = self.state.quote() {
                    tracing::debug!("Replacing quote {:?}", previous.quote_id);
                }
                self.state = SessionState::QuoteObtained {
                    signer,
                    smart_wallet,
                    quote,
                };
                StepOutcome::Advanced
            }
            Err(err) => failed("Swap quote", err),
        }
    }

    /// Sign the current quote id and execute it as a user operation
    pub async fn sign_and_execute(&mut self) -> StepOutcome {
        let SessionState::QuoteObtained {
            signer,
            smart_wallet,
            quote,
        } = &self.state
        else {
            return StepOutcome::Skipped;
        };
        let (signer, smart_wallet, quote) = (*signer, *smart_wallet, quote.clone());

        let Some(quote_id) = quote.actionable_id().map(str::to_owned) else {
            tracing::debug!("Quote has no id, nothing to sign");
            return StepOutcome::Skipped;
        };

        if self.enforce_expiry && quote.is_expired_at(now_ms()) {
            tracing::warn!("Quote {} expired, request a new one", quote_id);
            return StepOutcome::Skipped;
        }

        let message = match quote.message_bytes() {
            Ok(message) => message,
            Err(err) => return failed("Quote signing", err),
        };

        let signature = match self.wallet.sign_message(signer, &message).await {
            Ok(signature) => signature,
            Err(err) => return failed("Quote signing", err),
        };

        match self.client.execute_user_op(&quote_id, &signature).await {
            Ok(user_op_hash) => {
                self.state = SessionState::Executed {
                    signer,
                    smart_wallet,
                    quote,
                    user_op_hash,
                };
                StepOutcome::Advanced
            }
            Err(err) => failed("User operation execution", err),
        }
    }

    /// Drop signer, smart wallet, quote and hash, and log out of the wallet
    ///
    /// Always ends in `Disconnected`; a wallet logout error is logged only.
    pub async fn disconnect(&mut self) -> StepOutcome {
        if let Err(err) = self.wallet.disconnect().await {
            tracing::warn!("Wallet disconnect failed: {:#}", err);
        }

        self.state = SessionState::Disconnected;
        self.logged_in = false;
        StepOutcome::Advanced
    }
}
