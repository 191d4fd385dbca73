//! Notus SDK for Rust
//!
//! A Rust SDK for the Notus smart wallet API: connect a wallet, derive its
//! account abstraction address, quote a swap on Polygon and execute it as a
//! signed user operation.
//!
//! # Features
//!
//! - Injected (EIP-1193) and hosted-login wallet providers
//! - Smart wallet registration and lookup
//! - Swap quotes and user operation execution
//! - A session state machine driving the whole flow
//!
//! # Example
//!
//! ```rust,ignore
//! use notus_sdk::{InjectedSigner, NotusClient, NotusConfig, SwapSession};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let client = NotusClient::new(NotusConfig::from_env()?)?;
//!     let wallet = InjectedSigner::new("http://127.0.0.1:1248")?;
//!     let mut session = SwapSession::new(wallet, client);
//!
//!     session.connect().await;
//!     session.resolve_smart_wallet().await;
//!     session.request_quote().await;
//!     session.sign_and_execute().await;
//!
//!     println!("{}", notus_sdk::view::render(session.state()));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod session;
pub mod signer;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use client::NotusClient;
pub use config::{NotusConfig, ResolveStrategy, SwapDefaults};
pub use error::{eyre, Context, Report, Result};
pub use session::{SessionState, StepOutcome, SwapSession};
pub use signer::{EnvKeyLogin, HostedAuthConfig, HostedSigner, InjectedSigner, LoginFlow, WalletProvider};
pub use types::{
    ChainTarget, EstimatedFees, GasFeePaymentMethod, SwapParams, SwapQuote, WalletQuery,
};
pub use view::Action;
