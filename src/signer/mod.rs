//! Wallet provider abstraction for the Notus SDK
//!
//! This module provides a trait-based abstraction over the wallet that owns the
//! externally owned account, allowing a session to work with both an injected
//! EIP-1193 provider (browser extension style) and a hosted login flow.

mod hosted;
mod injected;

pub use hosted::{EnvKeyLogin, HostedAuthConfig, HostedSigner, LoginFlow};
pub use injected::InjectedSigner;

use alloy::primitives::{Address, Signature};
use eyre::Result;

/// Capability interface of a connected wallet
///
/// - `InjectedSigner`: talks EIP-1193 JSON-RPC to an injected provider
/// - `HostedSigner`: obtains the signer through a hosted login flow
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for access to its accounts
    fn connect(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Returns the addresses the wallet exposes, first one is the active account
    fn request_addresses(&self) -> impl std::future::Future<Output = Result<Vec<Address>>> + Send;

    /// Signs `message` as an EIP-191 personal message with `address`
    fn sign_message(
        &self,
        address: Address,
        message: &[u8],
    ) -> impl std::future::Future<Output = Result<Signature>> + Send;

    /// Ends the wallet session
    fn disconnect(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Whether the wallet reports an active connection
    fn is_connected(&self) -> bool;
}
