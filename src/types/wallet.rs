//! Smart wallet registration and lookup types

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// The `(externallyOwnedAccount, factory, salt)` triple a smart wallet is derived from.
///
/// Sent as the JSON body of `POST /wallets/register` and as the query string of
/// `GET /wallets/address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletQuery {
    pub externally_owned_account: Address,
    pub factory: Address,
    pub salt: String,
}

impl WalletQuery {
    pub fn new(externally_owned_account: Address, factory: Address, salt: impl Into<String>) -> Self {
        Self {
            externally_owned_account,
            factory,
            salt: salt.into(),
        }
    }
}

/// Response body of both wallet endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct WalletResponse {
    pub wallet: SmartWallet,
}

/// Smart wallet record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartWallet {
    /// Account abstraction (smart contract wallet) address
    pub account_abstraction: Address,
    #[serde(default)]
    pub externally_owned_account: Option<Address>,
    #[serde(default)]
    pub factory: Option<Address>,
    #[serde(default)]
    pub salt: Option<String>,
}
