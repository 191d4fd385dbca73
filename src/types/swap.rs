//! Swap quote types for user-facing API

use crate::constants::{parse_amount, USDC_DECIMALS};
use alloy::hex;
use alloy::primitives::Address;
use eyre::{ensure, eyre, Context, Result};
use serde::{Deserialize, Serialize};

/// How the gas fee of the user operation is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GasFeePaymentMethod {
    /// Fee is taken out of the swapped amount
    DeductFromAmount,
    /// Fee is charged on top of the swapped amount
    AddToAmount,
}

/// Which chain(s) the swap runs on
///
/// The API accepts either explicit chain ids or a chain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChainTarget {
    #[serde(rename_all = "camelCase")]
    Ids { chain_id_in: u64, chain_id_out: u64 },
    Named { chain: String },
}

impl ChainTarget {
    /// Same-chain swap identified by chain id
    pub fn same_chain(chain_id: u64) -> Self {
        Self::Ids {
            chain_id_in: chain_id,
            chain_id_out: chain_id,
        }
    }

    /// Swap identified by chain name (e.g. "POLYGON")
    pub fn named(chain: impl Into<String>) -> Self {
        Self::Named {
            chain: chain.into(),
        }
    }
}

/// Parameters for requesting a swap quote (`POST /crypto/swap`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    /// Token used to pay the gas fee
    pub pay_gas_fee_token: Address,
    pub token_in: Address,
    pub token_out: Address,
    /// Decimal amount of `token_in` (e.g. "5")
    pub amount_in: String,
    /// Smart wallet executing the swap
    pub wallet_address: Address,
    /// Recipient of `token_out` (defaults to the smart wallet on the API side)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<Address>,
    /// Externally owned account that signs the quote
    pub signer_address: Address,
    #[serde(flatten)]
    pub chain: ChainTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_provider: Option<String>,
    pub gas_fee_payment_method: GasFeePaymentMethod,
}

impl SwapParams {
    /// Create swap params for a token pair; gas is paid in `token_in` and deducted from the amount
    pub fn new(token_in: Address, token_out: Address, amount_in: impl Into<String>, chain: ChainTarget) -> Self {
        Self {
            pay_gas_fee_token: token_in,
            token_in,
            token_out,
            amount_in: amount_in.into(),
            wallet_address: Address::ZERO,
            to_address: None,
            signer_address: Address::ZERO,
            chain,
            swap_provider: None,
            gas_fee_payment_method: GasFeePaymentMethod::DeductFromAmount,
        }
    }

    /// Set the smart wallet and its signer
    pub fn with_wallet(mut self, wallet_address: Address, signer_address: Address) -> Self {
        self.wallet_address = wallet_address;
        self.signer_address = signer_address;
        self
    }

    /// Set the recipient of the output token
    pub fn with_to_address(mut self, to_address: Address) -> Self {
        self.to_address = Some(to_address);
        self
    }

    /// Set the swap provider (e.g. "PARASWAP")
    pub fn with_swap_provider(mut self, provider: impl Into<String>) -> Self {
        self.swap_provider = Some(provider.into());
        self
    }

    /// Set the gas fee token
    pub fn with_gas_fee_token(mut self, token: Address) -> Self {
        self.pay_gas_fee_token = token;
        self
    }

    /// Set the gas fee payment method
    pub fn with_payment_method(mut self, method: GasFeePaymentMethod) -> Self {
        self.gas_fee_payment_method = method;
        self
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        parse_amount(&self.amount_in, USDC_DECIMALS)?;
        ensure!(self.token_in != self.token_out, "Token in and token out must differ");
        ensure!(!self.wallet_address.is_zero(), "Wallet address not set");
        ensure!(!self.signer_address.is_zero(), "Signer address not set");
        Ok(())
    }
}

/// Estimated fees attached to a quote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedFees {
    pub max_gas_fee_token: String,
    pub max_gas_fee_native: String,
}

/// A priced, time-bounded swap proposal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    /// Identifier to sign; absent when the API could not price the swap
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Expiry as unix timestamp in milliseconds
    #[serde(default)]
    pub expires_at: Option<u64>,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: String,
    pub min_amount_out: String,
    #[serde(default)]
    pub estimated_fees: Option<EstimatedFees>,
    #[serde(default)]
    pub chain_id_in: Option<u64>,
    #[serde(default)]
    pub chain_id_out: Option<u64>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<Address>,
}

impl SwapQuote {
    /// Quote id if present and non-empty
    pub fn actionable_id(&self) -> Option<&str> {
        self.quote_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether the quote expired at `now_ms` (unix milliseconds).
    ///
    /// Quotes without an expiry never expire.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at.is_some_and(|expires_at| now_ms >= expires_at)
    }

    /// Raw message bytes to sign for this quote
    pub fn message_bytes(&self) -> Result<Vec<u8>> {
        let id = self
            .actionable_id()
            .ok_or_else(|| eyre!("Quote has no quote id"))?;
        quote_id_bytes(id)
    }
}

/// Decode a hex quote id into raw bytes.
///
/// The `0x` prefix is optional and odd-length input is left-padded with `0`.
pub fn quote_id_bytes(quote_id: &str) -> Result<Vec<u8>> {
    let digits = quote_id.strip_prefix("0x").unwrap_or(quote_id);
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    hex::decode(digits).with_context(|| format!("Quote id is not hex: {quote_id}"))
}

/// Body of `POST /crypto/swap`
///
/// The endpoint has answered both with a list of quotes and with a single `swap` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuoteResponse {
    Quotes { quotes: Vec<SwapQuote> },
    Swap { swap: SwapQuote },
}

impl QuoteResponse {
    /// Take the best (first) quote
    pub fn into_quote(self) -> Result<SwapQuote> {
        match self {
            Self::Quotes { quotes } => quotes
                .into_iter()
                .next()
                .ok_or_else(|| eyre!("Swap response contained no quotes")),
            Self::Swap { swap } => Ok(swap),
        }
    }
}
