//! Configuration for the Notus SDK

use crate::constants::{
    BRZ_POLYGON, DEFAULT_SALT, DEFAULT_SWAP_PROVIDER, FACTORY_ADDRESS, HOSTED_AMOUNT_IN,
    INJECTED_AMOUNT_IN, NOTUS_API_BASE, POLYGON_CHAIN_ID, POLYGON_CHAIN_NAME, QUOTE_TIMEOUT,
    USDC_POLYGON,
};
use crate::signer::HostedAuthConfig;
use crate::types::{ChainTarget, GasFeePaymentMethod, SwapParams};
use alloy::primitives::Address;
use eyre::{Context, Result};
use std::time::Duration;

/// How the smart wallet address is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// `POST /wallets/register`, falling back to `GET /wallets/address` on failure
    RegisterThenLookup,
    /// `GET /wallets/address` only
    LookupOnly,
}

/// Fixed swap the session quotes: token pair, amount and fee settings
#[derive(Debug, Clone)]
pub struct SwapDefaults {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: String,
    pub pay_gas_fee_token: Address,
    pub chain: ChainTarget,
    pub swap_provider: Option<String>,
    pub payment_method: GasFeePaymentMethod,
    /// Send the smart wallet as explicit `toAddress`
    pub send_to_wallet: bool,
    /// Abort the quote request after this long
    pub timeout: Option<Duration>,
}

impl SwapDefaults {
    /// 5 USDC -> BRZ addressed by chain id, 30s timeout
    pub fn injected() -> Self {
        Self {
            token_in: USDC_POLYGON,
            token_out: BRZ_POLYGON,
            amount_in: INJECTED_AMOUNT_IN.to_string(),
            pay_gas_fee_token: USDC_POLYGON,
            chain: ChainTarget::same_chain(POLYGON_CHAIN_ID),
            swap_provider: None,
            payment_method: GasFeePaymentMethod::DeductFromAmount,
            send_to_wallet: true,
            timeout: Some(QUOTE_TIMEOUT),
        }
    }

    /// 0.8 USDC -> BRZ addressed by chain name through Paraswap, no timeout
    pub fn hosted() -> Self {
        Self {
            token_in: USDC_POLYGON,
            token_out: BRZ_POLYGON,
            amount_in: HOSTED_AMOUNT_IN.to_string(),
            pay_gas_fee_token: USDC_POLYGON,
            chain: ChainTarget::named(POLYGON_CHAIN_NAME),
            swap_provider: Some(DEFAULT_SWAP_PROVIDER.to_string()),
            payment_method: GasFeePaymentMethod::DeductFromAmount,
            send_to_wallet: false,
            timeout: None,
        }
    }

    /// Build quote parameters for a smart wallet and its signer
    pub fn params_for(&self, wallet: Address, signer: Address) -> SwapParams {
        let mut params = SwapParams::new(
            self.token_in,
            self.token_out,
            self.amount_in.clone(),
            self.chain.clone(),
        )
        .with_gas_fee_token(self.pay_gas_fee_token)
        .with_payment_method(self.payment_method)
        .with_wallet(wallet, signer);

        if self.send_to_wallet {
            params = params.with_to_address(wallet);
        }
        if let Some(provider) = &self.swap_provider {
            params = params.with_swap_provider(provider.clone());
        }
        params
    }
}

impl Default for SwapDefaults {
    fn default() -> Self {
        Self::injected()
    }
}

/// Notus API configuration
#[derive(Debug, Clone)]
pub struct NotusConfig {
    /// API base URL
    pub base_url: String,
    /// Static API key sent as `x-api-key`
    pub api_key: String,
    /// Chain ID (137 for Polygon)
    pub chain_id: u64,
    /// Smart wallet factory
    pub factory: Address,
    /// Smart wallet salt
    pub salt: String,
    pub resolve_strategy: ResolveStrategy,
    pub swap: SwapDefaults,
}

impl NotusConfig {
    /// Configuration of the injected-provider flow
    pub fn injected(api_key: impl Into<String>) -> Self {
        Self {
            base_url: NOTUS_API_BASE.to_string(),
            api_key: api_key.into(),
            chain_id: POLYGON_CHAIN_ID,
            factory: FACTORY_ADDRESS,
            salt: DEFAULT_SALT.to_string(),
            resolve_strategy: ResolveStrategy::RegisterThenLookup,
            swap: SwapDefaults::injected(),
        }
    }

    /// Configuration of the hosted-login flow
    pub fn hosted(api_key: impl Into<String>) -> Self {
        Self {
            resolve_strategy: ResolveStrategy::LookupOnly,
            swap: SwapDefaults::hosted(),
            ..Self::injected(api_key)
        }
    }

    /// Injected-provider configuration from environment variables
    ///
    /// Reads `NOTUS_API_KEY` (required), `NOTUS_API_URL`, `NOTUS_FACTORY` and `NOTUS_CHAIN_ID`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("NOTUS_API_KEY").context("NOTUS_API_KEY not set")?;
        let mut config = Self::injected(api_key);

        if let Ok(url) = std::env::var("NOTUS_API_URL") {
            config = config.with_base_url(url);
        }
        if let Ok(factory) = std::env::var("NOTUS_FACTORY") {
            let factory: Address = factory.parse().context("Invalid NOTUS_FACTORY")?;
            config = config.with_factory(factory);
        }
        if let Ok(chain_id) = std::env::var("NOTUS_CHAIN_ID") {
            let chain_id: u64 = chain_id.parse().context("Invalid NOTUS_CHAIN_ID")?;
            config = config.with_chain_id(chain_id);
        }

        Ok(config)
    }

    /// Set the API base URL (trailing slashes are dropped)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the smart wallet factory
    pub fn with_factory(mut self, factory: Address) -> Self {
        self.factory = factory;
        self
    }

    /// Set the resolve strategy
    pub fn with_resolve_strategy(mut self, strategy: ResolveStrategy) -> Self {
        self.resolve_strategy = strategy;
        self
    }

    /// Replace the swap defaults
    pub fn with_swap(mut self, swap: SwapDefaults) -> Self {
        self.swap = swap;
        self
    }

    /// Move the session to another chain
    ///
    /// Retargets a chain-id swap target; a named target keeps its name.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        if let ChainTarget::Ids { .. } = self.swap.chain {
            self.swap.chain = ChainTarget::same_chain(chain_id);
        }
        self
    }

    /// Hosted login settings scoped to this configuration's chain
    pub fn hosted_auth(&self, client_id: impl Into<String>) -> HostedAuthConfig {
        HostedAuthConfig::new(client_id, self.chain_id)
    }

    /// Set the quote request timeout
    pub fn with_quote_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.swap.timeout = timeout;
        self
    }
}
