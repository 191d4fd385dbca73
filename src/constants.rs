//! Constants for the Notus API and the Polygon token pair used by the swap flow

use alloy::primitives::utils::parse_units;
use alloy::primitives::{address, Address, U256};
use eyre::{ensure, eyre, Result};
use std::time::Duration;

/// Default Notus API base URL
pub const NOTUS_API_BASE: &str = "https://api.notuslabs.xyz/api/v1";

/// Header carrying the static API key on every request
pub const API_KEY_HEADER: &str = "x-api-key";

/// Polygon PoS mainnet chain id
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Chain name accepted by the swap endpoint
pub const POLYGON_CHAIN_NAME: &str = "POLYGON";

/// Native USDC on Polygon
pub const USDC_POLYGON: Address = address!("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359");

/// BRZ (Brazilian Digital Token) on Polygon
pub const BRZ_POLYGON: Address = address!("0x4eD141110F6EeeAbA9A1df36d8c26f684d2475Dc");

/// Smart wallet factory the account abstraction address is derived from
pub const FACTORY_ADDRESS: Address = address!("0xE77f2C7D79B2743d39Ad73DC47a8e9C6416aD3f3");

/// Salt used for smart wallet derivation
pub const DEFAULT_SALT: &str = "0";

/// Swap amount used by the injected-provider flow (5 USDC)
pub const INJECTED_AMOUNT_IN: &str = "5";

/// Swap amount used by the hosted-login flow (0.8 USDC)
pub const HOSTED_AMOUNT_IN: &str = "0.8";

/// Swap provider requested by the hosted-login flow
pub const DEFAULT_SWAP_PROVIDER: &str = "PARASWAP";

/// Timeout applied to quote requests in the injected-provider flow
pub const QUOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Decimals of USDC, the input token of both swap flows
pub const USDC_DECIMALS: u8 = 6;

/// Parse a decimal token amount ("5", "0.8") into base units, rejecting zero and negatives
///
/// Digits beyond `decimals` are truncated, so dust below the token precision counts as zero.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256> {
    let units = parse_units(amount, decimals).map_err(|e| eyre!("Invalid amount {:?}: {}", amount, e))?;
    ensure!(
        units.is_positive() && !units.is_zero(),
        "Amount must be positive, got {:?}",
        amount
    );
    Ok(units.get_absolute())
}
