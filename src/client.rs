//! NotusClient - HTTP client for the Notus smart wallet API

use crate::config::{NotusConfig, ResolveStrategy};
use crate::constants::API_KEY_HEADER;
use crate::types::{
    ExecuteUserOpRequest, ExecuteUserOpResponse, QuoteResponse, SwapParams, SwapQuote,
    WalletQuery, WalletResponse,
};
use alloy::primitives::{Address, Signature};
use eyre::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the Notus wallet and crypto endpoints
#[derive(Debug, Clone)]
pub struct NotusClient {
    client: Client,
    config: NotusConfig,
}

impl NotusClient {
    /// Create a new NotusClient
    pub fn new(config: NotusConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("NotusRustSDK/0.1.0")
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Get the API configuration
    pub fn config(&self) -> &NotusConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.config.api_key)
    }

    // ========== Smart Wallet ==========

    /// The wallet query for a signer using the configured factory and salt
    pub fn wallet_query(&self, signer: Address) -> WalletQuery {
        WalletQuery::new(signer, self.config.factory, self.config.salt.clone())
    }

    /// Register the smart wallet of a signer (`POST /wallets/register`)
    pub async fn register_wallet(&self, query: &WalletQuery) -> Result<Address> {
        let resp = self
            .authed(self.client.post(self.url("/wallets/register")))
            .json(query)
            .send()
            .await
            .context("Failed to register smart wallet")?;

        let body: WalletResponse = parse_response(resp, "register smart wallet").await?;
        Ok(body.wallet.account_abstraction)
    }

    /// Look up the smart wallet of a signer (`GET /wallets/address`)
    pub async fn wallet_address(&self, query: &WalletQuery) -> Result<Address> {
        let resp = self
            .authed(self.client.get(self.url("/wallets/address")))
            .query(query)
            .send()
            .await
            .context("Failed to look up smart wallet")?;

        let body: WalletResponse = parse_response(resp, "look up smart wallet").await?;
        Ok(body.wallet.account_abstraction)
    }

    /// Resolve the account abstraction address of a signer using the configured strategy
    pub async fn resolve_smart_wallet(&self, signer: Address) -> Result<Address> {
        let query = self.wallet_query(signer);

        if self.config.resolve_strategy == ResolveStrategy::RegisterThenLookup {
            match self.register_wallet(&query).await {
                Ok(address) => {
                    tracing::info!("Registered smart wallet {} for {}", address, signer);
                    return Ok(address);
                }
                Err(err) => {
                    tracing::debug!("Register failed, falling back to lookup: {:#}", err);
                }
            }
        }

        let address = self.wallet_address(&query).await?;
        tracing::info!("Resolved smart wallet {} for {}", address, signer);
        Ok(address)
    }

    // ========== Swap ==========

    /// Request a swap quote (`POST /crypto/swap`)
    ///
    /// Uses the timeout of the configured swap defaults, if any.
    pub async fn request_swap_quote(&self, params: &SwapParams) -> Result<SwapQuote> {
        params.validate()?;

        let mut request = self
            .authed(self.client.post(self.url("/crypto/swap")))
            .json(params);
        if let Some(timeout) = self.config.swap.timeout {
            request = request.timeout(timeout);
        }

        let resp = request
            .send()
            .await
            .context("Failed to request swap quote")?;

        let body: QuoteResponse = parse_response(resp, "request swap quote").await?;
        let quote = body.into_quote()?;

        tracing::debug!(
            "Quote {:?}: {} {} -> min {} {}",
            quote.quote_id,
            quote.amount_in,
            quote.token_in,
            quote.min_amount_out,
            quote.token_out
        );
        Ok(quote)
    }

    /// Execute a signed quote as a user operation (`POST /crypto/execute-user-op`)
    ///
    /// Returns the user operation hash.
    pub async fn execute_user_op(&self, quote_id: &str, signature: &Signature) -> Result<String> {
        let body = ExecuteUserOpRequest::new(quote_id, signature);

        let resp = self
            .authed(self.client.post(self.url("/crypto/execute-user-op")))
            .json(&body)
            .send()
            .await
            .context("Failed to execute user operation")?;

        let result: ExecuteUserOpResponse = parse_response(resp, "execute user operation").await?;
        tracing::info!("Executed quote {}: user op {}", quote_id, result.user_op_hash);
        Ok(result.user_op_hash)
    }
}

/// Fail on non-2xx with status and body, otherwise decode JSON
async fn parse_response<T: DeserializeOwned>(resp: Response, action: &str) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        eyre::bail!("Failed to {}: {} - {}", action, status, body);
    }

    let text = resp
        .text()
        .await
        .with_context(|| format!("Failed to read {} response", action))?;

    serde_json::from_str(&text).with_context(|| {
        let preview: String = text.chars().take(200).collect();
        format!("Failed to parse {} response: {}", action, preview)
    })
}
