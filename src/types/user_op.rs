//! User operation execution types

use alloy::primitives::{Bytes, Signature};
use serde::{Deserialize, Serialize};

/// Body of `POST /crypto/execute-user-op`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteUserOpRequest {
    pub quote_id: String,
    /// 65-byte `r || s || v` signature, serialized as 0x-prefixed hex
    pub signature: Bytes,
}

impl ExecuteUserOpRequest {
    pub fn new(quote_id: impl Into<String>, signature: &Signature) -> Self {
        Self {
            quote_id: quote_id.into(),
            signature: Bytes::from(signature.as_bytes().to_vec()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteUserOpResponse {
    pub user_op_hash: String,
}
