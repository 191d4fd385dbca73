//! Request and response types for the Notus API

pub mod swap;
pub mod user_op;
pub mod wallet;

pub use swap::{
    ChainTarget, EstimatedFees, GasFeePaymentMethod, QuoteResponse, SwapParams, SwapQuote,
};
pub use user_op::{ExecuteUserOpRequest, ExecuteUserOpResponse};
pub use wallet::{SmartWallet, WalletQuery, WalletResponse};
