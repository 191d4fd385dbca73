//! Text rendering of a session and the actions it currently allows

use crate::session::SessionState;
use std::fmt::{self, Write};

/// A user action on the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    GetSmartWallet,
    SwapQuote,
    SignAndExecute,
    Disconnect,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect => "Connect wallet",
            Self::GetSmartWallet => "Get SmartWallet",
            Self::SwapQuote => "Swap Quote",
            Self::SignAndExecute => "Signing user operation and execute",
            Self::Disconnect => "Disconnect",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actions whose preconditions hold in `state`
pub fn available_actions(state: &SessionState) -> Vec<Action> {
    match state {
        SessionState::Disconnected => vec![Action::Connect],
        SessionState::SignerAcquired { .. } => vec![Action::GetSmartWallet, Action::Disconnect],
        SessionState::WalletResolved { .. } | SessionState::Executed { .. } => {
            vec![Action::SwapQuote, Action::Disconnect]
        }
        SessionState::QuoteObtained { quote, .. } => {
            let mut actions = vec![Action::SwapQuote];
            if quote.actionable_id().is_some() {
                actions.push(Action::SignAndExecute);
            }
            actions.push(Action::Disconnect);
            actions
        }
    }
}

/// Render the session as labelled lines
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();

    let Some(signer) = state.signer() else {
        out.push_str("Not connected\n");
        return out;
    };
    let _ = writeln!(out, "Signer: {}", signer);

    if let Some(smart_wallet) = state.smart_wallet() {
        let _ = writeln!(out, "Account Abstraction: {}", smart_wallet);
    }

    if let Some(quote) = state.quote() {
        out.push_str("Swap Quote:\n");
        let _ = writeln!(out, "  Quote Id: {}", quote.quote_id.as_deref().unwrap_or(""));
        let _ = writeln!(out, "  Token in: {}", quote.token_in);
        let _ = writeln!(out, "  Token out: {}", quote.token_out);
        let _ = writeln!(out, "  Amount in: {}", quote.amount_in);
        let _ = writeln!(out, "  Min amount out: {}", quote.min_amount_out);
        if let Some(fees) = &quote.estimated_fees {
            let _ = writeln!(out, "  Max gas fee: {} (token)", fees.max_gas_fee_token);
        }
    }

    if let Some(hash) = state.user_op_hash() {
        let _ = writeln!(out, "User Op Hash: {}", hash);
    }

    out
}
