//! Interactive CLI for the Notus SDK
//!
//! Run with: cargo run --example interactive
//!
//! Requires NOTUS_API_KEY. `SIGNER=injected` (default) talks to the wallet RPC at
//! WALLET_RPC_URL; `SIGNER=hosted` logs in with the session key in HOSTED_SESSION_KEY.

use std::io::{self, Write};

use notus_sdk::view::{available_actions, render, Action};
use notus_sdk::{
    EnvKeyLogin, HostedSigner, InjectedSigner, NotusClient, NotusConfig, StepOutcome,
    SwapSession, WalletProvider,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("NOTUS_API_KEY").expect("NOTUS_API_KEY must be set");
    let mode = std::env::var("SIGNER").unwrap_or_else(|_| "injected".to_string());

    match mode.as_str() {
        "hosted" => {
            let config = with_env_overrides(NotusConfig::hosted(api_key));
            let client_id = std::env::var("HOSTED_CLIENT_ID").unwrap_or_default();
            let mut signer = HostedSigner::new(
                config.hosted_auth(client_id),
                EnvKeyLogin::new("HOSTED_SESSION_KEY"),
            );

            // Initialization errors are logged, the user can still log in
            if let Err(err) = signer.init_modal().await {
                tracing::error!("Failed to initialize login: {:#}", err);
            }

            let mut session = SwapSession::new(signer, NotusClient::new(config)?);
            session.restore().await;
            run(session, "Hosted Login").await
        }
        _ => {
            let config = with_env_overrides(NotusConfig::injected(api_key));
            let rpc_url = std::env::var("WALLET_RPC_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:1248".to_string());
            let signer = InjectedSigner::new(rpc_url)?;

            let session = SwapSession::new(signer, NotusClient::new(config)?);
            run(session, "Injected Wallet").await
        }
    }
}

fn with_env_overrides(mut config: NotusConfig) -> NotusConfig {
    if let Ok(url) = std::env::var("NOTUS_API_URL") {
        config = config.with_base_url(url);
    }
    config
}

async fn run<W: WalletProvider>(mut session: SwapSession<W>, title: &str) -> eyre::Result<()> {
    println!("\n========================================");
    println!("       Notus Swap ({})", title);
    println!("========================================");

    // Main loop
    loop {
        println!("\n----------------------------------------");
        print!("{}", render(session.state()));
        println!("----------------------------------------");

        let actions = available_actions(session.state());
        for (i, action) in actions.iter().enumerate() {
            println!("  {}. {}", i + 1, action);
        }
        println!("  q. Quit");

        print!("Enter choice: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let choice = input.trim();

        if matches!(choice, "q" | "Q") {
            println!("\nGoodbye!");
            break;
        }

        let action = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| actions.get(i).copied());
        let Some(action) = action else {
            println!("\nInvalid choice. Please try again.");
            continue;
        };

        let outcome = match action {
            Action::Connect => session.connect().await,
            Action::GetSmartWallet => session.resolve_smart_wallet().await,
            Action::SwapQuote => session.request_quote().await,
            Action::SignAndExecute => session.sign_and_execute().await,
            Action::Disconnect => session.disconnect().await,
        };

        match outcome {
            StepOutcome::Advanced => {}
            StepOutcome::Skipped => println!("\n{}: nothing to do.", action),
            StepOutcome::Failed(err) => println!("\n{} failed: {}", action, err),
        }
    }

    Ok(())
}
