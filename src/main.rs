// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sui_wallet_session::auth::LocalAuthSdk;
use sui_wallet_session::blockchain::SuiClient;
use sui_wallet_session::cli::{self, Command, ParseError};
use sui_wallet_session::config::{AppConfig, LogFormat};
use sui_wallet_session::WalletSession;

const PROMPT: &[u8] = b"> ";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    tracing::info!(
        network = %config.network,
        rpc = config.rpc_endpoint(),
        client_id_configured = config.client_id.is_some(),
        "sui-wallet-session v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let rpc = match SuiClient::new(config.rpc_endpoint(), config.gas_budget) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            tracing::error!(error = %err, "failed to build RPC client");
            return ExitCode::FAILURE;
        }
    };

    let wallet = WalletSession::from_config(&config, Arc::new(LocalAuthSdk::new()), rpc);
    wallet.initialize().await;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl-C, shutting down");
        }
        signal_token.cancel();
    });

    run_repl(&wallet, shutdown).await;

    wallet.dispose().await;
    ExitCode::SUCCESS
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Read commands from stdin until EOF, `quit` or cancellation.
async fn run_repl(wallet: &WalletSession, shutdown: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("{}", cli::HELP);
    loop {
        if let Err(err) = write_prompt(&mut stdout).await {
            tracing::error!(error = %err, "failed to write to stdout");
            break;
        }

        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::error!(error = %err, "failed to read stdin");
                break;
            }
        };

        let command = match cli::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        let before = wallet.console().len();
        execute(wallet, command).await;
        print_new_entries(wallet, before);
    }
}

async fn write_prompt<W: AsyncWrite + Unpin>(out: &mut W) -> std::io::Result<()> {
    out.write_all(PROMPT).await?;
    out.flush().await
}

async fn execute(wallet: &WalletSession, command: Command) {
    match command {
        Command::Login { provider, email } => {
            wallet.login(&provider, email.as_deref()).await;
        }
        Command::Logout => {
            wallet.logout().await;
        }
        Command::Address => {
            wallet.get_address().await;
        }
        Command::ChainId => {
            wallet.get_chain_id().await;
        }
        Command::Balance => {
            wallet.get_balance().await;
        }
        Command::Faucet => {
            wallet.request_faucet_funds().await;
        }
        Command::Send { recipient, amount } => {
            if let Some(executed) = wallet.send_transaction(&recipient, amount).await {
                println!("{}", wallet.chain().explorer_tx_url(&executed.digest));
            }
        }
        Command::Sign { message } => {
            wallet.sign_message(message.as_deref()).await;
        }
        Command::User => {
            wallet.get_user_info().await;
        }
        Command::Wallet => {
            wallet.launch_wallet_services().await;
        }
        Command::RequestSignature => {
            wallet.request_signature().await;
        }
        Command::Console => println!("{}", wallet.console().render()),
        Command::Help => println!("{}", cli::HELP),
        Command::Quit => {}
    }
}

/// Print console entries recorded since the log had `before` entries.
fn print_new_entries(wallet: &WalletSession, before: usize) {
    let entries = wallet.console().entries();
    let added = entries.len().saturating_sub(before);
    for entry in entries.iter().take(added).rev() {
        match entry.error_code {
            Some(code) => println!("[{code}] {}", entry.message),
            None => println!("{}", entry.message),
        }
    }
}
