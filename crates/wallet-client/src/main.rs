use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wallet_client::{FileStore, HttpBalanceApi, KeypairFileWallet, WalletSession, WalletView};

#[derive(Parser)]
#[command(name = "wallet-client", about = "Connect a wallet and watch its BONKBOY balance")]
struct Cli {
    /// Base URL of the balance API
    #[arg(long, env = "BALANCE_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// Where the connected wallet is remembered between runs
    #[arg(long, env = "WALLET_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Solana CLI keypair used as the wallet
    #[arg(long, env = "SOLANA_KEYPAIR")]
    keypair: Option<PathBuf>,

    #[arg(long, env = "TOKEN_SYMBOL", default_value = "BONKBOY")]
    symbol: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect the wallet and fetch its balance
    Connect,
    /// Forget the connected wallet
    Disconnect,
    /// Connect when disconnected, disconnect otherwise
    Toggle,
    /// Restore the stored wallet and fetch its balance once
    Status,
    /// Restore the stored wallet and refresh its balance periodically
    Watch {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
}

fn render(view: &WalletView) {
    println!("{} | {}", view.status, view.balance_label);
    if let Some(notice) = &view.notice {
        println!("{}", notice);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let session_file = cli
        .session_file
        .or_else(FileStore::default_path)
        .context("No session file given and HOME is not set")?;
    let keypair = cli
        .keypair
        .or_else(KeypairFileWallet::default_path)
        .context("No keypair given and HOME is not set")?;

    let mut session = WalletSession::new(
        Arc::new(KeypairFileWallet::new(keypair)),
        Arc::new(FileStore::new(session_file)),
        Arc::new(HttpBalanceApi::new(cli.api_url)?),
        cli.symbol,
    );

    let outcome = match cli.command {
        Command::Connect => session.connect().await,
        Command::Disconnect => session.disconnect(),
        Command::Toggle => {
            session.resume();
            session.toggle().await
        }
        Command::Status => {
            session.restore().await;
            Ok(())
        }
        Command::Watch { interval_secs } => {
            let mut session = session.with_renderer(render);
            if !session.restore().await {
                return Ok(());
            }

            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        session.fetch_balance().await;
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            return Ok(());
        }
    };

    render(&session.view());
    if let Err(e) = outcome {
        tracing::debug!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
