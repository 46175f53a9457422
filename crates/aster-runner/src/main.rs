//! # aster-runner
//!
//! Command-line front end for the Aster trading module.
//!
//! Loads an optional JSON configuration file, reads credentials from
//! `ASTER_API_KEY` / `ASTER_API_SECRET`, runs one command, and prints the
//! result as JSON on stdout. Logs go to stderr (and optionally a file).
//!
//! # Usage
//!
//! ```bash
//! aster-runner --config aster.json account
//! aster-runner order --symbol BTCUSDT --side buy --type limit --quantity 0.01 --price 60000
//! aster-runner transfer --asset USDT --amount 10
//! aster-runner depth --symbol ETHUSDT --limit 20
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use aster_core::{Credentials, OrderKind, OrderRequest, Side, TimeInForce, TransferDirection};
use aster_td::TdModule;
use aster_td::aster::AsterTd;
use aster_td::aster::config::{AppConfig, load_config};
use aster_td::event::{TdEvent, TdEventReceiver};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Aster futures trading runner.
#[derive(Parser)]
#[command(name = "aster-runner", about = "Aster futures signed REST client")]
struct Cli {
    /// Configuration file path (JSON). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show futures account balances.
    Account,

    /// Place an order.
    Order {
        #[arg(long)]
        symbol: String,
        /// buy or sell.
        #[arg(long)]
        side: Side,
        /// limit or market.
        #[arg(long = "type", default_value = "limit")]
        kind: OrderKind,
        #[arg(long)]
        quantity: Decimal,
        /// Required for limit orders.
        #[arg(long)]
        price: Option<Decimal>,
        /// gtc, ioc or fok.
        #[arg(long)]
        tif: Option<TimeInForce>,
        /// Idempotency token; generated when omitted.
        #[arg(long)]
        client_order_id: Option<String>,
    },

    /// Move funds between the spot wallet and the futures account.
    Transfer {
        #[arg(long, default_value = "USDT")]
        asset: String,
        #[arg(long)]
        amount: Decimal,
        /// to-futures or to-spot.
        #[arg(long, default_value = "to-futures")]
        direction: TransferDirection,
    },

    /// 24h ticker statistics.
    Ticker {
        #[arg(long)]
        symbol: Option<String>,
    },

    /// Order book snapshot.
    Depth {
        #[arg(long)]
        symbol: String,
        /// Levels per side (5, 10, 20, 50, 100, 500, 1000).
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = match cli.config {
        Some(ref path) => {
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => AppConfig::default(),
    };

    // 2. Initialize logging
    let module_name = config.meta.module_name_or("aster-runner");
    let log_dir = cli.log_dir.clone().or_else(|| config.meta.log_path.clone());
    aster_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &module_name);
    info!(
        "aster-runner starting: url={}, log_level={}",
        config.aster.rest_url, cli.log_level
    );

    // 3. Build the module
    let credentials = Credentials::from_env().context("credentials")?;
    let depth_limit = config.aster.depth_limit;
    let (td, events) = AsterTd::new(config.aster, credentials)?;

    // 4. Run the command
    let output = run(&td, cli.command, depth_limit).await;
    drain_events(events);

    match output {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e.user_message()).context("command failed")),
    }
}

async fn run(
    td: &AsterTd,
    command: Command,
    depth_limit: u32,
) -> aster_core::Result<serde_json::Value> {
    let value = match command {
        Command::Account => serde_json::to_value(td.fetch_account_info().await?)?,
        Command::Order {
            symbol,
            side,
            kind,
            quantity,
            price,
            tif,
            client_order_id,
        } => {
            let req = OrderRequest {
                symbol,
                side,
                kind,
                quantity,
                price,
                time_in_force: tif,
                reference_price: None,
                client_order_id,
            };
            serde_json::to_value(td.place_order(&req).await?)?
        }
        Command::Transfer {
            asset,
            amount,
            direction,
        } => serde_json::to_value(td.transfer(&asset, amount, direction).await?)?,
        Command::Ticker { symbol } => {
            serde_json::to_value(td.fetch_ticker_24hr(symbol.as_deref()).await?)?
        }
        Command::Depth { symbol, limit } => {
            let limit = limit.unwrap_or(depth_limit);
            serde_json::to_value(td.fetch_order_book(&symbol, limit).await?)?
        }
    };
    Ok(value)
}

/// Log the events the command produced.
fn drain_events(mut events: TdEventReceiver) {
    while let Ok(event) = events.try_recv() {
        match event {
            TdEvent::OrderPlaced(ack) => {
                info!("event: order {} accepted ({})", ack.order_id, ack.status)
            }
            TdEvent::OrderRejected { symbol, message } => {
                warn!("event: order {symbol} rejected: {message}")
            }
            TdEvent::BalanceUpdated(snapshot) => {
                info!("event: balance {} USDT", snapshot.total_wallet_balance)
            }
            TdEvent::TransferCompleted {
                asset,
                amount,
                tran_id,
            } => {
                info!("event: transferred {amount} {asset} (tranId={tran_id:?})")
            }
            TdEvent::Error { operation, message } => {
                warn!("event: {operation} failed: {message}")
            }
        }
    }
}
