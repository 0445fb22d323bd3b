use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/* =======================
EXCHANGE CONSTANTS (BNB Chain)
======================= */

pub const CHAIN_ID: u64 = 56;

/// EIP-712 domain name and version of the exchange verifier.
pub const EXCHANGE_NAME: &str = "Opinion CTF Exchange";
pub const EXCHANGE_VERSION: &str = "1";

/// CTF exchange contract the orders are verified against. Lowercase on
/// purpose: the domain separator and the wire payload both carry the
/// lowercase form.
pub const EXCHANGE_ADDRESS: &str = "0x5e97d310ac6e2f33c9c16cd9c6d42d3db6ca24a6";

/// USDT on BNB Chain, the stable reference collateral. Markets quoting in
/// anything else use the non-stable price convention (see execution::amounts).
pub const USDT_ADDRESS: &str = "0x55d398326f99059ff775485246999027b3197955";

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/* =======================
CLI ARGS
======================= */

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, sign and submit a limit order
    Place {
        /// Market identifier
        #[arg(long)]
        market: String,
        /// BUY or SELL
        #[arg(long)]
        side: String,
        /// Limit price on the 0-100 percentage scale
        #[arg(long)]
        price: String,
        /// Share count (SHARES mode)
        #[arg(long)]
        shares: Option<String>,
        /// Currency amount (AMOUNT mode, buy only)
        #[arg(long)]
        amount: Option<String>,
        /// YES or NO outcome token
        #[arg(long, default_value = "YES")]
        outcome: String,
        /// Collateral token address; defaults to USDT (the stable reference)
        #[arg(long)]
        collateral: Option<String>,
        /// Bypass the metadata cache
        #[arg(long)]
        refresh: bool,
        /// Print the signed payload without submitting
        #[arg(long)]
        dry_run: bool,
    },
    /// List open orders for a market (raw API pass-through)
    Orders {
        #[arg(long)]
        market: String,
    },
}

/* =======================
WALLET CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Owner key, normally injected via the PRIVATE_KEY env var instead of
    /// the config file.
    pub private_key: Option<String>,
    pub chain_id: u64,
    /// The contract wallet that bears the trade (order `maker`).
    pub maker_wallet: String,
}

/* =======================
API CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub clob_api_url: String,
    pub market_api_url: String,

    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_passphrase: Option<String>,
}

/* =======================
MAIN CONFIG
======================= */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub wallet: WalletConfig,
    /// Directory for the on-disk market metadata cache.
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                clob_api_url: "https://clob.opinionmarket.io".to_string(),
                market_api_url: "https://api.opinionmarket.io".to_string(),
                api_key: None,
                api_secret: None,
                api_passphrase: None,
            },
            wallet: WalletConfig {
                private_key: None,
                chain_id: CHAIN_ID,
                maker_wallet: String::new(),
            },
            cache_dir: PathBuf::from(".market-cache"),
        }
    }
}

impl Config {
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            let cfg = Config::default();
            let content = serde_json::to_string_pretty(&cfg)?;
            std::fs::write(path, content)?;
            Ok(cfg)
        }
    }
}
