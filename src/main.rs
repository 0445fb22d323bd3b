use opinion_clob_client::*;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use client::payload::{build_api_payload, PayloadContext};
use client::{ApiCredentials, ClobClient};
use config::{Args, Command, Config, CHAIN_ID, USDT_ADDRESS};
use domain::Side;
use execution::{LimitOrderRequest, OrderPipeline};
use market::{MarketCache, Outcome};
use wallet::WalletSigner;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let credentials = ApiCredentials {
        api_key: env_or_config("API_KEY", config.api.api_key.clone()),
        api_secret: env_or_config("API_SECRET", config.api.api_secret.clone()),
        api_passphrase: env_or_config("API_PASSPHRASE", config.api.api_passphrase.clone()),
    };
    let clob = ClobClient::new(config.api.clob_api_url.clone(), credentials);
    let cache = MarketCache::new(&config.cache_dir, config.api.market_api_url.clone());

    match args.command {
        Command::Place {
            market,
            side,
            price,
            shares,
            amount,
            outcome,
            collateral,
            refresh,
            dry_run,
        } => {
            let side: Side = side.parse().map_err(anyhow::Error::msg)?;
            let outcome: Outcome = outcome.parse().map_err(anyhow::Error::msg)?;

            let private_key = std::env::var("PRIVATE_KEY")
                .ok()
                .or_else(|| config.wallet.private_key.clone())
                .context("PRIVATE_KEY missing from env and config")?;
            let maker = std::env::var("MAKER_WALLET")
                .ok()
                .unwrap_or_else(|| config.wallet.maker_wallet.clone());
            if maker.is_empty() {
                anyhow::bail!("MAKER_WALLET missing from env and config");
            }

            let signer = WalletSigner::new(&private_key, config.wallet.chain_id)?;
            info!("🔑 Signer {:?} for maker wallet {}", signer.address(), maker);

            let token_id = cache.token_id(&market, outcome, refresh).await?;
            info!("🎯 Market {} {:?} token: {}", market, outcome, token_id);

            let collateral = collateral.unwrap_or_else(|| USDT_ADDRESS.to_string());
            let stable_collateral = collateral.eq_ignore_ascii_case(USDT_ADDRESS);

            let mut request = match (&shares, &amount) {
                (Some(shares), None) => {
                    LimitOrderRequest::from_shares(token_id, side, &price, shares)
                }
                (Some(shares), Some(amount)) => {
                    LimitOrderRequest::from_amount(token_id, side, &price, shares, amount)
                }
                _ => anyhow::bail!("provide --shares, optionally with --amount for AMOUNT mode"),
            };
            request.stable_collateral = stable_collateral;

            let pipeline = OrderPipeline::new(signer, &maker);
            let signed = match pipeline.build_signed_order(&request) {
                Ok(signed) => signed,
                Err(e) => {
                    logging::log_rejection(&e.to_string());
                    return Err(e.into());
                }
            };

            let payload = build_api_payload(
                &signed,
                &PayloadContext {
                    market_id: &market,
                    limit_price: &price,
                    collateral_address: &collateral,
                    chain_id: CHAIN_ID,
                    stable_collateral,
                    safe_rate: "0",
                },
                pipeline.clock(),
            )?;

            logging::log_submitted(&market, side.as_str(), &payload.price);

            if dry_run {
                info!("📝 [DRY-RUN] Payload:");
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            let response = clob.submit_order(&payload, pipeline.clock()).await?;
            logging::log_success(&format!(
                "Order placed{}",
                response
                    .order_id
                    .map(|id| format!(": {id}"))
                    .unwrap_or_default()
            ));
        }

        Command::Orders { market } => {
            let orders = clob
                .open_orders(&market, &domain::SystemClock)
                .await
                .context("open orders query failed")?;
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
    }

    Ok(())
}

fn env_or_config(key: &str, fallback: Option<String>) -> String {
    std::env::var(key).ok().or(fallback).unwrap_or_default()
}
