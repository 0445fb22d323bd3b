use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cached metadata entries older than this are re-fetched.
const CACHE_HORIZON_HOURS: i64 = 24;

/// Which outcome token of a binary market is being traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Yes,
    No,
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "YES" => Ok(Outcome::Yes),
            "NO" => Ok(Outcome::No),
            other => Err(format!("outcome must be YES or NO, got {other:?}")),
        }
    }
}

/// Resolved market metadata as the order pipeline consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketMetadata {
    pub market_id: String,
    pub title: String,
    pub yes_token_id: String,
    pub no_token_id: String,
    #[serde(default)]
    pub yes_price: Option<Decimal>,
    #[serde(default)]
    pub no_price: Option<Decimal>,
}

impl MarketMetadata {
    pub fn token_id(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Yes => &self.yes_token_id,
            Outcome::No => &self.no_token_id,
        }
    }
}

/// One cache file per market id: capture timestamp plus the raw resolved
/// metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    market: MarketMetadata,
}

/// Wire shape of the metadata API.
#[derive(Debug, Deserialize)]
struct ApiMarket {
    #[serde(rename = "marketId")]
    market_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "outcomeTokens")]
    outcome_tokens: Vec<ApiOutcomeToken>,
}

#[derive(Debug, Deserialize)]
struct ApiOutcomeToken {
    outcome: String,
    #[serde(rename = "tokenId")]
    token_id: String,
    #[serde(default)]
    price: Option<Decimal>,
}

/// Time-boxed on-disk cache over the market metadata API.
#[derive(Clone)]
pub struct MarketCache {
    dir: PathBuf,
    http: Client,
    base_url: String,
}

impl MarketCache {
    pub fn new(dir: impl Into<PathBuf>, base_url: String) -> Self {
        Self {
            dir: dir.into(),
            http: Client::new(),
            base_url,
        }
    }

    /// Resolves a market id to its metadata, hitting the network only when
    /// the cached entry is missing, expired, or `force_refresh` is set.
    pub async fn get(&self, market_id: &str, force_refresh: bool) -> Result<MarketMetadata> {
        if !force_refresh {
            if let Some(entry) = self.read_entry(market_id) {
                if is_fresh(entry.fetched_at, Utc::now()) {
                    debug!("cache hit for market {market_id}");
                    return Ok(entry.market);
                }
                debug!("cache entry for market {market_id} expired");
            }
        }

        let market = self.fetch(market_id).await?;
        self.write_entry(market_id, &market)?;
        Ok(market)
    }

    /// Resolves market id + outcome to the token identifier the order will
    /// trade.
    pub async fn token_id(
        &self,
        market_id: &str,
        outcome: Outcome,
        force_refresh: bool,
    ) -> Result<String> {
        let market = self.get(market_id, force_refresh).await?;
        let token = market.token_id(outcome);
        if token.is_empty() {
            return Err(anyhow!(
                "market {market_id} has no {outcome:?} token configured"
            ));
        }
        Ok(token.to_string())
    }

    async fn fetch(&self, market_id: &str) -> Result<MarketMetadata> {
        let url = format!("{}/markets/{}", self.base_url, market_id);
        info!("🔍 Fetching metadata for market {market_id}");

        let api: ApiMarket = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("metadata request for {market_id} failed"))?
            .error_for_status()
            .with_context(|| format!("metadata request for {market_id} rejected"))?
            .json()
            .await
            .with_context(|| format!("metadata for {market_id} had unexpected shape"))?;

        resolve_market(api, market_id)
    }

    fn entry_path(&self, market_id: &str) -> PathBuf {
        self.dir.join(format!("{market_id}.json"))
    }

    fn read_entry(&self, market_id: &str) -> Option<CacheEntry> {
        let content = std::fs::read_to_string(self.entry_path(market_id)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write_entry(&self, market_id: &str, market: &MarketMetadata) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {:?}", self.dir))?;
        let entry = CacheEntry {
            fetched_at: Utc::now(),
            market: market.clone(),
        };
        let content = serde_json::to_string_pretty(&entry)?;
        std::fs::write(self.entry_path(market_id), content)
            .with_context(|| format!("writing cache entry for {market_id}"))
    }
}

fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - fetched_at < Duration::hours(CACHE_HORIZON_HOURS)
}

fn resolve_market(api: ApiMarket, requested_id: &str) -> Result<MarketMetadata> {
    let find = |name: &str| {
        api.outcome_tokens
            .iter()
            .find(|t| t.outcome.eq_ignore_ascii_case(name))
    };

    let yes = find("YES")
        .ok_or_else(|| anyhow!("market {requested_id} is missing its YES token"))?;
    let no = find("NO").ok_or_else(|| anyhow!("market {requested_id} is missing its NO token"))?;

    Ok(MarketMetadata {
        market_id: api.market_id,
        title: api.title.unwrap_or_default(),
        yes_token_id: yes.token_id.clone(),
        no_token_id: no.token_id.clone(),
        yes_price: yes.price,
        no_price: no.price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> MarketMetadata {
        MarketMetadata {
            market_id: "mkt-1".into(),
            title: "Will it rain tomorrow?".into(),
            yes_token_id: "111".into(),
            no_token_id: "222".into(),
            yes_price: None,
            no_price: None,
        }
    }

    #[test]
    fn freshness_boundary_is_24_hours() {
        let now = Utc::now();
        assert!(is_fresh(now - Duration::hours(23), now));
        assert!(!is_fresh(now - Duration::hours(24), now));
        assert!(!is_fresh(now - Duration::hours(25), now));
    }

    #[test]
    fn outcome_selects_the_token() {
        let m = metadata();
        assert_eq!(m.token_id(Outcome::Yes), "111");
        assert_eq!(m.token_id(Outcome::No), "222");
    }

    #[test]
    fn outcome_parses() {
        assert_eq!("yes".parse::<Outcome>().unwrap(), Outcome::Yes);
        assert_eq!("NO".parse::<Outcome>().unwrap(), Outcome::No);
        assert!("maybe".parse::<Outcome>().is_err());
    }

    #[test]
    fn resolve_market_requires_both_outcomes() {
        let api = ApiMarket {
            market_id: "mkt-1".into(),
            title: Some("t".into()),
            outcome_tokens: vec![ApiOutcomeToken {
                outcome: "YES".into(),
                token_id: "111".into(),
                price: None,
            }],
        };
        assert!(resolve_market(api, "mkt-1").is_err());
    }

    #[test]
    fn cache_entry_survives_disk_round_trip() {
        let dir = std::env::temp_dir().join(format!("market-cache-test-{}", std::process::id()));
        let cache = MarketCache::new(&dir, "http://localhost".to_string());

        cache.write_entry("mkt-1", &metadata()).unwrap();
        let entry = cache.read_entry("mkt-1").unwrap();
        assert_eq!(entry.market.yes_token_id, "111");
        assert!(is_fresh(entry.fetched_at, Utc::now()));

        std::fs::remove_dir_all(&dir).ok();
    }
}
