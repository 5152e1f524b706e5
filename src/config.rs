use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Anomaly thresholds and the trailing history window.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionCfg {
    /// Minimum number of prior observations before the statistical rule
    /// may judge a price.
    pub min_points: usize,
    /// Alert when the price falls under this share of the median.
    pub rel_factor: f64,
    /// Immediate alert under this absolute price, history or not.
    pub abs_floor: f64,
    /// Trailing look-back for the history window, in days.
    pub window_days: i64,
}

impl Default for DetectionCfg {
    fn default() -> Self {
        Self {
            min_points: 8,
            rel_factor: 0.40,
            abs_floor: 1.00,
            window_days: 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPolicyCfg {
    /// At most one dispatch per url within the cooldown window.
    Cooldown,
    /// Dispatch on every anomalous check.
    Always,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsCfg {
    pub policy: AlertPolicyCfg,
    pub cooldown_hours: i64,
}

impl Default for AlertsCfg {
    fn default() -> Self {
        Self {
            policy: AlertPolicyCfg::Cooldown,
            cooldown_hours: 12,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpCfg {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            timeout_secs: 40,
            user_agent: "Mozilla/5.0 (compatible; PricewatchBot/1.0)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    pub database_url: String,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            database_url: "sqlite://prices.db".to_string(),
        }
    }
}

/// Markup selectors believed to render the visible price on one site.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteCfg {
    pub domain: String,
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub urls_file: String,
    pub detection: DetectionCfg,
    pub alerts: AlertsCfg,
    pub http: HttpCfg,
    pub storage: StorageCfg,
    pub sites: Vec<SiteCfg>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls_file: "urls.csv".to_string(),
            detection: DetectionCfg::default(),
            alerts: AlertsCfg::default(),
            http: HttpCfg::default(),
            storage: StorageCfg::default(),
            sites: default_sites(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse config")?;
        Ok(cfg)
    }
}

fn default_sites() -> Vec<SiteCfg> {
    let site = |domain: &str, selectors: &[&str]| SiteCfg {
        domain: domain.to_string(),
        selectors: selectors.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        site("alltricks.fr", &["[itemprop=price]", "[class*=price]"]),
        site(
            "cdiscount.com",
            &["meta[itemprop=price]", "[class*=price]", "[id*=price]"],
        ),
        site(
            "leroymerlin.fr",
            &["[itemprop=price]", "[data-qa=product-price]", "[class*=price]"],
        ),
        site("ikea.com", &["[itemprop=price]", "[class*=price]"]),
        site(
            "fnac.com",
            &[r#"meta[property="product:price:amount"]"#, "[class*=price]"],
        ),
        site("boulanger.com", &["meta[itemprop=price]", "[class*=price]"]),
    ]
}
