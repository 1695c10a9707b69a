use super::corridor::{CorridorParams, DEFAULT_BEARING_TOLERANCE};
use super::ranker::{RankParams, DEFAULT_PREFILTER, DEFAULT_TOP_K};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::{env, num::NonZeroU32, str::FromStr, time::Duration};

const ENV_POI_SOURCE: &str = "WISATA_POI_SOURCE";
const ENV_GEOCODER_URL: &str = "WISATA_GEOCODER_URL";
const ENV_ROUTER_URL: &str = "WISATA_ROUTER_URL";
const ENV_USER_AGENT: &str = "WISATA_USER_AGENT";
const ENV_HTTP_TIMEOUT_SECS: &str = "WISATA_HTTP_TIMEOUT_SECS";
const ENV_GEOCODER_RPS: &str = "WISATA_GEOCODER_RPS";
const ENV_ROUTER_RPS: &str = "WISATA_ROUTER_RPS";
const ENV_PREFILTER: &str = "WISATA_PREFILTER";
const ENV_TOP_K: &str = "WISATA_TOP_K";
const ENV_BEARING_TOLERANCE: &str = "WISATA_BEARING_TOLERANCE";

const DEFAULT_POI_SOURCE: &str = "data/wisata_diy.geojson";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File path or URL of the POI collection.
    pub poi_source: String,
    pub geocoder_url: String,
    pub router_url: String,
    pub user_agent: String,
    /// `None` leaves requests without a timeout.
    pub http_timeout: Option<Duration>,
    pub geocoder_rps: NonZeroU32,
    pub router_rps: NonZeroU32,
    pub rank: RankParams,
    pub corridor: CorridorParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poi_source: DEFAULT_POI_SOURCE.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            router_url: DEFAULT_ROUTER_URL.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            http_timeout: None,
            geocoder_rps: NonZeroU32::MIN,
            router_rps: NonZeroU32::new(20).unwrap_or(NonZeroU32::MIN),
            rank: RankParams {
                prefilter: DEFAULT_PREFILTER,
                top_k: DEFAULT_TOP_K,
            },
            corridor: CorridorParams {
                tolerance_deg: DEFAULT_BEARING_TOLERANCE,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(source) = lookup(ENV_POI_SOURCE) {
            cfg.poi_source = source;
        }
        if let Some(url) = lookup(ENV_GEOCODER_URL) {
            cfg.geocoder_url = url;
        }
        if let Some(url) = lookup(ENV_ROUTER_URL) {
            cfg.router_url = url;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            cfg.user_agent = agent;
        }
        if let Some(secs) = parse_var(&lookup, ENV_HTTP_TIMEOUT_SECS)? {
            cfg.http_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(rps) = parse_var(&lookup, ENV_GEOCODER_RPS)? {
            cfg.geocoder_rps = rps;
        }
        if let Some(rps) = parse_var(&lookup, ENV_ROUTER_RPS)? {
            cfg.router_rps = rps;
        }
        if let Some(n) = parse_var(&lookup, ENV_PREFILTER)? {
            cfg.rank.prefilter = n;
        }
        if let Some(k) = parse_var(&lookup, ENV_TOP_K)? {
            cfg.rank.top_k = k;
        }
        if let Some(deg) = parse_var(&lookup, ENV_BEARING_TOLERANCE)? {
            cfg.corridor.tolerance_deg = deg;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let tolerance = self.corridor.tolerance_deg;
        if !(tolerance > 0.0 && tolerance <= 180.0) {
            return Err(anyhow!(
                "Bearing tolerance must be within (0, 180] degrees, got {tolerance}"
            ));
        }
        if self.rank.top_k > self.rank.prefilter {
            log::warn!(
                "Top {} requested but only {} candidates are kept after prefiltering",
                self.rank.top_k,
                self.rank.prefilter
            );
        }
        Ok(())
    }

    /// The HTTP client shared by every outgoing request.
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("Failed to build HTTP client")
    }
}

fn parse_var<T, L>(lookup: &L, key: &str) -> Result<Option<T>>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {key}: {raw:?}"))
        })
        .transpose()
}
