// src/config.rs
// =============================================================================
// Turns the parsed command line into a validated crawl configuration.
//
// Defaults flow from the target:
//   target  https://ex.com/health/advising/
//   seed    https://ex.com/health/     (parent directory of the target)
//   domain  ex.com                     (host of the seed)
//   prefix  /health                    (normalized path of the seed)
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::cli::Cli;
use crate::crawl::{FixedDelay, Throttle, TokenBucket};
use crate::error::ConfigError;
use crate::links::{NormalizedUrl, Scope};

/// How to space out page fetches.
#[derive(Debug, Clone, PartialEq)]
pub enum ThrottleConfig {
    Fixed(Duration),
    /// Average pages per second; bursts up to the same number
    TokenBucket { per_second: u32 },
}

impl ThrottleConfig {
    pub fn build(&self) -> Box<dyn Throttle> {
        match self {
            ThrottleConfig::Fixed(delay) => Box::new(FixedDelay::new(*delay)),
            ThrottleConfig::TokenBucket { per_second } => {
                Box::new(TokenBucket::new(*per_second, *per_second))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed: Url,
    pub target: Url,
    pub target_key: NormalizedUrl,
    pub scope: Scope,
    pub throttle: ThrottleConfig,
    pub timeout: Duration,
    pub user_agent: String,
    pub output: Option<PathBuf>,
    pub json: bool,
}

impl CrawlConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let target = parse_web_url("target", &cli.target_url)?;
        let target_key = NormalizedUrl::from_url(&target).ok_or_else(|| ConfigError::MissingHost {
            role: "target",
            url: cli.target_url.clone(),
        })?;

        let seed = match &cli.seed {
            Some(seed) => parse_web_url("seed", seed)?,
            None => parent_of(&target, &target_key),
        };
        let seed_key = NormalizedUrl::from_url(&seed).ok_or_else(|| ConfigError::MissingHost {
            role: "seed",
            url: seed.to_string(),
        })?;

        let domain = cli
            .domain
            .clone()
            .unwrap_or_else(|| seed_key.host().to_string());

        let prefix = match &cli.prefix {
            Some(prefix) if !prefix.starts_with('/') => {
                return Err(ConfigError::InvalidPrefix(prefix.clone()))
            }
            Some(prefix) => prefix.clone(),
            None => seed_key.path().to_string(),
        };

        let throttle = match cli.rate {
            Some(0) => return Err(ConfigError::ZeroRate),
            Some(per_second) => ThrottleConfig::TokenBucket { per_second },
            None => ThrottleConfig::Fixed(Duration::from_millis(cli.delay_ms)),
        };

        Ok(Self {
            seed,
            target,
            target_key,
            scope: Scope::new(domain, prefix),
            throttle,
            timeout: Duration::from_secs(cli.timeout_secs),
            user_agent: cli.user_agent.clone(),
            output: cli.output.clone(),
            json: cli.json,
        })
    }
}

fn parse_web_url(role: &'static str, input: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(input).map_err(|source| ConfigError::InvalidUrl {
        role,
        url: input.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme {
            role,
            url: input.to_string(),
        });
    }

    Ok(url)
}

// https://ex.com/health/advising/ -> https://ex.com/health/
fn parent_of(target: &Url, key: &NormalizedUrl) -> Url {
    let parent = match key.path().rsplit_once('/') {
        Some((dir, _)) => format!("{}/", dir),
        None => "/".to_string(),
    };

    let mut seed = target.clone();
    seed.set_path(&parent);
    seed.set_query(None);
    seed.set_fragment(None);
    seed
}
