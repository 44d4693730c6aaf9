use chrono::{DateTime, Duration, Utc};
use coupon_registry::seed::{build_seed, default_seed_entries, SeedCoupon};
use coupon_shared::Coupon;
use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::{StoreError, StoreResult};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub business_rules: BusinessRules,
    /// Replaces the built-in demo pool when non-empty
    #[serde(default)]
    pub seed: Vec<SeedCoupon>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i64,
    /// Artificial latency before request/claim results surface
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_identity_file")]
    pub identity_file: String,
}

fn default_cooldown_minutes() -> i64 { 60 }
fn default_request_delay_ms() -> u64 { 1500 }
fn default_identity_file() -> String { ".coupon-identity.json".to_string() }

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            cooldown_minutes: default_cooldown_minutes(),
            request_delay_ms: default_request_delay_ms(),
            identity_file: default_identity_file(),
        }
    }
}

impl Config {
    pub fn load() -> StoreResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &run_mode)
    }

    /// Layered load: `default`, then `{run_mode}`, then `local` from `dir`
    /// (all optional), then `COUPON__*` environment variables.
    pub fn load_from(dir: &Path, run_mode: &str) -> StoreResult<Self> {
        let layer = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&layer("default")).required(false))
            .add_source(config::File::with_name(&layer(run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name(&layer("local")).required(false))
            // e.g. `COUPON__BUSINESS_RULES__COOLDOWN_MINUTES=5`
            .add_source(config::Environment::with_prefix("COUPON").separator("__"))
            .build()?;

        let config: Config = s.try_deserialize()?;
        config.validate(Utc::now())?;
        tracing::debug!(
            "Loaded config: cooldown {}m, {} seed entries",
            config.business_rules.cooldown_minutes,
            config.seed.len()
        );
        Ok(config)
    }

    /// Reject values the services cannot run with: a non-positive or
    /// unrepresentable cooldown, or seed expiries out of chrono's range.
    pub fn validate(&self, now: DateTime<Utc>) -> StoreResult<()> {
        self.cooldown()?;
        self.seed_coupons(now)?;
        Ok(())
    }

    pub fn cooldown(&self) -> StoreResult<Duration> {
        let minutes = self.business_rules.cooldown_minutes;
        if minutes <= 0 {
            return Err(StoreError::Invalid(format!(
                "business_rules.cooldown_minutes must be positive, got {}",
                minutes
            )));
        }

        Duration::try_minutes(minutes).ok_or_else(|| {
            StoreError::Invalid(format!(
                "business_rules.cooldown_minutes is out of range: {}",
                minutes
            ))
        })
    }

    /// The coupons a fresh registry starts from, expiring relative to `now`
    pub fn seed_coupons(&self, now: DateTime<Utc>) -> StoreResult<Vec<Coupon>> {
        let entries = if self.seed.is_empty() {
            build_seed(&default_seed_entries(), now)?
        } else {
            build_seed(&self.seed, now)?
        };
        Ok(entries)
    }
}
