use chrono::{DateTime, Utc};
use coupon_guard::ClaimGuard;
use coupon_registry::CouponRegistry;
use coupon_store::{Config, StoreResult};

/// Everything the desk mutates, owned in one place and built once at startup
#[derive(Debug, Clone, Default)]
pub struct DeskState {
    pub registry: CouponRegistry,
    pub guard: ClaimGuard,
}

impl DeskState {
    pub fn new(registry: CouponRegistry, guard: ClaimGuard) -> Self {
        Self { registry, guard }
    }

    pub fn from_config(config: &Config, now: DateTime<Utc>) -> StoreResult<Self> {
        Ok(Self {
            registry: CouponRegistry::with_seed(config.seed_coupons(now)?),
            guard: ClaimGuard::with_cooldown(config.cooldown()?),
        })
    }
}
