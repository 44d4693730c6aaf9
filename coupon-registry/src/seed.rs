use chrono::{DateTime, Duration, Utc};
use coupon_shared::{Coupon, NewCoupon};
use serde::{Deserialize, Serialize};

/// A seed entry with expiry relative to registry construction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedCoupon {
    pub code: String,
    pub description: String,
    pub expires_in_days: i64,
}

impl SeedCoupon {
    pub fn new(code: &str, description: &str, expires_in_days: i64) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            expires_in_days,
        }
    }

    fn materialize(&self, now: DateTime<Utc>) -> Result<NewCoupon, SeedError> {
        let expires_at = Duration::try_days(self.expires_in_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| SeedError::ExpiryOutOfRange {
                code: self.code.clone(),
                days: self.expires_in_days,
            })?;

        Ok(NewCoupon::new(self.code.clone(), self.description.clone(), expires_at))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    #[error("Seed coupon {code}: expiry of {days} days is out of range")]
    ExpiryOutOfRange {
        code: String,
        days: i64,
    },
}

/// The demo pool handed out when nothing else is configured
pub fn default_seed_entries() -> Vec<SeedCoupon> {
    vec![
        SeedCoupon::new("SAVE10NOW", "10% off your purchase", 7),
        SeedCoupon::new("FREESHIP", "Free shipping on orders over $50", 14),
        SeedCoupon::new("BOGO2023", "Buy one get one free", 10),
        SeedCoupon::new("SUMMER25", "25% off summer collection", 30),
        SeedCoupon::new("WELCOME15", "15% off your first purchase", 60),
    ]
}

/// Turn seed entries into coupons with ids "1".."n", expiring relative to `now`
pub fn build_seed(entries: &[SeedCoupon], now: DateTime<Utc>) -> Result<Vec<Coupon>, SeedError> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| Ok(Coupon::issue((idx + 1).to_string(), entry.materialize(now)?)))
        .collect()
}

/// Built-in pool; lifetimes are at most 60 days so only a `now` at the very
/// end of the representable range yields an empty pool.
pub fn default_seed(now: DateTime<Utc>) -> Vec<Coupon> {
    build_seed(&default_seed_entries(), now).unwrap_or_default()
}
