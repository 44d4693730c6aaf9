use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A redeemable coupon in the distribution pool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub description: String,
    pub expires_at: DateTime<Utc>,
    pub claimed: bool,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Build an unclaimed coupon under the given id
    pub fn issue(id: String, new: NewCoupon) -> Self {
        Self {
            id,
            code: new.code,
            description: new.description,
            expires_at: new.expires_at,
            claimed: false,
            claimed_by: None,
            claimed_at: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Unclaimed and not yet expired
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        !self.claimed && !self.is_expired_at(now)
    }
}

/// Fields a caller supplies when adding a coupon; id and claim state are assigned by the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCoupon {
    pub code: String,
    pub description: String,
    pub expires_at: DateTime<Utc>,
}

impl NewCoupon {
    pub fn new(code: impl Into<String>, description: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_availability_window() {
        let now = Utc::now();
        let coupon = Coupon::issue(
            "1".to_string(),
            NewCoupon::new("SAVE10NOW", "10% off your purchase", now + Duration::minutes(5)),
        );

        assert!(coupon.is_available_at(now));
        // Expiry boundary is exclusive
        assert!(coupon.is_expired_at(now + Duration::minutes(5)));
        assert!(!coupon.is_available_at(now + Duration::minutes(5)));
    }

    #[test]
    fn test_claimed_is_unavailable() {
        let now = Utc::now();
        let mut coupon = Coupon::issue(
            "2".to_string(),
            NewCoupon::new("FREESHIP", "Free shipping", now + Duration::days(1)),
        );
        coupon.claimed = true;

        assert!(!coupon.is_available_at(now));
        assert!(!coupon.is_expired_at(now));
    }
}
