use chrono::{DateTime, Utc};
use coupon_shared::{Coupon, NewCoupon};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::seed::default_seed;

/// In-memory coupon pool with a round-robin cursor.
///
/// The cursor moves one slot for every coupon inspected by [`next_coupon`],
/// so each call resumes right after whatever the previous call looked at.
///
/// [`next_coupon`]: CouponRegistry::next_coupon
#[derive(Debug, Clone)]
pub struct CouponRegistry {
    seed: Vec<Coupon>,
    coupons: Vec<Coupon>,
    cursor: usize,
}

impl CouponRegistry {
    /// Registry holding the built-in demo coupons
    pub fn new() -> Self {
        Self::with_seed(default_seed(Utc::now()))
    }

    /// Registry whose initial (and post-reset) pool is `seed`
    pub fn with_seed(seed: Vec<Coupon>) -> Self {
        Self {
            coupons: seed.clone(),
            seed,
            cursor: 0,
        }
    }

    /// Every coupon in insertion order, claimed ones included
    pub fn list_coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn get(&self, coupon_id: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.id == coupon_id)
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn available_count_at(&self, now: DateTime<Utc>) -> usize {
        self.coupons.iter().filter(|c| c.is_available_at(now)).count()
    }

    /// Append an unclaimed coupon under a fresh id
    pub fn add_coupon(&mut self, new: NewCoupon) -> Coupon {
        let coupon = Coupon::issue(Uuid::new_v4().to_string(), new);
        info!("Coupon {} added as {}", coupon.code, coupon.id);
        self.coupons.push(coupon.clone());
        coupon
    }

    pub fn next_coupon(&mut self) -> Option<Coupon> {
        self.next_coupon_at(Utc::now())
    }

    /// Next unclaimed, unexpired coupon in round-robin order.
    /// Returns `None` after one full lap without a hit.
    pub fn next_coupon_at(&mut self, now: DateTime<Utc>) -> Option<Coupon> {
        let len = self.coupons.len();
        if len == 0 {
            return None;
        }

        let start = self.cursor;
        loop {
            let position = self.cursor;
            self.cursor = (self.cursor + 1) % len;

            if let Some(coupon) = self.coupons.get(position) {
                if coupon.is_available_at(now) {
                    debug!("Offering coupon {} from slot {}", coupon.id, position);
                    return Some(coupon.clone());
                }
            }

            if self.cursor == start {
                debug!("No eligible coupon among {} slots", len);
                return None;
            }
        }
    }

    pub fn claim(&mut self, coupon_id: &str, claimant: &str) -> Option<Coupon> {
        self.claim_at(coupon_id, claimant, Utc::now())
    }

    /// Mark a coupon as claimed. Fails for unknown or already-claimed ids.
    /// Expiry is not checked here: an offered coupon stays claimable.
    pub fn claim_at(&mut self, coupon_id: &str, claimant: &str, now: DateTime<Utc>) -> Option<Coupon> {
        let Some(coupon) = self.coupons.iter_mut().find(|c| c.id == coupon_id) else {
            warn!("Claim rejected, unknown coupon {}", coupon_id);
            return None;
        };

        if coupon.claimed {
            warn!("Claim rejected, coupon {} already claimed", coupon_id);
            return None;
        }

        *coupon = Coupon {
            claimed: true,
            claimed_by: Some(claimant.to_string()),
            claimed_at: Some(now),
            ..coupon.clone()
        };

        info!("Coupon {} ({}) claimed", coupon.id, coupon.code);
        Some(coupon.clone())
    }

    /// Restore the seed pool and rewind the cursor
    pub fn reset(&mut self) {
        self.coupons = self.seed.clone();
        self.cursor = 0;
        info!("Coupon registry reset to {} seed coupons", self.coupons.len());
    }
}

impl Default for CouponRegistry {
    fn default() -> Self {
        Self::new()
    }
}
