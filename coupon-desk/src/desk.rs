use chrono::{DateTime, Utc};
use coupon_core::Clock;
use coupon_shared::{ClientIdentity, Coupon};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::DeskError;
use crate::state::DeskState;

/// Runs the visitor flow: check eligibility, offer the next coupon, claim it,
/// then record the claim against the visitor's identity.
///
/// Each identity holds at most one pending offer, and may only claim that
/// offer while the claim guard allows it.
#[derive(Debug)]
pub struct ClaimDesk<C: Clock> {
    state: DeskState,
    clock: C,
    pending: HashMap<String, Coupon>,
}

impl<C: Clock> ClaimDesk<C> {
    pub fn new(state: DeskState, clock: C) -> Self {
        Self {
            state,
            clock,
            pending: HashMap::new(),
        }
    }

    pub fn state(&self) -> &DeskState {
        &self.state
    }

    pub fn coupons(&self) -> &[Coupon] {
        self.state.registry.list_coupons()
    }

    /// Coupon offered to `identity` and not yet claimed
    pub fn pending_offer(&self, identity: &ClientIdentity) -> Option<&Coupon> {
        self.pending.get(identity.key())
    }

    /// Offer a coupon. An identity that already holds an offer that is still
    /// available gets the same offer back and the cursor does not move.
    pub fn request_coupon(&mut self, identity: &ClientIdentity) -> Result<Coupon, DeskError> {
        let now = self.clock.now();
        self.ensure_eligible(identity, now)?;

        let key = identity.key();
        if let Some(offer_id) = self.pending.get(key).map(|offer| offer.id.clone()) {
            match self.state.registry.get(&offer_id) {
                Some(current) if current.is_available_at(now) => {
                    debug!("Re-offering pending {} to {}", current.code, identity.ip_address);
                    let current = current.clone();
                    self.pending.insert(key.to_string(), current.clone());
                    return Ok(current);
                }
                _ => {
                    self.pending.remove(key);
                }
            }
        }

        let coupon = self
            .state
            .registry
            .next_coupon_at(now)
            .ok_or(DeskError::PoolExhausted)?;

        debug!("Offering {} to {}", coupon.code, identity.ip_address);
        self.pending.insert(key.to_string(), coupon.clone());
        Ok(coupon)
    }

    /// Claim the coupon previously offered to `identity`
    pub fn claim_coupon(&mut self, identity: &ClientIdentity, coupon_id: &str) -> Result<Coupon, DeskError> {
        let now = self.clock.now();
        self.ensure_eligible(identity, now)?;

        let key = identity.key();
        let offered = self.pending.get(key).is_some_and(|offer| offer.id == coupon_id);
        if !offered {
            warn!("{} tried to claim {} without an offer", identity.ip_address, coupon_id);
            return Err(DeskError::NotOffered(coupon_id.to_string()));
        }
        self.pending.remove(key);

        let claimed = self
            .state
            .registry
            .claim_at(coupon_id, key, now)
            .ok_or_else(|| DeskError::CouponUnavailable(coupon_id.to_string()))?;

        self.state.guard.record_claim_at(identity, coupon_id, now);
        info!("{} claimed by {}", claimed.code, identity.ip_address);
        Ok(claimed)
    }

    /// Demo only: restore the seed pool and forget every claim
    pub fn reset(&mut self) {
        self.state.registry.reset();
        self.state.guard.reset_history();
        self.pending.clear();
    }

    fn ensure_eligible(&self, identity: &ClientIdentity, now: DateTime<Utc>) -> Result<(), DeskError> {
        let status = self.state.guard.check_eligibility_at(identity.key(), now);
        if status.allowed {
            return Ok(());
        }
        Err(DeskError::CooldownActive {
            minutes_remaining: status.time_remaining.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use coupon_core::ManualClock;
    use coupon_guard::ClaimGuard;
    use coupon_registry::CouponRegistry;
    use coupon_shared::NewCoupon;

    fn desk_with(clock: &ManualClock, codes: &[&str]) -> ClaimDesk<ManualClock> {
        let now = clock.now();
        let seed = codes
            .iter()
            .enumerate()
            .map(|(idx, code)| {
                Coupon::issue((idx + 1).to_string(), NewCoupon::new(*code, "test", now + Duration::days(1)))
            })
            .collect();
        ClaimDesk::new(
            DeskState::new(CouponRegistry::with_seed(seed), ClaimGuard::new()),
            clock.clone(),
        )
    }

    fn desk(clock: &ManualClock) -> ClaimDesk<ManualClock> {
        desk_with(clock, &["A", "B"])
    }

    #[test]
    fn test_request_then_claim() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk(&clock);
        let visitor = ClientIdentity::new("192.168.0.1", "fp");

        let offered = desk.request_coupon(&visitor).unwrap();
        assert_eq!(desk.pending_offer(&visitor), Some(&offered));

        let claimed = desk.claim_coupon(&visitor, &offered.id).unwrap();
        assert!(claimed.claimed);
        assert_eq!(claimed.claimed_by.as_deref(), Some("192.168.0.1"));
        assert!(desk.pending_offer(&visitor).is_none());
        assert_eq!(desk.state().guard.history("192.168.0.1").len(), 1);
    }

    #[test]
    fn test_cooldown_blocks_second_request() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk(&clock);
        let visitor = ClientIdentity::new("192.168.0.1", "fp");

        let offered = desk.request_coupon(&visitor).unwrap();
        desk.claim_coupon(&visitor, &offered.id).unwrap();

        clock.advance(Duration::minutes(15));
        assert_eq!(
            desk.request_coupon(&visitor),
            Err(DeskError::CooldownActive { minutes_remaining: 45 })
        );
    }

    #[test]
    fn test_cooldown_blocks_claiming_other_coupons() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk_with(&clock, &["A", "B", "C", "D", "E"]);
        let visitor = ClientIdentity::new("192.168.1.1", "fp");

        let offered = desk.request_coupon(&visitor).unwrap();
        desk.claim_coupon(&visitor, &offered.id).unwrap();

        for id in ["2", "3", "4", "5"] {
            assert_eq!(
                desk.claim_coupon(&visitor, id),
                Err(DeskError::CooldownActive { minutes_remaining: 60 })
            );
        }
        assert_eq!(desk.state().guard.history(visitor.key()).len(), 1);
        assert!(desk.coupons().iter().skip(1).all(|c| !c.claimed));
    }

    #[test]
    fn test_claim_requires_matching_offer() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk(&clock);
        let first = ClientIdentity::new("192.168.0.1", "fp1");
        let second = ClientIdentity::new("192.168.0.2", "fp2");

        // Nothing offered yet
        assert_eq!(desk.claim_coupon(&first, "1"), Err(DeskError::NotOffered("1".into())));

        let first_offer = desk.request_coupon(&first).unwrap();
        let second_offer = desk.request_coupon(&second).unwrap();
        assert_ne!(first_offer.id, second_offer.id);

        // Another visitor's offer is off limits, and the rejection keeps the own offer
        assert_eq!(
            desk.claim_coupon(&second, &first_offer.id),
            Err(DeskError::NotOffered(first_offer.id.clone()))
        );
        assert!(desk.state().guard.history(second.key()).is_empty());
        assert_eq!(desk.pending_offer(&second), Some(&second_offer));
        assert!(desk.claim_coupon(&second, &second_offer.id).is_ok());
    }

    #[test]
    fn test_repeat_request_returns_pending_offer() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk(&clock);
        let visitor = ClientIdentity::new("192.168.0.1", "fp");

        let offered = desk.request_coupon(&visitor).unwrap();
        let cursor = desk.state().registry.cursor();

        assert_eq!(desk.request_coupon(&visitor).unwrap(), offered);
        assert_eq!(desk.state().registry.cursor(), cursor);
    }

    #[test]
    fn test_stale_pending_offer_replaced() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk_with(&clock, &["A"]);
        let slow = ClientIdentity::new("192.168.0.1", "fp1");
        let fast = ClientIdentity::new("192.168.0.2", "fp2");

        desk.request_coupon(&slow).unwrap();
        let offered = desk.request_coupon(&fast).unwrap();
        desk.claim_coupon(&fast, &offered.id).unwrap();

        // The only coupon is gone, so the slow visitor's offer is dropped
        assert_eq!(desk.request_coupon(&slow), Err(DeskError::PoolExhausted));
        assert!(desk.pending_offer(&slow).is_none());
    }

    #[test]
    fn test_offer_claimable_after_expiry() {
        let clock = ManualClock::new(Utc::now());
        let mut desk = desk(&clock);
        let visitor = ClientIdentity::new("192.168.0.1", "fp");

        let offered = desk.request_coupon(&visitor).unwrap();
        clock.advance(Duration::days(2));
        assert!(desk.claim_coupon(&visitor, &offered.id).is_ok());
    }
}
