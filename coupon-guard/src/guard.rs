use chrono::{DateTime, Duration, Utc};
use coupon_shared::{ClaimRecord, ClientIdentity, Eligibility, Masked};
use std::collections::HashMap;
use tracing::{debug, info};

pub const DEFAULT_COOLDOWN_MINUTES: i64 = 60;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Per-identity claim history enforcing a cooldown between claims
#[derive(Debug, Clone)]
pub struct ClaimGuard {
    claims: HashMap<String, Vec<ClaimRecord>>,
    cooldown: Duration,
}

impl ClaimGuard {
    pub fn new() -> Self {
        Self::with_cooldown(Duration::minutes(DEFAULT_COOLDOWN_MINUTES))
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            claims: HashMap::new(),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn check_eligibility(&self, ip_address: &str) -> Eligibility {
        self.check_eligibility_at(ip_address, Utc::now())
    }

    /// Allowed when the identity has never claimed, or its latest claim is at
    /// least one cooldown old. Otherwise denied with whole minutes remaining.
    pub fn check_eligibility_at(&self, ip_address: &str, now: DateTime<Utc>) -> Eligibility {
        let Some(latest) = self.latest_claim_time(ip_address) else {
            return Eligibility::allowed();
        };

        let elapsed = now - latest;
        if elapsed >= self.cooldown {
            return Eligibility::allowed();
        }

        let remaining_ms = (self.cooldown - elapsed).num_milliseconds();
        let minutes = (remaining_ms + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE;
        debug!(
            "Identity {} cooling down, {} minutes remaining",
            Masked::from(ip_address),
            minutes
        );
        Eligibility::cooling_down(minutes)
    }

    pub fn record_claim(&mut self, identity: &ClientIdentity, coupon_id: &str) {
        self.record_claim_at(identity, coupon_id, Utc::now());
    }

    /// Append a claim to the identity's history. No dedup, no cap.
    pub fn record_claim_at(&mut self, identity: &ClientIdentity, coupon_id: &str, now: DateTime<Utc>) {
        let record = ClaimRecord {
            ip_address: identity.ip_address.clone(),
            fingerprint: identity.fingerprint.clone(),
            claim_time: now,
            coupon_id: coupon_id.to_string(),
        };

        info!("Recorded claim of coupon {} by {}", coupon_id, identity.ip_address);
        self.claims
            .entry(identity.key().to_string())
            .or_default()
            .push(record);
    }

    /// Claims made by an identity, oldest first
    pub fn history(&self, ip_address: &str) -> &[ClaimRecord] {
        self.claims.get(ip_address).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tracked_identities(&self) -> usize {
        self.claims.len()
    }

    pub fn reset_history(&mut self) {
        let cleared = self.claims.len();
        self.claims.clear();
        info!("Claim history reset, {} identities cleared", cleared);
    }

    fn latest_claim_time(&self, ip_address: &str) -> Option<DateTime<Utc>> {
        self.claims
            .get(ip_address)?
            .iter()
            .map(|record| record.claim_time)
            .max()
    }
}

impl Default for ClaimGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_shared::DenialReason;

    fn visitor() -> ClientIdentity {
        ClientIdentity::new("192.168.10.20", "1x2y3z")
    }

    #[test]
    fn test_fresh_identity_allowed() {
        let guard = ClaimGuard::new();
        let status = guard.check_eligibility("192.168.10.20");
        assert!(status.allowed);
        assert_eq!(status.time_remaining, None);
        assert_eq!(status.reason, None);
    }

    #[test]
    fn test_cooldown_lifecycle() {
        let mut guard = ClaimGuard::new();
        let now = Utc::now();
        let who = visitor();

        guard.record_claim_at(&who, "1", now);

        let denied = guard.check_eligibility_at(who.key(), now);
        assert!(!denied.allowed);
        assert_eq!(denied.reason, Some(DenialReason::Cooldown));
        assert_eq!(denied.time_remaining, Some(60));

        // Partial minutes round up
        let partway = guard.check_eligibility_at(who.key(), now + Duration::seconds(30 * 60 + 1));
        assert_eq!(partway.time_remaining, Some(30));

        let almost = guard.check_eligibility_at(who.key(), now + Duration::minutes(59) + Duration::seconds(59));
        assert_eq!(almost.time_remaining, Some(1));

        // Exactly one window later the identity is unrestricted again
        assert!(guard.check_eligibility_at(who.key(), now + Duration::minutes(60)).allowed);
    }

    #[test]
    fn test_other_identities_unaffected() {
        let mut guard = ClaimGuard::new();
        guard.record_claim(&visitor(), "1");

        assert!(!guard.check_eligibility("192.168.10.20").allowed);
        assert!(guard.check_eligibility("192.168.10.21").allowed);
    }

    #[test]
    fn test_latest_claim_wins_regardless_of_order() {
        let mut guard = ClaimGuard::new();
        let now = Utc::now();
        let who = visitor();

        guard.record_claim_at(&who, "2", now - Duration::minutes(10));
        guard.record_claim_at(&who, "1", now - Duration::minutes(120));

        let status = guard.check_eligibility_at(who.key(), now);
        assert_eq!(status.time_remaining, Some(50));
        assert_eq!(guard.history(who.key()).len(), 2);
    }

    #[test]
    fn test_history_keeps_fingerprint() {
        let mut guard = ClaimGuard::new();
        let who = visitor();
        guard.record_claim(&who, "4");

        let history = guard.history(who.key());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].coupon_id, "4");
        assert_eq!(history[0].fingerprint.reveal(), "1x2y3z");
        assert!(guard.history("10.9.9.9").is_empty());
    }

    #[test]
    fn test_custom_cooldown() {
        let mut guard = ClaimGuard::with_cooldown(Duration::minutes(5));
        let now = Utc::now();
        let who = visitor();
        guard.record_claim_at(&who, "1", now);

        assert_eq!(guard.check_eligibility_at(who.key(), now).time_remaining, Some(5));
        assert!(guard.check_eligibility_at(who.key(), now + Duration::minutes(5)).allowed);
    }

    #[test]
    fn test_reset_history() {
        let mut guard = ClaimGuard::new();
        let who = visitor();
        guard.record_claim(&who, "1");
        assert_eq!(guard.tracked_identities(), 1);

        guard.reset_history();
        assert_eq!(guard.tracked_identities(), 0);
        assert!(guard.check_eligibility(who.key()).allowed);
    }
}
