use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::pii::Masked;

/// Caller-supplied identity signals. `ip_address` is the cooldown key; the
/// fingerprint is recorded alongside each claim but not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientIdentity {
    pub ip_address: Masked<String>,
    pub fingerprint: Masked<String>,
}

impl ClientIdentity {
    pub fn new(ip_address: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            ip_address: Masked(ip_address.into()),
            fingerprint: Masked(fingerprint.into()),
        }
    }

    /// The lookup key used by the claim guard
    pub fn key(&self) -> &str {
        self.ip_address.reveal()
    }
}

/// One successful claim, as remembered by the claim guard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRecord {
    pub ip_address: Masked<String>,
    pub fingerprint: Masked<String>,
    pub claim_time: DateTime<Utc>,
    pub coupon_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    Cooldown,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Cooldown => "Time restriction",
        }
    }
}

/// Outcome of an eligibility check. A denial is a normal result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Eligibility {
    pub allowed: bool,
    pub reason: Option<DenialReason>,
    /// Whole minutes until the identity may claim again, rounded up
    pub time_remaining: Option<i64>,
}

impl Eligibility {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            time_remaining: None,
        }
    }

    pub fn cooling_down(minutes_remaining: i64) -> Self {
        Self {
            allowed: false,
            reason: Some(DenialReason::Cooldown),
            time_remaining: Some(minutes_remaining),
        }
    }
}
