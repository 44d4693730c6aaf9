use coupon_shared::FeedbackMessage;

/// Expected "not available" outcomes of the claim flow
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeskError {
    #[error("You've already claimed a coupon. Please try again later ({minutes_remaining} minutes remaining).")]
    CooldownActive { minutes_remaining: i64 },

    #[error("Sorry, all coupons have been claimed. Please check back later.")]
    PoolExhausted,

    #[error("Sorry, this coupon is no longer available.")]
    CouponUnavailable(String),

    #[error("Please request a coupon before claiming.")]
    NotOffered(String),
}

impl DeskError {
    fn display_ms(&self) -> u64 {
        match self {
            DeskError::CooldownActive { .. } | DeskError::PoolExhausted => 7000,
            DeskError::CouponUnavailable(_) | DeskError::NotOffered(_) => 5000,
        }
    }
}

impl From<&DeskError> for FeedbackMessage {
    fn from(err: &DeskError) -> Self {
        FeedbackMessage::error(err.to_string(), err.display_ms())
    }
}

pub fn offer_ready() -> FeedbackMessage {
    FeedbackMessage::success("Your coupon is ready to claim!", 5000)
}

pub fn claim_succeeded(code: &str) -> FeedbackMessage {
    FeedbackMessage::success(format!("Coupon {} has been claimed successfully!", code), 7000)
}

pub fn code_copied() -> FeedbackMessage {
    FeedbackMessage::info("Coupon code copied to clipboard!", 3000)
}

pub fn reset_done() -> FeedbackMessage {
    FeedbackMessage::info("Demo has been reset. All coupons are now available.", 5000)
}
