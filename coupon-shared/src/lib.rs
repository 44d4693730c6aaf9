pub mod models;
pub mod pii;

pub use models::claim::{ClaimRecord, ClientIdentity, DenialReason, Eligibility};
pub use models::coupon::{Coupon, NewCoupon};
pub use models::feedback::{FeedbackKind, FeedbackMessage};
pub use pii::Masked;
