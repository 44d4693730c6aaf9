pub mod claim;
pub mod coupon;
pub mod feedback;
