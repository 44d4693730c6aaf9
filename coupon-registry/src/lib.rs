pub mod registry;
pub mod seed;

pub use registry::CouponRegistry;
pub use seed::{build_seed, default_seed, SeedCoupon, SeedError};
