pub mod guard;

pub use guard::{ClaimGuard, DEFAULT_COOLDOWN_MINUTES};
