pub mod desk;
pub mod error;
pub mod notifier;
pub mod state;

pub use desk::ClaimDesk;
pub use error::DeskError;
pub use notifier::Notifier;
pub use state::DeskState;
