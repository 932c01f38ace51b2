// Domain layer modules
pub mod user;

// Re-exports
pub use user::{UserProfile, USER_ENTITY};
