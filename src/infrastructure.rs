// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod notification;
pub mod user_repository;

// Re-exports
pub use config::{ApiConfig, ApiConfigError};
pub use logging::init_logging;
pub use notification::{NotificationError, NotificationPublisher, SnsNotificationPublisher};
pub use user_repository::{DynamoUserRepository, UserRepository, UserRepositoryError};
