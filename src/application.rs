// アプリケーション層モジュール
pub mod operation;
pub mod resolver_handler;

// 再エクスポート
pub use operation::{CreateUserArgs, GetUserArgs, Operation, OperationError, ResolverEvent};
pub use resolver_handler::{ResolverError, ResolverHandler};
