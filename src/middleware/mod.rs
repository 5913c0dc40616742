pub mod auth;
pub mod response;
pub mod session;

pub use auth::{bearer_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use session::{require_login, resolve_session, CurrentUser};
