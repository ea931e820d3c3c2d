pub mod auth;
pub mod guard;
pub mod permission;
pub mod response;
mod scope;

pub use auth::session_middleware;
pub use guard::{require_admin, require_customer, require_platform_admin, CurrentUser};
pub use permission::{ensure_permission, require_permission, RequiredPermission};
pub use response::{ApiResponse, ApiResult};
