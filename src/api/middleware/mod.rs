//! API middleware.

mod auth;
mod error_report;
mod rate_limit;

pub use auth::{
    auth_middleware, bearer_token, require_admin, require_catalog_editor, CurrentUser,
};
pub use error_report::{panic_response, report_server_errors};
pub use rate_limit::{client_ip, rate_limit_auth_middleware, rate_limit_middleware, RateLimitError};
