pub mod auth;
pub mod response;

pub use auth::{authenticate_jwt, AuthUser, CurrentUser};
pub use response::{ApiResponse, ApiResult};
