mod auth;

pub use auth::{AuthUser, BearerAuth};
