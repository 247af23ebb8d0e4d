//! Session cookies, password hashing and the middleware that guards protected routes.

mod cookie;
mod middleware;
mod password;
mod session;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use middleware::{AuthState, auth_guard};
pub use password::PasswordHash;
pub use session::{log_in_response, log_out_response};
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
