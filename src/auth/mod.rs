//! Bearer token authentication and the auth routes.
//!
//! The gateway does not issue or validate tokens itself. Registration and log
//! in are forwarded to the remote store, and [auth_guard] asks the store who a
//! token belongs to before any protected route runs.

mod current_user;
mod log_in;
mod log_out;
mod middleware;
mod register;
mod session;

pub use current_user::get_current_user;
pub use log_in::{LogInForm, log_in};
pub use log_out::log_out;
pub use middleware::{AuthState, Caller, auth_guard};
pub use register::{RegisterForm, register};
pub use session::{AuthResponse, Session};
