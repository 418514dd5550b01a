//! Client side of the hosted auth service: session lookup, refresh and
//! sign-out, stored in the request's cookies.

pub mod chunker;
pub mod client;
pub mod cookies;
pub mod error;
pub mod session;

pub use client::{AuthClient, SignOutScope};
pub use cookies::{CookieMethods, CookieOptions};
pub use error::{AuthError, ConfigError};
pub use session::{Session, User};
