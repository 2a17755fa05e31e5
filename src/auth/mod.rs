//! Authentication module
//!
//! Password hashing, credential checks, token issuance and the
//! login/registration flow built on top of them.

mod authenticator;
mod extractor;
pub mod handlers;
mod password;
pub mod roles;
mod service;
mod token;

pub use authenticator::{AuthenticatedIdentity, Authenticator};
pub use password::PasswordHasher;
pub use service::{AuthService, JwtResponse, MessageResponse, Registration, REGISTERED_MESSAGE};
pub use token::{Claims, TokenIssuer};
