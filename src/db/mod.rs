//! Persistence for users and roles.
//!
//! The auth layer only sees the `UserStore` and `RoleStore` traits;
//! `PgStore` backs them with PostgreSQL and `MemoryStore` keeps everything
//! in process.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use models::{NewUser, Role, RoleName, User};
pub use postgres::PgStore;
pub use store::{RoleStore, UserStore};
