//! # dirview-auth
//!
//! Authentication for DirView: Argon2id password hashing, the provisioned
//! user registry, in-memory sessions with sliding and absolute expiry, and
//! the request gate that guards protected routes.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing in the `base64(salt):base64(hash)` form
//! - `users`: user registry lookup
//! - `session`: session store and background sweeper
//! - `gate`: per-request authorization
//! - `clock`: injectable time source

pub mod clock;
pub mod error;
pub mod gate;
pub mod password;
pub mod session;
pub mod users;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use gate::RequestGate;
pub use password::PasswordHasher;
pub use session::{Session, SessionStore, SessionSweeper};
pub use users::{StaticUserDirectory, UserDirectory, UserRecord};
