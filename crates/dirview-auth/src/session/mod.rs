//! Session lifecycle: creation, sliding validation, revocation, and sweeping.

pub mod cleanup;
pub mod store;

pub use cleanup::SessionSweeper;
pub use store::{Session, SessionStore};
