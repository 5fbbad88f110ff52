//! Core domain types shared across the crate

mod repo;
mod session;
mod snapshot;

pub use repo::{InvalidUrl, RepoId};
pub use session::{BROADCAST_SESSION, Destination, SessionId};
pub use snapshot::RepoSnapshot;
