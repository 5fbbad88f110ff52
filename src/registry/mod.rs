//! Session-scoped watch registry

mod core;

pub use core::{SessionRegistry, WatchError};
