pub mod cli;
pub mod config;
pub mod converter;
pub mod model;

mod api;
mod flock;

pub use api::{DepsLock, DepsLockBuilder, LockError, LockMode};
