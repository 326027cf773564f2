//! In-memory adapters
//!
//! Implementations of repository traits backed by `RwLock`-guarded maps.
//! Used by the MCP server and by tests; state lives for the process lifetime.

pub mod event_repo;
pub mod poll_repo;
pub mod vote_repo;

pub use event_repo::InMemoryEventRepository;
pub use poll_repo::InMemoryPollRepository;
pub use vote_repo::InMemoryVoteRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::DomainError;

pub(crate) fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, DomainError> {
    lock.read()
        .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, DomainError> {
    lock.write()
        .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
}
