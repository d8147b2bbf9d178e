//! Collaborators supplied by the application shell.
//!
//! The store never generates ids or reads the clock directly; it asks an
//! [`IdSource`] and a [`Clock`]. Production code uses [`UuidSource`] and
//! [`SystemClock`]; tests inject deterministic implementations.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces globally unique element and project ids.
#[cfg_attr(test, mockall::automock)]
pub trait IdSource: Send + Sync {
    fn generate_id(&self) -> String;
}

/// Source of the current time for `createdAt` / `updatedAt` stamps.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Random (v4) UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sequential ids with a fixed prefix (`el-1`, `el-2`, ...).
///
/// Unique per instance only; meant for tests and reproducible fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdSource for SequentialIds {
    fn generate_id(&self) -> String {
        format!("{}-{}", self.prefix, self.next.fetch_add(1, Ordering::Relaxed))
    }
}
