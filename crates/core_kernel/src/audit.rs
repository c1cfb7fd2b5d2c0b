//! Audit metadata assigned by the database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and last-modification times of a persisted row
///
/// Both values come from the database: `created_at` is set once on insert,
/// `modified_at` is refreshed by a trigger whenever the row is updated.
/// An entity that has never been persisted has no timestamps at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimestamps {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl AuditTimestamps {
    pub fn new(created_at: DateTime<Utc>, modified_at: DateTime<Utc>) -> Self {
        Self { created_at, modified_at }
    }

    /// Returns true if the row has been updated since it was inserted
    pub fn was_modified(&self) -> bool {
        self.modified_at > self.created_at
    }
}
