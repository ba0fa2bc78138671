//! Store interfaces consumed by the assignment engine.
//!
//! The relational backend owns registrations, lecturer availability and
//! profiles. The engine only needs three narrow operations on it (two reads
//! and one per-record write) plus a role lookup for callers, so those are the
//! traits defined here:
//!
//! - [`AssignmentStore`] collects demand and supply for a period and applies
//!   individual assignments
//! - [`IdentityStore`] resolves a profile to its role
//!
//! [`PgStore`] implements both against Postgres; [`MemoryStore`] implements
//! both in memory for tests and local development.

mod memory;
mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use ims_allocation::{DemandUnit, RegistrationStatus, SupplyUnit};
use ims_id::{LecturerId, PeriodId, ProfileId, RegistrationId};
use thiserror::Error;

pub use memory::{MemoryStore, RegistrationSnapshot};
pub use postgres::PgStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("invalid {field} in stored row: {message}")]
    Decode {
        field: &'static str,
        message: String,
    },

    /// The lecturer had no stored slots left when the assignment was written.
    #[error("lecturer {lecturer_id} has no remaining slots")]
    CapacityExhausted { lecturer_id: LecturerId },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result of a single conditional assignment write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The registration was updated.
    Applied,

    /// The registration was no longer waiting for a lecturer; nothing changed.
    Conflict,
}

/// Roles a profile can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Lecturer,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lecturer => "lecturer",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "lecturer" => Ok(Self::Lecturer),
            "student" => Ok(Self::Student),
            other => Err(StoreError::Decode {
                field: "role",
                message: format!("unknown role '{other}'"),
            }),
        }
    }
}

/// Demand/supply reads and per-record writes for one period.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Registrations for `period_id` with status `registered` and no assigned
    /// lecturer, each tagged with its student's department.
    ///
    /// An unknown period yields an empty list.
    async fn unassigned_registrations(&self, period_id: PeriodId) -> StoreResult<Vec<DemandUnit>>;

    /// Lecturer availability for `period_id` with `slots_remaining > 0`.
    async fn available_lecturers(&self, period_id: PeriodId) -> StoreResult<Vec<SupplyUnit>>;

    /// Set the assigned lecturer and status on one registration, provided it is
    /// still registered and unassigned.
    ///
    /// An applied write consumes one of the lecturer's stored slots; if none
    /// is left the write fails with [`StoreError::CapacityExhausted`] and the
    /// registration is unchanged.
    async fn assign_lecturer(
        &self,
        registration_id: RegistrationId,
        lecturer_id: LecturerId,
        status: RegistrationStatus,
    ) -> StoreResult<WriteOutcome>;

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}

/// Caller identity lookups.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// The role of `profile_id`, or `None` if no such profile exists.
    async fn profile_role(&self, profile_id: ProfileId) -> StoreResult<Option<Role>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Lecturer, Role::Student] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_decode_error() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(matches!(err, StoreError::Decode { field: "role", .. }));
    }
}
