//! Auto-assignment orchestration.

use std::sync::Arc;

use ims_allocation::allocate;
use ims_id::PeriodId;
use tracing::{debug, info, instrument, warn};

use super::locks::PeriodLocks;
use super::persister::{persist, PersistReport};
use crate::store::{AssignmentStore, StoreError};

/// Errors that end an auto-assignment run.
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    /// There are students to assign but no lecturer has a free slot.
    #[error("no available lecturers with remaining slots")]
    NoCapacity,

    /// A collector read failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignSummary {
    /// Allocation decisions made, whether or not their write succeeded.
    pub assigned: usize,

    /// Students fed to the allocator.
    pub total_unassigned: usize,

    /// Students the allocator could not place.
    pub skipped: usize,

    /// Per-record write results.
    pub persistence: PersistReport,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// No student in the period is waiting for a lecturer.
    NothingToDo,

    /// Allocation ran and its decisions were persisted.
    Completed(AssignSummary),
}

impl AssignOutcome {
    /// Number of allocation decisions made.
    pub fn assigned(&self) -> usize {
        match self {
            Self::NothingToDo => 0,
            Self::Completed(summary) => summary.assigned,
        }
    }
}

/// Runs auto-assignment for one period at a time.
#[derive(Clone)]
pub struct AssignmentEngine {
    store: Arc<dyn AssignmentStore>,
    locks: PeriodLocks,
}

impl AssignmentEngine {
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self {
            store,
            locks: PeriodLocks::new(),
        }
    }

    /// Assign every waiting student of `period_id` to a lecturer of their
    /// department.
    ///
    /// Runs for the same period are serialized; a queued run re-reads the
    /// store after the previous one finishes and only sees students that are
    /// still waiting.
    #[instrument(skip(self), fields(period_id = %period_id))]
    pub async fn auto_assign(&self, period_id: PeriodId) -> Result<AssignOutcome, AssignError> {
        let _guard = self.locks.acquire(period_id).await;

        let demand = self.store.unassigned_registrations(period_id).await?;
        if demand.is_empty() {
            info!("No unassigned students for period");
            return Ok(AssignOutcome::NothingToDo);
        }

        let supply = self.store.available_lecturers(period_id).await?;
        if supply.is_empty() {
            warn!(
                unassigned = demand.len(),
                "No lecturers with remaining slots for period"
            );
            return Err(AssignError::NoCapacity);
        }

        debug!(
            unassigned = demand.len(),
            lecturers = supply.len(),
            "Running allocation"
        );

        let allocation = allocate(&demand, supply);
        for skipped in &allocation.skipped {
            debug!(
                registration_id = %skipped.registration_id,
                reason = %skipped.reason,
                "Student left unassigned"
            );
        }

        let persistence = persist(self.store.as_ref(), &allocation.records).await;

        let summary = AssignSummary {
            assigned: allocation.assigned(),
            total_unassigned: demand.len(),
            skipped: allocation.skipped_count(),
            persistence,
        };

        info!(
            assigned = summary.assigned,
            total_unassigned = summary.total_unassigned,
            skipped = summary.skipped,
            confirmed = summary.persistence.confirmed.len(),
            conflicted = summary.persistence.conflicted.len(),
            failed = summary.persistence.failed.len(),
            "Auto-assignment complete"
        );

        Ok(AssignOutcome::Completed(summary))
    }
}
