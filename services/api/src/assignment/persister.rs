//! Sequential, failure-tolerant persistence of allocation decisions.

use ims_allocation::AssignmentRecord;
use ims_id::RegistrationId;
use tracing::{debug, warn};

use crate::store::{AssignmentStore, WriteOutcome};

/// A write that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub registration_id: RegistrationId,
    pub error: String,
}

/// What happened to each record handed to [`persist`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Registrations whose assignment was written.
    pub confirmed: Vec<RegistrationId>,

    /// Registrations that were no longer waiting when the write ran.
    pub conflicted: Vec<RegistrationId>,

    /// Registrations whose write raised an error.
    pub failed: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn attempted(&self) -> usize {
        self.confirmed.len() + self.conflicted.len() + self.failed.len()
    }
}

/// Apply each record as its own write, in order.
///
/// A failing or conflicting write is logged and recorded; the remaining
/// records are still attempted. Nothing spans the batch, so a partial run
/// leaves the successful writes in place.
pub async fn persist(store: &dyn AssignmentStore, records: &[AssignmentRecord]) -> PersistReport {
    let mut report = PersistReport::default();

    for record in records {
        match store
            .assign_lecturer(record.registration_id, record.lecturer_id, record.status)
            .await
        {
            Ok(WriteOutcome::Applied) => {
                debug!(
                    registration_id = %record.registration_id,
                    lecturer_id = %record.lecturer_id,
                    "Assigned lecturer"
                );
                report.confirmed.push(record.registration_id);
            }
            Ok(WriteOutcome::Conflict) => {
                warn!(
                    registration_id = %record.registration_id,
                    lecturer_id = %record.lecturer_id,
                    "Registration no longer unassigned; skipping write"
                );
                report.conflicted.push(record.registration_id);
            }
            Err(e) => {
                warn!(
                    registration_id = %record.registration_id,
                    lecturer_id = %record.lecturer_id,
                    error = %e,
                    "Failed to persist assignment"
                );
                report.failed.push(PersistFailure {
                    registration_id: record.registration_id,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}
