//! Lecturer allocation primitives.
//!
//! Given a snapshot of students waiting for a lecturer (demand) and a snapshot
//! of lecturer availability (supply) for one internship period, [`allocate`]
//! assigns each student to a lecturer of the same department in a single
//! greedy pass.
//!
//! # Invariants
//!
//! - A student is only matched with a lecturer whose department equals the
//!   student's department (exact string match)
//! - No lecturer receives more students than its initial `slots_remaining`
//! - Every pick goes to the candidate with the most remaining slots at that
//!   moment; ties go to the candidate seen first in supply order
//! - Given identical snapshots (same order), the result is identical
//!
//! The allocator performs no I/O and never fails: a student either gets an
//! [`AssignmentRecord`] or a [`Skipped`] entry explaining why not.

mod index;
mod model;

pub use index::DepartmentIndex;
pub use model::{
    AssignmentRecord, DemandUnit, RegistrationStatus, SkipReason, Skipped, SupplyUnit,
};

/// Outcome of one allocation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// One record per student that received a lecturer, in demand order.
    pub records: Vec<AssignmentRecord>,

    /// Students that were processed but received no lecturer, in demand order.
    pub skipped: Vec<Skipped>,

    /// Supply units after the pass, in supply order, with in-memory
    /// `slots_remaining` reduced by the picks made against them.
    pub remaining_capacity: Vec<SupplyUnit>,
}

impl Allocation {
    /// Number of allocation decisions made.
    pub fn assigned(&self) -> usize {
        self.records.len()
    }

    /// Number of students that were processed but not assigned.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Run a single allocation pass over the given snapshots.
///
/// Demand is processed strictly in the order given; when capacity is scarce
/// that order decides who is served, so callers should pass demand in a
/// meaningful priority order.
pub fn allocate(demand: &[DemandUnit], supply: Vec<SupplyUnit>) -> Allocation {
    let mut index = DepartmentIndex::build(supply);
    let mut records = Vec::with_capacity(demand.len());
    let mut skipped = Vec::new();

    for unit in demand {
        let Some(department) = unit.department() else {
            skipped.push(Skipped {
                registration_id: unit.registration_id,
                reason: SkipReason::NoDepartment,
            });
            continue;
        };

        match index.pick(department) {
            Ok(lecturer_id) => records.push(AssignmentRecord {
                registration_id: unit.registration_id,
                lecturer_id,
                status: RegistrationStatus::LecturerConfirmed,
            }),
            Err(reason) => skipped.push(Skipped {
                registration_id: unit.registration_id,
                reason,
            }),
        }
    }

    Allocation {
        records,
        skipped,
        remaining_capacity: index.into_units(),
    }
}

#[cfg(test)]
mod tests;
