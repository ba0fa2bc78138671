//! Lecturer auto-assignment.
//!
//! The engine is responsible for:
//! - Collecting unassigned registrations (demand) and lecturer availability
//!   (supply) for a period
//! - Running the allocator over both snapshots
//! - Persisting each decision independently, tolerating individual failures
//! - Serializing runs for the same period within this process
//!
//! The allocation itself lives in `ims-allocation`; this module only wires
//! it to the store.

mod engine;
mod locks;
mod persister;

pub use engine::{AssignError, AssignOutcome, AssignSummary, AssignmentEngine};
pub use locks::PeriodLocks;
pub use persister::{persist, PersistFailure, PersistReport};
