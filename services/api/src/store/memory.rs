//! In-memory store for tests and local development.
//!
//! Mirrors the Postgres behavior the engine relies on: collectors filter and
//! order like the SQL queries, writes are conditional on the registration
//! still waiting, and an applied write consumes one of the lecturer's slots
//! (the job the `consume_lecturer_slot` trigger does in Postgres), failing
//! when none is left.

#[cfg(test)]
use std::collections::HashSet;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use ims_allocation::{DemandUnit, RegistrationStatus, SupplyUnit};
use ims_id::{LecturerId, PeriodId, ProfileId, RegistrationId};

use super::{AssignmentStore, IdentityStore, Role, StoreError, StoreResult, WriteOutcome};

#[derive(Debug, Clone)]
struct Profile {
    role: Role,
    department: Option<String>,
}

#[derive(Debug, Clone)]
struct Registration {
    id: RegistrationId,
    period_id: PeriodId,
    student_id: ProfileId,
    status: RegistrationStatus,
    assigned_lecturer_id: Option<LecturerId>,
}

#[derive(Debug, Clone)]
struct Availability {
    period_id: PeriodId,
    lecturer_id: LecturerId,
    slots_remaining: u32,
}

#[derive(Debug, Default)]
struct State {
    profiles: HashMap<ProfileId, Profile>,
    registrations: Vec<Registration>,
    availability: Vec<Availability>,
    write_attempts: usize,
    #[cfg(test)]
    faults: Faults,
}

/// Injected failures for unit tests.
#[cfg(test)]
#[derive(Debug, Default)]
struct Faults {
    failing_writes: HashSet<RegistrationId>,
    reads_unavailable: bool,
}

impl State {
    fn check_readable(&self) -> StoreResult<()> {
        #[cfg(test)]
        if self.faults.reads_unavailable {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    #[cfg_attr(not(test), allow(unused_variables))]
    fn check_writable(&self, registration_id: RegistrationId) -> StoreResult<()> {
        #[cfg(test)]
        if self.faults.failing_writes.contains(&registration_id) {
            return Err(StoreError::Unavailable(format!(
                "write to registration {registration_id} rejected"
            )));
        }
        Ok(())
    }
}

/// Point-in-time view of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationSnapshot {
    pub status: RegistrationStatus,
    pub assigned_lecturer_id: Option<LecturerId>,
}

/// In-memory [`AssignmentStore`] and [`IdentityStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a profile and return its id.
    pub fn add_profile(&self, role: Role, department: Option<&str>) -> ProfileId {
        let id = ProfileId::new();
        self.state().profiles.insert(
            id,
            Profile {
                role,
                department: department.map(str::to_string),
            },
        );
        id
    }

    /// Register `student_id` for `period_id`; later registrations sort after
    /// earlier ones.
    pub fn add_registration(&self, period_id: PeriodId, student_id: ProfileId) -> RegistrationId {
        let id = RegistrationId::new();
        self.state().registrations.push(Registration {
            id,
            period_id,
            student_id,
            status: RegistrationStatus::Registered,
            assigned_lecturer_id: None,
        });
        id
    }

    /// Declare `lecturer` available for `period_id` with the given capacity.
    pub fn add_availability(
        &self,
        period_id: PeriodId,
        lecturer: ProfileId,
        slots_remaining: u32,
    ) -> LecturerId {
        let lecturer_id = LecturerId::from(lecturer);
        self.state().availability.push(Availability {
            period_id,
            lecturer_id,
            slots_remaining,
        });
        lecturer_id
    }

    /// Mark a registration as already assigned, bypassing capacity bookkeeping.
    pub fn mark_assigned(&self, registration_id: RegistrationId, lecturer_id: LecturerId) {
        let mut state = self.state();
        if let Some(registration) = state
            .registrations
            .iter_mut()
            .find(|r| r.id == registration_id)
        {
            registration.status = RegistrationStatus::LecturerConfirmed;
            registration.assigned_lecturer_id = Some(lecturer_id);
        }
    }

    /// Make every write to `registration_id` fail.
    #[cfg(test)]
    pub(crate) fn fail_writes_for(&self, registration_id: RegistrationId) {
        self.state().faults.failing_writes.insert(registration_id);
    }

    /// Make reads and pings fail (or succeed again).
    #[cfg(test)]
    pub(crate) fn set_reads_unavailable(&self, unavailable: bool) {
        self.state().faults.reads_unavailable = unavailable;
    }

    pub fn registration(&self, registration_id: RegistrationId) -> Option<RegistrationSnapshot> {
        self.state()
            .registrations
            .iter()
            .find(|r| r.id == registration_id)
            .map(|r| RegistrationSnapshot {
                status: r.status,
                assigned_lecturer_id: r.assigned_lecturer_id,
            })
    }

    /// Stored slots for `lecturer_id` in `period_id`.
    pub fn slots_remaining(&self, period_id: PeriodId, lecturer_id: LecturerId) -> Option<u32> {
        self.state()
            .availability
            .iter()
            .find(|a| a.period_id == period_id && a.lecturer_id == lecturer_id)
            .map(|a| a.slots_remaining)
    }

    /// Number of `assign_lecturer` calls received, including failed ones.
    pub fn write_attempts(&self) -> usize {
        self.state().write_attempts
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn unassigned_registrations(&self, period_id: PeriodId) -> StoreResult<Vec<DemandUnit>> {
        let state = self.state();
        state.check_readable()?;

        Ok(state
            .registrations
            .iter()
            .filter(|r| {
                r.period_id == period_id
                    && r.status == RegistrationStatus::Registered
                    && r.assigned_lecturer_id.is_none()
            })
            .map(|r| {
                let department = state
                    .profiles
                    .get(&r.student_id)
                    .and_then(|p| p.department.clone());
                DemandUnit::new(r.id, department)
            })
            .collect())
    }

    async fn available_lecturers(&self, period_id: PeriodId) -> StoreResult<Vec<SupplyUnit>> {
        let state = self.state();
        state.check_readable()?;

        Ok(state
            .availability
            .iter()
            .filter(|a| a.period_id == period_id && a.slots_remaining > 0)
            .filter_map(|a| {
                let profile = state.profiles.get(&a.lecturer_id.profile_id())?;
                Some(SupplyUnit::new(
                    a.lecturer_id,
                    profile.department.clone().unwrap_or_default(),
                    a.slots_remaining,
                ))
            })
            .collect())
    }

    async fn assign_lecturer(
        &self,
        registration_id: RegistrationId,
        lecturer_id: LecturerId,
        status: RegistrationStatus,
    ) -> StoreResult<WriteOutcome> {
        let mut state = self.state();
        state.write_attempts += 1;
        state.check_writable(registration_id)?;

        let Some(position) = state.registrations.iter().position(|r| {
            r.id == registration_id
                && r.status == RegistrationStatus::Registered
                && r.assigned_lecturer_id.is_none()
        }) else {
            return Ok(WriteOutcome::Conflict);
        };
        let period_id = state.registrations[position].period_id;

        if let Some(availability) = state
            .availability
            .iter_mut()
            .find(|a| a.period_id == period_id && a.lecturer_id == lecturer_id)
        {
            availability.slots_remaining = availability
                .slots_remaining
                .checked_sub(1)
                .ok_or(StoreError::CapacityExhausted { lecturer_id })?;
        }

        let registration = &mut state.registrations[position];
        registration.status = status;
        registration.assigned_lecturer_id = Some(lecturer_id);

        Ok(WriteOutcome::Applied)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.state().check_readable()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn profile_role(&self, profile_id: ProfileId) -> StoreResult<Option<Role>> {
        Ok(self.state().profiles.get(&profile_id).map(|p| p.role))
    }
}
