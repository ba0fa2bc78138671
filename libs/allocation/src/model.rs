//! Snapshot and result types consumed and produced by the allocator.

use std::fmt;

use ims_id::{LecturerId, RegistrationId};

/// A student registration waiting for a lecturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandUnit {
    /// The registration to assign.
    pub registration_id: RegistrationId,

    /// Department of the student's profile, if known.
    pub department: Option<String>,
}

impl DemandUnit {
    pub fn new(registration_id: RegistrationId, department: Option<impl Into<String>>) -> Self {
        Self {
            registration_id,
            department: department.map(Into::into),
        }
    }

    /// The department to match on.
    ///
    /// Blank departments are treated as absent.
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .filter(|department| !department.trim().is_empty())
    }
}

/// A lecturer's remaining capacity for a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyUnit {
    pub lecturer_id: LecturerId,
    pub department: String,
    pub slots_remaining: u32,
}

impl SupplyUnit {
    pub fn new(lecturer_id: LecturerId, department: impl Into<String>, slots_remaining: u32) -> Self {
        Self {
            lecturer_id,
            department: department.into(),
            slots_remaining,
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.slots_remaining > 0
    }
}

/// Registration lifecycle states known to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStatus {
    /// Registered for a period, waiting for a lecturer.
    Registered,

    /// A lecturer has been assigned.
    LecturerConfirmed,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::LecturerConfirmed => "lecturer_confirmed",
        }
    }
}

/// One allocation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub registration_id: RegistrationId,
    pub lecturer_id: LecturerId,
    pub status: RegistrationStatus,
}

/// Why a student received no lecturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The student's profile has no department.
    NoDepartment,

    /// No lecturer in the student's department offered capacity.
    UnknownDepartment,

    /// Every lecturer in the department ran out of slots during this pass.
    DepartmentExhausted,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDepartment => "no_department",
            Self::UnknownDepartment => "unknown_department",
            Self::DepartmentExhausted => "department_exhausted",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student that was processed but not assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skipped {
    pub registration_id: RegistrationId,
    pub reason: SkipReason,
}
