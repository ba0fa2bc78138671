//! Typed ID definitions for the internship domain.

use crate::define_id;

// =============================================================================
// People
// =============================================================================

define_id!(ProfileId, "profile");
define_id!(LecturerId, "lecturer");

impl LecturerId {
    /// The profile that owns this lecturer identity.
    ///
    /// Lecturer ids share the profile id space; the distinct type only keeps
    /// supply-side ids from being mixed up with arbitrary profiles.
    #[must_use]
    pub const fn profile_id(&self) -> ProfileId {
        ProfileId::from_uuid(self.0)
    }
}

impl From<ProfileId> for LecturerId {
    fn from(id: ProfileId) -> Self {
        Self(id.uuid())
    }
}

// =============================================================================
// Internship Periods
// =============================================================================

define_id!(PeriodId, "period");
define_id!(RegistrationId, "registration");

// =============================================================================
// Requests
// =============================================================================

define_id!(RequestId, "request", now_v7);

// =============================================================================
// Tests
// =============================================================================
