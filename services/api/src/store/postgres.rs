//! Postgres-backed store.

use async_trait::async_trait;
use ims_allocation::{DemandUnit, RegistrationStatus, SupplyUnit};
use ims_id::{LecturerId, PeriodId, ProfileId, RegistrationId, Uuid};
use tracing::{debug, instrument};

use super::{AssignmentStore, IdentityStore, Role, StoreError, StoreResult, WriteOutcome};
use crate::db::Database;

/// Check constraint the slot trigger trips when a lecturer is over-assigned.
const SLOTS_CONSTRAINT: &str = "lecturer_availability_slots_nonnegative";

/// Store implementation over the internship tables.
#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentStore for PgStore {
    #[instrument(skip(self), fields(period_id = %period_id))]
    async fn unassigned_registrations(&self, period_id: PeriodId) -> StoreResult<Vec<DemandUnit>> {
        // Earliest registrations first: this order decides who is served when
        // capacity runs short.
        let rows = sqlx::query_as::<_, DemandRow>(
            r#"
            SELECT r.id AS registration_id, p.department
            FROM student_registrations r
            LEFT JOIN profiles p ON p.id = r.student_id
            WHERE r.period_id = $1
              AND r.status = 'registered'
              AND r.assigned_lecturer_id IS NULL
            ORDER BY r.registered_at, r.id
            "#,
        )
        .bind(period_id.uuid())
        .fetch_all(self.db.pool())
        .await?;

        debug!(count = rows.len(), "Loaded unassigned registrations");

        Ok(rows
            .into_iter()
            .map(|row| DemandUnit::new(RegistrationId::from_uuid(row.registration_id), row.department))
            .collect())
    }

    #[instrument(skip(self), fields(period_id = %period_id))]
    async fn available_lecturers(&self, period_id: PeriodId) -> StoreResult<Vec<SupplyUnit>> {
        let rows = sqlx::query_as::<_, SupplyRow>(
            r#"
            SELECT a.lecturer_id, COALESCE(p.department, '') AS department, a.slots_remaining
            FROM lecturer_availability a
            JOIN profiles p ON p.id = a.lecturer_id
            WHERE a.period_id = $1
              AND a.slots_remaining > 0
            ORDER BY a.created_at, a.lecturer_id
            "#,
        )
        .bind(period_id.uuid())
        .fetch_all(self.db.pool())
        .await?;

        debug!(count = rows.len(), "Loaded lecturer availability");

        rows.into_iter()
            .map(|row| {
                let slots_remaining =
                    u32::try_from(row.slots_remaining).map_err(|_| StoreError::Decode {
                        field: "slots_remaining",
                        message: format!("negative value {}", row.slots_remaining),
                    })?;
                Ok(SupplyUnit::new(
                    LecturerId::from_uuid(row.lecturer_id),
                    row.department,
                    slots_remaining,
                ))
            })
            .collect()
    }

    async fn assign_lecturer(
        &self,
        registration_id: RegistrationId,
        lecturer_id: LecturerId,
        status: RegistrationStatus,
    ) -> StoreResult<WriteOutcome> {
        // Only a registration that is still waiting may be claimed, so two
        // overlapping runs can never overwrite each other's choice.
        let result = sqlx::query(
            r#"
            UPDATE student_registrations
            SET assigned_lecturer_id = $2,
                status = $3,
                updated_at = now()
            WHERE id = $1
              AND status = $4
              AND assigned_lecturer_id IS NULL
            "#,
        )
        .bind(registration_id.uuid())
        .bind(lecturer_id.uuid())
        .bind(status.as_str())
        .bind(RegistrationStatus::Registered.as_str())
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if violates_slots_constraint(&e) {
                StoreError::CapacityExhausted { lecturer_id }
            } else {
                StoreError::Query(e)
            }
        })?;

        if result.rows_affected() == 0 {
            Ok(WriteOutcome::Conflict)
        } else {
            Ok(WriteOutcome::Applied)
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .ping()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn violates_slots_constraint(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.constraint())
        == Some(SLOTS_CONSTRAINT)
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn profile_role(&self, profile_id: ProfileId) -> StoreResult<Option<Role>> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
            .bind(profile_id.uuid())
            .fetch_optional(self.db.pool())
            .await?;

        role.map(|role| role.parse()).transpose()
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(Debug)]
struct DemandRow {
    registration_id: Uuid,
    department: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for DemandRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            registration_id: row.try_get("registration_id")?,
            department: row.try_get("department")?,
        })
    }
}

#[derive(Debug)]
struct SupplyRow {
    lecturer_id: Uuid,
    department: String,
    slots_remaining: i32,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SupplyRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            lecturer_id: row.try_get("lecturer_id")?,
            department: row.try_get("department")?,
            slots_remaining: row.try_get("slots_remaining")?,
        })
    }
}
