//! Collaborator traits implemented by storage backends.
//!
//! The report aggregator only reads, through [`PlanStore`],
//! [`SchoolDirectory`], [`ActivityLog`] and [`SupervisorDirectory`]. The
//! planning workflow writes through [`PortalStore`]. Backends such as
//! `pengawas-store-sqlite` implement all of them.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  DomainError,
  answer::FormData,
  directory::{Activity, NewActivity, SchoolInfo, Supervisor},
  period::Period,
  plan::{NewPlan, PlanRecord},
};

// ─── Read collaborators ──────────────────────────────────────────────────────

pub trait PlanStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Published plans owned by `owner_id` whose period label falls inside
  /// `period` (see [`Period::covers`]), oldest first.
  fn list_published_plans(
    &self,
    owner_id: Uuid,
    period: Period,
  ) -> impl Future<Output = Result<Vec<PlanRecord>, Self::Error>> + Send + '_;
}

pub trait SchoolDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the schools with the given ids in one call. Unknown ids are
  /// simply absent from the result.
  fn get_schools<'a>(
    &'a self,
    ids: &'a [String],
  ) -> impl Future<Output = Result<Vec<SchoolInfo>, Self::Error>> + Send + 'a;
}

pub trait ActivityLog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Activities of `owner_id` dated within `start..=end`.
  fn list_activities_in_range(
    &self,
    owner_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;
}

pub trait SupervisorDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get_supervisor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Supervisor>, Self::Error>> + Send + '_;
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// The full CRUD surface of a backend.
pub trait PortalStore:
  PlanStore + SchoolDirectory + ActivityLog + SupervisorDirectory
{
  /// Domain failures (missing plan, already published, ...) are reported
  /// through [`DomainError::domain`].
  type WriteError: std::error::Error + DomainError + Send + Sync + 'static;

  // ── Plans ─────────────────────────────────────────────────────────────

  /// Create a draft plan with an empty form.
  fn create_plan(
    &self,
    input: NewPlan,
  ) -> impl Future<Output = Result<PlanRecord, Self::WriteError>> + Send + '_;

  fn get_plan(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PlanRecord>, Self::WriteError>> + Send + '_;

  /// All plans of a supervisor regardless of status, newest first.
  fn list_plans(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PlanRecord>, Self::WriteError>> + Send + '_;

  /// Autosave: replace the form of a draft plan.
  ///
  /// Returns an error if the plan is missing or already published.
  fn save_form_data(
    &self,
    id: Uuid,
    form_data: FormData,
  ) -> impl Future<Output = Result<PlanRecord, Self::WriteError>> + Send + '_;

  /// Move a draft to published.
  ///
  /// Returns an error if the plan is missing, already published, or its
  /// interview is incomplete.
  fn publish_plan(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<PlanRecord, Self::WriteError>> + Send + '_;

  /// Delete a draft plan. Published plans are kept.
  fn delete_plan(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::WriteError>> + Send + '_;

  // ── Directory ─────────────────────────────────────────────────────────

  fn upsert_school(
    &self,
    school: SchoolInfo,
  ) -> impl Future<Output = Result<SchoolInfo, Self::WriteError>> + Send + '_;

  fn list_schools(
    &self,
  ) -> impl Future<Output = Result<Vec<SchoolInfo>, Self::WriteError>> + Send + '_;

  fn upsert_supervisor(
    &self,
    supervisor: Supervisor,
  ) -> impl Future<Output = Result<Supervisor, Self::WriteError>> + Send + '_;

  // ── Activities ────────────────────────────────────────────────────────

  fn record_activity(
    &self,
    input: NewActivity,
  ) -> impl Future<Output = Result<Activity, Self::WriteError>> + Send + '_;
}
