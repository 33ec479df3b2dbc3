//! [`SqliteStore`], the SQLite implementation of the collaborator traits.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use pengawas_core::{
  answer::FormData,
  directory::{Activity, NewActivity, SchoolInfo, Supervisor},
  period::Period,
  plan::{NewPlan, PlanRecord, PlanStatus, parse_school_ids},
  store::{ActivityLog, PlanStore, PortalStore, SchoolDirectory, SupervisorDirectory},
};
use rusqlite::OptionalExtension as _;
use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    ACTIVITY_COLUMNS, PLAN_COLUMNS, RawActivity, RawPlan, decode_form_data,
    decode_school_ids, encode_date, encode_dt, encode_status, encode_uuid, into_supervisor,
    school_from_row, supervisor_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Pengawas store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Result of the publish transaction, mapped to domain errors by the caller.
enum PublishOutcome {
  Missing,
  AlreadyPublished,
  Incomplete(String),
  Published(RawPlan),
}

/// Why a draft cannot be published yet, if anything blocks it.
fn publish_blocker(form: &FormData, school_ids: &[String]) -> Option<String> {
  let missing = form.selected_answers.missing_questions();
  if !missing.is_empty() {
    return Some(format!("unanswered questions: {}", missing.join(", ")));
  }
  if school_ids.is_empty() {
    return Some("no schools selected".into());
  }
  None
}

/// `?1, ?2, ..., ?n` starting at `first`.
fn placeholders(first: usize, n: usize) -> String {
  (first..first + n)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ")
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a plan or fail with [`pengawas_core::Error::PlanNotFound`].
  async fn require_plan(&self, id: Uuid) -> Result<PlanRecord> {
    self
      .fetch_plan(id)
      .await?
      .ok_or_else(|| pengawas_core::Error::PlanNotFound(id).into())
  }

  async fn fetch_plan(&self, id: Uuid) -> Result<Option<PlanRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPlan> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE plan_id = ?1"),
              rusqlite::params![id_str],
              RawPlan::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlan::into_plan).transpose()
  }

  /// Store a raw `school_ids` value as-is. Lets tests reproduce rows written
  /// by older clients.
  #[cfg(test)]
  pub(crate) async fn overwrite_school_ids(&self, id: Uuid, raw: &str) -> Result<()> {
    let id_str = encode_uuid(id);
    let raw = raw.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE plans SET school_ids = ?2 WHERE plan_id = ?1",
          rusqlite::params![id_str, raw],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Read collaborators ──────────────────────────────────────────────────────

impl PlanStore for SqliteStore {
  type Error = Error;

  async fn list_published_plans(
    &self,
    owner_id: Uuid,
    period: Period,
  ) -> Result<Vec<PlanRecord>> {
    let owner_str = encode_uuid(owner_id);
    let labels: Vec<String> =
      period.matching_labels().iter().map(ToString::to_string).collect();

    let raws: Vec<RawPlan> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PLAN_COLUMNS} FROM plans
           WHERE owner_id = ?1 AND status = 'published'
             AND period_label IN ({})
           ORDER BY created_at ASC, rowid ASC",
          placeholders(2, labels.len()),
        );
        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&owner_str];
        params.extend(labels.iter().map(|l| l as &dyn rusqlite::ToSql));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params.as_slice(), RawPlan::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlan::into_plan).collect()
  }
}

impl SchoolDirectory for SqliteStore {
  type Error = Error;

  async fn get_schools<'a>(&'a self, ids: &'a [String]) -> Result<Vec<SchoolInfo>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids = ids.to_vec();

    let schools = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT school_id, registration_number, name, region
           FROM schools WHERE school_id IN ({})",
          placeholders(1, ids.len()),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids.iter()), school_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(schools)
  }
}

impl ActivityLog for SqliteStore {
  type Error = Error;

  async fn list_activities_in_range(
    &self,
    owner_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Activity>> {
    let owner_str = encode_uuid(owner_id);
    let start_str = encode_date(start);
    let end_str   = encode_date(end);

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTIVITY_COLUMNS} FROM activities
           WHERE owner_id = ?1 AND date >= ?2 AND date <= ?3
           ORDER BY date ASC, recorded_at ASC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![owner_str, start_str, end_str],
            RawActivity::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }
}

impl SupervisorDirectory for SqliteStore {
  type Error = Error;

  async fn get_supervisor(&self, id: Uuid) -> Result<Option<Supervisor>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT supervisor_id, name, registration_number, title
               FROM supervisors WHERE supervisor_id = ?1",
              rusqlite::params![id_str],
              supervisor_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(into_supervisor).transpose()
  }
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  type WriteError = Error;

  // ── Plans ─────────────────────────────────────────────────────────────────

  async fn create_plan(&self, input: NewPlan) -> Result<PlanRecord> {
    let now = Utc::now();
    let school_ids: Vec<String> = input
      .school_ids
      .into_iter()
      .map(|s| s.trim().to_owned())
      .filter(|s| !s.is_empty())
      .collect();

    let plan = PlanRecord {
      id:             Uuid::new_v4(),
      owner_id:       input.owner_id,
      raw_school_ids: serde_json::to_value(&school_ids)?,
      period_label:   input.period_label.to_string(),
      status:         PlanStatus::Draft,
      form_data:      FormData::default(),
      created_at:     now,
      updated_at:     now,
      published_at:   None,
    };

    let id_str         = encode_uuid(plan.id);
    let owner_str      = encode_uuid(plan.owner_id);
    let school_ids_str = plan.raw_school_ids.to_string();
    let label          = plan.period_label.clone();
    let status_str     = encode_status(plan.status);
    let form_str       = serde_json::to_string(&plan.form_data)?;
    let at_str         = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO plans (
             plan_id, owner_id, school_ids, period_label, status,
             form_data, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            id_str,
            owner_str,
            school_ids_str,
            label,
            status_str,
            form_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    info!(plan_id = %plan.id, owner_id = %plan.owner_id, label = %plan.period_label, "plan created");
    Ok(plan)
  }

  async fn get_plan(&self, id: Uuid) -> Result<Option<PlanRecord>> {
    self.fetch_plan(id).await
  }

  async fn list_plans(&self, owner_id: Uuid) -> Result<Vec<PlanRecord>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawPlan> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PLAN_COLUMNS} FROM plans
           WHERE owner_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawPlan::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlan::into_plan).collect()
  }

  async fn save_form_data(&self, id: Uuid, form_data: FormData) -> Result<PlanRecord> {
    let mut plan = self.require_plan(id).await?;
    if plan.is_published() {
      return Err(pengawas_core::Error::PlanAlreadyPublished(id).into());
    }

    let now      = Utc::now();
    let id_str   = encode_uuid(id);
    let form_str = serde_json::to_string(&form_data)?;
    let at_str   = encode_dt(now);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE plans SET form_data = ?2, updated_at = ?3
           WHERE plan_id = ?1 AND status = 'draft'",
          rusqlite::params![id_str, form_str, at_str],
        )?)
      })
      .await?;

    // Published between the read and the write.
    if updated == 0 {
      return Err(pengawas_core::Error::PlanAlreadyPublished(id).into());
    }

    plan.form_data = form_data;
    plan.updated_at = now;
    Ok(plan)
  }

  async fn publish_plan(&self, id: Uuid) -> Result<PlanRecord> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    // Read, gate and update in one transaction.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE plan_id = ?1"),
            rusqlite::params![id_str],
            RawPlan::from_row,
          )
          .optional()?;

        let Some(mut raw) = raw else {
          return Ok(PublishOutcome::Missing);
        };
        if raw.status != encode_status(PlanStatus::Draft) {
          return Ok(PublishOutcome::AlreadyPublished);
        }
        let form = decode_form_data(&raw.plan_id, &raw.form_data);
        let schools = parse_school_ids(&decode_school_ids(&raw.school_ids));
        if let Some(reason) = publish_blocker(&form, &schools.ids) {
          return Ok(PublishOutcome::Incomplete(reason));
        }

        tx.execute(
          "UPDATE plans SET status = 'published', published_at = ?2, updated_at = ?2
           WHERE plan_id = ?1 AND status = 'draft'",
          rusqlite::params![id_str, at_str],
        )?;
        tx.commit()?;

        raw.status = encode_status(PlanStatus::Published).to_owned();
        raw.published_at = Some(at_str.clone());
        raw.updated_at = at_str;
        Ok(PublishOutcome::Published(raw))
      })
      .await?;

    let raw = match outcome {
      PublishOutcome::Published(raw) => raw,
      PublishOutcome::Missing => return Err(pengawas_core::Error::PlanNotFound(id).into()),
      PublishOutcome::AlreadyPublished => {
        return Err(pengawas_core::Error::PlanAlreadyPublished(id).into());
      }
      PublishOutcome::Incomplete(reason) => {
        return Err(pengawas_core::Error::IncompletePlan { id, reason }.into());
      }
    };

    let plan = raw.into_plan()?;
    info!(plan_id = %id, "plan published");
    Ok(plan)
  }

  async fn delete_plan(&self, id: Uuid) -> Result<()> {
    let plan = self.require_plan(id).await?;
    if plan.is_published() {
      return Err(pengawas_core::Error::PlanAlreadyPublished(id).into());
    }

    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM plans WHERE plan_id = ?1 AND status = 'draft'",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    info!(plan_id = %id, "draft plan deleted");
    Ok(())
  }

  // ── Directory ─────────────────────────────────────────────────────────────

  async fn upsert_school(&self, school: SchoolInfo) -> Result<SchoolInfo> {
    let row = school.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO schools (school_id, registration_number, name, region)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (school_id) DO UPDATE SET
             registration_number = excluded.registration_number,
             name                = excluded.name,
             region              = excluded.region",
          rusqlite::params![row.id, row.registration_number, row.name, row.region],
        )?;
        Ok(())
      })
      .await?;

    Ok(school)
  }

  async fn list_schools(&self) -> Result<Vec<SchoolInfo>> {
    let schools = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT school_id, registration_number, name, region
           FROM schools ORDER BY name COLLATE NOCASE, school_id",
        )?;
        let rows = stmt
          .query_map([], school_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(schools)
  }

  async fn upsert_supervisor(&self, supervisor: Supervisor) -> Result<Supervisor> {
    let id_str = encode_uuid(supervisor.id);
    let name   = supervisor.name.clone();
    let nip    = supervisor.registration_number.clone();
    let title  = supervisor.title.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO supervisors (supervisor_id, name, registration_number, title)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (supervisor_id) DO UPDATE SET
             name                = excluded.name,
             registration_number = excluded.registration_number,
             title               = excluded.title",
          rusqlite::params![id_str, name, nip, title],
        )?;
        Ok(())
      })
      .await?;

    Ok(supervisor)
  }

  // ── Activities ────────────────────────────────────────────────────────────

  async fn record_activity(&self, input: NewActivity) -> Result<Activity> {
    let activity = Activity {
      id:          Uuid::new_v4(),
      owner_id:    input.owner_id,
      school_id:   input.school_id,
      date:        input.date,
      note:        input.note,
      recorded_at: Utc::now(),
    };

    let id_str    = encode_uuid(activity.id);
    let owner_str = encode_uuid(activity.owner_id);
    let school_id = activity.school_id.clone();
    let date_str  = encode_date(activity.date);
    let note      = activity.note.clone();
    let at_str    = encode_dt(activity.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activities (activity_id, owner_id, school_id, date, note, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, owner_str, school_id, date_str, note, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(activity)
  }
}
