//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision, so text
//! ordering is chronological. Dates are `YYYY-MM-DD`. UUIDs are hyphenated
//! lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use pengawas_core::{
  answer::FormData,
  directory::{Activity, SchoolInfo, Supervisor},
  plan::{PlanRecord, PlanStatus},
};
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_status(status: PlanStatus) -> &'static str {
  match status {
    PlanStatus::Draft => "draft",
    PlanStatus::Published => "published",
  }
}

pub fn decode_status(s: &str) -> Result<PlanStatus> {
  match s {
    "draft" => Ok(PlanStatus::Draft),
    "published" => Ok(PlanStatus::Published),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Lenient JSON columns ────────────────────────────────────────────────────

/// Stored `school_ids` text as a JSON value. Text that is not JSON at all is
/// kept as a JSON string so the core parser can flag it as malformed.
pub fn decode_school_ids(s: &str) -> serde_json::Value {
  serde_json::from_str(s).unwrap_or_else(|_| serde_json::Value::String(s.to_owned()))
}

/// Stored form data. A corrupt blob decodes as an empty form so that reports
/// stay renderable.
pub fn decode_form_data(plan_id: &str, s: &str) -> FormData {
  serde_json::from_str(s).unwrap_or_else(|e| {
    warn!(%plan_id, error = %e, "corrupt form_data; treating as empty");
    FormData::default()
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `plans` row.
pub struct RawPlan {
  pub plan_id:      String,
  pub owner_id:     String,
  pub school_ids:   String,
  pub period_label: String,
  pub status:       String,
  pub form_data:    String,
  pub created_at:   String,
  pub updated_at:   String,
  pub published_at: Option<String>,
}

pub const PLAN_COLUMNS: &str = "plan_id, owner_id, school_ids, period_label, status, \
                                form_data, created_at, updated_at, published_at";

impl RawPlan {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      plan_id:      row.get(0)?,
      owner_id:     row.get(1)?,
      school_ids:   row.get(2)?,
      period_label: row.get(3)?,
      status:       row.get(4)?,
      form_data:    row.get(5)?,
      created_at:   row.get(6)?,
      updated_at:   row.get(7)?,
      published_at: row.get(8)?,
    })
  }

  pub fn into_plan(self) -> Result<PlanRecord> {
    Ok(PlanRecord {
      id:             decode_uuid(&self.plan_id)?,
      owner_id:       decode_uuid(&self.owner_id)?,
      raw_school_ids: decode_school_ids(&self.school_ids),
      form_data:      decode_form_data(&self.plan_id, &self.form_data),
      period_label:   self.period_label,
      status:         decode_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
      published_at:   self.published_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from an `activities` row.
pub struct RawActivity {
  pub activity_id: String,
  pub owner_id:    String,
  pub school_id:   String,
  pub date:        String,
  pub note:        Option<String>,
  pub recorded_at: String,
}

pub const ACTIVITY_COLUMNS: &str =
  "activity_id, owner_id, school_id, date, note, recorded_at";

impl RawActivity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      activity_id: row.get(0)?,
      owner_id:    row.get(1)?,
      school_id:   row.get(2)?,
      date:        row.get(3)?,
      note:        row.get(4)?,
      recorded_at: row.get(5)?,
    })
  }

  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      id:          decode_uuid(&self.activity_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      school_id:   self.school_id,
      date:        decode_date(&self.date)?,
      note:        self.note,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

pub fn school_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SchoolInfo> {
  Ok(SchoolInfo {
    id:                  row.get(0)?,
    registration_number: row.get(1)?,
    name:                row.get(2)?,
    region:              row.get(3)?,
  })
}

/// Supervisor row with the id still encoded.
pub fn supervisor_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<(String, String, String, String)> {
  Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

pub fn into_supervisor(
  (id, name, registration_number, title): (String, String, String, String),
) -> Result<Supervisor> {
  Ok(Supervisor { id: decode_uuid(&id)?, name, registration_number, title })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_sort_as_text() {
    let a = DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z").unwrap().with_timezone(&Utc);
    let b = DateTime::parse_from_rfc3339("2025-01-01T10:00:00.5Z").unwrap().with_timezone(&Utc);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn non_json_school_ids_become_a_string() {
    assert_eq!(decode_school_ids("s1,s2"), serde_json::json!("s1,s2"));
    assert_eq!(decode_school_ids("[\"s1\"]"), serde_json::json!(["s1"]));
  }

  #[test]
  fn corrupt_form_data_is_empty() {
    assert_eq!(decode_form_data("p", "{not json"), FormData::default());
  }
}
