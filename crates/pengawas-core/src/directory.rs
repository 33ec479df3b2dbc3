//! Schools, supervisors, and mentoring-visit activity records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A school as known to the school directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolInfo {
  pub id:                  String,
  /// National school registration number (NPSN).
  pub registration_number: String,
  pub name:                String,
  /// District or city.
  pub region:              String,
}

/// Identity fields printed in report headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervisor {
  pub id:                  Uuid,
  pub name:                String,
  /// Civil-service registration number (NIP).
  pub registration_number: String,
  /// Rank or functional title.
  pub title:               String,
}

/// A mentoring visit ("pendampingan") to a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub id:          Uuid,
  pub owner_id:    Uuid,
  pub school_id:   String,
  pub date:        NaiveDate,
  pub note:        Option<String>,
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::PortalStore::record_activity`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
  pub owner_id:  Uuid,
  pub school_id: String,
  pub date:      NaiveDate,
  #[serde(default)]
  pub note:      Option<String>,
}
