//! Supervision plans ("rencana program").
//!
//! A plan starts as a draft, is autosaved while the supervisor answers the
//! interview, and is then published. Only published plans feed reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{answer::FormData, period::PeriodLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
  Draft,
  /// Published ("terbit").
  Published,
}

/// A persisted plan.
///
/// `school_ids` keeps whatever JSON the store holds so that readers can parse
/// it leniently with [`PlanRecord::school_ids`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
  pub id:             Uuid,
  pub owner_id:       Uuid,
  #[serde(rename = "school_ids")]
  pub raw_school_ids: serde_json::Value,
  pub period_label:   String,
  pub status:         PlanStatus,
  pub form_data:      FormData,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
  pub published_at:   Option<DateTime<Utc>>,
}

impl PlanRecord {
  pub fn is_published(&self) -> bool { self.status == PlanStatus::Published }

  /// Parsed school ids. See [`parse_school_ids`].
  pub fn school_ids(&self) -> SchoolIds { parse_school_ids(&self.raw_school_ids) }
}

/// Input to [`crate::store::PortalStore::create_plan`].
#[derive(Debug, Clone)]
pub struct NewPlan {
  pub owner_id:     Uuid,
  pub school_ids:   Vec<String>,
  pub period_label: PeriodLabel,
}

// ─── School id parsing ───────────────────────────────────────────────────────

/// Outcome of parsing a stored `school_ids` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolIds {
  pub ids:       Vec<String>,
  /// `true` when the stored value was not a clean array of strings.
  pub malformed: bool,
}

/// Parse stored school ids without ever failing.
///
/// - an array keeps its non-blank string elements;
/// - a string holding a JSON array is parsed as that array;
/// - `null` is an empty list;
/// - anything else is treated as empty and flagged as malformed.
pub fn parse_school_ids(value: &serde_json::Value) -> SchoolIds {
  use serde_json::Value;

  match value {
    Value::Null => SchoolIds { ids: Vec::new(), malformed: false },
    Value::Array(items) => {
      let ids: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
      let malformed = ids.len() != items.len();
      SchoolIds { ids, malformed }
    }
    Value::String(s) => match serde_json::from_str::<Value>(s) {
      Ok(inner @ Value::Array(_)) => SchoolIds {
        malformed: true,
        ..parse_school_ids(&inner)
      },
      _ => SchoolIds { ids: Vec::new(), malformed: true },
    },
    _ => SchoolIds { ids: Vec::new(), malformed: true },
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn clean_array() {
    let parsed = parse_school_ids(&json!(["a", "b"]));
    assert_eq!(parsed.ids, vec!["a", "b"]);
    assert!(!parsed.malformed);
  }

  #[test]
  fn stringified_array_is_recovered() {
    let parsed = parse_school_ids(&json!("[\"s1\",\"s2\"]"));
    assert_eq!(parsed.ids, vec!["s1", "s2"]);
    assert!(parsed.malformed);
  }

  #[test]
  fn unparseable_string_is_empty() {
    let parsed = parse_school_ids(&json!("s1, s2"));
    assert!(parsed.ids.is_empty());
    assert!(parsed.malformed);
  }

  #[test]
  fn non_string_elements_are_dropped() {
    let parsed = parse_school_ids(&json!(["a", 3, null, " ", "b"]));
    assert_eq!(parsed.ids, vec!["a", "b"]);
    assert!(parsed.malformed);
  }

  #[test]
  fn null_and_objects() {
    assert_eq!(parse_school_ids(&json!(null)).ids, Vec::<String>::new());
    assert!(!parse_school_ids(&json!(null)).malformed);
    assert!(parse_school_ids(&json!({"id": "a"})).malformed);
  }
}
