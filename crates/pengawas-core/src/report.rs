//! Plan Aggregator: quarterly (triwulan) and annual (tahunan) reports.
//!
//! A report has one row per school referenced by the supervisor's published
//! plans in the period. Each row carries the levels and strategy derived from
//! the latest plan for that school. Mentoring visits in the period are
//! bucketed by month for the report header. Rows are never stored; every
//! request recomputes them from fresh collaborator reads.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike as _, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  directory::{Activity, SchoolInfo, Supervisor},
  error::Collaborator,
  level::{CapacityLevel, ReflectionLevel},
  period::{Period, PeriodLabel},
  plan::PlanRecord,
  store::{ActivityLog, PlanStore, SchoolDirectory, SupervisorDirectory},
  strategy::classify,
};

const MONTH_NAMES: [&str; 12] = [
  "Januari",
  "Februari",
  "Maret",
  "April",
  "Mei",
  "Juni",
  "Juli",
  "Agustus",
  "September",
  "Oktober",
  "November",
  "Desember",
];

// ─── Output types ────────────────────────────────────────────────────────────

/// One row of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
  /// 1-based, assigned after sorting by school name.
  pub sequence:            usize,
  pub school_id:           String,
  pub registration_number: String,
  pub school_name:         String,
  pub region:              String,
  pub reflection:          ReflectionLevel,
  pub capacity:            CapacityLevel,
  /// Title of the selected strategy profile.
  pub strategy:            String,
  pub methods:             Vec<String>,
  /// Placeholder column for supporting evidence; filled in by presenters.
  pub supporting_document: Option<String>,
  /// The plan the row was derived from.
  pub plan_id:             Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
  /// School name, or the raw school id when the directory does not know it.
  pub place:     String,
  pub school_id: String,
  pub date:      NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthActivities {
  /// Calendar month, 1–12.
  pub month:  u32,
  pub name:   &'static str,
  pub visits: Vec<Visit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub supervisor: Supervisor,
  pub period:     Period,
  pub rows:       Vec<ReportRow>,
  /// One entry per month of the period, in calendar order.
  pub activities: Vec<MonthActivities>,
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Build the report for `owner_id` over `period`.
///
/// Any collaborator failure fails the whole request with [`Error::Fetch`].
/// Plans referencing schools the directory does not return produce no row.
pub async fn build_report<S>(
  sources: &S,
  owner_id: Uuid,
  period: Period,
) -> Result<Report>
where
  S: PlanStore + SchoolDirectory + ActivityLog + SupervisorDirectory,
{
  let (start, end) = period.date_range()?;

  let supervisor = sources
    .get_supervisor(owner_id)
    .await
    .map_err(|e| Error::fetch(Collaborator::SupervisorDirectory, e))?
    .ok_or(Error::SupervisorNotFound(owner_id))?;

  let plans = sources
    .list_published_plans(owner_id, period)
    .await
    .map_err(|e| Error::fetch(Collaborator::PlanStore, e))?;
  debug!(%owner_id, ?period, plans = plans.len(), "fetched published plans");

  let activities = sources
    .list_activities_in_range(owner_id, start, end)
    .await
    .map_err(|e| Error::fetch(Collaborator::ActivityLog, e))?;

  let latest = latest_plan_per_school(&plans, period);

  let ids: Vec<String> = latest
    .keys()
    .cloned()
    .chain(activities.iter().map(|a| a.school_id.clone()))
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect();

  let schools = if ids.is_empty() {
    Vec::new()
  } else {
    sources
      .get_schools(&ids)
      .await
      .map_err(|e| Error::fetch(Collaborator::SchoolDirectory, e))?
  };
  let directory: HashMap<&str, &SchoolInfo> =
    schools.iter().map(|s| (s.id.as_str(), s)).collect();

  let rows = assemble_rows(&latest, &directory);
  let activities = bucket_activities(period, &activities, &directory);

  debug!(%owner_id, rows = rows.len(), "report assembled");

  Ok(Report { supervisor, period, rows, activities })
}

/// For each school id, the plan with the latest `created_at`. Ties go to the
/// plan that appears later in `plans`.
pub fn latest_plan_per_school(
  plans: &[PlanRecord],
  period: Period,
) -> BTreeMap<String, &PlanRecord> {
  let mut latest: BTreeMap<String, &PlanRecord> = BTreeMap::new();

  for plan in plans {
    if !plan.is_published() {
      debug!(plan_id = %plan.id, "skipping unpublished plan");
      continue;
    }
    match plan.period_label.parse::<PeriodLabel>() {
      Ok(label) if period.covers(&label) => {}
      Ok(_) => {
        debug!(plan_id = %plan.id, label = %plan.period_label, "plan outside period");
        continue;
      }
      Err(_) => {
        warn!(plan_id = %plan.id, label = %plan.period_label, "unparseable period label");
        continue;
      }
    }

    let parsed = plan.school_ids();
    if parsed.malformed {
      warn!(
        plan_id = %plan.id,
        raw = %plan.raw_school_ids,
        recovered = parsed.ids.len(),
        "malformed school_ids",
      );
    }

    for id in parsed.ids {
      latest
        .entry(id)
        .and_modify(|kept| {
          if plan.created_at >= kept.created_at {
            *kept = plan;
          }
        })
        .or_insert(plan);
    }
  }

  latest
}

fn assemble_rows(
  latest: &BTreeMap<String, &PlanRecord>,
  directory: &HashMap<&str, &SchoolInfo>,
) -> Vec<ReportRow> {
  let mut rows: Vec<ReportRow> = latest
    .iter()
    .filter_map(|(school_id, plan)| {
      let Some(school) = directory.get(school_id.as_str()) else {
        debug!(%school_id, plan_id = %plan.id, "school not in directory; skipped");
        return None;
      };
      let classification = classify(&plan.form_data.selected_answers);
      Some(ReportRow {
        sequence:            0,
        school_id:           school.id.clone(),
        registration_number: school.registration_number.clone(),
        school_name:         school.name.clone(),
        region:              school.region.clone(),
        reflection:          classification.reflection,
        capacity:            classification.capacity,
        strategy:            classification.strategy.title.to_owned(),
        methods:             plan.form_data.selected_methods.clone(),
        supporting_document: None,
        plan_id:             plan.id,
      })
    })
    .collect();

  rows.sort_by(|a, b| {
    a.school_name
      .to_lowercase()
      .cmp(&b.school_name.to_lowercase())
      .then_with(|| a.school_id.cmp(&b.school_id))
  });
  for (i, row) in rows.iter_mut().enumerate() {
    row.sequence = i + 1;
  }
  rows
}

fn bucket_activities(
  period: Period,
  activities: &[Activity],
  directory: &HashMap<&str, &SchoolInfo>,
) -> Vec<MonthActivities> {
  let mut buckets: Vec<MonthActivities> = period
    .months()
    .map(|month| MonthActivities {
      month,
      name: MONTH_NAMES[(month - 1) as usize],
      visits: Vec::new(),
    })
    .collect();

  for activity in activities.iter().filter(|a| period.contains_date(a.date)) {
    let month = activity.date.month();
    let Some(bucket) = buckets.iter_mut().find(|b| b.month == month) else {
      continue;
    };
    let place = directory
      .get(activity.school_id.as_str())
      .map_or_else(|| activity.school_id.clone(), |s| s.name.clone());
    bucket.visits.push(Visit {
      place,
      school_id: activity.school_id.clone(),
      date: activity.date,
    });
  }

  for bucket in &mut buckets {
    bucket.visits.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.place.cmp(&b.place)));
  }
  buckets
}
