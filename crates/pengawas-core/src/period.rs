//! Reporting periods and plan period labels.
//!
//! A plan is labelled either for a whole year (`"2025"`) or for one quarter
//! (`"2025-T2"`, *triwulan* II). Reports are requested for a year or a
//! quarter; a year-wide plan counts towards every quarter of its year.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator as _};

use crate::{Error, Result};

// ─── Quarter ─────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quarter {
  T1,
  T2,
  T3,
  T4,
}

impl Quarter {
  pub fn number(self) -> u8 {
    match self {
      Self::T1 => 1,
      Self::T2 => 2,
      Self::T3 => 3,
      Self::T4 => 4,
    }
  }

  pub fn first_month(self) -> u32 { u32::from(self.number() - 1) * 3 + 1 }

  pub fn last_month(self) -> u32 { self.first_month() + 2 }

  pub fn of_month(month: u32) -> Option<Self> {
    match month {
      1..=3 => Some(Self::T1),
      4..=6 => Some(Self::T2),
      7..=9 => Some(Self::T3),
      10..=12 => Some(Self::T4),
      _ => None,
    }
  }
}

impl TryFrom<u8> for Quarter {
  type Error = Error;

  fn try_from(n: u8) -> Result<Self> {
    match n {
      1 => Ok(Self::T1),
      2 => Ok(Self::T2),
      3 => Ok(Self::T3),
      4 => Ok(Self::T4),
      other => Err(Error::InvalidPeriod(format!("quarter {other} out of range 1..=4"))),
    }
  }
}

impl From<Quarter> for u8 {
  fn from(q: Quarter) -> u8 { q.number() }
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// A reporting period: a whole year or one quarter of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
  pub year:    i32,
  pub quarter: Option<Quarter>,
}

impl Period {
  pub fn year(year: i32) -> Self { Self { year, quarter: None } }

  pub fn quarter(year: i32, quarter: Quarter) -> Self {
    Self { year, quarter: Some(quarter) }
  }

  pub fn first_month(&self) -> u32 {
    self.quarter.map_or(1, Quarter::first_month)
  }

  pub fn last_month(&self) -> u32 {
    self.quarter.map_or(12, Quarter::last_month)
  }

  /// Months covered by the period, in calendar order.
  pub fn months(&self) -> RangeInclusive<u32> {
    self.first_month()..=self.last_month()
  }

  /// Inclusive date range of the period.
  pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::InvalidPeriod(format!("year {} is out of range", self.year));

    let start = NaiveDate::from_ymd_opt(self.year, self.first_month(), 1)
      .ok_or_else(invalid)?;
    let next_start = if self.last_month() == 12 {
      NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
    } else {
      NaiveDate::from_ymd_opt(self.year, self.last_month() + 1, 1)
    }
    .ok_or_else(invalid)?;
    let end = next_start.pred_opt().ok_or_else(invalid)?;

    Ok((start, end))
  }

  pub fn contains_date(&self, date: NaiveDate) -> bool {
    date.year() == self.year
      && self.quarter.is_none_or(|q| Quarter::of_month(date.month()) == Some(q))
  }

  /// Whether a plan labelled `label` belongs in a report for this period.
  pub fn covers(&self, label: &PeriodLabel) -> bool {
    if label.year != self.year {
      return false;
    }
    match (self.quarter, label.quarter) {
      (None, _) | (_, None) => true,
      (Some(want), Some(have)) => want == have,
    }
  }

  /// The canonical labels [`Period::covers`] accepts, for use as a storage
  /// filter.
  pub fn matching_labels(&self) -> Vec<PeriodLabel> {
    let whole_year = PeriodLabel { year: self.year, quarter: None };
    match self.quarter {
      Some(q) => vec![whole_year, PeriodLabel { year: self.year, quarter: Some(q) }],
      None => std::iter::once(whole_year)
        .chain(
          Quarter::iter().map(|q| PeriodLabel { year: self.year, quarter: Some(q) }),
        )
        .collect(),
    }
  }
}

// ─── PeriodLabel ─────────────────────────────────────────────────────────────

/// The period a plan is written for. Canonical form `YYYY` or `YYYY-Tn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodLabel {
  pub year:    i32,
  pub quarter: Option<Quarter>,
}

impl fmt::Display for PeriodLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.quarter {
      Some(q) => write!(f, "{:04}-T{}", self.year, q.number()),
      None => write!(f, "{:04}", self.year),
    }
  }
}

impl FromStr for PeriodLabel {
  type Err = Error;

  /// Accepts `2025`, `2025-T3` and `2025-t3`, with surrounding whitespace.
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidPeriodLabel(s.to_owned());
    let trimmed = s.trim();

    let (year_part, quarter_part) = match trimmed.split_once('-') {
      Some((y, q)) => (y, Some(q)),
      None => (trimmed, None),
    };

    if year_part.len() != 4 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }
    let year: i32 = year_part.parse().map_err(|_| invalid())?;

    let quarter = match quarter_part {
      None => None,
      Some(q) => {
        let n = match q.as_bytes() {
          [b'T' | b't', d @ b'1'..=b'4'] => d - b'0',
          _ => return Err(invalid()),
        };
        Some(Quarter::try_from(n).map_err(|_| invalid())?)
      }
    };

    Ok(Self { year, quarter })
  }
}

impl TryFrom<String> for PeriodLabel {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<PeriodLabel> for String {
  fn from(label: PeriodLabel) -> String { label.to_string() }
}

impl From<Period> for PeriodLabel {
  fn from(p: Period) -> Self { Self { year: p.year, quarter: p.quarter } }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_parse_and_canonicalise() {
    let l: PeriodLabel = " 2025-t2 ".parse().unwrap();
    assert_eq!(l, PeriodLabel { year: 2025, quarter: Some(Quarter::T2) });
    assert_eq!(l.to_string(), "2025-T2");
    assert_eq!("2024".parse::<PeriodLabel>().unwrap().to_string(), "2024");
  }

  #[test]
  fn label_rejects_garbage() {
    for bad in ["", "25", "2025-T5", "2025-Q1", "2025-T", "abcd", "2025-T1-x", "2025-T0"] {
      assert!(
        matches!(bad.parse::<PeriodLabel>(), Err(Error::InvalidPeriodLabel(_))),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn quarter_must_be_a_single_plain_digit() {
    for bad in ["2025-T+1", "2025-T01", "2025-T 1", "2025-T1 0", "2025-T١"] {
      assert!(
        matches!(bad.parse::<PeriodLabel>(), Err(Error::InvalidPeriodLabel(_))),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn quarter_covers_its_own_label_and_the_whole_year() {
    let p = Period::quarter(2025, Quarter::T3);
    assert!(p.covers(&"2025".parse().unwrap()));
    assert!(p.covers(&"2025-T3".parse().unwrap()));
    assert!(!p.covers(&"2025-T2".parse().unwrap()));
    assert!(!p.covers(&"2024-T3".parse().unwrap()));
  }

  #[test]
  fn year_covers_every_quarter() {
    let p = Period::year(2025);
    for label in p.matching_labels() {
      assert!(p.covers(&label));
    }
    assert_eq!(p.matching_labels().len(), 5);
    assert_eq!(Period::quarter(2025, Quarter::T1).matching_labels().len(), 2);
  }

  #[test]
  fn date_ranges() {
    let (s, e) = Period::quarter(2024, Quarter::T1).date_range().unwrap();
    assert_eq!(s, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(e, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

    let (s, e) = Period::year(2025).date_range().unwrap();
    assert_eq!(s, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(e, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

    let (_, e) = Period::quarter(2025, Quarter::T4).date_range().unwrap();
    assert_eq!(e, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
  }

  #[test]
  fn contains_date_respects_quarter() {
    let p = Period::quarter(2025, Quarter::T2);
    assert!(p.contains_date(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    assert!(p.contains_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
    assert!(!p.contains_date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    assert_eq!(Period::year(2025).months().count(), 12);
    assert_eq!(p.months().collect::<Vec<_>>(), vec![4, 5, 6]);
  }

  #[test]
  fn quarter_serde_is_numeric() {
    assert_eq!(serde_json::to_string(&Quarter::T3).unwrap(), "3");
    assert!(serde_json::from_str::<Quarter>("7").is_err());
  }
}
