//! Level Calculator: interview answers → reflection and capacity levels.
//!
//! Both axes average the per-question scores of whatever questions are
//! answered. An axis with no answers scores 1, so an incomplete draft always
//! lands on the lowest levels instead of failing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::answer::{AnswerSet, CAPACITY_QUESTIONS, REFLECTION_QUESTIONS};

/// Awareness of the need to change ("refleksi").
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ReflectionLevel {
  /// Still developing awareness.
  Berkembang,
  /// Already empowered.
  Berdaya,
}

/// Capacity of school leadership to carry out change ("kapasitas").
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum CapacityLevel {
  Rendah,
  Sedang,
  Tinggi,
}

/// The pair of levels derived from one answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levels {
  pub reflection: ReflectionLevel,
  pub capacity:   CapacityLevel,
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// `k1`/`k2` are the "not yet" options, `k3`/`k4` the "already" options.
fn reflection_score(code: &str) -> u8 {
  match code {
    "k3" | "k4" => 2,
    _ => 1,
  }
}

fn capacity_score(code: &str) -> u8 {
  match code {
    "c3" | "c4" => 2,
    "c5" | "c6" => 3,
    _ => 1,
  }
}

/// Mean score over the answered questions, or 1 when none are answered.
fn axis_average(
  answers: &AnswerSet,
  questions: &[&str],
  score: fn(&str) -> u8,
) -> f64 {
  let (sum, count) = questions
    .iter()
    .filter_map(|q| answers.get(q))
    .fold((0u32, 0u32), |(sum, count), code| {
      (sum + u32::from(score(code)), count + 1)
    });

  if count == 0 { 1.0 } else { f64::from(sum) / f64::from(count) }
}

// ─── Public API ──────────────────────────────────────────────────────────────

pub fn reflection_level(answers: &AnswerSet) -> ReflectionLevel {
  let avg = axis_average(answers, &REFLECTION_QUESTIONS, reflection_score);
  if avg >= 1.5 {
    ReflectionLevel::Berdaya
  } else {
    ReflectionLevel::Berkembang
  }
}

pub fn capacity_level(answers: &AnswerSet) -> CapacityLevel {
  let avg = axis_average(answers, &CAPACITY_QUESTIONS, capacity_score);
  if avg < 1.5 {
    CapacityLevel::Rendah
  } else if avg < 2.5 {
    CapacityLevel::Sedang
  } else {
    CapacityLevel::Tinggi
  }
}

/// Derive both levels. Total over every input, including the empty set.
pub fn calculate_levels(answers: &AnswerSet) -> Levels {
  Levels {
    reflection: reflection_level(answers),
    capacity:   capacity_level(answers),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
    pairs.iter().copied().collect()
  }

  #[test]
  fn empty_answers_default_to_lowest() {
    let levels = calculate_levels(&AnswerSet::new());
    assert_eq!(levels.reflection, ReflectionLevel::Berkembang);
    assert_eq!(levels.capacity, CapacityLevel::Rendah);
  }

  #[test]
  fn reflection_threshold_is_inclusive() {
    let a = answers(&[("q1_1", "k1"), ("q1_2", "k3")]);
    assert_eq!(reflection_level(&a), ReflectionLevel::Berdaya);
  }

  #[test]
  fn reflection_both_not_yet_is_berkembang() {
    let a = answers(&[("q1_1", "k1"), ("q1_2", "k2")]);
    assert_eq!(reflection_level(&a), ReflectionLevel::Berkembang);
  }

  #[test]
  fn single_reflection_answer_is_its_own_average() {
    assert_eq!(
      reflection_level(&answers(&[("q1_2", "k4")])),
      ReflectionLevel::Berdaya
    );
    assert_eq!(
      reflection_level(&answers(&[("q1_1", "k2")])),
      ReflectionLevel::Berkembang
    );
  }

  #[test]
  fn capacity_mid_band() {
    let a = answers(&[("q2_1", "c3"), ("q2_2", "c4")]);
    assert_eq!(capacity_level(&a), CapacityLevel::Sedang);
  }

  #[test]
  fn capacity_band_edges() {
    // (1 + 2) / 2 = 1.5 → Sedang
    assert_eq!(
      capacity_level(&answers(&[("q2_1", "c1"), ("q2_2", "c3")])),
      CapacityLevel::Sedang
    );
    // (2 + 3) / 2 = 2.5 → Tinggi
    assert_eq!(
      capacity_level(&answers(&[("q2_1", "c4"), ("q2_2", "c5")])),
      CapacityLevel::Tinggi
    );
    // (1 + 1) / 2 = 1.0 → Rendah
    assert_eq!(
      capacity_level(&answers(&[("q2_1", "c2"), ("q2_2", "c1")])),
      CapacityLevel::Rendah
    );
  }

  #[test]
  fn unrecognised_codes_score_lowest() {
    let a = answers(&[("q2_1", "zz"), ("q2_2", "c6")]);
    // (1 + 3) / 2 = 2.0
    assert_eq!(capacity_level(&a), CapacityLevel::Sedang);

    let a = answers(&[("q1_1", "c6"), ("q1_2", "")]);
    assert_eq!(reflection_level(&a), ReflectionLevel::Berkembang);
  }

  #[test]
  fn questions_outside_the_axis_are_ignored() {
    // Reflection codes under capacity questions and vice versa score 1.
    let a = answers(&[("q1_1", "c6"), ("q2_1", "k4"), ("extra", "k4")]);
    let levels = calculate_levels(&a);
    assert_eq!(levels.reflection, ReflectionLevel::Berkembang);
    assert_eq!(levels.capacity, CapacityLevel::Rendah);
  }

  #[test]
  fn every_subset_of_answers_yields_levels() {
    let all = [("q1_1", "k3"), ("q1_2", "k2"), ("q2_1", "c5"), ("q2_2", "c2")];
    for mask in 0u8..16 {
      let subset: AnswerSet = all
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, pair)| *pair)
        .collect();
      let first = calculate_levels(&subset);
      assert_eq!(first, calculate_levels(&subset), "mask {mask:04b}");
    }
  }
}
