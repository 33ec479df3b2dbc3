//! Interview answers and the form payload stored on a plan.
//!
//! The interview script asks two reflection questions and two capacity
//! questions. Each answer is an option code picked from a fixed list; the
//! mapping from codes to scores lives in [`crate::level`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reflection questions, in script order.
pub const REFLECTION_QUESTIONS: [&str; 2] = ["q1_1", "q1_2"];

/// Capacity questions, in script order.
pub const CAPACITY_QUESTIONS: [&str; 2] = ["q2_1", "q2_2"];

/// Option codes offered for reflection questions.
pub const REFLECTION_OPTIONS: [&str; 4] = ["k1", "k2", "k3", "k4"];

/// Option codes offered for capacity questions.
pub const CAPACITY_OPTIONS: [&str; 6] = ["c1", "c2", "c3", "c4", "c5", "c6"];

// ─── AnswerSet ───────────────────────────────────────────────────────────────

/// Question id → selected option code.
///
/// May be partially filled while the plan is a draft. Keys outside the
/// interview script are preserved but carry no signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
  pub fn new() -> Self { Self::default() }

  pub fn insert(
    &mut self,
    question: impl Into<String>,
    option: impl Into<String>,
  ) -> Option<String> {
    self.0.insert(question.into(), option.into())
  }

  pub fn get(&self, question: &str) -> Option<&str> {
    self.0.get(question).map(String::as_str)
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Script questions that have no (non-blank) answer yet, in script order.
  pub fn missing_questions(&self) -> Vec<&'static str> {
    REFLECTION_QUESTIONS
      .iter()
      .chain(CAPACITY_QUESTIONS.iter())
      .copied()
      .filter(|q| self.get(q).is_none_or(|a| a.trim().is_empty()))
      .collect()
  }

  pub fn is_complete(&self) -> bool { self.missing_questions().is_empty() }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

// ─── FormData ────────────────────────────────────────────────────────────────

/// The form blob autosaved while a supervisor steps through the interview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
  #[serde(default)]
  pub selected_answers: AnswerSet,
  /// Mentoring methods chosen for the schools in the plan.
  #[serde(default)]
  pub selected_methods: Vec<String>,
}
