//! Strategy Selector: the 2×3 "komitmen perubahan" decision table.
//!
//! |             | Rendah              | Sedang              | Tinggi                  |
//! |-------------|---------------------|---------------------|-------------------------|
//! | Berkembang  | Penyemai Perubahan  | Penguatan Perubahan | Pemicu Perubahan        |
//! | Berdaya     | Perubahan Segera    | Perubahan Berangsur | Perubahan Berkelanjutan |

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::{
  answer::AnswerSet,
  level::{CapacityLevel, Levels, ReflectionLevel, calculate_levels},
};

/// Stable identifier of a strategy profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKey {
  PenyemaiPerubahan,
  PenguatanPerubahan,
  PemicuPerubahan,
  PerubahanSegera,
  PerubahanBerangsur,
  PerubahanBerkelanjutan,
}

/// Static reference data for one cell of the decision table.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StrategyProfile {
  pub key:         StrategyKey,
  pub title:       &'static str,
  pub description: &'static str,
  /// Short tag used to order mentoring effort across schools.
  pub priority:    &'static str,
  pub icon:        &'static str,
  pub color:       &'static str,
}

// ─── Table ───────────────────────────────────────────────────────────────────

pub static PENYEMAI_PERUBAHAN: StrategyProfile = StrategyProfile {
  key:         StrategyKey::PenyemaiPerubahan,
  title:       "Penyemai Perubahan",
  description: "Kesadaran akan perlunya perubahan masih berkembang dan \
                kapasitas kepemimpinan satuan pendidikan masih rendah. \
                Pendampingan dimulai dengan menumbuhkan refleksi atas kondisi \
                sekolah sambil membangun kapasitas dasar kepala sekolah.",
  priority:    "pendampingan intensif",
  icon:        "sprout",
  color:       "red",
};

pub static PENGUATAN_PERUBAHAN: StrategyProfile = StrategyProfile {
  key:         StrategyKey::PenguatanPerubahan,
  title:       "Penguatan Perubahan",
  description: "Kapasitas kepemimpinan cukup, namun refleksi atas kebutuhan \
                perubahan belum kuat. Pendampingan menekankan penggunaan data \
                rapor pendidikan untuk mempertajam refleksi dan menguatkan \
                komitmen.",
  priority:    "pendampingan terarah",
  icon:        "shield",
  color:       "orange",
};

pub static PEMICU_PERUBAHAN: StrategyProfile = StrategyProfile {
  key:         StrategyKey::PemicuPerubahan,
  title:       "Pemicu Perubahan",
  description: "Kapasitas kepemimpinan tinggi tetapi kesadaran akan perlunya \
                perubahan masih berkembang. Pendampingan berfokus memicu \
                refleksi sehingga kapasitas yang ada diarahkan pada perbaikan \
                prioritas.",
  priority:    "pemantik refleksi",
  icon:        "zap",
  color:       "yellow",
};

pub static PERUBAHAN_SEGERA: StrategyProfile = StrategyProfile {
  key:         StrategyKey::PerubahanSegera,
  title:       "Perubahan Segera",
  description: "Satuan pendidikan sudah menyadari perlunya perubahan, tetapi \
                kapasitas untuk melaksanakannya masih rendah. Pendampingan \
                segera diberikan dalam bentuk penguatan kapasitas teknis dan \
                perencanaan.",
  priority:    "penguatan kapasitas segera",
  icon:        "alarm-clock",
  color:       "purple",
};

pub static PERUBAHAN_BERANGSUR: StrategyProfile = StrategyProfile {
  key:         StrategyKey::PerubahanBerangsur,
  title:       "Perubahan Berangsur",
  description: "Kesadaran sudah terbentuk dan kapasitas berada pada tingkat \
                sedang. Perubahan dijalankan bertahap dengan pendampingan \
                berkala untuk menjaga konsistensi pelaksanaan program.",
  priority:    "pendampingan berkala",
  icon:        "trending-up",
  color:       "blue",
};

pub static PERUBAHAN_BERKELANJUTAN: StrategyProfile = StrategyProfile {
  key:         StrategyKey::PerubahanBerkelanjutan,
  title:       "Perubahan Berkelanjutan",
  description: "Kesadaran dan kapasitas kepemimpinan sama-sama kuat. Satuan \
                pendidikan mampu menggerakkan perubahan secara mandiri; \
                pengawas berperan sebagai mitra untuk menjaga keberlanjutan \
                dan berbagi praktik baik.",
  priority:    "kemitraan mandiri",
  icon:        "infinity",
  color:       "green",
};

/// All six profiles, row-major over the decision table.
pub static ALL_PROFILES: [&StrategyProfile; 6] = [
  &PENYEMAI_PERUBAHAN,
  &PENGUATAN_PERUBAHAN,
  &PEMICU_PERUBAHAN,
  &PERUBAHAN_SEGERA,
  &PERUBAHAN_BERANGSUR,
  &PERUBAHAN_BERKELANJUTAN,
];

/// Look up the profile for a pair of levels. Total over all six pairs.
pub fn strategy_for(
  reflection: ReflectionLevel,
  capacity: CapacityLevel,
) -> &'static StrategyProfile {
  use CapacityLevel::*;
  use ReflectionLevel::*;

  match (reflection, capacity) {
    (Berkembang, Rendah) => &PENYEMAI_PERUBAHAN,
    (Berkembang, Sedang) => &PENGUATAN_PERUBAHAN,
    (Berkembang, Tinggi) => &PEMICU_PERUBAHAN,
    (Berdaya, Rendah) => &PERUBAHAN_SEGERA,
    (Berdaya, Sedang) => &PERUBAHAN_BERANGSUR,
    (Berdaya, Tinggi) => &PERUBAHAN_BERKELANJUTAN,
  }
}

impl Levels {
  pub fn strategy(&self) -> &'static StrategyProfile {
    strategy_for(self.reflection, self.capacity)
  }
}

// ─── Classification ──────────────────────────────────────────────────────────

/// Levels plus the selected profile for one answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
  pub reflection: ReflectionLevel,
  pub capacity:   CapacityLevel,
  pub strategy:   &'static StrategyProfile,
}

pub fn classify(answers: &AnswerSet) -> Classification {
  let levels = calculate_levels(answers);
  Classification {
    reflection: levels.reflection,
    capacity:   levels.capacity,
    strategy:   levels.strategy(),
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn lookup_examples() {
    assert_eq!(
      strategy_for(ReflectionLevel::Berdaya, CapacityLevel::Tinggi).title,
      "Perubahan Berkelanjutan"
    );
    assert_eq!(
      strategy_for(ReflectionLevel::Berkembang, CapacityLevel::Rendah).title,
      "Penyemai Perubahan"
    );
  }

  #[test]
  fn table_covers_six_distinct_profiles() {
    let mut seen = HashSet::new();
    for r in ReflectionLevel::iter() {
      for c in CapacityLevel::iter() {
        seen.insert(strategy_for(r, c).key);
      }
    }
    assert_eq!(seen.len(), 6);
    assert_eq!(seen, StrategyKey::iter().collect());
  }

  #[test]
  fn all_profiles_in_table_order() {
    let mut table = Vec::new();
    for r in ReflectionLevel::iter() {
      for c in CapacityLevel::iter() {
        table.push(strategy_for(r, c).key);
      }
    }
    let listed: Vec<_> = ALL_PROFILES.iter().map(|p| p.key).collect();
    assert_eq!(table, listed);
  }

  #[test]
  fn classify_is_deterministic() {
    let answers: AnswerSet =
      [("q1_1", "k4"), ("q1_2", "k3"), ("q2_1", "c3"), ("q2_2", "c2")]
        .into_iter()
        .collect();
    let first = classify(&answers);
    for _ in 0..10 {
      assert_eq!(classify(&answers), first);
    }
    assert_eq!(first.strategy.title, "Perubahan Berangsur");
  }

  #[test]
  fn classification_serialises_profile_inline() {
    let json = serde_json::to_value(classify(&AnswerSet::new())).unwrap();
    assert_eq!(json["reflection"], "berkembang");
    assert_eq!(json["capacity"], "rendah");
    assert_eq!(json["strategy"]["key"], "penyemai_perubahan");
    assert_eq!(json["strategy"]["title"], "Penyemai Perubahan");
  }
}
