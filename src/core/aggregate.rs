use crate::domain::model::{AverageRating, ModuleId, ProfessorId, Rating};
use crate::utils::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tie-break used when the mean falls exactly halfway between two integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 2.5 -> 2, 3.5 -> 4
    #[default]
    HalfEven,
    /// 2.5 -> 3, 3.5 -> 4
    HalfUp,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfEven => write!(f, "half_even"),
            RoundingMode::HalfUp => write!(f, "half_up"),
        }
    }
}

impl RoundingMode {
    /// Rounds `sum / count` to the nearest integer. Exact, no floating point.
    /// `count` must be non-zero.
    pub fn round_ratio(self, sum: u64, count: u64) -> u64 {
        debug_assert!(count > 0);
        let quotient = sum / count;
        let twice_remainder = (sum % count) * 2;

        if twice_remainder > count {
            quotient + 1
        } else if twice_remainder < count {
            quotient
        } else {
            match self {
                RoundingMode::HalfUp => quotient + 1,
                RoundingMode::HalfEven if quotient % 2 == 0 => quotient,
                RoundingMode::HalfEven => quotient + 1,
            }
        }
    }
}

/// Averages the ratings that belong exactly to `(professor, module)`.
/// Rows for any other pair are ignored.
pub fn average(
    professor: ProfessorId,
    module: ModuleId,
    ratings: &[Rating],
    mode: RoundingMode,
) -> Result<AverageRating> {
    let values: Vec<u64> = ratings
        .iter()
        .filter(|r| r.professor == professor && r.module == module)
        .map(|r| u64::from(r.rating.get()))
        .collect();

    if values.is_empty() {
        return Err(RatingError::NoData { professor, module });
    }

    let count = values.len() as u64;
    let sum: u64 = values.iter().sum();
    // A mean of values in 1..=5 rounds back into 1..=5.
    let rounded = mode.round_ratio(sum, count) as u8;

    Ok(AverageRating {
        professor,
        module,
        average_rating: rounded,
        mean: sum as f64 / count as f64,
        count: values.len(),
    })
}
