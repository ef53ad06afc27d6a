//! Raw caller input (query parameters, form fields, CLI arguments) turned into typed ids.

use crate::domain::model::{ModuleId, ProfessorId};
use crate::utils::error::{RatingError, Result};
use crate::utils::validation::parse_required;
use serde::Deserialize;
use std::num::IntErrorKind;

/// Parameters of an average-rating lookup, as they arrive from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AverageQuery {
    pub professor: Option<String>,
    pub module: Option<String>,
}

impl AverageQuery {
    pub fn parse(&self) -> Result<(ProfessorId, ModuleId)> {
        if self.professor.is_none() || self.module.is_none() {
            return Err(RatingError::invalid_input(
                "professor/module",
                "both professor and module ID are required",
            ));
        }
        let professor = parse_required::<u64>("professor", self.professor.as_deref())?;
        let module = parse_required::<u64>("module", self.module.as_deref())?;
        Ok((ProfessorId::new(professor), ModuleId::new(module)))
    }
}

/// A rating submission before any domain checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateRequest {
    pub professor: Option<String>,
    pub module: Option<String>,
    pub rating: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRate {
    pub professor: ProfessorId,
    pub module: ModuleId,
    /// Still unchecked against the 1-5 range; that is a domain rule, not a parse rule.
    pub rating: i64,
    pub comment: Option<String>,
}

impl RateRequest {
    pub fn parse(&self) -> Result<ParsedRate> {
        let professor = parse_required::<u64>("professor", self.professor.as_deref())?;
        let module = parse_required::<u64>("module", self.module.as_deref())?;
        let rating = parse_rating(self.rating.as_deref())?;

        Ok(ParsedRate {
            professor: ProfessorId::new(professor),
            module: ModuleId::new(module),
            rating,
            comment: self.comment.clone(),
        })
    }
}

/// An integer too wide for `i64` is still an integer, so it is out of range
/// rather than malformed.
fn parse_rating(raw: Option<&str>) -> Result<i64> {
    let overflow = raw
        .map(str::trim)
        .and_then(|s| s.parse::<i64>().err())
        .map(|e| e.kind().clone());

    match overflow {
        Some(IntErrorKind::PosOverflow) => Err(RatingError::OutOfRange { value: i64::MAX }),
        Some(IntErrorKind::NegOverflow) => Err(RatingError::OutOfRange { value: i64::MIN }),
        _ => parse_required::<i64>("rating", raw),
    }
}
