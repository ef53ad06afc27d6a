use crate::utils::error::{RatingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(ProfessorId);
id_type!(ModuleId);
id_type!(RatingId);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Usernames are trimmed; an empty name is not an identity.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RatingError::invalid_input("user", "username cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A star rating, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(RatingError::OutOfRange { value });
        }
        Ok(Self(value as u8))
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: ProfessorId,
    pub name: String,
}

impl fmt::Display for Professor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub year: i32,
    pub semester: i32,
    #[serde(default)]
    pub professors: BTreeSet<ProfessorId>,
}

impl Module {
    pub fn is_taught_by(&self, professor: ProfessorId) -> bool {
        self.professors.contains(&professor)
    }

    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id,
            name: self.name.clone(),
            year: self.year,
            semester: self.semester,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Year: {}, Semester: {}",
            self.name, self.year, self.semester
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub user: UserId,
    pub professor: ProfessorId,
    pub module: ModuleId,
    pub rating: RatingValue,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A rating that passed the service checks and awaits the store's atomic insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub user: UserId,
    pub professor: ProfessorId,
    pub module: ModuleId,
    pub rating: RatingValue,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModule {
    pub id: Option<ModuleId>,
    pub name: String,
    pub year: i32,
    pub semester: i32,
    pub professors: BTreeSet<ProfessorId>,
}

/// Professors and modules written together when a store is first set up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub professors: Vec<Professor>,
    pub modules: Vec<NewModule>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.professors.is_empty() && self.modules.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub name: String,
    pub year: i32,
    pub semester: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorListing {
    pub id: ProfessorId,
    pub name: String,
    pub modules: Vec<ModuleSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingView {
    pub professor: Professor,
    pub module: ModuleSummary,
    pub rating: RatingValue,
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageRating {
    pub professor: ProfessorId,
    pub module: ModuleId,
    pub average_rating: u8,
    pub mean: f64,
    pub count: usize,
}

/// The teaching rule: a professor may only be rated for a module listed as teaching it.
pub fn ensure_teaches(module: &Module, professor: ProfessorId) -> Result<()> {
    if module.is_taught_by(professor) {
        Ok(())
    } else {
        Err(RatingError::NotTeaching {
            professor,
            module: module.id,
        })
    }
}
