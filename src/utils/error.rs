use crate::domain::model::{ModuleId, ProfessorId};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which kind of entity a failed lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Professor,
    Module,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Professor => write!(f, "Professor"),
            Entity::Module => write!(f, "Module"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: u64 },

    #[error("Professor {professor} does not teach module {module}")]
    NotTeaching {
        professor: ProfessorId,
        module: ModuleId,
    },

    #[error("Rating {value} is outside the allowed range 1-5")]
    OutOfRange { value: i64 },

    #[error("Rating attempted without an authenticated user")]
    Unauthenticated,

    #[error("No ratings found for professor {professor} in module {module}")]
    NoData {
        professor: ProfessorId,
        module: ModuleId,
    },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stable tag for each error, independent of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    NotTeaching,
    OutOfRange,
    Unauthenticated,
    NoData,
    InvalidInput,
    StorageUnavailable,
    Config,
    Serialization,
}

impl RatingError {
    pub fn professor_not_found(id: ProfessorId) -> Self {
        RatingError::NotFound {
            entity: Entity::Professor,
            id: id.get(),
        }
    }

    pub fn module_not_found(id: ModuleId) -> Self {
        RatingError::NotFound {
            entity: Entity::Module,
            id: id.get(),
        }
    }

    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        RatingError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        RatingError::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn config(field: &str, message: impl Into<String>) -> Self {
        RatingError::Config {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RatingError::NotFound { .. } => ErrorKind::NotFound,
            RatingError::NotTeaching { .. } => ErrorKind::NotTeaching,
            RatingError::OutOfRange { .. } => ErrorKind::OutOfRange,
            RatingError::Unauthenticated => ErrorKind::Unauthenticated,
            RatingError::NoData { .. } => ErrorKind::NoData,
            RatingError::InvalidInput { .. } => ErrorKind::InvalidInput,
            RatingError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
            RatingError::Config { .. } => ErrorKind::Config,
            RatingError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// HTTP-style status code for a transport layer sitting on top of the core.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::NoData => 404,
            ErrorKind::NotTeaching | ErrorKind::OutOfRange | ErrorKind::InvalidInput => 400,
            ErrorKind::Unauthenticated => 401,
            ErrorKind::StorageUnavailable => 503,
            ErrorKind::Config | ErrorKind::Serialization => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RatingError::NotFound { entity, .. } => format!("{} not found.", entity),
            RatingError::NotTeaching { .. } => {
                "Professor does not teach that module.".to_string()
            }
            RatingError::OutOfRange { .. } => "Rating must be between 1 and 5.".to_string(),
            RatingError::Unauthenticated => "Please login before rating.".to_string(),
            RatingError::NoData { .. } => {
                "No ratings found for that professor in that module.".to_string()
            }
            RatingError::InvalidInput { field, reason } => {
                format!("Invalid value for {}: {}.", field, reason)
            }
            RatingError::StorageUnavailable { .. } => {
                "The rating store is currently unavailable. Try again later.".to_string()
            }
            RatingError::Config { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            RatingError::Serialization(e) => format!("Could not encode the result: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, RatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_4xx() {
        let errors = vec![
            RatingError::professor_not_found(ProfessorId::new(1)),
            RatingError::NotTeaching {
                professor: ProfessorId::new(1),
                module: ModuleId::new(20),
            },
            RatingError::OutOfRange { value: 6 },
            RatingError::Unauthenticated,
            RatingError::NoData {
                professor: ProfessorId::new(1),
                module: ModuleId::new(10),
            },
            RatingError::invalid_input("professor", "missing"),
        ];

        for error in errors {
            assert!(error.is_client_error(), "{:?} should be a client error", error);
        }
    }

    #[test]
    fn test_storage_error_is_not_client_error() {
        let error = RatingError::storage("disk gone");
        assert_eq!(error.kind(), ErrorKind::StorageUnavailable);
        assert_eq!(error.status_code(), 503);
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let error = RatingError::module_not_found(ModuleId::new(99));
        assert_eq!(error.user_friendly_message(), "Module not found.");
        assert_eq!(error.to_string(), "Module 99 not found");
        assert_eq!(error.status_code(), 404);
    }

    #[test]
    fn test_not_teaching_and_no_data_have_distinct_codes() {
        let not_teaching = RatingError::NotTeaching {
            professor: ProfessorId::new(1),
            module: ModuleId::new(20),
        };
        let no_data = RatingError::NoData {
            professor: ProfessorId::new(1),
            module: ModuleId::new(20),
        };
        assert_eq!(not_teaching.status_code(), 400);
        assert_eq!(no_data.status_code(), 404);
        assert_ne!(not_teaching.kind(), no_data.kind());
    }
}
