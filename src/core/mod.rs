pub mod aggregate;
pub mod requests;
pub mod service;
pub mod validator;

pub use crate::domain::model::{
    AverageRating, Module, ModuleId, Professor, ProfessorId, ProfessorListing, Rating,
    RatingView,
};
pub use crate::domain::ports::{IdentityProvider, Store};
pub use crate::utils::error::Result;
