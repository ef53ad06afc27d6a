use crate::domain::model::{
    Catalog, Module, ModuleId, NewModule, NewRating, Professor, ProfessorId, Rating, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for professors, modules and ratings.
///
/// Implementations must make `insert_rating` atomic: the teaching relation is
/// re-checked with [`crate::domain::model::ensure_teaches`] and the row written
/// without any other writer observing or changing the relation in between.
#[async_trait]
pub trait Store: Send + Sync {
    async fn professor(&self, id: ProfessorId) -> Result<Option<Professor>>;
    async fn module(&self, id: ModuleId) -> Result<Option<Module>>;

    /// All professors, ordered by id.
    async fn professors(&self) -> Result<Vec<Professor>>;
    /// All modules, ordered by id.
    async fn modules(&self) -> Result<Vec<Module>>;
    /// All ratings, ordered by creation time then id.
    async fn ratings(&self) -> Result<Vec<Rating>>;
    async fn ratings_for(&self, professor: ProfessorId, module: ModuleId) -> Result<Vec<Rating>>;

    async fn insert_rating(&self, rating: NewRating) -> Result<Rating>;

    // Administrative writes. Not reachable from rating creation.
    async fn add_professor(&self, id: Option<ProfessorId>, name: &str) -> Result<Professor>;
    async fn add_module(&self, module: NewModule) -> Result<Module>;
    async fn assign_teacher(&self, module: ModuleId, professor: ProfessorId) -> Result<()>;
    async fn remove_teacher(&self, module: ModuleId, professor: ProfessorId) -> Result<()>;
    /// Writes `catalog` in one step if the store holds no professors and no modules.
    async fn seed(&self, catalog: Catalog) -> Result<bool>;
}

/// Answers "who is making this request".
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Result<UserId>;
}
