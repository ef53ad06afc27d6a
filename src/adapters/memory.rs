use crate::adapters::state::StoreState;
use crate::domain::model::{
    Catalog, Module, ModuleId, NewModule, NewRating, Professor, ProfessorId, Rating,
};
use crate::domain::ports::Store;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rating_count(&self) -> usize {
        self.state.read().await.rating_count()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn professor(&self, id: ProfessorId) -> Result<Option<Professor>> {
        Ok(self.state.read().await.professor(id).cloned())
    }

    async fn module(&self, id: ModuleId) -> Result<Option<Module>> {
        Ok(self.state.read().await.module(id).cloned())
    }

    async fn professors(&self) -> Result<Vec<Professor>> {
        Ok(self.state.read().await.professors())
    }

    async fn modules(&self) -> Result<Vec<Module>> {
        Ok(self.state.read().await.modules())
    }

    async fn ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.state.read().await.ratings())
    }

    async fn ratings_for(&self, professor: ProfessorId, module: ModuleId) -> Result<Vec<Rating>> {
        Ok(self.state.read().await.ratings_for(professor, module))
    }

    async fn insert_rating(&self, rating: NewRating) -> Result<Rating> {
        let mut state = self.state.write().await;
        state.insert_rating(rating, Utc::now())
    }

    async fn add_professor(&self, id: Option<ProfessorId>, name: &str) -> Result<Professor> {
        self.state.write().await.add_professor(id, name)
    }

    async fn add_module(&self, module: NewModule) -> Result<Module> {
        self.state.write().await.add_module(module)
    }

    async fn assign_teacher(&self, module: ModuleId, professor: ProfessorId) -> Result<()> {
        self.state.write().await.assign_teacher(module, professor)
    }

    async fn remove_teacher(&self, module: ModuleId, professor: ProfessorId) -> Result<()> {
        self.state.write().await.remove_teacher(module, professor)
    }

    async fn seed(&self, catalog: Catalog) -> Result<bool> {
        self.state.write().await.seed(catalog)
    }
}
