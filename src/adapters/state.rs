use crate::domain::model::{
    ensure_teaches, Catalog, Module, ModuleId, NewModule, NewRating, Professor, ProfessorId,
    Rating, RatingId,
};
use crate::utils::error::{RatingError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATE_VERSION: u32 = 1;

/// Table contents shared by the store adapters. Every method is synchronous;
/// callers hold their lock for the whole call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub version: u32,
    #[serde(default)]
    professors: BTreeMap<ProfessorId, Professor>,
    #[serde(default)]
    modules: BTreeMap<ModuleId, Module>,
    #[serde(default)]
    ratings: Vec<Rating>,
    #[serde(default)]
    last_rating_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            professors: BTreeMap::new(),
            modules: BTreeMap::new(),
            ratings: Vec::new(),
            last_rating_id: 0,
        }
    }

    pub fn professor(&self, id: ProfessorId) -> Option<&Professor> {
        self.professors.get(&id)
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn professors(&self) -> Vec<Professor> {
        self.professors.values().cloned().collect()
    }

    pub fn modules(&self) -> Vec<Module> {
        self.modules.values().cloned().collect()
    }

    pub fn ratings(&self) -> Vec<Rating> {
        let mut ratings = self.ratings.clone();
        ratings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        ratings
    }

    pub fn ratings_for(&self, professor: ProfessorId, module: ModuleId) -> Vec<Rating> {
        self.ratings
            .iter()
            .filter(|r| r.professor == professor && r.module == module)
            .cloned()
            .collect()
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    /// Re-checks the teaching relation and appends the rating.
    pub fn insert_rating(&mut self, new: NewRating, now: DateTime<Utc>) -> Result<Rating> {
        let module = self
            .modules
            .get(&new.module)
            .ok_or_else(|| RatingError::module_not_found(new.module))?;
        if !self.professors.contains_key(&new.professor) {
            return Err(RatingError::professor_not_found(new.professor));
        }
        ensure_teaches(module, new.professor)?;

        self.last_rating_id = next_id(Some(self.last_rating_id), "rating.id")?;
        let rating = Rating {
            id: RatingId::new(self.last_rating_id),
            user: new.user,
            professor: new.professor,
            module: new.module,
            rating: new.rating,
            comment: new.comment,
            created_at: now,
        };
        self.ratings.push(rating.clone());
        Ok(rating)
    }

    pub fn add_professor(&mut self, id: Option<ProfessorId>, name: &str) -> Result<Professor> {
        validate_non_empty_string("professor.name", name)?;

        let id = match id {
            Some(id) if self.professors.contains_key(&id) => {
                return Err(RatingError::invalid_input(
                    "professor.id",
                    format!("professor {} already exists", id),
                ));
            }
            Some(id) => id,
            None => ProfessorId::new(next_id(
                self.professors.keys().last().map(|id| id.get()),
                "professor.id",
            )?),
        };

        let professor = Professor {
            id,
            name: name.trim().to_string(),
        };
        self.professors.insert(id, professor.clone());
        Ok(professor)
    }

    pub fn add_module(&mut self, new: NewModule) -> Result<Module> {
        validate_non_empty_string("module.name", &new.name)?;
        if let Some(missing) = new
            .professors
            .iter()
            .find(|p| !self.professors.contains_key(*p))
        {
            return Err(RatingError::professor_not_found(*missing));
        }

        let id = match new.id {
            Some(id) if self.modules.contains_key(&id) => {
                return Err(RatingError::invalid_input(
                    "module.id",
                    format!("module {} already exists", id),
                ));
            }
            Some(id) => id,
            None => ModuleId::new(next_id(
                self.modules.keys().last().map(|id| id.get()),
                "module.id",
            )?),
        };

        let module = Module {
            id,
            name: new.name.trim().to_string(),
            year: new.year,
            semester: new.semester,
            professors: new.professors,
        };
        self.modules.insert(id, module.clone());
        Ok(module)
    }

    pub fn assign_teacher(&mut self, module: ModuleId, professor: ProfessorId) -> Result<()> {
        if !self.professors.contains_key(&professor) {
            return Err(RatingError::professor_not_found(professor));
        }
        let entry = self
            .modules
            .get_mut(&module)
            .ok_or_else(|| RatingError::module_not_found(module))?;
        entry.professors.insert(professor);
        Ok(())
    }

    /// Writes the whole catalog, but only into empty tables. Either every entry
    /// lands or none does. Returns whether anything was written.
    pub fn seed(&mut self, catalog: Catalog) -> Result<bool> {
        if catalog.is_empty() || !self.professors.is_empty() || !self.modules.is_empty() {
            return Ok(false);
        }

        let mut next = self.clone();
        for professor in catalog.professors {
            next.add_professor(Some(professor.id), &professor.name)?;
        }
        for module in catalog.modules {
            next.add_module(module)?;
        }
        *self = next;
        Ok(true)
    }

    /// Existing ratings are kept; only future ratings are affected.
    pub fn remove_teacher(&mut self, module: ModuleId, professor: ProfessorId) -> Result<()> {
        let entry = self
            .modules
            .get_mut(&module)
            .ok_or_else(|| RatingError::module_not_found(module))?;
        entry.professors.remove(&professor);
        Ok(())
    }
}

/// Next id after `last`, starting at 1.
fn next_id(last: Option<u64>, field: &str) -> Result<u64> {
    match last {
        None => Ok(1),
        Some(id) => id
            .checked_add(1)
            .ok_or_else(|| RatingError::invalid_input(field, "no ids left to assign")),
    }
}
