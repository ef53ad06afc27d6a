use crate::core::Store;
use crate::domain::model::{ensure_teaches, Module, ModuleId, Professor, ProfessorId};
use crate::utils::error::{RatingError, Result};

/// Resolves both ids and checks that the professor teaches the module.
///
/// The module is resolved before the professor, so a request naming two
/// unknown ids reports the module.
pub async fn validate<S: Store + ?Sized>(
    store: &S,
    professor: ProfessorId,
    module: ModuleId,
) -> Result<()> {
    resolve_pair(store, professor, module).await.map(|_| ())
}

/// Same check as [`validate`], handing back the resolved entities.
pub async fn resolve_pair<S: Store + ?Sized>(
    store: &S,
    professor: ProfessorId,
    module: ModuleId,
) -> Result<(Professor, Module)> {
    let module_row = store
        .module(module)
        .await?
        .ok_or_else(|| RatingError::module_not_found(module))?;
    let professor_row = store
        .professor(professor)
        .await?
        .ok_or_else(|| RatingError::professor_not_found(professor))?;

    ensure_teaches(&module_row, professor)?;
    tracing::debug!(
        "Professor {} teaches module {}",
        professor_row.name,
        module_row.name
    );
    Ok((professor_row, module_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::model::NewModule;
    use crate::utils::error::Entity;

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .add_professor(Some(ProfessorId::new(1)), "Ada")
            .await
            .unwrap();
        store
            .add_professor(Some(ProfessorId::new(2)), "Brian")
            .await
            .unwrap();
        store
            .add_module(NewModule {
                id: Some(ModuleId::new(10)),
                name: "Algorithms".to_string(),
                year: 2024,
                semester: 1,
                professors: [ProfessorId::new(1), ProfessorId::new(2)]
                    .into_iter()
                    .collect(),
            })
            .await
            .unwrap();
        store
            .add_module(NewModule {
                id: Some(ModuleId::new(20)),
                name: "Graphics".to_string(),
                year: 2024,
                semester: 2,
                professors: [ProfessorId::new(2)].into_iter().collect(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_validate_matches_teacher_sets() {
        let store = store().await;
        let cases = [
            (1, 10, true),
            (2, 10, true),
            (1, 20, false),
            (2, 20, true),
        ];

        for (professor, module, teaches) in cases {
            let result = validate(&store, ProfessorId::new(professor), ModuleId::new(module)).await;
            assert_eq!(
                result.is_ok(),
                teaches,
                "professor {} module {}",
                professor,
                module
            );
            if !teaches {
                assert!(matches!(result, Err(RatingError::NotTeaching { .. })));
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_module_reported_first() {
        let store = store().await;
        let err = validate(&store, ProfessorId::new(99), ModuleId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RatingError::NotFound {
                entity: Entity::Module,
                id: 99
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_professor() {
        let store = store().await;
        let err = validate(&store, ProfessorId::new(99), ModuleId::new(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RatingError::NotFound {
                entity: Entity::Professor,
                id: 99
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_pair_returns_entities() {
        let store = store().await;
        let (professor, module) =
            resolve_pair(&store, ProfessorId::new(2), ModuleId::new(20))
                .await
                .unwrap();
        assert_eq!(professor.name, "Brian");
        assert_eq!(module.name, "Graphics");
    }
}
