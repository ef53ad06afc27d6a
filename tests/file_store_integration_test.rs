use prof_rates::core::{ModuleId, ProfessorId, Store};
use prof_rates::domain::model::UserId;
use prof_rates::{FileStore, RatingError, RatingService, Session, TomlConfig};
use std::sync::Arc;
use tempfile::TempDir;

const CATALOG: &str = r#"
[store]
backend = "file"
path = "unused-in-tests.json"

[[professors]]
id = 1
name = "Ada"

[[modules]]
id = 10
name = "Algorithms"
year = 2024
semester = 1
professors = [1]

[[modules]]
id = 20
name = "Graphics"
year = 2024
semester = 1
"#;

fn session() -> Session {
    Session::authenticated(UserId::parse("alice").unwrap())
}

#[tokio::test]
async fn test_ratings_persist_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = TomlConfig::from_toml_str(CATALOG).unwrap();

    {
        let store = FileStore::open(&path).await.unwrap();
        assert!(config.seed_catalog(&store).await.unwrap());
        let service = RatingService::new(store);
        service
            .create_rating(
                &session(),
                ProfessorId::new(1),
                ModuleId::new(10),
                5,
                Some("great".to_string()),
            )
            .await
            .unwrap();
        service
            .create_rating(&session(), ProfessorId::new(1), ModuleId::new(10), 3, None)
            .await
            .unwrap();
    }

    let store = FileStore::open(&path).await.unwrap();
    // Already seeded; nothing is written twice.
    assert!(!config.seed_catalog(&store).await.unwrap());

    let service = RatingService::new(store);
    let average = service
        .average_rating(ProfessorId::new(1), ModuleId::new(10))
        .await
        .unwrap();
    assert_eq!(average.average_rating, 4);

    let views = service.list_ratings().await.unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].comment.as_deref(), Some("great"));
}

#[tokio::test]
async fn test_rejected_rating_does_not_touch_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = TomlConfig::from_toml_str(CATALOG).unwrap();

    let store = FileStore::open(&path).await.unwrap();
    config.seed_catalog(&store).await.unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let service = RatingService::new(store);
    let err = service
        .create_rating(&session(), ProfessorId::new(1), ModuleId::new(20), 4, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RatingError::NotTeaching { .. }));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_concurrent_writers_share_one_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = TomlConfig::from_toml_str(CATALOG).unwrap();

    let store = FileStore::open(&path).await.unwrap();
    config.seed_catalog(&store).await.unwrap();
    let service = Arc::new(RatingService::new(store));

    let mut handles = Vec::new();
    for value in 1..=5 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .create_rating(&session(), ProfessorId::new(1), ModuleId::new(10), value, None)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(reopened.ratings().await.unwrap().len(), 5);
    let average = RatingService::new(reopened)
        .average_rating(ProfessorId::new(1), ModuleId::new(10))
        .await
        .unwrap();
    assert_eq!(average.average_rating, 3);
}

#[tokio::test]
async fn test_two_handles_on_one_file_keep_every_rating() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = TomlConfig::from_toml_str(CATALOG).unwrap();

    let first = RatingService::new(FileStore::open(&path).await.unwrap());
    let second = RatingService::new(FileStore::open(&path).await.unwrap());
    config.seed_catalog(&FileStore::open(&path).await.unwrap()).await.unwrap();

    let a = first
        .create_rating(&session(), ProfessorId::new(1), ModuleId::new(10), 5, None)
        .await
        .unwrap();
    let b = second
        .create_rating(&session(), ProfessorId::new(1), ModuleId::new(10), 3, None)
        .await
        .unwrap();
    assert_ne!(a.id, b.id);

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(reopened.ratings().await.unwrap().len(), 2);
    let average = first
        .average_rating(ProfessorId::new(1), ModuleId::new(10))
        .await
        .unwrap();
    assert_eq!(average.count, 2);
}

#[tokio::test]
async fn test_removal_through_other_handle_blocks_rating() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = TomlConfig::from_toml_str(CATALOG).unwrap();

    let rater = FileStore::open(&path).await.unwrap();
    config.seed_catalog(&rater).await.unwrap();
    let admin = FileStore::open(&path).await.unwrap();
    admin
        .remove_teacher(ModuleId::new(10), ProfessorId::new(1))
        .await
        .unwrap();

    let service = RatingService::new(rater);
    let err = service
        .create_rating(&session(), ProfessorId::new(1), ModuleId::new(10), 4, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RatingError::NotTeaching { .. }));

    let reopened = FileStore::open(&path).await.unwrap();
    assert!(reopened.ratings().await.unwrap().is_empty());
    let module = reopened.module(ModuleId::new(10)).await.unwrap().unwrap();
    assert!(!module.is_taught_by(ProfessorId::new(1)));
}

#[tokio::test]
async fn test_concurrent_writers_on_separate_handles() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let config = TomlConfig::from_toml_str(CATALOG).unwrap();
    config.seed_catalog(&FileStore::open(&path).await.unwrap()).await.unwrap();

    let mut handles = Vec::new();
    for value in 1..=5 {
        let path = path.clone();
        handles.push(tokio::spawn(async move {
            let service = RatingService::new(FileStore::open(&path).await?);
            service
                .create_rating(&session(), ProfessorId::new(1), ModuleId::new(10), value, None)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ratings = FileStore::open(&path).await.unwrap().ratings().await.unwrap();
    let mut ids: Vec<u64> = ratings.iter().map(|r| r.id.get()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}
