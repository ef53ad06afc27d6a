use crate::adapters::state::{StoreState, STATE_VERSION};
use crate::domain::model::{
    Catalog, Module, ModuleId, NewModule, NewRating, Professor, ProfessorId, Rating,
};
use crate::domain::ports::Store;
use crate::utils::error::{RatingError, Result};
use async_trait::async_trait;
use atomic_write_file::AtomicWriteFile;
use chrono::Utc;
use fd_lock::RwLock as FileLock;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tokio::task;

/// Store backed by a single JSON snapshot file, safe to share between processes.
///
/// Every call reloads the snapshot while holding a lock on the sidecar
/// `<path>.lock` file: shared for reads, exclusive for writes. A write applies
/// its change to the tables it just loaded and commits them through
/// `AtomicWriteFile` before the lock is released, so the teaching re-check and
/// the insert see the same state whichever process wrote last. A rejected or
/// failed write leaves the file untouched.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    // Queues this handle's tasks here rather than on the blocking pool.
    gate: RwLock<()>,
}

impl FileStore {
    /// Opens the snapshot at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = Self {
            lock_path: lock_path_for(&path),
            path,
            gate: RwLock::new(()),
        };

        let count = store.read(|state| state.rating_count()).await?;
        tracing::debug!(
            "Opened rating store at {} ({} ratings)",
            store.path.display(),
            count
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T, F>(&self, view: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&StoreState) -> T + Send + 'static,
    {
        let _gate = self.gate.read().await;
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();

        run_blocking(move || {
            let lock = FileLock::new(open_lock_file(&lock_path)?);
            let _held = lock.read().map_err(|e| io_error(&lock_path, e))?;
            let state = load_state(&path)?;
            Ok(view(&state))
        })
        .await
    }

    async fn mutate<T, F>(&self, apply: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut StoreState) -> Result<T> + Send + 'static,
    {
        let _gate = self.gate.write().await;
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();

        run_blocking(move || {
            let mut lock = FileLock::new(open_lock_file(&lock_path)?);
            let _held = lock.write().map_err(|e| io_error(&lock_path, e))?;
            let mut state = load_state(&path)?;
            let value = apply(&mut state)?;
            save_state(&path, &state)?;
            Ok(value)
        })
        .await
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(|e| RatingError::storage(format!("store task failed: {}", e)))?
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn open_lock_file(lock_path: &Path) -> Result<File> {
    ensure_parent_dir(lock_path)?;
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| io_error(lock_path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    Ok(())
}

fn load_state(path: &Path) -> Result<StoreState> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreState::new()),
        Err(e) => return Err(io_error(path, e)),
    };

    let state: StoreState = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        RatingError::storage(format!("corrupt store file {}: {}", path.display(), e))
    })?;

    if state.version != STATE_VERSION {
        return Err(RatingError::storage(format!(
            "unsupported store version {} in {}",
            state.version,
            path.display()
        )));
    }

    Ok(state)
}

fn save_state(path: &Path, state: &StoreState) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path).map_err(|e| io_error(path, e))?;
    serde_json::to_writer_pretty(&mut file, state)
        .map_err(|e| RatingError::storage(format!("failed to serialize store: {}", e)))?;
    file.commit().map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, err: io::Error) -> RatingError {
    RatingError::storage(format!("{}: {}", path.display(), err))
}

#[async_trait]
impl Store for FileStore {
    async fn professor(&self, id: ProfessorId) -> Result<Option<Professor>> {
        self.read(move |state| state.professor(id).cloned()).await
    }

    async fn module(&self, id: ModuleId) -> Result<Option<Module>> {
        self.read(move |state| state.module(id).cloned()).await
    }

    async fn professors(&self) -> Result<Vec<Professor>> {
        self.read(|state| state.professors()).await
    }

    async fn modules(&self) -> Result<Vec<Module>> {
        self.read(|state| state.modules()).await
    }

    async fn ratings(&self) -> Result<Vec<Rating>> {
        self.read(|state| state.ratings()).await
    }

    async fn ratings_for(&self, professor: ProfessorId, module: ModuleId) -> Result<Vec<Rating>> {
        self.read(move |state| state.ratings_for(professor, module))
            .await
    }

    async fn insert_rating(&self, rating: NewRating) -> Result<Rating> {
        self.mutate(move |state| state.insert_rating(rating, Utc::now()))
            .await
    }

    async fn add_professor(&self, id: Option<ProfessorId>, name: &str) -> Result<Professor> {
        let name = name.to_string();
        self.mutate(move |state| state.add_professor(id, &name))
            .await
    }

    async fn add_module(&self, module: NewModule) -> Result<Module> {
        self.mutate(move |state| state.add_module(module)).await
    }

    async fn assign_teacher(&self, module: ModuleId, professor: ProfessorId) -> Result<()> {
        self.mutate(move |state| state.assign_teacher(module, professor))
            .await
    }

    async fn remove_teacher(&self, module: ModuleId, professor: ProfessorId) -> Result<()> {
        self.mutate(move |state| state.remove_teacher(module, professor))
            .await
    }

    async fn seed(&self, catalog: Catalog) -> Result<bool> {
        self.mutate(move |state| state.seed(catalog)).await
    }
}
