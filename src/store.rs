// Task list store backed by a single JSON file

use crate::task::Task;
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Owns the authoritative task list and its persistence.
///
/// The persisted form is one JSON array of task objects. A missing file
/// means an empty list. A file that is not valid JSON, or valid JSON that
/// is not an array, is removed and the list resets to empty; corruption is
/// self-healed with a diagnostic, never surfaced as an error. Individual
/// array elements that are not task-shaped are skipped the same way.
///
/// Mutation methods only touch the in-memory list; callers pair each
/// mutation with a `save()` (the actions layer treats mutate-then-save as
/// one unit).
pub struct Store {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl Store {
    /// Open a store at the given file path, loading whatever is there.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let tasks = Self::load_from(&path);
        debug!(path = ?path, count = tasks.len(), "Opened store");

        Ok(Self { path, tasks })
    }

    /// Read the persisted list, healing any corruption to an empty list.
    fn load_from(path: &Path) -> Vec<Task> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = ?path, error = ?e, "Failed to read store file, starting empty");
                return Vec::new();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(path = ?path, error = ?e, "Store file is not valid JSON, resetting");
                Self::discard(path);
                return Vec::new();
            }
        };

        let Some(items) = value.as_array() else {
            warn!(path = ?path, "Store file is not a JSON array, resetting");
            Self::discard(path);
            return Vec::new();
        };

        let mut tasks = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match serde_json::from_value::<Task>(item.clone()) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    warn!(path = ?path, index = i, error = ?e, "Skipping malformed task record");
                }
            }
        }
        tasks
    }

    fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = ?path, error = ?e, "Failed to remove corrupt store file");
        }
    }

    /// Serialize the full list and rewrite the store file.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks).context("Failed to serialize task list")?;
        fs::write(&self.path, json).context("Failed to write store file")?;
        debug!(path = ?self.path, count = self.tasks.len(), "Saved store");
        Ok(())
    }

    /// Append a fully-populated task to the end of the list.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Apply `f` to the task with the given id. Returns false (no-op) if
    /// the id is not in the list.
    pub fn update<F: FnOnce(&mut Task)>(&mut self, id: &str, f: F) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task);
                true
            }
            None => false,
        }
    }

    /// Remove the task with the given id. Returns false if it was absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() < before
    }

    /// Empty the list.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Swap in a whole new list (import).
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The list in stored (insertion) order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
