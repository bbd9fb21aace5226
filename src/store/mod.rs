//! Flat JSON task record store.
//!
//! This is the opaque collaborator behind the capability route groups. The
//! flag engine never looks inside it; capabilities read it, and nothing else
//! does. Records persist as a single JSON document rewritten on mutation.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
}

#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    // None for in-memory stores; mutations are not persisted.
    path: Option<PathBuf>,
    tasks: Vec<TaskRecord>,
}

impl RecordStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Store path has no parent directory"))?;
        fs::create_dir_all(parent)?;

        let tasks = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(StoreInner {
                path: Some(path),
                tasks,
            })),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "switchboard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open(dirs.data_dir().join("tasks.json"))
    }

    pub fn open_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                path: None,
                tasks: Vec::new(),
            })),
        }
    }

    pub fn all_tasks(&self) -> Vec<TaskRecord> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner.tasks.clone()
    }

    /// Case-insensitive substring match on the title.
    pub fn search_tasks(&self, term: &str, limit: Option<u32>) -> Vec<TaskRecord> {
        let inner = self.inner.lock().expect("store lock poisoned");
        let needle = term.to_lowercase();
        let matches = inner
            .tasks
            .iter()
            .filter(|task| task.title.to_lowercase().contains(&needle))
            .cloned();

        match limit {
            Some(limit) => matches.take(limit as usize).collect(),
            None => matches.collect(),
        }
    }

    pub fn create_task(&self, input: CreateTaskInput) -> Result<TaskRecord> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let task = TaskRecord {
            id: Uuid::new_v4(),
            title: input.title,
            done: false,
            created_at: Utc::now(),
        };
        inner.tasks.push(task.clone());
        inner.persist()?;

        Ok(task)
    }
}

impl StoreInner {
    fn persist(&self) -> Result<()> {
        if let Some(path) = &self.path {
            fs::write(path, serde_json::to_string_pretty(&self.tasks)?)?;
        }
        Ok(())
    }
}
