use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::error::{Result, StroopError};

pub const RECORD_VERSION: u32 = 1;

/// Best finished-and-won session. `correct_count == 0` means none yet; a
/// won session always has at least two correct rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighscoreRecord {
    #[serde(default = "current_version")]
    pub version: u32,
    pub correct_count: u32,
    pub elapsed_seconds: f32,
    #[serde(default)]
    pub achieved_at: Option<DateTime<Local>>,
}

fn current_version() -> u32 {
    RECORD_VERSION
}

impl Default for HighscoreRecord {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            correct_count: 0,
            elapsed_seconds: 0.0,
            achieved_at: None,
        }
    }
}

impl HighscoreRecord {
    pub fn new(correct_count: u32, elapsed: Duration) -> Self {
        Self {
            correct_count,
            elapsed_seconds: elapsed.as_secs_f32(),
            achieved_at: Some(Local::now()),
            ..Self::default()
        }
    }

    pub fn is_set(&self) -> bool {
        self.correct_count > 0
    }

    /// True when a won session with this total time should replace the record.
    pub fn beaten_by(&self, elapsed: Duration) -> bool {
        !self.is_set() || elapsed.as_secs_f32() < self.elapsed_seconds
    }
}

pub trait HighscoreStore {
    fn load(&self) -> Result<HighscoreRecord>;
    fn save(&self, record: &HighscoreRecord) -> Result<()>;
}

impl<S: HighscoreStore + ?Sized> HighscoreStore for Box<S> {
    fn load(&self) -> Result<HighscoreRecord> {
        (**self).load()
    }

    fn save(&self, record: &HighscoreRecord) -> Result<()> {
        (**self).save(record)
    }
}

/// JSON file under the state directory.
#[derive(Debug, Clone)]
pub struct FileHighscoreStore {
    path: PathBuf,
}

impl FileHighscoreStore {
    pub fn new() -> Self {
        let path = AppDirs::highscore_path()
            .unwrap_or_else(|| PathBuf::from("stroop_highscore.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, what: &str, err: impl std::fmt::Display) -> StroopError {
        StroopError::Persistence(format!("{what} {}: {err}", self.path.display()))
    }
}

impl Default for FileHighscoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighscoreStore for FileHighscoreStore {
    fn load(&self) -> Result<HighscoreRecord> {
        if !self.path.exists() {
            return Ok(HighscoreRecord::default());
        }

        let bytes = fs::read(&self.path).map_err(|e| self.persistence_error("reading", e))?;
        let record: HighscoreRecord =
            serde_json::from_slice(&bytes).map_err(|e| self.persistence_error("parsing", e))?;

        if record.version > RECORD_VERSION {
            return Err(self.persistence_error(
                "reading",
                format!("unsupported record version {}", record.version),
            ));
        }
        Ok(record)
    }

    fn save(&self, record: &HighscoreRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.persistence_error("creating dir for", e))?;
        }
        let data = serde_json::to_vec_pretty(record)?;
        fs::write(&self.path, data).map_err(|e| self.persistence_error("writing", e))
    }
}

/// Keeps the record in memory only (`--no-save` and tests).
#[derive(Debug, Default)]
pub struct MemoryHighscoreStore {
    record: RefCell<Option<HighscoreRecord>>,
    saves: RefCell<usize>,
}

impl MemoryHighscoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: HighscoreRecord) -> Self {
        Self {
            record: RefCell::new(Some(record)),
            saves: RefCell::new(0),
        }
    }

    pub fn saved(&self) -> Option<HighscoreRecord> {
        self.record.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl HighscoreStore for MemoryHighscoreStore {
    fn load(&self) -> Result<HighscoreRecord> {
        Ok(self.record.borrow().clone().unwrap_or_default())
    }

    fn save(&self, record: &HighscoreRecord) -> Result<()> {
        *self.record.borrow_mut() = Some(record.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

impl<S: HighscoreStore + ?Sized> HighscoreStore for &S {
    fn load(&self) -> Result<HighscoreRecord> {
        (**self).load()
    }

    fn save(&self, record: &HighscoreRecord) -> Result<()> {
        (**self).save(record)
    }
}

impl<S: HighscoreStore + ?Sized> HighscoreStore for std::rc::Rc<S> {
    fn load(&self) -> Result<HighscoreRecord> {
        (**self).load()
    }

    fn save(&self, record: &HighscoreRecord) -> Result<()> {
        (**self).save(record)
    }
}
