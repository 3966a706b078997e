//! # Configuration
//!
//! Store configuration is loaded with [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `CLASSBOARD_STORAGE_DIR`, `CLASSBOARD_TASK_KEY`, etc.
//! 2. **Config file**: the TOML file passed to [`StoreConfig::load`], if any.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_dir` | OS data dir (`directories`) | Where persisted collections live |
//! | `task_key` | `classboard.tasks` | Storage key of the task store |
//! | `exam_key` | `classboard.exams` | Storage key of the exam store |
//! | `result_key` | `classboard.exam-results` | Storage key of the exam-result store |

use crate::error::{Result, StoreError};
use crate::model::{RegisteredExam, StudentExamResult, TaskRecord};
use crate::record::Record;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the persisted collections.
    /// When absent, the platform data directory is used.
    #[config(env = "CLASSBOARD_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    #[config(env = "CLASSBOARD_TASK_KEY", default = "classboard.tasks")]
    pub task_key: String,

    #[config(env = "CLASSBOARD_EXAM_KEY", default = "classboard.exams")]
    pub exam_key: String,

    #[config(env = "CLASSBOARD_RESULT_KEY", default = "classboard.exam-results")]
    pub result_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            task_key: TaskRecord::STORAGE_KEY.to_string(),
            exam_key: RegisteredExam::STORAGE_KEY.to_string(),
            result_key: StudentExamResult::STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Load from the environment, then `file` (if given), then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder.load().map_err(StoreError::Config)
    }

    /// The configured storage directory, or the platform data directory.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        ProjectDirs::from("", "", "classboard")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                StoreError::Storage("No home directory to place default storage in".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_matches_record_keys() {
        let config = StoreConfig::default();
        assert_eq!(config.task_key, "classboard.tasks");
        assert_eq!(config.exam_key, "classboard.exams");
        assert_eq!(config.result_key, "classboard.exam-results");
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_explicit_storage_dir_wins() {
        let config = StoreConfig {
            storage_dir: Some(PathBuf::from("/srv/classboard")),
            ..Default::default()
        };
        assert_eq!(
            config.storage_dir().unwrap(),
            PathBuf::from("/srv/classboard")
        );
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classboard.toml");
        fs::write(
            &path,
            "storage_dir = \"/tmp/classboard-data\"\ntask_key = \"term2.tasks\"\n",
        )
        .unwrap();

        let config = StoreConfig::load(Some(&path)).unwrap();
        assert_eq!(config.task_key, "term2.tasks");
        assert_eq!(config.exam_key, "classboard.exams");
        assert_eq!(
            config.storage_dir,
            Some(PathBuf::from("/tmp/classboard-data"))
        );
    }
}
