//! Photo storage layer
//!
//! Photos are plain files in one directory per category:
//! `root/<category>/<filename>`.

use crate::taxonomy::{Category, CATEGORIES};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Blocking task was cancelled or panicked
    #[error("Background task failed: {0}")]
    Join(String),
}

/// Interface for photo storage providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Create the category directory if it does not exist yet
    async fn ensure_category(&self, category: Category) -> Result<(), StoreError>;
    /// All photo paths under the given categories, recursively
    async fn list_files(&self, categories: &[Category]) -> Result<Vec<PathBuf>, StoreError>;
    /// One photo chosen uniformly from `list_files`, or `None` when there are none
    async fn pick_random(&self, categories: &[Category]) -> Result<Option<PathBuf>, StoreError>;
    /// Write a photo, replacing any file with the same name
    async fn save_photo(
        &self,
        category: Category,
        filename: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError>;
}

/// Filesystem-backed photo store
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    /// Create a store rooted at `root`. Nothing is touched on disk.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory backing a category
    #[must_use]
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.name())
    }

    /// Create the root and a directory for every known category.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub async fn provision(&self) -> Result<(), StoreError> {
        for category in CATEGORIES {
            self.ensure_category(*category).await?;
        }
        info!(
            "Provisioned {} category folders under {}",
            CATEGORIES.len(),
            self.root.display()
        );
        Ok(())
    }
}

// Symlinked photos count as photos. Entries that cannot be read are logged
// and skipped so one bad file never hides the rest of the group.
fn walk_category_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            debug!("Skipping missing category folder {}", dir.display());
            continue;
        }
        for entry in WalkDir::new(dir).follow_links(true) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable entry under {}: {}", dir.display(), e),
            }
        }
    }
    files
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn ensure_category(&self, category: Category) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(self.category_dir(category)).await?;
        Ok(())
    }

    async fn list_files(&self, categories: &[Category]) -> Result<Vec<PathBuf>, StoreError> {
        let dirs: Vec<PathBuf> = categories.iter().map(|c| self.category_dir(*c)).collect();
        tokio::task::spawn_blocking(move || walk_category_dirs(&dirs))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))
    }

    async fn pick_random(&self, categories: &[Category]) -> Result<Option<PathBuf>, StoreError> {
        let files = self.list_files(categories).await?;
        debug!("Choosing among {} candidate photos", files.len());
        Ok(files.choose(&mut rand::thread_rng()).cloned())
    }

    async fn save_photo(
        &self,
        category: Category,
        filename: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        self.ensure_category(category).await?;
        let path = self.category_dir(category).join(filename);
        tokio::fs::write(&path, bytes).await?;
        info!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }
}
