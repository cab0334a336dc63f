//! Pet tax service: photo uploads and random retrieval.

use crate::store::{PhotoStore, StoreError};
use crate::taxonomy::{Category, TaxGroup};
use crate::upload::{normalize_filename, safe_filename, Attachment, UploadPlan};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by uploads
#[derive(Error, Debug)]
pub enum UploadError {
    /// The declared content type is missing or not an image
    #[error("`{filename}` has invalid file type (not a photo), nothing processed")]
    NotAnImage {
        /// Filename as sent
        filename: String,
    },
    /// The filename has no usable final component
    #[error("`{filename}` is not a usable file name, nothing processed")]
    InvalidFilename {
        /// Filename as sent
        filename: String,
    },
    /// Writing the photo failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by retrieval
#[derive(Error, Debug)]
pub enum TaxError {
    /// The selected categories hold no photos
    #[error("No pet tax available for `{0}` yet")]
    NoPhotos(TaxGroup),
    /// Reading the store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Upload and retrieval over a [`PhotoStore`]
#[derive(Clone)]
pub struct TaxService {
    store: Arc<dyn PhotoStore>,
}

impl TaxService {
    /// Create a service over `store`
    #[must_use]
    pub fn new(store: Arc<dyn PhotoStore>) -> Self {
        Self { store }
    }

    /// Validate an attachment before any bytes are fetched.
    ///
    /// No side effects: the store is not touched.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::NotAnImage` or `UploadError::InvalidFilename`.
    pub fn prepare_upload(
        &self,
        category: Category,
        attachment: &Attachment,
    ) -> Result<UploadPlan, UploadError> {
        if !attachment.is_image() {
            warn!(
                "Rejected upload of {} for {}: content type {:?}",
                attachment.filename, category, attachment.content_type
            );
            return Err(UploadError::NotAnImage {
                filename: attachment.filename.clone(),
            });
        }
        let filename =
            safe_filename(&attachment.filename).ok_or_else(|| UploadError::InvalidFilename {
                filename: attachment.filename.clone(),
            })?;
        Ok(UploadPlan {
            category,
            filename: normalize_filename(&filename),
        })
    }

    /// Persist the bytes of a prepared upload, overwriting any same-named photo.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Store` if the write fails.
    pub async fn store_upload(
        &self,
        plan: &UploadPlan,
        bytes: &[u8],
    ) -> Result<PathBuf, UploadError> {
        let path = self
            .store
            .save_photo(plan.category, &plan.filename, bytes)
            .await?;
        info!("Uploaded {} for {}", plan.filename, plan.category);
        Ok(path)
    }

    /// Pick a random photo from a tax group.
    ///
    /// # Errors
    ///
    /// Returns `TaxError::NoPhotos` when the group is empty, or
    /// `TaxError::Store` if listing fails.
    pub async fn give_tax(&self, group: TaxGroup) -> Result<PathBuf, TaxError> {
        let categories = group.categories();
        match self.store.pick_random(&categories).await? {
            Some(path) => {
                info!("Serving {} for {}", path.display(), group);
                Ok(path)
            }
            None => Err(TaxError::NoPhotos(group)),
        }
    }
}
