//! Testing helpers and mock utilities.
//!
//! Provides convenient constructors for mocked photo stores.

use crate::store::MockPhotoStore;
use std::path::PathBuf;

/// Create a mock store whose every selection is empty.
///
/// `list_files` returns no paths and `pick_random` returns `None`. Writes are
/// not expected and panic.
#[must_use]
pub fn mock_store_empty() -> MockPhotoStore {
    let mut mock = MockPhotoStore::new();
    mock.expect_list_files().returning(|_| Ok(Vec::new()));
    mock.expect_pick_random().returning(|_| Ok(None));
    mock
}

/// Create a mock store that always picks `path`.
#[must_use]
pub fn mock_store_picking(path: &'static str) -> MockPhotoStore {
    let mut mock = MockPhotoStore::new();
    mock.expect_list_files()
        .returning(move |_| Ok(vec![PathBuf::from(path)]));
    mock.expect_pick_random()
        .returning(move |_| Ok(Some(PathBuf::from(path))));
    mock
}
