//! Materialized directory listing for a single canonical path.
//!
//! A [`Directory`] only ever comes from a successful remote fetch and is
//! replaced whole on refetch. The directory controller owns every cached
//! instance; other components treat the files it exposes as read-mostly.

use crate::domain::file::{check_filename, File, FilenameError};
use crate::domain::path;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    /// Backend identifier of the directory node itself.
    pub id: String,
    /// Canonical path this listing corresponds to; the cache key.
    pub path: String,
    /// Files directly inside this directory, one level only.
    pub files: Vec<File>,
}

impl Directory {
    pub fn new(id: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            path: path::sanitize(target),
            files: Vec::new(),
        }
    }

    pub fn file_by_name(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|file| file.name == name)
    }

    /// The cached entry standing for `target`, matched by id when both
    /// sides are persisted and by name otherwise.
    pub fn entry_mut(&mut self, target: &File) -> Option<&mut File> {
        self.files.iter_mut().find(|file| same_entry(file, target))
    }

    /// Insert a file, replacing any sibling holding the same name.
    pub fn add_file(&mut self, file: File) {
        self.files.retain(|existing| existing.name != file.name);
        self.files.push(file);
    }

    /// Remove and return the entry standing for `target`.
    pub fn remove_entry(&mut self, target: &File) -> Option<File> {
        let index = self.files.iter().position(|file| same_entry(file, target))?;
        Some(self.files.remove(index))
    }

    /// Full validation for a new or renamed sibling: the filename rules
    /// plus the case-sensitive collision check against this listing.
    pub fn check_name(&self, name: &str) -> Result<(), FilenameError> {
        check_filename(name)?;

        let encoded = path::spaces_to_underscores(name);
        if self
            .files
            .iter()
            .any(|file| path::spaces_to_underscores(&file.name) == encoded)
        {
            return Err(FilenameError::AlreadyExists);
        }

        Ok(())
    }
}

fn same_entry(a: &File, b: &File) -> bool {
    if !a.id.is_empty() && !b.id.is_empty() {
        a.id == b.id
    } else {
        a.name == b.name
    }
}
