//! File entity and filename validation.
//!
//! A [`File`] is an in-memory node of the virtual tree: a regular file, a
//! directory, or the synthetic parent-marker entry. Names are stored in
//! their decoded (display) form; canonical paths are produced on demand.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::domain::path;
use crate::domain::tag::{Tag, TagRegistry, VIRTUAL_TAG};
use crate::domain::tool::{Tool, ToolRegistry};

/// Flag bit marking a node as a directory.
pub const FLAG_DIRECTORY: u8 = 0x04;

/// Maximum filename length, in characters.
pub const MAX_FILENAME_LEN: usize = 36;

// Metadata keys assigned by the backend.
pub const METADATA_SIZE: &str = "size";
pub const METADATA_UPDATED_AT: &str = "updated_at";
pub const METADATA_TOOL: &str = "app";
pub const METADATA_REF: &str = "ref";
pub const METADATA_TAGS: &str = "tags";

/// Separator within the tags metadata value.
pub const TAG_SEPARATOR: char = ';';

// ── Validation ────────────────────────────────────────────────────────────

/// Violations reported by filename validation. The display messages are
/// the inline form feedback shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename cannot be empty")]
    Empty,
    #[error("A name cannot contain special characters.")]
    SpecialCharacters,
    #[error("A name cannot exceed 36 characters long.")]
    TooLong,
    #[error("Name already exists")]
    AlreadyExists,
}

/// Validate a candidate filename against the character and length rules.
/// Sibling collisions are the listing's concern, see
/// [`Directory::check_name`](crate::domain::directory::Directory::check_name).
pub fn check_filename(name: &str) -> Result<(), FilenameError> {
    let name = path::spaces_to_underscores(name);
    if name.is_empty() {
        return Err(FilenameError::Empty);
    }

    let permitted = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');
    if !name.chars().all(permitted) {
        return Err(FilenameError::SpecialCharacters);
    }

    if name.chars().count() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }

    Ok(())
}

// ── File ──────────────────────────────────────────────────────────────────

/// Per-user access rights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub owner: bool,
}

/// A file or directory node inside a cached listing.
#[derive(Debug, Clone, Default)]
pub struct File {
    /// Backend identifier; empty until the entity is persisted.
    pub id: String,
    /// Display name (decoded; may contain spaces).
    pub name: String,
    /// Canonical path of the containing directory.
    pub directory: String,
    pub metadata: HashMap<String, String>,
    pub permissions: HashMap<u32, Permissions>,
    pub flags: u8,
    /// Transient marker set right after local creation; cleared on the
    /// next navigation.
    pub new: bool,
}

impl File {
    pub fn new(id: &str, name: &str, directory: &str) -> Self {
        Self {
            id: id.to_string(),
            name: path::underscores_to_spaces(name),
            directory: path::sanitize(directory),
            ..Default::default()
        }
    }

    /// Mark this file as a directory.
    pub fn into_directory(mut self) -> Self {
        self.flags |= FLAG_DIRECTORY;
        self
    }

    /// Canonical path of this node.
    pub fn path(&self) -> String {
        path::join(&[&self.directory, &self.name])
    }

    pub fn is_directory(&self) -> bool {
        (self.flags & FLAG_DIRECTORY) != 0 || self.is_parent_directory()
    }

    pub fn is_parent_directory(&self) -> bool {
        self.name == path::PARENT_DIRECTORY
    }

    /// Size metadata. Directories default to 0 when unset; files report
    /// no size at all until the backend assigns one.
    pub fn size(&self) -> Option<u64> {
        match self.metadata.get(METADATA_SIZE) {
            Some(size) => size.parse().ok(),
            None if self.is_directory() => Some(0),
            None => None,
        }
    }

    /// Last-updated timestamp, stored as hex-encoded unix seconds.
    pub fn updated_at(&self) -> Option<SystemTime> {
        let unix = self.metadata.get(METADATA_UPDATED_AT)?;
        let seconds = u64::from_str_radix(unix, 16).ok()?;
        Some(UNIX_EPOCH + Duration::from_secs(seconds))
    }

    /// The external tool this file belongs to, when any.
    pub fn tool<'a>(&self, tools: &'a ToolRegistry) -> Option<&'a Tool> {
        let id = self.metadata.get(METADATA_TOOL)?;
        tools.find(id)
    }

    /// External URL opening this file on its associated tool. Falls back
    /// to a reference-by-id URL when no `ref` metadata is set; absent
    /// whenever no tool is associated.
    pub fn url(&self, tools: &ToolRegistry) -> Option<String> {
        let base = self.tool(tools)?.base_uri.trim_end_matches('/').to_string();
        match self.metadata.get(METADATA_REF) {
            Some(reference) => Some(format!("{}/{}", base, reference)),
            None => Some(format!("{}/ref/{}", base, self.id)),
        }
    }

    /// Decorating tags: the synthetic virtual tag first, then the tool
    /// tag, then the metadata-declared tags in stored order.
    pub fn tags(&self, registry: &TagRegistry, tools: &ToolRegistry) -> Vec<Tag> {
        let mut names: Vec<String> = self
            .metadata
            .get(METADATA_TAGS)
            .map(|tags| {
                tags.split(TAG_SEPARATOR)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if let Some(tool) = self.tool(tools) {
            names.insert(0, tool.id.clone());
        }

        if self.is_directory() && !self.is_parent_directory() && self.size().unwrap_or(0) == 0 {
            names.insert(0, VIRTUAL_TAG.to_string());
        }

        names.iter().map(|name| registry.find(name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agora_tools() -> ToolRegistry {
        ToolRegistry::new(vec![Tool::new(
            "agora",
            "Agora",
            "icon-greek-pillar-outline",
            "https://agora.example.com/",
        )])
    }

    #[test]
    fn test_new_decodes_name_and_sanitizes_directory() {
        let file = File::new("42", "my_notes", "docs//archive");
        assert_eq!(file.name, "my notes");
        assert_eq!(file.directory, "/docs/archive");
        assert_eq!(file.path(), "/docs/archive/my_notes");
    }

    #[test]
    fn test_is_directory_by_flag() {
        let file = File::new("1", "stuff", "/").into_directory();
        assert!(file.is_directory());
        assert!(!file.is_parent_directory());
    }

    #[test]
    fn test_parent_marker_is_directory_regardless_of_flags() {
        let file = File::new("", "..", "/a/b");
        assert_eq!(file.flags, 0);
        assert!(file.is_parent_directory());
        assert!(file.is_directory());
    }

    #[test]
    fn test_size_defaults_to_zero_for_directories_only() {
        let dir = File::new("1", "stuff", "/").into_directory();
        assert_eq!(dir.size(), Some(0));

        let file = File::new("2", "notes", "/");
        assert_eq!(file.size(), None);

        let mut sized = File::new("3", "report", "/");
        sized.metadata.insert(METADATA_SIZE.to_string(), "128".to_string());
        assert_eq!(sized.size(), Some(128));
    }

    #[test]
    fn test_updated_at_parses_hex_unix_seconds() {
        let mut file = File::new("1", "notes", "/");
        file.metadata
            .insert(METADATA_UPDATED_AT.to_string(), "65a0f000".to_string());

        let expected = UNIX_EPOCH + Duration::from_secs(0x65a0f000);
        assert_eq!(file.updated_at(), Some(expected));

        file.metadata
            .insert(METADATA_UPDATED_AT.to_string(), "not-hex".to_string());
        assert_eq!(file.updated_at(), None);
    }

    #[test]
    fn test_url_joins_base_and_ref() {
        let mut file = File::new("42", "notes", "/");
        file.metadata.insert(METADATA_TOOL.to_string(), "agora".to_string());
        file.metadata.insert(METADATA_REF.to_string(), "abc123".to_string());

        assert_eq!(
            file.url(&agora_tools()),
            Some("https://agora.example.com/abc123".to_string())
        );
    }

    #[test]
    fn test_url_falls_back_to_reference_by_id() {
        let mut file = File::new("42", "notes", "/");
        file.metadata.insert(METADATA_TOOL.to_string(), "agora".to_string());

        assert_eq!(
            file.url(&agora_tools()),
            Some("https://agora.example.com/ref/42".to_string())
        );
    }

    #[test]
    fn test_url_absent_without_tool() {
        let file = File::new("42", "notes", "/");
        assert_eq!(file.url(&agora_tools()), None);
    }

    #[test]
    fn test_tags_order_virtual_then_tool_then_declared() {
        let mut dir = File::new("1", "characters", "/").into_directory();
        dir.metadata.insert(METADATA_TOOL.to_string(), "agora".to_string());
        dir.metadata
            .insert(METADATA_TAGS.to_string(), "draft;shared".to_string());

        let tags = dir.tags(&TagRegistry::default(), &agora_tools());
        let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, vec![VIRTUAL_TAG, "agora", "draft", "shared"]);
    }

    #[test]
    fn test_tags_no_virtual_for_sized_directory_or_parent_marker() {
        let mut dir = File::new("1", "stuff", "/").into_directory();
        dir.metadata.insert(METADATA_SIZE.to_string(), "3".to_string());
        assert!(dir
            .tags(&TagRegistry::default(), &ToolRegistry::default())
            .is_empty());

        let parent = File::new("", "..", "/a");
        assert!(parent
            .tags(&TagRegistry::default(), &ToolRegistry::default())
            .is_empty());
    }

    // ── check_filename ───────────────────────────────────────────────────

    #[test]
    fn test_check_filename_rejects_empty() {
        assert_eq!(check_filename(""), Err(FilenameError::Empty));
        assert_eq!(check_filename("   "), Err(FilenameError::Empty));
    }

    #[test]
    fn test_check_filename_rejects_separator_and_special_characters() {
        assert_eq!(check_filename("a/b"), Err(FilenameError::SpecialCharacters));
        assert_eq!(check_filename("a:b"), Err(FilenameError::SpecialCharacters));
        assert_eq!(check_filename("a*"), Err(FilenameError::SpecialCharacters));
    }

    #[test]
    fn test_check_filename_length_boundary() {
        let ok = "a".repeat(MAX_FILENAME_LEN);
        assert_eq!(check_filename(&ok), Ok(()));

        let too_long = "a".repeat(MAX_FILENAME_LEN + 1);
        assert_eq!(check_filename(&too_long), Err(FilenameError::TooLong));
    }

    #[test]
    fn test_check_filename_accepts_spaces_and_punctuation() {
        // Spaces are underscore-encoded before the character check.
        assert_eq!(check_filename("my project notes"), Ok(()));
        assert_eq!(check_filename(".hidden-file_v2.bak"), Ok(()));
    }
}
