//! Request and response types for the filebrowser REST API.
//!
//! All structs use camelCase serialization to match the API's JSON
//! format. Names and directory paths cross the wire underscore-encoded;
//! the adapter decodes them on ingest.

use serde::{Deserialize, Serialize};

/// One metadata key/value pair of a file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub key: String,
    pub value: String,
}

/// Access rights of one user over a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsDto {
    pub user_id: u32,
    pub read: bool,
    pub write: bool,
    pub owner: bool,
}

/// A file record as the backend represents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub directory: String,
    #[serde(default)]
    pub metadata: Vec<MetadataDto>,
    #[serde(default)]
    pub permissions: Vec<PermissionsDto>,
    #[serde(default)]
    pub flags: u8,
}

/// A directory listing response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryDto {
    pub id: String,
    #[serde(default)]
    pub files: Vec<FileDto>,
}

/// A single search hit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatchDto {
    pub file: FileDto,
    pub match_start: usize,
    pub match_end: usize,
}

/// Body of the relocate operation, reused for both rename and move.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocateRequest {
    /// Anchored expression selecting the paths to relocate.
    pub filter: String,
    /// Canonical destination path.
    pub destination: String,
}

/// Error body returned by the backend on any failed operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_dto_camel_case_round_trip() {
        let dto = FileDto {
            id: "f-1".to_string(),
            name: "notes".to_string(),
            directory: "/docs".to_string(),
            metadata: vec![MetadataDto {
                key: "size".to_string(),
                value: "2".to_string(),
            }],
            permissions: vec![PermissionsDto {
                user_id: 7,
                read: true,
                write: false,
                owner: false,
            }],
            flags: 0x04,
        };

        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains("\"userId\":7"));
        assert!(json.contains("\"directory\":\"/docs\""));

        let parsed: FileDto = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.permissions[0].user_id, 7);
        assert_eq!(parsed.flags, 0x04);
    }

    #[test]
    fn test_directory_dto_defaults_missing_files() {
        let parsed: DirectoryDto = serde_json::from_str(r#"{"id": "d-1"}"#).unwrap();
        assert!(parsed.files.is_empty());
    }

    #[test]
    fn test_search_match_dto_field_names() {
        let json = r#"{
            "file": {"id": "f-1", "name": "notes", "directory": "/"},
            "matchStart": 2,
            "matchEnd": 5
        }"#;

        let parsed: SearchMatchDto = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.match_start, 2);
        assert_eq!(parsed.match_end, 5);
    }

    #[test]
    fn test_relocate_request_serialization() {
        let request = RelocateRequest {
            filter: "^/docs/notes$".to_string(),
            destination: "/docs/journal".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"filter\":\"^/docs/notes$\""));
        assert!(json.contains("\"destination\":\"/docs/journal\""));
    }
}
