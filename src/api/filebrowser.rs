//! REST adapter implementing the controllers' remote boundary.
//!
//! The backend exposes a single relocate operation driven by an anchored
//! filter expression over canonical paths; rename and move are both
//! expressed through it. Backend failures carry an opaque error code the
//! controllers translate through the warning table; transport failures
//! map to the unknown code.

use reqwest::Response;

use crate::api::client::HttpClient;
use crate::api::types::{
    DirectoryDto, ErrorResponse, FileDto, MetadataDto, PermissionsDto, RelocateRequest,
    SearchMatchDto,
};
use crate::controllers::directory::FilebrowserClient;
use crate::controllers::search::SearchClient;
use crate::domain::directory::Directory;
use crate::domain::file::{File, Permissions};
use crate::domain::path;
use crate::domain::search::SearchMatch;
use crate::domain::warning::{ErrorCode, ERR_UNKNOWN};

pub struct RestFilebrowserClient {
    http: HttpClient,
}

impl RestFilebrowserClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Anchored filter expression selecting `target` for the relocate
    /// operation; with `subtree` set it also selects everything below it,
    /// which is what turns a directory relocation into a subtree move.
    fn relocate_filter(target: &str, subtree: bool) -> String {
        let escaped = escape_pattern(target);
        if subtree {
            format!("^{}(/.*)?$", escaped)
        } else {
            format!("^{}$", escaped)
        }
    }

    async fn relocate(&self, filter: String, destination: String) -> Result<(), ErrorCode> {
        let request = RelocateRequest {
            filter,
            destination,
        };

        let resp = self
            .http
            .put("/directory/relocate", &request)
            .await
            .map_err(connection_error)?;
        expect_success(resp).await
    }

    fn file_from_dto(dto: FileDto) -> File {
        let mut file = File::new(&dto.id, &dto.name, &dto.directory);
        for entry in dto.metadata {
            file.metadata.insert(entry.key, entry.value);
        }
        for entry in dto.permissions {
            file.permissions.insert(
                entry.user_id,
                Permissions {
                    read: entry.read,
                    write: entry.write,
                    owner: entry.owner,
                },
            );
        }

        file.flags = dto.flags;
        file
    }

    fn file_to_dto(file: &File) -> FileDto {
        FileDto {
            id: file.id.clone(),
            name: path::spaces_to_underscores(&file.name),
            directory: path::sanitize(&file.directory),
            metadata: file
                .metadata
                .iter()
                .map(|(key, value)| MetadataDto {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            permissions: file
                .permissions
                .iter()
                .map(|(user_id, permissions)| PermissionsDto {
                    user_id: *user_id,
                    read: permissions.read,
                    write: permissions.write,
                    owner: permissions.owner,
                })
                .collect(),
            flags: file.flags,
        }
    }
}

impl FilebrowserClient for RestFilebrowserClient {
    async fn retrieve(&self, target: &str) -> Result<Directory, ErrorCode> {
        let target = path::sanitize(target);
        let query = urlencoding::encode(&path::as_directory(&target)).into_owned();
        let resp = self
            .http
            .get(&format!("/directory?path={}", query))
            .await
            .map_err(connection_error)?;

        if !resp.status().is_success() {
            return Err(error_code(resp).await);
        }

        let dto: DirectoryDto = resp.json().await.map_err(decode_error)?;
        let mut dir = Directory::new(&dto.id, &target);
        for file in dto.files {
            dir.add_file(Self::file_from_dto(file));
        }

        Ok(dir)
    }

    async fn rename(&self, file: &File, name: &str) -> Result<(), ErrorCode> {
        let filter = Self::relocate_filter(&file.path(), file.is_directory());
        let dest = path::join(&[&file.directory, name]);
        self.relocate(filter, dest).await
    }

    async fn move_file(&self, source: &File, dest: &str) -> Result<(), ErrorCode> {
        let filter = Self::relocate_filter(&source.path(), source.is_directory());
        self.relocate(filter, path::sanitize(dest)).await
    }

    async fn delete(&self, file: &File) -> Result<(), ErrorCode> {
        // Directories are addressed by path, files by their backend id.
        let resp = if file.is_directory() {
            let query = urlencoding::encode(&path::as_directory(&file.path())).into_owned();
            self.http.delete(&format!("/directory?path={}", query)).await
        } else {
            self.http
                .delete(&format!("/file/{}", urlencoding::encode(&file.id)))
                .await
        }
        .map_err(connection_error)?;

        expect_success(resp).await
    }

    async fn create(&self, file: &File) -> Result<File, ErrorCode> {
        let resp = self
            .http
            .post("/file", &Self::file_to_dto(file))
            .await
            .map_err(connection_error)?;

        if !resp.status().is_success() {
            return Err(error_code(resp).await);
        }

        let dto: FileDto = resp.json().await.map_err(decode_error)?;
        Ok(Self::file_from_dto(dto))
    }
}

impl SearchClient for RestFilebrowserClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, ErrorCode> {
        let encoded = path::spaces_to_underscores(query);
        let resp = self
            .http
            .get(&format!(
                "/directory/search?query={}",
                urlencoding::encode(&encoded)
            ))
            .await
            .map_err(connection_error)?;

        if !resp.status().is_success() {
            return Err(error_code(resp).await);
        }

        let matches: Vec<SearchMatchDto> = resp.json().await.map_err(decode_error)?;
        Ok(matches
            .into_iter()
            .map(|dto| SearchMatch::new(Self::file_from_dto(dto.file), dto.match_start, dto.match_end))
            .collect())
    }
}

/// Escape regex metacharacters so path components match literally.
fn escape_pattern(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(
            c,
            '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

fn connection_error(err: reqwest::Error) -> ErrorCode {
    log::warn!("Filebrowser request failed: {}", err);
    ErrorCode::from(ERR_UNKNOWN)
}

fn decode_error(err: reqwest::Error) -> ErrorCode {
    log::warn!("Filebrowser response could not be decoded: {}", err);
    ErrorCode::from(ERR_UNKNOWN)
}

/// Map a non-success response to the backend's error code, falling back
/// to the unknown code when the body carries none.
async fn error_code(resp: Response) -> ErrorCode {
    match resp.json::<ErrorResponse>().await {
        Ok(body) => ErrorCode(body.error),
        Err(_) => ErrorCode::from(ERR_UNKNOWN),
    }
}

async fn expect_success(resp: Response) -> Result<(), ErrorCode> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(error_code(resp).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_filter_exact_match_for_files() {
        let filter = RestFilebrowserClient::relocate_filter("/docs/notes", false);
        assert_eq!(filter, "^/docs/notes$");
    }

    #[test]
    fn test_relocate_filter_covers_directory_subtree() {
        let filter = RestFilebrowserClient::relocate_filter("/docs/archive", true);
        assert_eq!(filter, "^/docs/archive(/.*)?$");
    }

    #[test]
    fn test_relocate_filter_escapes_metacharacters() {
        let filter = RestFilebrowserClient::relocate_filter("/docs/v1.2_(draft)", false);
        assert_eq!(filter, "^/docs/v1\\.2_\\(draft\\)$");
    }

    #[test]
    fn test_file_from_dto_decodes_names() {
        let dto = FileDto {
            id: "f-1".to_string(),
            name: "my_project_notes".to_string(),
            directory: "/my_stuff".to_string(),
            metadata: vec![],
            permissions: vec![],
            flags: 0,
        };

        let file = RestFilebrowserClient::file_from_dto(dto);
        assert_eq!(file.name, "my project notes");
        assert_eq!(file.directory, "/my_stuff");
    }

    #[test]
    fn test_file_to_dto_encodes_name() {
        let file = File::new("f-1", "my project notes", "/my stuff");
        let dto = RestFilebrowserClient::file_to_dto(&file);
        assert_eq!(dto.name, "my_project_notes");
        assert_eq!(dto.directory, "/my_stuff");
    }
}
