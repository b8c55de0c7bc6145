//! Directory state controller.
//!
//! Owns the path-indexed cache of directory listings and every mutation
//! that goes through the remote filebrowser. Remote calls never block the
//! caller: fetches are spawned onto the runtime and the cache is mutated
//! only after a positive acknowledgment, so a failed call leaves local
//! state untouched and surfaces exactly one warning.
//!
//! Must run inside a tokio runtime.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::controllers::observer::{Observer, Subject};
use crate::controllers::warning::WarningSink;
use crate::domain::directory::Directory;
use crate::domain::file::{check_filename, File, FilenameError, METADATA_SIZE};
use crate::domain::path;
use crate::domain::tool::ToolRegistry;
use crate::domain::warning::{ErrorCode, Warning};

/// Remote boundary the controller drives. Implemented by the REST
/// adapter in [`api::filebrowser`](crate::api::filebrowser); tests
/// provide mocks.
///
/// Every operation settles with either a success or an opaque backend
/// error code; there is no retry or cancellation on this side.
pub trait FilebrowserClient {
    /// Fetch the listing for a canonical path.
    fn retrieve(&self, target: &str) -> impl Future<Output = Result<Directory, ErrorCode>> + Send;

    /// Rename `file` in place, keeping its directory.
    fn rename(&self, file: &File, name: &str) -> impl Future<Output = Result<(), ErrorCode>> + Send;

    /// Relocate `source` (and its subtree, for directories) to `dest`.
    fn move_file(&self, source: &File, dest: &str)
        -> impl Future<Output = Result<(), ErrorCode>> + Send;

    fn delete(&self, file: &File) -> impl Future<Output = Result<(), ErrorCode>> + Send;

    /// Persist a virtual file. The response carries the backend-assigned
    /// id and canonical metadata.
    fn create(&self, file: &File) -> impl Future<Output = Result<File, ErrorCode>> + Send;
}

struct BrowserState {
    /// Listings keyed by canonical path.
    dirs: HashMap<String, Directory>,
    /// Canonical path of the current location.
    path: String,
    /// Paths with a fetch in flight, so a cache miss spawns at most one.
    pending: HashSet<String>,
}

struct Inner<C, W> {
    client: Arc<C>,
    warnings: Arc<W>,
    tools: ToolRegistry,
    state: Mutex<BrowserState>,
    subject: Subject,
}

pub struct DirectoryController<C, W> {
    inner: Arc<Inner<C, W>>,
}

impl<C, W> Clone for DirectoryController<C, W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, W> DirectoryController<C, W>
where
    C: FilebrowserClient + Send + Sync + 'static,
    W: WarningSink + 'static,
{
    pub fn new(client: Arc<C>, warnings: Arc<W>, tools: ToolRegistry) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                warnings,
                tools,
                state: Mutex::new(BrowserState {
                    dirs: HashMap::new(),
                    path: path::ROOT.to_string(),
                    pending: HashSet::new(),
                }),
                subject: Subject::new(),
            }),
        }
    }

    /// Decoded form of the current location.
    pub fn path(&self) -> String {
        path::display(&self.inner.state.lock().unwrap().path)
    }

    /// Navigate to `target`. Clears the `new` marker on the files of the
    /// listing being left and notifies observers. Fetching is deferred to
    /// the next [`get_directory`](Self::get_directory) call.
    pub fn set_path(&self, target: &str) {
        {
            let mut state = self.inner.state.lock().unwrap();
            let previous = state.path.clone();
            if let Some(dir) = state.dirs.get_mut(&previous) {
                for file in &mut dir.files {
                    file.new = false;
                }
            }

            state.path = path::sanitize(target);
            log::info!("Location set to {}", state.path);
        }

        self.inner.subject.broadcast();
    }

    /// Cached listing for the current location. On a cache miss an
    /// asynchronous fetch is started (at most one per path) and `None` is
    /// returned immediately; observers are notified once data arrives.
    pub fn get_directory(&self) -> Option<Directory> {
        let target = {
            let mut state = self.inner.state.lock().unwrap();
            let target = state.path.clone();
            if let Some(dir) = state.dirs.get(&target) {
                return Some(dir.clone());
            }

            if !state.pending.insert(target.clone()) {
                // Fetch already in flight for this path.
                return None;
            }

            target
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.fetch_directory(target).await });
        None
    }

    /// Dispatch on the file kind: the parent marker navigates up one
    /// level, directories are entered, and regular files resolve to their
    /// external URL, returned for the embedding shell to open. `None`
    /// when navigation happened or no URL is resolvable.
    pub fn open_file(&self, file: &File) -> Option<String> {
        if file.is_parent_directory() {
            self.change_directory(-1);
            None
        } else if file.is_directory() {
            let current = self.inner.state.lock().unwrap().path.clone();
            self.set_path(&path::join(&[&current, &file.name]));
            None
        } else {
            file.url(&self.inner.tools)
        }
    }

    /// Truncate the current path by `delta` components (negative values
    /// climb towards the root) and navigate there.
    pub fn change_directory(&self, delta: i32) {
        let current = self.inner.state.lock().unwrap().path.clone();
        let components = path::split(&current);
        let keep = (components.len() as i32 + delta).clamp(0, components.len() as i32) as usize;

        let kept: Vec<&str> = components[..keep].iter().map(String::as_str).collect();
        self.set_path(&path::join(&kept));
    }

    /// Pre-flight name validation against the current listing, shared by
    /// the rename and creation forms.
    pub fn check_name(&self, name: &str) -> Result<(), FilenameError> {
        let state = self.inner.state.lock().unwrap();
        match state.dirs.get(&state.path) {
            Some(dir) => dir.check_name(name),
            None => check_filename(name),
        }
    }

    /// Rename `file` after local validation. An invalid name aborts
    /// without any remote call; the validation error surfaces through the
    /// rename form, not the warning sink.
    pub async fn rename_file(&self, file: &File, name: &str) {
        let directory = path::sanitize(&file.directory);

        let validation = {
            let state = self.inner.state.lock().unwrap();
            match state.dirs.get(&directory) {
                Some(dir) => dir.check_name(name),
                None => check_filename(name),
            }
        };

        if let Err(err) = validation {
            log::debug!("Rename of {} to {:?} rejected: {}", file.name, name, err);
            return;
        }

        match self.inner.client.rename(file, name).await {
            Ok(()) => {
                {
                    let mut state = self.inner.state.lock().unwrap();
                    if let Some(entry) = state
                        .dirs
                        .get_mut(&directory)
                        .and_then(|dir| dir.entry_mut(file))
                    {
                        entry.name = path::underscores_to_spaces(name);
                    }
                }

                self.inner.subject.broadcast();
            }
            Err(code) => {
                log::warn!("Rename of {} failed: {}", file.name, code);
                self.inner.warnings.push(Warning::find(&code));
            }
        }
    }

    /// Move `source` into the directory `target` stands for: its
    /// containing directory when `target` is the parent marker, the
    /// directory itself otherwise. A moved directory keeps its own name
    /// as the final component so the subtree is preserved under the new
    /// parent.
    pub async fn move_file(&self, source: &File, target: &File) {
        let target_path = if target.is_parent_directory() {
            path::sanitize(&target.directory)
        } else {
            path::join(&[&target.directory, &target.name])
        };

        let subtree = if source.is_directory() {
            source.name.as_str()
        } else {
            ""
        };
        let dest = path::as_directory(&path::join(&[&target_path, subtree]));

        match self.inner.client.move_file(source, &dest).await {
            Ok(()) => {
                {
                    let mut state = self.inner.state.lock().unwrap();
                    let origin = path::sanitize(&source.directory);
                    let moved_size = if source.is_directory() {
                        source.size().unwrap_or(0) as i64
                    } else {
                        1
                    };

                    if let Some(dir) = state.dirs.get_mut(&origin) {
                        dir.remove_entry(source);
                    }
                    bump_size(&mut state.dirs, &origin, -moved_size);
                    bump_size(&mut state.dirs, &target_path, moved_size);

                    // Only a cached destination receives the entry; an
                    // uncached one materializes it on its next fetch.
                    if let Some(dir) = state.dirs.get_mut(&target_path) {
                        let mut moved = source.clone();
                        moved.directory = target_path.clone();
                        dir.add_file(moved);
                    }
                }

                self.inner.subject.broadcast();
            }
            Err(code) => {
                log::warn!("Move of {} to {} failed: {}", source.name, dest, code);
                self.inner.warnings.push(Warning::find(&code));
            }
        }
    }

    /// Delete `file` and drop it from its cached listing.
    pub async fn delete_file(&self, file: &File) {
        match self.inner.client.delete(file).await {
            Ok(()) => {
                {
                    let mut state = self.inner.state.lock().unwrap();
                    let directory = path::sanitize(&file.directory);
                    let removed = state
                        .dirs
                        .get_mut(&directory)
                        .and_then(|dir| dir.remove_entry(file));

                    if let Some(removed) = removed {
                        let freed = if removed.is_directory() {
                            removed.size().unwrap_or(0) as i64
                        } else {
                            1
                        };
                        bump_size(&mut state.dirs, &directory, -freed);
                    }
                }

                self.inner.subject.broadcast();
            }
            Err(code) => {
                log::warn!("Delete of {} failed: {}", file.name, code);
                self.inner.warnings.push(Warning::find(&code));
            }
        }
    }

    /// Persist a virtual file and insert the backend's canonical version
    /// into the cache, marked as newly created until the next navigation.
    pub async fn create_file(&self, file: File) {
        match self.inner.client.create(&file).await {
            Ok(mut created) => {
                created.new = true;
                self.add_file(created);
            }
            Err(code) => {
                log::warn!("Create of {} failed: {}", file.name, code);
                self.inner.warnings.push(Warning::find(&code));
            }
        }
    }

    /// Insert `file` into its directory's cached listing, keeping a
    /// single entry per name and bumping the parent entry's size. Also
    /// the entry point for externally pushed real-time updates.
    pub fn add_file(&self, file: File) {
        {
            let mut state = self.inner.state.lock().unwrap();
            let directory = path::sanitize(&file.directory);
            if let Some(dir) = state.dirs.get_mut(&directory) {
                dir.add_file(file);
                bump_size(&mut state.dirs, &directory, 1);
            }
        }

        self.inner.subject.broadcast();
    }

    pub fn add_observer(&self, observer: Arc<dyn Observer>) {
        self.inner.subject.add_observer(observer);
    }

    pub fn remove_observer(&self, observer: &Arc<dyn Observer>) {
        self.inner.subject.remove_observer(observer);
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.inner.tools
    }
}

impl<C, W> Inner<C, W>
where
    C: FilebrowserClient + Send + Sync + 'static,
    W: WarningSink + 'static,
{
    async fn fetch_directory(&self, target: String) {
        log::debug!("Retrieving directory {}", target);
        let result = self.client.retrieve(&target).await;

        let failure = {
            let mut state = self.state.lock().unwrap();
            state.pending.remove(&target);
            match result {
                Ok(dir) => {
                    state.dirs.insert(target.clone(), dir);
                    None
                }
                Err(code) => Some(code),
            }
        };

        match failure {
            // A failed fetch leaves no cache entry behind, so the next
            // get_directory call retries. The warning sink notifies its
            // own observers.
            Some(code) => {
                log::warn!("Retrieve of {} failed: {}", target, code);
                self.warnings.push(Warning::find(&code));
            }
            None => self.subject.broadcast(),
        }
    }
}

/// Best-effort size bookkeeping: adjust the cached size metadata of the
/// entry standing for `dir_path` inside its parent listing. Refetching
/// resynchronizes whenever this drifts.
fn bump_size(dirs: &mut HashMap<String, Directory>, dir_path: &str, delta: i64) {
    let Some(parent) = path::parent(dir_path) else {
        return;
    };
    let Some(listing) = dirs.get_mut(&parent) else {
        return;
    };
    let Some(entry) = listing.files.iter_mut().find(|file| file.path() == dir_path) else {
        return;
    };

    let size = entry
        .metadata
        .get(METADATA_SIZE)
        .and_then(|size| size.parse::<i64>().ok())
        .unwrap_or(0);
    entry
        .metadata
        .insert(METADATA_SIZE.to_string(), (size + delta).max(0).to_string());
}
