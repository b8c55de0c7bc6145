//! Interactive shell driving the filebrowser core against a live backend.
//!
//! Purely a driver: every domain decision lives in the library. The shell
//! wires the REST adapter to the controllers, registers one observer that
//! wakes it up on state changes, and maps line commands onto controller
//! operations.

use std::collections::HashMap;
use std::io::{self, Write as _};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use tokio::sync::Notify;

use filebrowser::api::client::HttpClient;
use filebrowser::api::filebrowser::RestFilebrowserClient;
use filebrowser::controllers::directory::DirectoryController;
use filebrowser::controllers::filter::{FileFilter, Sort};
use filebrowser::controllers::observer::Observer;
use filebrowser::controllers::search::SearchController;
use filebrowser::controllers::warning::WarningController;
use filebrowser::domain::directory::Directory;
use filebrowser::domain::file::File;
use filebrowser::domain::path;
use filebrowser::domain::tool::ToolRegistry;
use filebrowser::time;

type Browser = DirectoryController<RestFilebrowserClient, WarningController>;
type Searcher = SearchController<RestFilebrowserClient, WarningController>;

#[derive(Parser, Debug)]
#[command(name = "filebrowser")]
struct Args {
    /// Base URL of the filebrowser API
    #[arg(long)]
    api_url: Option<String>,

    /// Extra header attached to every request, as `name: value`
    #[arg(long = "header")]
    headers: Vec<String>,

    /// Include hidden files in listings
    #[arg(long)]
    show_hidden: bool,

    /// Sort listings descending instead of ascending
    #[arg(long)]
    descending: bool,
}

/// Wakes the shell whenever any controller broadcasts a change.
struct ShellObserver {
    notify: Arc<Notify>,
}

impl Observer for ShellObserver {
    fn update(&self) {
        self.notify.notify_one();
    }
}

#[tokio::main]
async fn main() {
    // Shares FILEBROWSER_* vars with the web frontend's .env file.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args = Args::parse();
    let api_url = args
        .api_url
        .or_else(|| std::env::var("FILEBROWSER_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let mut headers = HashMap::new();
    for header in &args.headers {
        match header.split_once(':') {
            Some((name, value)) => {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
            None => eprintln!("ignoring malformed header {:?}", header),
        }
    }

    log::info!("Filebrowser shell connecting to {}", api_url);

    let client = Arc::new(RestFilebrowserClient::new(HttpClient::new(&api_url, headers)));
    let warnings = Arc::new(WarningController::new());
    let browser = Arc::new(DirectoryController::new(
        Arc::clone(&client),
        Arc::clone(&warnings),
        ToolRegistry::default(),
    ));
    let searcher: Arc<Searcher> = Arc::new(SearchController::new(client, Arc::clone(&warnings)));

    let notify = Arc::new(Notify::new());
    let observer = Arc::new(ShellObserver {
        notify: Arc::clone(&notify),
    });
    browser.add_observer(observer.clone());
    searcher.add_observer(observer.clone());
    warnings.add_observer(observer);

    let sort = if args.descending { Sort::Za } else { Sort::Az };
    let filter = FileFilter::new(sort, args.show_hidden);

    println!("filebrowser shell -- type `help` for commands");
    loop {
        print!("{}> ", browser.path());
        let _ = io::stdout().flush();

        let Some(line) = read_line().await else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        match (command, rest.as_slice()) {
            ("ls", _) => match resolve_listing(&browser, &notify).await {
                Some(listing) => print_listing(&listing, &filter),
                None => println!("directory not available (see `warnings`)"),
            },
            ("pwd", _) => println!("{}", browser.path()),
            ("cd", [target]) => {
                let target = if target.starts_with('/') {
                    (*target).to_string()
                } else {
                    path::join(&[current_path(&browser).as_str(), *target])
                };
                browser.set_path(&target);
            }
            ("up", levels) => {
                let delta: i32 = levels.first().and_then(|l| l.parse().ok()).unwrap_or(1);
                browser.change_directory(-delta);
            }
            ("open", [name]) => match lookup(&browser, &notify, name).await {
                Some(file) => match browser.open_file(&file) {
                    Some(url) => println!("open {}", url),
                    None => {}
                },
                None => println!("no such file: {}", name),
            },
            ("rename", [name, new_name]) => {
                if let Err(err) = browser.check_name(new_name) {
                    println!("{}", err);
                } else if let Some(file) = lookup(&browser, &notify, name).await {
                    browser.rename_file(&file, new_name).await;
                } else {
                    println!("no such file: {}", name);
                }
            }
            ("mv", [name, target]) => {
                let Some(source) = lookup(&browser, &notify, name).await else {
                    println!("no such file: {}", name);
                    continue;
                };
                let target = if *target == path::PARENT_DIRECTORY {
                    let parent = path::parent(&current_path(&browser)).unwrap_or_default();
                    File::new("", path::PARENT_DIRECTORY, &parent)
                } else {
                    match lookup(&browser, &notify, target).await {
                        Some(file) => file,
                        None => {
                            println!("no such file: {}", target);
                            continue;
                        }
                    }
                };
                browser.move_file(&source, &target).await;
            }
            ("rm", [name]) => match lookup(&browser, &notify, name).await {
                Some(file) => browser.delete_file(&file).await,
                None => println!("no such file: {}", name),
            },
            ("mkdir", [name]) => {
                if let Err(err) = browser.check_name(name) {
                    println!("{}", err);
                } else {
                    let dir = File::new("", name, &current_path(&browser)).into_directory();
                    browser.create_file(dir).await;
                }
            }
            ("touch", [name]) => {
                if let Err(err) = browser.check_name(name) {
                    println!("{}", err);
                } else {
                    browser
                        .create_file(File::new("", name, &current_path(&browser)))
                        .await;
                }
            }
            ("search", terms) if !terms.is_empty() => {
                searcher.search(&terms.join(" "));
                let _ = tokio::time::timeout(Duration::from_secs(5), notify.notified()).await;
                for item in searcher.items() {
                    println!("{:<32} {}", item.file.name, path::display(&item.file.path()));
                }
            }
            ("warnings", _) => {
                for (index, warning) in warnings.all().iter().enumerate() {
                    println!("[{}] {}: {}", index, warning.title, warning.text);
                }
            }
            ("help", _) => print_help(),
            ("quit" | "exit", _) => break,
            _ => println!("unknown command, type `help`"),
        }
    }
}

/// Canonical form of the browser's current location.
fn current_path(browser: &Arc<Browser>) -> String {
    path::sanitize(&browser.path())
}

/// Read one line from stdin without blocking the runtime.
async fn read_line() -> Option<String> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None, // EOF
            Ok(_) => Some(line),
            Err(_) => None,
        }
    })
    .await
    .ok()
    .flatten()
}

/// Resolve the current listing, waiting for an in-flight fetch if needed.
async fn resolve_listing(browser: &Arc<Browser>, notify: &Arc<Notify>) -> Option<Directory> {
    for _ in 0..40 {
        if let Some(listing) = browser.get_directory() {
            return Some(listing);
        }
        let _ = tokio::time::timeout(Duration::from_millis(250), notify.notified()).await;
    }

    None
}

/// Find a file by display name in the current listing.
async fn lookup(browser: &Arc<Browser>, notify: &Arc<Notify>, name: &str) -> Option<File> {
    resolve_listing(browser, notify)
        .await?
        .file_by_name(name)
        .cloned()
}

fn print_listing(listing: &Directory, filter: &FileFilter) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_secs())
        .unwrap_or(0);

    for file in filter.filter(&listing.files) {
        let kind = if file.is_directory() { "d" } else { "-" };
        let marker = if file.new { "*" } else { " " };
        let size = file.size().map(|s| s.to_string()).unwrap_or_default();
        let updated = file
            .updated_at()
            .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
            .map(|at| time::elapsed(at.as_secs(), now))
            .unwrap_or_default();

        println!("{}{} {:>8}  {:<28} {}", kind, marker, size, file.name, updated);
    }
}

fn print_help() {
    println!("  ls                 list the current directory");
    println!("  cd <path>          navigate to a path (absolute or relative)");
    println!("  up [n]             navigate n levels towards the root");
    println!("  open <name>        enter a directory or resolve a file's URL");
    println!("  rename <old> <new> rename a file");
    println!("  mv <name> <target> move a file onto a directory entry or `..`");
    println!("  rm <name>          delete a file");
    println!("  mkdir <name>       create a directory");
    println!("  touch <name>       create an empty file");
    println!("  search <query>     search file names");
    println!("  warnings           show pending warnings");
    println!("  quit               leave the shell");
}
