//! Session logger — a `log` backend that writes to one file per launch.
//!
//! The file is **truncated at each launch**, so it only ever holds the most
//! recent session. Warnings and errors are mirrored to stderr as well.
//!
//! Log location:
//!   Windows:  `%APPDATA%\Lomo\lomo.log`
//!   Linux:    `~/.local/share/Lomo/lomo.log`
//!   macOS:    `~/Library/Application Support/Lomo/lomo.log`

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct SessionLogger {
    file: Option<Mutex<File>>,
    level: LevelFilter,
}

impl SessionLogger {
    /// Open (or truncate) `path`. A file that can't be opened just disables
    /// the file sink.
    pub fn new(path: &Path, level: LevelFilter) -> Self {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path);
        let file = match file {
            Ok(f) => Some(Mutex::new(f)),
            Err(e) => {
                eprintln!("[logger] failed to open log file {}: {}", path.display(), e);
                None
            }
        };
        Self { file, level }
    }

    fn write_line(&self, line: &str) {
        if let Some(mutex) = &self.file
            && let Ok(mut file) = mutex.lock()
        {
            let _ = writeln!(file, "{}", line);
        }
    }
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(&timestamp(), record.level(), &record.args().to_string());
        self.write_line(&line);
        if record.level() <= Level::Warn {
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        if let Some(mutex) = &self.file
            && let Ok(mut file) = mutex.lock()
        {
            let _ = file.flush();
        }
    }
}

/// Install the session logger as the global `log` backend and hook panics
/// into it. `verbose` lowers the filter to `Debug`.
pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let path = log_file_path();
    let logger = SessionLogger::new(&path, level);
    logger.write_line(&format!(
        "=== Lomo session started {} ===",
        human_timestamp()
    ));
    logger.write_line(&format!("Log file: {}", path.display()));

    if log::set_boxed_logger(Box::new(logger)).is_err() {
        // Already installed (e.g. a second init in the same process).
        return;
    }
    log::set_max_level(level);

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("PANIC: {}", info);
        log::logger().flush();
        prev(info);
    }));
}

fn format_line(ts: &str, level: Level, msg: &str) -> String {
    format!("[{}] [{}] {}", ts, level, msg)
}

pub fn log_file_path() -> PathBuf {
    data_dir().join("Lomo").join("lomo.log")
}

/// Platform data directory (without the app sub-folder).
fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support");
        }
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from(".")
}

/// HH:MM:SS within the current UTC day.
fn timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => {
            let secs = d.as_secs();
            let h = (secs % 86400) / 3600;
            let m = (secs % 3600) / 60;
            let s = secs % 60;
            format!("{:02}:{:02}:{:02}", h, m, s)
        }
        Err(_) => "??:??:??".to_string(),
    }
}

fn human_timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => format!("(unix {})", d.as_secs()),
        Err(_) => "(unknown time)".to_string(),
    }
}
