use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Filter used when RUST_LOG is not set
pub const DEFAULT_FILTER: &str = "warn";

/// Name of the log file written while the TUI owns the terminal
pub const LOG_FILE_NAME: &str = "focuslist.log";

/// Install the global logger. With `log_dir` set, records are appended to a file in
/// that directory instead of stderr; if the file cannot be opened, stderr is used.
pub fn init(log_dir: Option<&Path>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));

    if let Some(dir) = log_dir {
        let opened = fs::create_dir_all(dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))
        });
        match opened {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Could not open log file in {}: {}", dir.display(), e);
            }
        }
    }

    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}
