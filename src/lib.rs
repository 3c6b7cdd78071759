pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{Category, Stats, Task};
pub use session::{Session, SessionError};
pub use storage::{Storage, StorageError};
pub use store::{FilteredView, StoreError, TaskStore};
pub use utils::Profile;
