pub mod executor;

pub use executor::{report_path, DownloadExecutor};
