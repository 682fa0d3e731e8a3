pub mod executor;
pub mod progress_tracker;

pub use executor::UploadExecutor;
pub use progress_tracker::ProgressTracker;
