pub mod executor;

pub use executor::TaskListsExecutor;
