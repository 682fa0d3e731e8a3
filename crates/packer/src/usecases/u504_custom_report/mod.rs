pub mod executor;

pub use executor::CustomReportExecutor;
