pub mod record_set;
pub mod time_info;

pub use record_set::{Record, RecordSet};
pub use time_info::TimeWorkedSummary;
