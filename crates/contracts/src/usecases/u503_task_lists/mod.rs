pub mod request;
pub mod response;

pub use request::HideTaskRequest;
pub use response::{
    ExpiryData, ExpiryDataResponse, TaskInProgress, TaskListResponse, TasksInProgressResponse,
    WarehousesResponse,
};

use crate::usecases::common::UseCaseMetadata;

pub struct TaskLists;

impl UseCaseMetadata for TaskLists {
    fn usecase_index() -> &'static str {
        "u503"
    }

    fn usecase_name() -> &'static str {
        "task_lists"
    }

    fn display_name() -> &'static str {
        "Списки заданий и складов"
    }
}
