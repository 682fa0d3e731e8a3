pub mod progress;
pub mod request;
pub mod response;

pub use progress::{UploadProgress, UploadStatus};
pub use request::{DeleteUploadedDataRequest, UploadRequest};
pub use response::UploadResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct UploadTask;

impl UseCaseMetadata for UploadTask {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "upload_task"
    }

    fn display_name() -> &'static str {
        "Выгрузка задания на сервер"
    }

    fn description() -> &'static str {
        "Построчная выгрузка Excel-файла на склад с повтором и отменой"
    }
}
