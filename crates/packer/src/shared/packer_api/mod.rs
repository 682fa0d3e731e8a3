pub mod client;
#[cfg(test)]
pub(crate) mod fake;

use contracts::enums::TaskListKind;
use contracts::shared::Record;
use contracts::usecases::u501_upload_task::DeleteUploadedDataRequest;
use contracts::usecases::u502_download_report::{DownloadDataResponse, VpsDataResponse};
use contracts::usecases::u503_task_lists::{ExpiryData, TaskInProgress};

use crate::shared::error::PackerResult;

pub use client::PackerApiClient;

/// Трейт для бэкенда склада.
///
/// Use case-ы работают через него, в тестах подставляется фейк.
pub trait PackerApi {
    /// POST одной строки на эндпоинт выгрузки; успех только при 200
    fn upload_row(&self, endpoint: &str, payload: &Record) -> PackerResult<()>;

    /// Откат частично выгруженного задания
    fn delete_uploaded_data(&self, request: &DeleteUploadedDataRequest) -> PackerResult<()>;

    fn warehouses(&self) -> PackerResult<Vec<String>>;

    fn task_names(&self, kind: TaskListKind) -> PackerResult<Vec<String>>;

    fn tasks_in_progress(&self) -> PackerResult<Vec<TaskInProgress>>;

    fn download(&self, task_name: &str) -> PackerResult<DownloadDataResponse>;

    fn download_vps(&self, task_name: &str) -> PackerResult<VpsDataResponse>;

    fn hide_task(&self, task_name: &str) -> PackerResult<()>;

    fn expiry_data(&self, artikul: &str) -> PackerResult<Vec<ExpiryData>>;
}
