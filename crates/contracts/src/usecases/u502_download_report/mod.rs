pub mod request;
pub mod response;

pub use request::DownloadRequest;
pub use response::{DownloadDataResponse, DownloadResult, VpsDataResponse};

use crate::usecases::common::UseCaseMetadata;

pub struct DownloadReport;

impl UseCaseMetadata for DownloadReport {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "download_report"
    }

    fn display_name() -> &'static str {
        "Формирование отчёта по заданию"
    }

    fn description() -> &'static str {
        "Скачивание данных задания и сборка Excel-отчёта"
    }
}
