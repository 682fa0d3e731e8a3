pub mod config;
pub mod request;

pub use config::{DateRange, FilterOperator, ReportConfig, ReportFilter, ReportSort, SortDirection};
pub use request::{CustomReportRequest, CustomReportResult, ReportSource};

use crate::usecases::common::UseCaseMetadata;

pub struct CustomReport;

impl UseCaseMetadata for CustomReport {
    fn usecase_index() -> &'static str {
        "u504"
    }

    fn usecase_name() -> &'static str {
        "custom_report"
    }

    fn display_name() -> &'static str {
        "Пользовательский отчёт"
    }

    fn description() -> &'static str {
        "Фильтры, сортировка, группировка и выбор полей по данным задания"
    }
}
