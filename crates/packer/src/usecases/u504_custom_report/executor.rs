use contracts::enums::SchemaId;
use contracts::shared::Record;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_download_report::DownloadDataResponse;
use contracts::usecases::u504_custom_report::{
    CustomReport, CustomReportRequest, CustomReportResult, ReportConfig, ReportSource,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::projections::p901_wb_report::report_builder::{display_sheet, FLAT_SHEET};
use crate::projections::p902_custom_report::process;
use crate::shared::config::DownloadConfig;
use crate::shared::error::{PackerError, PackerResult};
use crate::shared::excel::write_workbook;
use crate::shared::packer_api::PackerApi;
use crate::usecases::u502_download_report::report_path;

/// Executor для UseCase пользовательского отчёта
pub struct CustomReportExecutor<A: PackerApi> {
    api: Arc<A>,
    config: DownloadConfig,
}

impl<A: PackerApi> CustomReportExecutor<A> {
    pub fn new(api: Arc<A>, config: DownloadConfig) -> Self {
        Self { api, config }
    }

    /// Скачать данные задания, обработать по шаблону и сохранить книгу
    pub fn execute(&self, request: &CustomReportRequest) -> PackerResult<CustomReportResult> {
        let task_name = request.task_name.trim();
        if task_name.is_empty() {
            return Err(PackerError::NoTaskSelected);
        }
        tracing::info!("{}: downloading {}", CustomReport::full_name(), task_name);

        let response = self.api.download(task_name)?;
        self.render(task_name, response, request.source, &request.config, request.output_dir.as_deref())
    }

    /// То же по сохранённому ответу `/download`
    pub fn render(
        &self,
        task_name: &str,
        response: DownloadDataResponse,
        source: ReportSource,
        config: &ReportConfig,
        output_dir: Option<&str>,
    ) -> PackerResult<CustomReportResult> {
        let rows = select_source(response, source);
        if rows.is_empty() {
            return Err(PackerError::NoData(task_name.to_string()));
        }
        let source_rows = rows.len();

        let set = process(rows, config)?;
        if set.is_empty() {
            tracing::warn!("Custom report for {} is empty after filters", task_name);
            return Err(PackerError::NoData(task_name.to_string()));
        }

        let mut unmapped = Vec::new();
        let sheet = display_sheet(FLAT_SHEET, &set, SchemaId::WbReport, &mut unmapped);
        let columns = sheet.header.clone();

        let dir = output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.output_dir());
        std::fs::create_dir_all(&dir)?;
        let path = report_path(&dir, &custom_file_name(task_name));
        write_workbook(&path, &[sheet])?;
        tracing::info!("Custom report saved to {}", path.display());

        Ok(CustomReportResult {
            task_name: task_name.to_string(),
            path: path.to_string_lossy().into_owned(),
            source_rows,
            rows: set.len(),
            columns,
        })
    }
}

fn select_source(response: DownloadDataResponse, source: ReportSource) -> Vec<Record> {
    match source {
        ReportSource::Detail => response.data_set1,
        ReportSource::Summary => response.data_set2.unwrap_or_default(),
    }
}

/// «<задание> отчёт» без исходного расширения
fn custom_file_name(task_name: &str) -> String {
    const EXT: &str = ".xlsx";
    let stem = task_name
        .len()
        .checked_sub(EXT.len())
        .filter(|&i| task_name.get(i..).is_some_and(|ext| ext.eq_ignore_ascii_case(EXT)))
        .map_or(task_name, |i| &task_name[..i]);
    format!("{} отчёт", stem.trim_end())
}
