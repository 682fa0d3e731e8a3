use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_download_report::{
    DownloadDataResponse, DownloadReport, DownloadRequest, DownloadResult,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::projections::p901_wb_report::{build_report, build_vps_report, BuiltReport, ReshapeOptions};
use crate::shared::config::DownloadConfig;
use crate::shared::error::{PackerError, PackerResult};
use crate::shared::excel::write_workbook;
use crate::shared::packer_api::PackerApi;

/// Executor для UseCase формирования отчёта
pub struct DownloadExecutor<A: PackerApi> {
    api: Arc<A>,
    config: DownloadConfig,
}

impl<A: PackerApi> DownloadExecutor<A> {
    pub fn new(api: Arc<A>, config: DownloadConfig) -> Self {
        Self { api, config }
    }

    /// Скачать данные задания и сохранить книгу
    pub fn execute(&self, request: &DownloadRequest) -> PackerResult<DownloadResult> {
        let task_name = request.task_name.trim();
        if task_name.is_empty() {
            return Err(PackerError::NoTaskSelected);
        }
        tracing::info!("{}: downloading {}", DownloadReport::full_name(), task_name);

        let report = if request.vps {
            build_vps_report(task_name, self.api.download_vps(task_name)?)?
        } else {
            build_report(task_name, self.api.download(task_name)?, self.options())?
        };
        self.save(task_name, report, request.output_dir.as_deref())
    }

    /// Отчёт по сохранённому ответу `/download`, без обращения к серверу
    pub fn render(
        &self,
        task_name: &str,
        response: DownloadDataResponse,
        output_dir: Option<&str>,
    ) -> PackerResult<DownloadResult> {
        let task_name = task_name.trim();
        if task_name.is_empty() {
            return Err(PackerError::NoTaskSelected);
        }
        let report = build_report(task_name, response, self.options())?;
        self.save(task_name, report, output_dir)
    }

    fn options(&self) -> ReshapeOptions {
        ReshapeOptions {
            pallet_merge: self.config.pallet_merge,
        }
    }

    fn save(&self, task_name: &str, report: BuiltReport, output_dir: Option<&str>) -> PackerResult<DownloadResult> {
        let dir = output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.output_dir());
        std::fs::create_dir_all(&dir)?;

        let path = report_path(&dir, task_name);
        write_workbook(&path, &report.sheets)?;

        Ok(DownloadResult {
            task_name: task_name.to_string(),
            path: path.to_string_lossy().into_owned(),
            kind: report.kind,
            detail_rows: report.detail_rows,
            summary_rows: report.summary_rows,
            time_info: report.time_info,
            unmapped_columns: report.unmapped_columns,
        })
    }
}

/// `<dir>/<task>.xlsx`; расширение не удваивается, разделители пути заменяются
pub fn report_path(dir: &Path, task_name: &str) -> PathBuf {
    let safe: String = task_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let file_name = if safe.to_lowercase().ends_with(".xlsx") {
        safe
    } else {
        format!("{}.xlsx", safe)
    };
    dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::packer_api::fake::FakeApi;
    use calamine::{open_workbook, Reader, Xlsx};
    use contracts::enums::ReportKind;
    use contracts::shared::Record;
    use contracts::usecases::u502_download_report::VpsDataResponse;
    use serde_json::{json, Value};

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .filter_map(|v| match v {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn compound() -> DownloadDataResponse {
        DownloadDataResponse {
            data_set1: records(vec![
                json!({"Artikul": "A", "Kolvo_Tovarov": 2, "Pallet_No": "P1", "Time_Start": "2024-02-01 10:00:00"}),
                json!({"Artikul": "A", "Kolvo_Tovarov": 2, "Pallet_No": "P1", "Time_End": "2024-02-01 10:30:00"}),
            ]),
            data_set2: Some(records(vec![json!({"Artikul": "A", "Vlozhennost": 2})])),
            report_kind: None,
        }
    }

    fn request(task: &str, dir: &Path, vps: bool) -> DownloadRequest {
        DownloadRequest {
            task_name: task.to_string(),
            output_dir: Some(dir.to_string_lossy().into_owned()),
            vps,
        }
    }

    #[test]
    fn test_report_path() {
        let dir = Path::new("/tmp/out");
        assert_eq!(report_path(dir, "1001 WB.xlsx"), dir.join("1001 WB.xlsx"));
        assert_eq!(report_path(dir, "1001 WB"), dir.join("1001 WB.xlsx"));
        assert_eq!(report_path(dir, "a/b\\c"), dir.join("a_b_c.xlsx"));
    }

    #[test]
    fn test_download_writes_compound_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi {
            download: Some(compound()),
            ..FakeApi::default()
        });
        let exec = DownloadExecutor::new(api, DownloadConfig::default());

        let result = exec.execute(&request("1001 WB.xlsx", dir.path(), false)).unwrap();
        assert_eq!(result.kind, ReportKind::Compound);
        assert_eq!(result.summary_rows, 1);
        assert_eq!(result.time_info.duration_secs, Some(1800));

        let workbook: Xlsx<_> = open_workbook(&result.path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["Время работы", "Краткий отчет", "Полный отчет"]
        );
    }

    #[test]
    fn test_vps_download_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi {
            vps: Some(VpsDataResponse {
                success: true,
                data: records(vec![json!({"id": 7, "artikul": "X", "shk": "460"})]),
            }),
            ..FakeApi::default()
        });
        let exec = DownloadExecutor::new(api, DownloadConfig::default());

        let result = exec.execute(&request("ВПС 5", dir.path(), true)).unwrap();
        assert_eq!(result.kind, ReportKind::Flat);
        assert!(result.path.ends_with("ВПС 5.xlsx"));
    }

    #[test]
    fn test_blank_task_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let exec = DownloadExecutor::new(Arc::new(FakeApi::default()), DownloadConfig::default());
        let err = exec.execute(&request("  ", dir.path(), false)).unwrap_err();
        assert!(matches!(err, PackerError::NoTaskSelected));
    }

    #[test]
    fn test_render_offline() {
        let dir = tempfile::tempdir().unwrap();
        let exec = DownloadExecutor::new(Arc::new(FakeApi::default()), DownloadConfig::default());
        let dir_str = dir.path().to_string_lossy().into_owned();

        let result = exec.render("1001 WB", compound(), Some(&dir_str)).unwrap();
        assert!(result.path.ends_with("1001 WB.xlsx"));
        assert!(Path::new(&result.path).exists());
    }
}
