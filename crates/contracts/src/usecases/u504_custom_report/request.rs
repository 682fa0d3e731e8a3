use serde::{Deserialize, Serialize};

use super::config::ReportConfig;

/// Какой набор ответа `/download` обрабатывать
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// `dataSet1`
    #[default]
    Detail,
    /// `dataSet2`, если сервер его вернул
    Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomReportRequest {
    pub task_name: String,
    pub config: ReportConfig,
    #[serde(default)]
    pub source: ReportSource,
    pub output_dir: Option<String>,
}

/// Результат сохранения пользовательского отчёта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomReportResult {
    pub task_name: String,
    pub path: String,
    pub source_rows: usize,
    pub rows: usize,
    pub columns: Vec<String>,
}
