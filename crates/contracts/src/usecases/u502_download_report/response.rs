use serde::{Deserialize, Serialize};

use crate::enums::ReportKind;
use crate::shared::{Record, TimeWorkedSummary};

/// Ответ `GET /download?task=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadDataResponse {
    /// Детальный набор (краткий отчёт)
    #[serde(rename = "dataSet1", default)]
    pub data_set1: Vec<Record>,

    /// Сводный набор (полный отчёт), только для составных отчётов
    #[serde(rename = "dataSet2", default, skip_serializing_if = "Option::is_none")]
    pub data_set2: Option<Vec<Record>>,

    #[serde(rename = "reportKind", default, skip_serializing_if = "Option::is_none")]
    pub report_kind: Option<ReportKind>,
}

/// Ответ `GET /downloadData?task=` (задания ВПС)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpsDataResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Record>,
}

/// Результат сохранения отчёта на диск
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub task_name: String,
    pub path: String,
    pub kind: ReportKind,
    pub detail_rows: usize,
    pub summary_rows: usize,
    pub time_info: TimeWorkedSummary,
    /// Колонки, оставленные в отчёте под исходными именами
    #[serde(default)]
    pub unmapped_columns: Vec<String>,
}
