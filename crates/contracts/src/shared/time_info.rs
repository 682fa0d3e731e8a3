use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Сводка «время работы с заданием», вычисляется при каждой выгрузке отчёта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWorkedSummary {
    pub task_name: String,
    pub total_rows: usize,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    /// Длительность в секундах (конец − начало)
    pub duration_secs: Option<i64>,
}

impl TimeWorkedSummary {
    pub fn empty(task_name: impl Into<String>, total_rows: usize) -> Self {
        Self {
            task_name: task_name.into(),
            total_rows,
            started_at: None,
            finished_at: None,
            duration_secs: None,
        }
    }
}
