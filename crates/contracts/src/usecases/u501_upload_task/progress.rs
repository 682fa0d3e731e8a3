use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Текущий прогресс выгрузки задания
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadProgress {
    pub session_id: String,
    pub status: UploadStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Отправлено строк
    pub processed: i32,
    pub total: Option<i32>,
    /// Повторные попытки по всем строкам
    pub retries: i32,

    /// Текущая строка, например "строка 3"
    pub current_item: Option<String>,

    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Running,
    Completed,
    /// Отменено оператором, данные на сервере удалены
    Cancelled,
    Failed,
}

impl UploadProgress {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: UploadStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
            processed: 0,
            total: None,
            retries: 0,
            current_item: None,
            error_messages: Vec::new(),
        }
    }

    /// Доля выполнения 0..=100
    pub fn percent(&self) -> f64 {
        match self.total {
            Some(total) if total > 0 => f64::from(self.processed) * 100.0 / f64::from(total),
            _ => 0.0,
        }
    }
}
