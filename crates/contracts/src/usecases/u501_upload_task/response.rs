use serde::{Deserialize, Serialize};

use super::progress::UploadStatus;

/// Итог выгрузки задания
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub status: UploadStatus,
    /// Имя файла, оно же название задания
    pub task_name: String,
    pub prefix: String,
    pub rows_uploaded: usize,
    pub retries: usize,
}
