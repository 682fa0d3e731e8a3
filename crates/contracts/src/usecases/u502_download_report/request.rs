use serde::{Deserialize, Serialize};

/// Запрос на формирование Excel-отчёта по заданию
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Название задания (обычно имя исходного файла с .xlsx)
    pub task_name: String,

    /// Каталог сохранения, иначе каталог из конфигурации
    pub output_dir: Option<String>,

    /// Задание ВПС: данные берутся из `/downloadData`
    #[serde(default)]
    pub vps: bool,
}
