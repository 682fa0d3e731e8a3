use contracts::enums::SchemaId;
use thiserror::Error;

/// Ошибки ядра Packer
#[derive(Debug, Error)]
pub enum PackerError {
    #[error("spreadsheet has no data rows")]
    EmptyFile,

    #[error("warehouse is not selected")]
    NoWarehouse,

    #[error("task is not selected")]
    NoTaskSelected,

    #[error("no data for task: {0}")]
    NoData(String),

    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("unreadable spreadsheet: {0}")]
    UnreadableSpreadsheet(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("schema {0} has no upload endpoint")]
    NotUploadable(SchemaId),

    #[error("invalid report template: {0}")]
    InvalidReportConfig(String),

    #[error("cancelled by operator")]
    Cancelled,
}

pub type PackerResult<T> = Result<T, PackerError>;

impl PackerError {
    /// Сбой, после которого строку можно отправить повторно
    pub fn is_transient(&self) -> bool {
        matches!(self, PackerError::Http { .. } | PackerError::Network(_))
    }

    /// Сообщение для оператора
    pub fn user_message(&self) -> String {
        match self {
            PackerError::EmptyFile => "Файл пустой.".to_string(),
            PackerError::NoWarehouse => "Пожалуйста, выберите склад.".to_string(),
            PackerError::NoTaskSelected => "Пожалуйста, выберите задание из списка!".to_string(),
            PackerError::NoData(task) => format!("Нет данных для задания {}.", task),
            PackerError::Http { status, .. } => format!("Сервер вернул ошибку: {}", status),
            PackerError::Network(e) => format!("Ошибка сети: {}", e),
            PackerError::MissingColumns(cols) => {
                format!("Отсутствуют необходимые колонки: {}", cols.join(", "))
            }
            PackerError::UnreadableSpreadsheet(e) => format!("Не удалось прочитать файл: {}", e),
            PackerError::Json(e) => format!("Некорректный ответ сервера: {}", e),
            PackerError::Io(e) => format!("Ошибка файловой системы: {}", e),
            PackerError::Xlsx(e) => format!("Не удалось сохранить Excel-файл: {}", e),
            PackerError::NotUploadable(schema) => {
                format!("Схема «{}» не предназначена для выгрузки.", schema.display_name())
            }
            PackerError::InvalidReportConfig(e) => format!("Ошибка в настройке отчёта: {}", e),
            PackerError::Cancelled => "Загрузка отменена, данные удалены с сервера.".to_string(),
        }
    }
}

impl From<reqwest::Error> for PackerError {
    fn from(e: reqwest::Error) -> Self {
        PackerError::Network(e.to_string())
    }
}

impl From<calamine::XlsxError> for PackerError {
    fn from(e: calamine::XlsxError) -> Self {
        PackerError::UnreadableSpreadsheet(e.to_string())
    }
}
