use serde::{Deserialize, Serialize};

use crate::enums::{NormalizerPreset, SchemaId};

/// Запрос на построчную выгрузку Excel-файла на сервер
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Путь к .xlsx, берётся первый лист
    pub file_path: String,

    /// Схема колонок, определяет эндпоинт
    pub schema: SchemaId,

    /// Код склада (обязателен для схем оператора)
    pub warehouse: Option<String>,

    /// Переопределение политики нормализации для этой выгрузки
    pub preset: Option<NormalizerPreset>,
}

/// Тело `POST /delete-uploaded-data`, откат частично выгруженного задания
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteUploadedDataRequest {
    pub pref: String,
    #[serde(rename = "Nazvanie_Zadaniya")]
    pub task_name: String,
}
