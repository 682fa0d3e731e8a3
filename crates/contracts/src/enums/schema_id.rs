use serde::{Deserialize, Serialize};

use super::NormalizerPreset;

/// Идентификатор схемы колонок (таблица соответствий «поле ↔ заголовок»)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaId {
    /// Базовая выгрузка оператора (`/upload-data`)
    BasicUpload,
    /// Расширенная выгрузка веб-клиента (`/upload-data-new`)
    ExtendedUpload,
    /// Выгрузка задания менеджера задач (`/uploadData`)
    TaskUpload,
    /// Выгрузка ВПС (`/uploadWPS`)
    VpsUpload,
    /// Переименование колонок отчёта WB
    WbReport,
    /// Переименование колонок отчёта ВПС
    VpsReport,
}

impl SchemaId {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaId::BasicUpload => "basic",
            SchemaId::ExtendedUpload => "extended",
            SchemaId::TaskUpload => "task",
            SchemaId::VpsUpload => "vps",
            SchemaId::WbReport => "wb-report",
            SchemaId::VpsReport => "vps-report",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SchemaId::BasicUpload => "Базовая выгрузка",
            SchemaId::ExtendedUpload => "Расширенная выгрузка",
            SchemaId::TaskUpload => "Выгрузка задания",
            SchemaId::VpsUpload => "Выгрузка ВПС",
            SchemaId::WbReport => "Отчёт WB",
            SchemaId::VpsReport => "Отчёт ВПС",
        }
    }

    pub fn all() -> Vec<SchemaId> {
        vec![
            SchemaId::BasicUpload,
            SchemaId::ExtendedUpload,
            SchemaId::TaskUpload,
            SchemaId::VpsUpload,
            SchemaId::WbReport,
            SchemaId::VpsReport,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    /// Путь POST-эндпоинта для построчной выгрузки; `None` для схем отчётов
    pub fn upload_endpoint(&self) -> Option<&'static str> {
        match self {
            SchemaId::BasicUpload => Some("/upload-data"),
            SchemaId::ExtendedUpload => Some("/upload-data-new"),
            SchemaId::TaskUpload => Some("/uploadData"),
            SchemaId::VpsUpload => Some("/uploadWPS"),
            SchemaId::WbReport | SchemaId::VpsReport => None,
        }
    }

    /// Политика нормализации по умолчанию для эндпоинта
    pub fn default_preset(&self) -> NormalizerPreset {
        match self {
            SchemaId::BasicUpload => NormalizerPreset::Legacy,
            SchemaId::ExtendedUpload => NormalizerPreset::Web,
            _ => NormalizerPreset::Passthrough,
        }
    }

    /// Нужен ли код склада (`Scklad_Pref`) в каждой строке
    pub fn requires_warehouse(&self) -> bool {
        matches!(self, SchemaId::BasicUpload | SchemaId::ExtendedUpload)
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrip() {
        for schema in SchemaId::all() {
            assert_eq!(SchemaId::from_code(schema.code()), Some(schema));
        }
        assert_eq!(SchemaId::from_code("nope"), None);
    }

    #[test]
    fn test_report_schemas_have_no_endpoint() {
        assert!(SchemaId::WbReport.upload_endpoint().is_none());
        assert_eq!(SchemaId::ExtendedUpload.upload_endpoint(), Some("/upload-data-new"));
    }
}
