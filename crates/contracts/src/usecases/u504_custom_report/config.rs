use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Настройка пользовательского отчёта (шаблон в JSON)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Поля результата по порядку; пусто: все поля
    pub fields: Vec<String>,
    pub filters: Vec<ReportFilter>,
    pub sorting: Vec<ReportSort>,
    pub group_by: Vec<String>,
    pub date_range: Option<DateRange>,
    /// Одна строка на артикул с итогами заказа
    pub group_by_article: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub field: String,
    pub operator: FilterOperator,
    /// Для `between` пара [min, max], для `in` список или одно значение
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Без учёта регистра
    Equals,
    /// Подстрока без учёта регистра
    Contains,
    Greater,
    Less,
    /// Включительно с обеих сторон
    Between,
    In,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSort {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Диапазон дат `YYYY-MM-DD`, обе границы включаются целыми днями
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}
