//! Пользовательский отчёт: фильтры, сортировка, группировка и выбор полей
//! поверх записей задания

pub mod filters;
pub mod grouping;
pub mod processor;
pub mod sorting;
mod values;

pub use filters::{apply_date_range, apply_filters, DATE_FIELDS};
pub use grouping::{group_by_article, group_data, ARTICLE_RECORDS, GROUP_RECORDS, ORDER_TOTAL};
pub use processor::{available_fields, process};
pub use sorting::apply_sorting;
