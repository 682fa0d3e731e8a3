//! Чтение исходных таблиц и запись отчётов Excel

pub mod reader;
pub mod time_info;
pub mod writer;

pub use reader::{read_first_sheet, RawCell, Sheet, SpreadsheetRow};
pub use writer::{write_workbook, SheetData};
