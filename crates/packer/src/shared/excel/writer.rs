use contracts::shared::RecordSet;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;
use std::path::Path;

use crate::shared::error::PackerResult;

/// Максимальная ширина колонки в символах
const MAX_COLUMN_WIDTH: usize = 40;

/// Содержимое одного листа
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub name: String,
    /// Пустой заголовок: лист без строки заголовков, как «Время работы»
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Колонки, значения которых всегда пишутся текстом (штрихкоды)
    pub text_columns: Vec<String>,
}

impl SheetData {
    pub fn from_record_set(name: impl Into<String>, set: &RecordSet) -> Self {
        Self {
            name: name.into(),
            header: set.columns.clone(),
            rows: set
                .ordered_rows()
                .map(|row| row.into_iter().cloned().collect())
                .collect(),
            text_columns: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            rows,
            ..Default::default()
        }
    }

    pub fn with_text_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.text_columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    fn is_text_column(&self, col: usize) -> bool {
        self.header
            .get(col)
            .map(|h| self.text_columns.iter().any(|t| t == h))
            .unwrap_or(false)
    }
}

/// Собирает книгу целиком в памяти и только потом сохраняет файл
pub fn write_workbook(path: &Path, sheets: &[SheetData]) -> PackerResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, &header_format)?;
    }

    workbook.save(path)?;
    tracing::info!("Saved workbook {} ({} sheets)", path.display(), sheets.len());
    Ok(())
}

fn write_sheet(ws: &mut Worksheet, sheet: &SheetData, header_format: &Format) -> PackerResult<()> {
    let mut row_idx: u32 = 0;

    if !sheet.header.is_empty() {
        for (col, title) in sheet.header.iter().enumerate() {
            ws.write_string_with_format(0, col as u16, title, header_format)?;
        }
        row_idx = 1;
    }

    for row in &sheet.rows {
        for (col, value) in row.iter().enumerate() {
            write_cell(ws, row_idx, col as u16, value, sheet.is_text_column(col))?;
        }
        row_idx += 1;
    }

    for (col, width) in column_widths(sheet).into_iter().enumerate() {
        ws.set_column_width(col as u16, width as f64)?;
    }
    Ok(())
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, value: &Value, as_text: bool) -> PackerResult<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) if !as_text => {
            ws.write_boolean(row, col, *b)?;
        }
        Value::Number(n) if !as_text => {
            if let Some(f) = n.as_f64() {
                ws.write_number(row, col, f)?;
            }
        }
        other => {
            ws.write_string(row, col, &cell_text(other))?;
        }
    }
    Ok(())
}

/// Текстовое представление значения; целые без ".0"
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Ширина = длиннейшее значение (или заголовок) + 2, не больше MAX_COLUMN_WIDTH
fn column_widths(sheet: &SheetData) -> Vec<usize> {
    let columns = sheet
        .rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(sheet.header.len()))
        .max()
        .unwrap_or(0);

    (0..columns)
        .map(|col| {
            let header_len = sheet.header.get(col).map(|h| h.chars().count()).unwrap_or(10);
            let longest = sheet
                .rows
                .iter()
                .filter_map(|r| r.get(col))
                .map(|v| cell_text(v).chars().count())
                .max()
                .unwrap_or(0);
            (header_len.max(longest) + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!(4600000000012i64)), "4600000000012");
        assert_eq!(cell_text(&json!(12.0)), "12");
        assert_eq!(cell_text(&json!(1.5)), "1.5");
        assert_eq!(cell_text(&Value::Null), "");
    }

    #[test]
    fn test_column_widths_capped() {
        let sheet = SheetData {
            name: "s".into(),
            header: vec!["ШК".into(), "Название товара".into()],
            rows: vec![vec![json!("1"), json!("x".repeat(100))]],
            text_columns: vec![],
        };
        assert_eq!(column_widths(&sheet), vec![4, 40]);
    }

    #[test]
    fn test_barcodes_written_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let sheet = SheetData {
            name: "Отчет".into(),
            header: vec!["ШК".into(), "Место".into()],
            rows: vec![vec![json!(4600000000012i64), json!(3)]],
            text_columns: vec![],
        }
        .with_text_columns(&["ШК"]);
        let info = SheetData::from_rows("Время работы", vec![vec![json!("Название задания:"), json!("t")]]);

        write_workbook(&path, &[info, sheet]).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Время работы", "Отчет"]);
        let range = workbook.worksheet_range("Отчет").unwrap();
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("4600000000012".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(3.0)));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let sheet = SheetData::from_rows("Отчет", vec![]);
        let result = write_workbook(Path::new("/nonexistent-dir/x/out.xlsx"), &[sheet]);
        assert!(result.is_err());
    }
}
