use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;

use crate::shared::error::{PackerError, PackerResult};

/// Сырое значение ячейки исходной таблицы
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawCell {
    /// Пусто, пробелы, "nan"/"NaN"
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => {
                let t = s.trim();
                t.is_empty() || t == "nan" || t == "NaN"
            }
            RawCell::Number(n) => n.is_nan(),
            RawCell::Bool(_) => false,
        }
    }
}

/// Строка таблицы: заголовок → ячейка, в порядке колонок
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadsheetRow {
    cells: Vec<(String, RawCell)>,
}

impl SpreadsheetRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, cell: RawCell) {
        self.cells.push((label.into(), cell));
    }

    pub fn with(mut self, label: impl Into<String>, cell: RawCell) -> Self {
        self.push(label, cell);
        self
    }

    /// Первая ячейка с таким заголовком
    pub fn get(&self, label: &str) -> Option<&RawCell> {
        self.cells.iter().find(|(l, _)| l == label).map(|(_, c)| c)
    }

    pub fn has(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, c)| c.is_blank())
    }
}

/// Первый лист книги: заголовки + строки данных
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<SpreadsheetRow>,
}

impl Sheet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Читает первый лист .xlsx, первая строка содержит заголовки.
/// Полностью пустые строки пропускаются.
pub fn read_first_sheet(path: &Path) -> PackerResult<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PackerError::UnreadableSpreadsheet("workbook has no sheets".into()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_label).collect(),
        None => return Ok(Sheet::default()),
    };

    let mut sheet = Sheet {
        headers: headers.clone(),
        rows: Vec::new(),
    };

    for row in rows {
        let mut record = SpreadsheetRow::new();
        for (idx, label) in headers.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            let cell = row.get(idx).map(to_raw_cell).unwrap_or(RawCell::Empty);
            record.push(label.clone(), cell);
        }
        if !record.is_blank() {
            sheet.rows.push(record);
        }
    }

    tracing::info!(
        "Read {} rows, {} columns from sheet '{}' of {}",
        sheet.rows.len(),
        sheet.headers.len(),
        sheet_name,
        path.display()
    );

    Ok(sheet)
}

fn header_label(cell: &Data) -> String {
    match to_raw_cell(cell) {
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
        RawCell::Number(n) => n.to_string(),
        RawCell::Bool(b) => b.to_string(),
        RawCell::Empty => String::new(),
    }
}

fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(value) => RawCell::Text(format_excel_datetime(value)),
            None => RawCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
    }
}

/// Серийная дата Excel (база 1899-12-30) → дата и время
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(Duration::milliseconds(millis))
}

/// Даты без времени выводятся как `DD.MM.YYYY`, иначе `YYYY-MM-DD HH:MM:SS`
fn format_excel_datetime(value: NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%d.%m.%Y").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
