use chrono::{NaiveDate, NaiveDateTime};
use contracts::shared::{Record, RecordSet};
use contracts::usecases::u504_custom_report::{DateRange, FilterOperator, ReportFilter};
use serde_json::Value;

use super::values::{date_of, lower_text, number_of};
use crate::shared::error::{PackerError, PackerResult};

/// Поля с датами, по которым работает диапазон
pub const DATE_FIELDS: [&str; 7] = [
    "time_start",
    "Time_Start",
    "time_end",
    "Time_End",
    "Srok_Godnosti",
    "created_at",
    "updated_at",
];

/// Строка проходит, только если выполнены все фильтры
pub fn apply_filters(set: &mut RecordSet, filters: &[ReportFilter]) {
    if filters.is_empty() {
        return;
    }
    let before = set.len();
    set.retain_rows(|row| filters.iter().all(|f| matches(row, f)));
    tracing::debug!("Filters: {} → {} rows", before, set.len());
}

fn matches(row: &Record, filter: &ReportFilter) -> bool {
    let value = RecordSet::get(row, &filter.field);
    let expected = &filter.value;

    // пустое значение находит только `equals` с пустым образцом
    if value.is_null() {
        return filter.operator == FilterOperator::Equals
            && (expected.is_null() || expected.as_str() == Some(""));
    }

    match filter.operator {
        FilterOperator::Equals => lower_text(value) == lower_text(expected),
        FilterOperator::Contains => lower_text(value).contains(&lower_text(expected)),
        FilterOperator::Greater => compare(value, expected, |v, e| v > e),
        FilterOperator::Less => compare(value, expected, |v, e| v < e),
        FilterOperator::Between => match expected.as_array().map(Vec::as_slice) {
            Some([min, max]) => match (number_of(value), number_of(min), number_of(max)) {
                (Some(v), Some(lo), Some(hi)) => v >= lo && v <= hi,
                _ => false,
            },
            _ => false,
        },
        FilterOperator::In => match expected {
            Value::Array(items) => items.iter().any(|item| lower_text(value) == lower_text(item)),
            single => lower_text(value) == lower_text(single),
        },
    }
}

fn compare(value: &Value, expected: &Value, op: impl Fn(f64, f64) -> bool) -> bool {
    match (number_of(value), number_of(expected)) {
        (Some(v), Some(e)) => op(v, e),
        _ => false,
    }
}

/// Диапазон дат по полям `DATE_FIELDS`.
///
/// Строка остаётся, если хотя бы одна её дата в диапазоне или дат нет вовсе.
pub fn apply_date_range(set: &mut RecordSet, range: &DateRange) -> PackerResult<()> {
    let from = bound(range.from.as_deref(), 0, 0, 0)?;
    let to = bound(range.to.as_deref(), 23, 59, 59)?;
    if from.is_none() && to.is_none() {
        return Ok(());
    }

    let before = set.len();
    set.retain_rows(|row| {
        let dates: Vec<NaiveDateTime> = DATE_FIELDS
            .iter()
            .filter_map(|f| date_of(RecordSet::get(row, f)))
            .collect();
        dates.is_empty()
            || dates
                .iter()
                .any(|d| from.map_or(true, |f| *d >= f) && to.map_or(true, |t| *d <= t))
    });
    tracing::debug!("Date range: {} → {} rows", before, set.len());
    Ok(())
}

fn bound(raw: Option<&str>, h: u32, m: u32, s: u32) -> PackerResult<Option<NaiveDateTime>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(h, m, s))
        .map(Some)
        .ok_or_else(|| PackerError::InvalidReportConfig(format!("дата «{}» не в формате ГГГГ-ММ-ДД", raw)))
}
