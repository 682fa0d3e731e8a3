use chrono::{DateTime, NaiveDate, NaiveDateTime};
use contracts::shared::{RecordSet, TimeWorkedSummary};
use serde_json::Value;

use crate::shared::format::format_duration;

pub const START_COLUMNS: [&str; 3] = ["Начало", "Time_Start", "time_start"];
pub const END_COLUMNS: [&str; 3] = ["Окончание", "Time_End", "time_end"];

pub const SHEET_NAME: &str = "Время работы";
const NO_DATA: &str = "Нет данных";

/// Форматы с явным порядком полей, проверяются по очереди
const EXPLICIT_FORMATS: [&str; 4] = [
    "%H:%M:%S %d.%m.%Y",
    "%m-%d-%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Разбор отметки времени из ответа сервера
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in EXPLICIT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // best effort
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Сводка времени работы по набору записей.
///
/// Сначала просматривается детальный набор; если в нём нет колонок
/// начала/окончания или ни одной разобранной отметки, берётся сводный.
pub fn summarize(task_name: &str, detail: &RecordSet, summary: Option<&RecordSet>) -> TimeWorkedSummary {
    if let Some(info) = scan(task_name, detail) {
        return info;
    }
    if let Some(info) = summary.and_then(|s| scan(task_name, s)) {
        return info;
    }
    tracing::debug!("No parsable work timestamps for task {}", task_name);
    TimeWorkedSummary::empty(task_name, detail.len())
}

fn scan(task_name: &str, set: &RecordSet) -> Option<TimeWorkedSummary> {
    let start_col = START_COLUMNS.iter().find(|c| set.has_column(c))?;
    let end_col = END_COLUMNS.iter().find(|c| set.has_column(c))?;

    let started_at = set
        .rows
        .iter()
        .filter_map(|row| timestamp_of(RecordSet::get(row, start_col)))
        .min()?;
    let finished_at = set
        .rows
        .iter()
        .filter_map(|row| timestamp_of(RecordSet::get(row, end_col)))
        .max()?;

    Some(TimeWorkedSummary {
        task_name: task_name.to_string(),
        total_rows: set.len(),
        started_at: Some(started_at),
        finished_at: Some(finished_at),
        duration_secs: Some((finished_at - started_at).num_seconds()),
    })
}

fn timestamp_of(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Строки листа «Время работы»
pub fn sheet_rows(info: &TimeWorkedSummary) -> Vec<Vec<Value>> {
    let stamp = |dt: Option<NaiveDateTime>| {
        dt.map(|d| d.format("%d.%m.%Y %H:%M:%S").to_string())
            .unwrap_or_else(|| NO_DATA.to_string())
    };
    let duration = info
        .duration_secs
        .map(format_duration)
        .unwrap_or_else(|| NO_DATA.to_string());

    vec![
        vec![Value::from("Информация о времени работы с заданием")],
        vec![Value::from("Название задания:"), Value::from(info.task_name.clone())],
        vec![Value::from("Количество строк:"), Value::from(info.total_rows as u64)],
        vec![Value::from("Начало работы:"), Value::from(stamp(info.started_at))],
        vec![Value::from("Окончание работы:"), Value::from(stamp(info.finished_at))],
        vec![Value::from("Общее время работы:"), Value::from(duration)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::Record;
    use serde_json::json;

    fn set(rows: Vec<Value>) -> RecordSet {
        RecordSet::from_rows(
            rows.into_iter()
                .map(|v| match v {
                    Value::Object(m) => m,
                    _ => Record::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_parse_formats_in_order() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        assert_eq!(parse_timestamp("14:07:09 05.03.2024"), Some(expected));
        assert_eq!(parse_timestamp("03-05-2024 14:07:09"), Some(expected));
        assert_eq!(parse_timestamp("05.03.2024 14:07:09"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 14:07:09"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T14:07:09.250"), expected.checked_add_signed(chrono::Duration::milliseconds(250)));
        assert_eq!(parse_timestamp("вчера"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn test_summarize_min_start_max_end() {
        let detail = set(vec![
            json!({"Artikul": "A", "Time_Start": "10:00:00 01.02.2024", "Time_End": "10:30:00 01.02.2024"}),
            json!({"Artikul": "B", "Time_Start": "09:15:00 01.02.2024", "Time_End": "11:45:30 01.02.2024"}),
            json!({"Artikul": "C", "Time_Start": null, "Time_End": "мусор"}),
        ]);
        let info = summarize("1001 WB.xlsx", &detail, None);
        assert_eq!(info.total_rows, 3);
        assert_eq!(info.duration_secs, Some(2 * 3600 + 30 * 60 + 30));

        let rows = sheet_rows(&info);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[3][1], json!("01.02.2024 09:15:00"));
        assert_eq!(rows[5][1], json!("2:30:30"));
    }

    #[test]
    fn test_summary_used_when_detail_has_no_times() {
        let detail = set(vec![json!({"Artikul": "A"})]);
        let summary = set(vec![json!({"Начало": "2024-01-01 08:00:00", "Окончание": "2024-01-01 09:00:00"})]);
        let info = summarize("t", &detail, Some(&summary));
        assert_eq!(info.duration_secs, Some(3600));
        assert_eq!(info.total_rows, 1);
    }

    #[test]
    fn test_placeholders_without_times() {
        let info = summarize("t", &set(vec![json!({"Artikul": "A"})]), None);
        let rows = sheet_rows(&info);
        assert_eq!(rows[3][1], json!("Нет данных"));
        assert_eq!(rows[5][1], json!("Нет данных"));
        assert_eq!(rows[2][1], json!(1));
    }
}
