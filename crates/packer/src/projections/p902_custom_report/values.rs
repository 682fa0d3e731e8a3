use chrono::NaiveDateTime;
use serde_json::{Number, Value};

use crate::shared::excel::time_info::parse_timestamp;
use crate::shared::excel::writer::cell_text;

/// Числовое значение ячейки. Пустая строка считается нулём, `null` числом не считается
pub(crate) fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Some(0.0);
            }
            t.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join(","),
        Value::Bool(b) => b.to_string(),
        other => cell_text(other),
    }
}

pub(crate) fn lower_text(value: &Value) -> String {
    text_of(value).to_lowercase()
}

/// `null`, пустая строка, ноль и `false`
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        _ => false,
    }
}

pub(crate) fn date_of(value: &Value) -> Option<NaiveDateTime> {
    value.as_str().and_then(parse_timestamp)
}

/// Целые суммы пишутся без дробной части
pub(crate) fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return Value::from(f as i64);
    }
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Сумма ненулевых числовых значений поля; `None`, если таких нет
pub(crate) fn sum_nonzero<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Value>,
{
    let numbers: Vec<f64> = values
        .into_iter()
        .filter(|v| !v.is_null())
        .filter_map(number_of)
        .filter(|n| *n != 0.0)
        .collect();
    (!numbers.is_empty()).then(|| numbers.iter().sum::<f64>())
}
