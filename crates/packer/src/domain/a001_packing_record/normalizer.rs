use contracts::enums::NormalizerPreset;
use serde_json::Value;

use super::schemas::FieldKind;
use crate::shared::excel::RawCell;

pub const MARKER: &str = "V";

/// Результат нормализации одной ячейки
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Null,
    Integer(i64),
    Text(String),
}

impl NormalizedValue {
    pub fn into_json(self) -> Value {
        match self {
            NormalizedValue::Null => Value::Null,
            NormalizedValue::Integer(i) => Value::from(i),
            NormalizedValue::Text(s) => Value::String(s),
        }
    }

    fn marker() -> Self {
        NormalizedValue::Text(MARKER.to_string())
    }
}

/// Как кодируется отметка "V"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEncoding {
    /// "V"
    Literal,
    /// 1
    Integer,
    /// "1"
    Text,
}

/// Что делать с числом в колонке операции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericHandling {
    /// Целая часть строкой: "5.0" → "5"
    Truncate,
    ForceMarker,
}

/// Что делать с прочим текстом в колонке операции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFallback {
    ForceMarker,
    PassThrough,
}

/// Политика нормализации флагов операций для конкретного эндпоинта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerPolicy {
    pub marker: MarkerEncoding,
    pub numeric: NumericHandling,
    pub text: TextFallback,
}

impl NormalizerPolicy {
    pub const fn passthrough() -> Self {
        Self {
            marker: MarkerEncoding::Literal,
            numeric: NumericHandling::Truncate,
            text: TextFallback::PassThrough,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            marker: MarkerEncoding::Integer,
            numeric: NumericHandling::Truncate,
            text: TextFallback::ForceMarker,
        }
    }

    pub const fn web() -> Self {
        Self {
            marker: MarkerEncoding::Text,
            numeric: NumericHandling::Truncate,
            text: TextFallback::PassThrough,
        }
    }

    pub const fn strict_marker() -> Self {
        Self {
            marker: MarkerEncoding::Literal,
            numeric: NumericHandling::ForceMarker,
            text: TextFallback::ForceMarker,
        }
    }
}

impl From<NormalizerPreset> for NormalizerPolicy {
    fn from(preset: NormalizerPreset) -> Self {
        match preset {
            NormalizerPreset::Passthrough => Self::passthrough(),
            NormalizerPreset::Legacy => Self::legacy(),
            NormalizerPreset::Web => Self::web(),
            NormalizerPreset::StrictMarker => Self::strict_marker(),
        }
    }
}

/// Нормализация значения колонки операции
pub fn normalize(raw: &RawCell, policy: &NormalizerPolicy) -> NormalizedValue {
    if raw.is_blank() {
        return NormalizedValue::Null;
    }

    let text = match raw {
        RawCell::Number(n) => return numeric(*n, policy),
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Bool(true) => "True".to_string(),
        RawCell::Bool(false) => "False".to_string(),
        RawCell::Empty => return NormalizedValue::Null,
    };

    if text == MARKER {
        return match policy.marker {
            MarkerEncoding::Literal => NormalizedValue::marker(),
            MarkerEncoding::Integer => NormalizedValue::Integer(1),
            MarkerEncoding::Text => NormalizedValue::Text("1".to_string()),
        };
    }

    if let Ok(n) = text.parse::<f64>() {
        if n.is_finite() {
            return numeric(n, policy);
        }
    }

    match policy.text {
        TextFallback::ForceMarker => NormalizedValue::marker(),
        TextFallback::PassThrough => NormalizedValue::Text(text),
    }
}

fn numeric(n: f64, policy: &NormalizerPolicy) -> NormalizedValue {
    match policy.numeric {
        NumericHandling::Truncate => NormalizedValue::Text(format!("{}", n.trunc() as i64)),
        NumericHandling::ForceMarker => NormalizedValue::marker(),
    }
}

/// Приведение ячейки к значению поля по его виду.
/// `None`: колонки с таким заголовком в строке нет.
pub fn apply_kind(raw: Option<&RawCell>, kind: FieldKind, policy: &NormalizerPolicy) -> Value {
    let cell = match raw {
        Some(cell) if !cell.is_blank() => cell,
        _ => {
            return match kind {
                FieldKind::Stringified => Value::String(String::new()),
                _ => Value::Null,
            };
        }
    };

    match kind {
        FieldKind::Plain => plain(cell),
        FieldKind::Flag => normalize(cell, policy).into_json(),
        FieldKind::MarkerOnly => match cell {
            RawCell::Text(s) if s.trim() == MARKER => Value::from(MARKER),
            _ => Value::Null,
        },
        FieldKind::RawMaterialCode | FieldKind::Stringified => Value::String(stringify(cell)),
    }
}

fn plain(cell: &RawCell) -> Value {
    match cell {
        RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => Value::from(*n as i64),
        RawCell::Number(n) => Value::from(*n),
        RawCell::Text(s) => Value::String(s.clone()),
        RawCell::Bool(b) => Value::Bool(*b),
        RawCell::Empty => Value::Null,
    }
}

/// Числа с нулевой дробной частью без ".0", остальное как есть
pub fn stringify(cell: &RawCell) -> String {
    match cell {
        RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => format!("{}", *n as i64),
        RawCell::Number(n) => n.to_string(),
        RawCell::Text(s) => s.clone(),
        RawCell::Bool(b) => b.to_string(),
        RawCell::Empty => String::new(),
    }
}
