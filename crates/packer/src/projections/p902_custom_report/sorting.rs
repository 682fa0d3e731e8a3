use contracts::shared::{Record, RecordSet};
use contracts::usecases::u504_custom_report::{ReportSort, SortDirection};
use serde_json::Value;
use std::cmp::Ordering;

use super::values::{date_of, number_of, text_of};

/// Многоключевая устойчивая сортировка; пустые значения идут первыми при `asc`
pub fn apply_sorting(set: &mut RecordSet, sorting: &[ReportSort]) {
    if sorting.is_empty() {
        return;
    }
    set.rows.sort_by(|a, b| compare_rows(a, b, sorting));
}

fn compare_rows(a: &Record, b: &Record, sorting: &[ReportSort]) -> Ordering {
    for sort in sorting {
        let ord = compare_values(RecordSet::get(a, &sort.field), RecordSet::get(b, &sort.field));
        let ord = match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Числа, затем даты, затем текст без учёта регистра
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let blank = |v: &Value| v.as_str() == Some("");
    if !blank(a) && !blank(b) {
        if let (Some(x), Some(y)) = (number_of(a), number_of(b)) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
    }

    if let (Some(x), Some(y)) = (date_of(a), date_of(b)) {
        return x.cmp(&y);
    }

    let (x, y) = (text_of(a), text_of(b));
    x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(&y))
}
