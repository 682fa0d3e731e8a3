//! Группировка по полям и итоги по артикулу

use contracts::shared::{Record, RecordSet};
use serde_json::Value;
use std::collections::HashMap;

use super::values::{is_falsy, number_of, number_value, sum_nonzero, text_of};

/// Число строк в группе для `group_data`
pub const GROUP_RECORDS: &str = "Количество_записей";
/// Сумма «Итог Заказ» по артикулу
pub const ORDER_TOTAL: &str = "Всего в заказе";
/// Число строк артикула
pub const ARTICLE_RECORDS: &str = "Количество записей";

const NO_ARTICLE: &str = "Без артикула";

/// Всегда суммируются при группировке по полям
const KNOWN_NUMERIC: [&str; 8] = [
    "Itog_Zakaz",
    "SOH",
    "Kol_vo_Syrya",
    "Итог Заказ",
    "Количество товаров",
    "itog_zakaz",
    "soh",
    "kol_vo_syrya",
];

const ARTICLE_SUMS: [&str; 11] = [
    "Итог Заказ",
    "Itog_Zakaz",
    "itog_zakaz",
    "Количество товаров",
    "Kol_vo_Syrya",
    "kol_vo_syrya",
    "SOH",
    "soh",
    "Всего в заказе",
    "Vsego_v_zakaze",
    "vsego_v_zakaze",
];

const ORDER_FIELDS: [&str; 3] = ["Итог Заказ", "Itog_Zakaz", "itog_zakaz"];

/// Группы в порядке первого появления ключа
fn collect_groups<'a>(set: &'a RecordSet, key: impl Fn(&Record) -> String) -> Vec<Vec<&'a Record>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Record>> = Vec::new();
    for row in &set.rows {
        let slot = *index.entry(key(row)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }
    groups
}

fn numeric_cell(value: &Value) -> bool {
    !value.is_null() && value.as_str() != Some("") && number_of(value).is_some()
}

/// Одна строка на сочетание значений `group_by`.
///
/// Числовые поля (известные и числовые в первой строке группы) суммируются,
/// остальные берутся из первой строки. Добавляется `Количество_записей`.
pub fn group_data(set: &RecordSet, group_by: &[String]) -> RecordSet {
    if group_by.is_empty() {
        return set.clone();
    }

    let groups = collect_groups(set, |row| {
        group_by
            .iter()
            .map(|f| {
                let v = RecordSet::get(row, f);
                if is_falsy(v) {
                    String::new()
                } else {
                    text_of(v)
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    });

    let rows: Vec<Record> = groups
        .into_iter()
        .map(|group| {
            let first = group[0];
            let mut out = Record::new();
            for field in group_by {
                out.insert(field.clone(), RecordSet::get(first, field).clone());
            }

            let numeric: Vec<&str> = KNOWN_NUMERIC
                .iter()
                .copied()
                .chain(first.iter().filter(|(_, v)| numeric_cell(v)).map(|(k, _)| k.as_str()))
                .collect();

            let fields = first
                .keys()
                .map(String::as_str)
                .chain(KNOWN_NUMERIC.iter().copied().filter(|k| !first.contains_key(*k)));
            for field in fields {
                if group_by.iter().any(|g| g == field) {
                    continue;
                }
                if numeric.contains(&field) {
                    match sum_nonzero(group.iter().filter_map(|r| r.get(field))) {
                        Some(total) => {
                            out.insert(field.to_string(), number_value(total));
                        }
                        None => {
                            if let Some(v) = first.get(field) {
                                out.insert(field.to_string(), v.clone());
                            }
                        }
                    }
                } else if let Some(v) = first.get(field) {
                    out.insert(field.to_string(), v.clone());
                }
            }

            out.insert(GROUP_RECORDS.to_string(), Value::from(group.len() as u64));
            out
        })
        .collect();

    tracing::debug!("Grouping by {}: {} → {} rows", group_by.join(", "), set.len(), rows.len());
    RecordSet::from_rows(rows)
}

/// Поле артикула строки: содержит «артикул», «article» или «sku», либо `Artikul`
fn article_field(row: &Record) -> Option<&str> {
    row.keys().map(String::as_str).find(|key| {
        let lower = key.to_lowercase();
        lower.contains("артикул") || lower.contains("article") || lower.contains("sku") || lower == "artikul"
    })
}

/// Одна строка на артикул: основа из первой строки, количества суммируются,
/// добавляются «Всего в заказе» и «Количество записей»
pub fn group_by_article(set: &RecordSet) -> RecordSet {
    if set.is_empty() {
        return set.clone();
    }

    let groups = collect_groups(set, |row| {
        match article_field(row).map(|f| RecordSet::get(row, f)) {
            Some(v) if !is_falsy(v) => text_of(v),
            _ => NO_ARTICLE.to_string(),
        }
    });

    let rows: Vec<Record> = groups
        .into_iter()
        .map(|group| {
            let mut base = group[0].clone();
            for field in ARTICLE_SUMS {
                if let Some(total) = sum_nonzero(group.iter().filter_map(|r| r.get(field))) {
                    base.insert(field.to_string(), number_value(total));
                }
            }

            let order_total = sum_nonzero(group.iter().filter_map(|r| {
                ORDER_FIELDS
                    .iter()
                    .map(|f| RecordSet::get(r, f))
                    .find(|v| !is_falsy(v))
            }))
            .unwrap_or(0.0);
            base.insert(ORDER_TOTAL.to_string(), number_value(order_total));
            base.insert(ARTICLE_RECORDS.to_string(), Value::from(group.len() as u64));
            base
        })
        .collect();

    tracing::debug!("Grouping by article: {} → {} rows", set.len(), rows.len());
    RecordSet::from_rows(rows)
}
