//! Пересчёт полного отчёта (сводного набора) по детальным строкам.
//!
//! Детальные строки группируются по (артикул, количество товаров, паллет),
//! число строк в группе становится «Местом» сводной строки с той же
//! вложенностью. Затем дубликаты без данных удаляются, колонки приводятся
//! к шаблону.

use contracts::shared::{Record, RecordSet};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::template::apply_template;
use crate::domain::a001_packing_record::column_mapper::standardize;
use crate::shared::error::{PackerError, PackerResult};

const ARTIKUL: &str = "Artikul";
const KOLVO: &str = "Kolvo_Tovarov";
const PALLET: &str = "Pallet_No";
const NESTING: &str = "Vlozhennost";
const PLACE: &str = "Mesto";

/// Исторические написания ключевых колонок
pub const STANDARD_ALIASES: [(&str, &[&str]); 5] = [
    (ARTIKUL, &["Артикул", "Artikul"]),
    (KOLVO, &["Kolvo_Tovarov", "Количество товаров"]),
    (PALLET, &["Паллет №", "Pallet_No"]),
    (NESTING, &["Вложенность"]),
    (PLACE, &["Место"]),
];

const GROUP_KEYS: [&str; 3] = [ARTIKUL, KOLVO, PALLET];
const PLACEMENT: [&str; 3] = [PLACE, NESTING, PALLET];

/// Что делать, если одна пара (артикул, вложенность) лежит на нескольких паллетах
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalletMergePolicy {
    /// Отдельная сводная строка на каждый паллет
    #[default]
    SplitPerPallet,
    /// Одна строка на пару, место и паллет берутся из последней группы
    LastGroupWins,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReshapeOptions {
    pub pallet_merge: PalletMergePolicy,
}

/// Группа детальных строк
#[derive(Debug, Clone)]
struct Group {
    artikul: String,
    kolvo: String,
    pallet: String,
    kolvo_value: Value,
    pallet_value: Value,
    count: usize,
}

/// Пересчитывает сводный набор по детальному.
///
/// Без колонок группировки в детальном наборе возвращает `MissingColumns`.
pub fn reshape(detail: &RecordSet, summary: &RecordSet, options: ReshapeOptions) -> PackerResult<RecordSet> {
    let mut detail = detail.clone();
    let mut summary = summary.clone();
    standardize(&mut detail, &STANDARD_ALIASES);
    standardize(&mut summary, &STANDARD_ALIASES);

    let missing: Vec<String> = GROUP_KEYS
        .iter()
        .filter(|k| !detail.has_column(k))
        .map(|k| k.to_string())
        .collect();
    if !missing.is_empty() {
        tracing::error!("Missing columns in detail set after renaming: {:?}", missing);
        return Err(PackerError::MissingColumns(missing));
    }

    for column in [ARTIKUL, NESTING, PLACE, PALLET] {
        summary.ensure_column(column);
    }

    let groups = group_detail(&detail);
    tracing::debug!("Detail set: {} rows in {} groups", detail.len(), groups.len());

    let appended = match options.pallet_merge {
        PalletMergePolicy::SplitPerPallet => merge_split(&mut summary.rows, &groups),
        PalletMergePolicy::LastGroupWins => merge_last_wins(&mut summary.rows, &groups),
    };
    summary.rows.extend(appended);

    drop_superseded(&mut summary);

    Ok(apply_template(&summary))
}

/// Ключ сравнения: целые без ".0", текст без пробелов по краям, пусто → None
pub(crate) fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            match n.as_f64().and_then(whole_i64) {
                Some(i) => Some(i.to_string()),
                None => Some(n.to_string()),
            }
        }
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return None;
            }
            match t.parse::<f64>().ok().and_then(whole_i64) {
                Some(i) if t.contains('.') => Some(i.to_string()),
                _ => Some(t.to_string()),
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Целое значение дробного числа, если оно без потерь помещается в i64
fn whole_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 == 2^63, граница исключается
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Числа сравниваются как числа, остальное как текст
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

fn key_of(row: &Record, column: &str) -> Option<String> {
    value_key(RecordSet::get(row, column))
}

fn group_detail(detail: &RecordSet) -> Vec<Group> {
    let mut groups: BTreeMap<(String, String, String), Group> = BTreeMap::new();

    for row in &detail.rows {
        let (Some(artikul), Some(kolvo), Some(pallet)) =
            (key_of(row, ARTIKUL), key_of(row, KOLVO), key_of(row, PALLET))
        else {
            continue;
        };

        groups
            .entry((artikul.clone(), kolvo.clone(), pallet.clone()))
            .or_insert_with(|| Group {
                artikul,
                kolvo,
                pallet,
                kolvo_value: RecordSet::get(row, KOLVO).clone(),
                pallet_value: RecordSet::get(row, PALLET).clone(),
                count: 0,
            })
            .count += 1;
    }

    let mut ordered: Vec<Group> = groups.into_values().collect();
    ordered.sort_by(|a, b| {
        compare_keys(&a.artikul, &b.artikul)
            .then_with(|| compare_keys(&a.kolvo, &b.kolvo))
            .then_with(|| compare_keys(&a.pallet, &b.pallet))
    });
    ordered
}

fn matches_item(row: &Record, group: &Group) -> bool {
    key_of(row, ARTIKUL).as_deref() == Some(group.artikul.as_str())
}

fn matches_nesting(row: &Record, group: &Group) -> bool {
    matches_item(row, group) && key_of(row, NESTING).as_deref() == Some(group.kolvo.as_str())
}

fn matches_pallet(row: &Record, group: &Group) -> bool {
    matches_nesting(row, group) && key_of(row, PALLET).as_deref() == Some(group.pallet.as_str())
}

fn apply_group(row: &mut Record, group: &Group) {
    row.insert(PLACE.to_string(), Value::from(group.count as u64));
    row.insert(PALLET.to_string(), group.pallet_value.clone());
}

fn clone_for(template: &Record, group: &Group) -> Record {
    let mut row = template.clone();
    row.insert(NESTING.to_string(), group.kolvo_value.clone());
    apply_group(&mut row, group);
    row
}

/// Одна сводная строка на (артикул, вложенность, паллет).
///
/// Сначала каждая группа занимает строку с точно совпадающим паллетом,
/// затем свободную строку с той же вложенностью, иначе клонируется
/// строка того же артикула.
fn merge_split(rows: &mut [Record], groups: &[Group]) -> Vec<Record> {
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut pending: Vec<&Group> = Vec::new();

    for group in groups {
        let exact = (0..rows.len()).find(|i| !claimed.contains(i) && matches_pallet(&rows[*i], group));
        match exact {
            Some(i) => {
                apply_group(&mut rows[i], group);
                claimed.insert(i);
            }
            None => pending.push(group),
        }
    }

    let mut appended = Vec::new();
    for group in pending {
        let free = (0..rows.len()).find(|i| !claimed.contains(i) && matches_nesting(&rows[*i], group));
        if let Some(i) = free {
            apply_group(&mut rows[i], group);
            claimed.insert(i);
            continue;
        }

        let source = rows
            .iter()
            .find(|r| matches_nesting(r, group))
            .or_else(|| rows.iter().find(|r| matches_item(r, group)));
        match source {
            Some(template) => appended.push(clone_for(template, group)),
            None => tracing::warn!(
                "No summary row for item {} (nesting {}), group skipped",
                group.artikul,
                group.kolvo
            ),
        }
    }
    appended
}

/// Все строки с (артикул, вложенность) получают место и паллет
/// последней по порядку группы.
fn merge_last_wins(rows: &mut [Record], groups: &[Group]) -> Vec<Record> {
    let mut appended: Vec<Record> = Vec::new();

    for group in groups {
        let mut matched = false;
        for row in rows.iter_mut().filter(|r| matches_nesting(r, group)) {
            apply_group(row, group);
            matched = true;
        }
        if matched {
            continue;
        }

        if let Some(pending) = appended.iter_mut().find(|r| matches_nesting(r, group)) {
            apply_group(pending, group);
            continue;
        }

        match rows.iter().find(|r| matches_item(r, group)) {
            Some(template) => appended.push(clone_for(template, group)),
            None => tracing::warn!(
                "No summary row for item {} (nesting {}), group skipped",
                group.artikul,
                group.kolvo
            ),
        }
    }
    appended
}

/// Строки без места, вложенности и паллета удаляются, если у того же
/// артикула есть полностью заполненная строка
fn drop_superseded(summary: &mut RecordSet) {
    fn filled(row: &Record) -> bool {
        PLACEMENT.iter().all(|c| key_of(row, c).is_some())
    }
    fn empty(row: &Record) -> bool {
        PLACEMENT.iter().all(|c| key_of(row, c).is_none())
    }

    let populated: HashSet<String> = summary
        .rows
        .iter()
        .filter(|r| filled(r))
        .filter_map(|r| key_of(r, ARTIKUL))
        .collect();

    let before = summary.len();
    summary.retain_rows(|row| match key_of(row, ARTIKUL) {
        Some(artikul) => !(empty(row) && populated.contains(&artikul)),
        None => true,
    });
    if before != summary.len() {
        tracing::debug!("Dropped {} superseded summary rows", before - summary.len());
    }
}
