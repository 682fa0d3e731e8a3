use contracts::enums::SchemaId;
use contracts::shared::{Record, RecordSet};

use super::normalizer::{apply_kind, NormalizerPolicy};
use super::schemas::mapping;
use crate::shared::excel::SpreadsheetRow;

/// Строка таблицы → каноническая запись.
///
/// Для каждого поля берётся первый присутствующий заголовок из списка схемы;
/// поле без заголовка получает `null` (или `""` для строковых полей ВПС).
/// Метаданные задания сюда не входят, их дописывает payload_builder.
pub fn to_canonical(row: &SpreadsheetRow, schema: SchemaId, policy: &NormalizerPolicy) -> Record {
    let mapping = mapping(schema);
    let mut record = Record::new();

    for field in &mapping.fields {
        let cell = field.labels.iter().find_map(|label| row.get(label));
        record.insert(field.id.to_string(), apply_kind(cell, field.kind, policy));
    }

    record
}

/// Результат переименования в отображаемые заголовки
#[derive(Debug, Clone)]
pub struct DisplayOutcome {
    pub set: RecordSet,
    /// Колонки без записи в таблице схемы, оставлены как есть
    pub unmapped: Vec<String>,
}

/// Переименование идентификаторов в отображаемые заголовки схемы.
/// Служебные колонки схемы (`id`) удаляются, неизвестные сохраняются.
pub fn to_display(set: &RecordSet, schema: SchemaId) -> DisplayOutcome {
    let mapping = mapping(schema);
    let mut out = set.clone();
    let mut unmapped = Vec::new();

    for dropped in &mapping.dropped {
        out.drop_column(dropped);
    }

    for column in out.columns.clone() {
        match mapping.display_label(&column) {
            Some(label) => out.rename_column(&column, label),
            None => unmapped.push(column),
        }
    }

    if !unmapped.is_empty() {
        tracing::warn!(
            "Columns without display label in schema {}: {}",
            schema,
            unmapped.join(", ")
        );
    }

    DisplayOutcome { set: out, unmapped }
}

/// Исторические написания → канонический идентификатор.
/// Если идентификатор уже есть, набор не меняется.
pub fn standardize(set: &mut RecordSet, aliases: &[(&str, &[&str])]) {
    for (canonical, labels) in aliases {
        if set.has_column(canonical) {
            continue;
        }
        if let Some(found) = labels.iter().find(|l| set.has_column(l)) {
            set.rename_column(found, canonical);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_packing_record::schemas::mapping;
    use crate::shared::excel::RawCell;
    use serde_json::{json, Value};

    #[test]
    fn test_to_canonical_covers_vocabulary() {
        let row = SpreadsheetRow::new()
            .with("Артикул", RawCell::Text("A-1".into()))
            .with("Оп 7 пересчет", RawCell::Text("V".into()))
            .with("Посторонняя колонка", RawCell::Text("x".into()));

        for schema in [SchemaId::BasicUpload, SchemaId::ExtendedUpload, SchemaId::TaskUpload, SchemaId::VpsUpload] {
            let record = to_canonical(&row, schema, &NormalizerPolicy::legacy());
            for field in &mapping(schema).fields {
                assert!(record.contains_key(field.id), "{} missing in {}", field.id, schema);
            }
            assert!(!record.contains_key("Посторонняя колонка"));
        }
    }

    #[test]
    fn test_first_label_wins() {
        let row = SpreadsheetRow::new()
            .with("Итог заказа", RawCell::Number(2.0))
            .with("Итог Заказ", RawCell::Number(5.0));
        let record = to_canonical(&row, SchemaId::BasicUpload, &NormalizerPolicy::legacy());
        assert_eq!(record["Itog_Zakaz"], json!(5));

        let old_only = SpreadsheetRow::new().with("Итог заказа", RawCell::Number(2.0));
        let record = to_canonical(&old_only, SchemaId::BasicUpload, &NormalizerPolicy::legacy());
        assert_eq!(record["Itog_Zakaz"], json!(2));
    }

    #[test]
    fn test_extended_accepts_identifier_headers() {
        let row = SpreadsheetRow::new()
            .with("Zakrytaya_Zona", RawCell::Text("V".into()))
            .with("Оп 1 бл. 1 шт", RawCell::Number(2.0));
        let record = to_canonical(&row, SchemaId::ExtendedUpload, &NormalizerPolicy::web());
        assert_eq!(record["Zakrytaya_Zona"], json!("1"));
        assert_eq!(record["Op_1_Bl_1_Sht"], json!("2"));
        assert_eq!(record["Produkty"], Value::Null);
    }

    #[test]
    fn test_to_display_keeps_unmapped_and_drops_id() {
        let mut row = Record::new();
        row.insert("id".into(), json!(7));
        row.insert("artikul".into(), json!("A"));
        row.insert("shk".into(), json!("460"));
        row.insert("comment".into(), json!("x"));
        let set = RecordSet::from_rows(vec![row]);

        let outcome = to_display(&set, SchemaId::VpsReport);
        assert_eq!(outcome.set.columns, vec!["Артикул", "Штрих-код", "comment"]);
        assert_eq!(outcome.unmapped, vec!["comment"]);
        assert_eq!(outcome.set.rows[0]["comment"], json!("x"));
    }

    #[test]
    fn test_standardize_renames_first_present_alias() {
        let mut row = Record::new();
        row.insert("Артикул".into(), json!("A"));
        row.insert("Количество товаров".into(), json!(2));
        row.insert("Pallet_No".into(), json!("P1"));
        let mut set = RecordSet::from_rows(vec![row]);

        standardize(
            &mut set,
            &[
                ("Artikul", &["Артикул", "Artikul"]),
                ("Kolvo_Tovarov", &["Kolvo_Tovarov", "Количество товаров"]),
                ("Pallet_No", &["Паллет №", "Pallet_No"]),
            ],
        );
        assert_eq!(set.columns, vec!["Artikul", "Kolvo_Tovarov", "Pallet_No"]);
    }
}
