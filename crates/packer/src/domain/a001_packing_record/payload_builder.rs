use contracts::enums::SchemaId;
use contracts::shared::Record;
use serde_json::Value;

use super::column_mapper::to_canonical;
use super::normalizer::NormalizerPolicy;
use super::schemas::{mapping, MetaField};
use crate::shared::error::{PackerError, PackerResult};
use crate::shared::excel::{Sheet, SpreadsheetRow};

/// Начальный статус строки и задания на сервере
const STATUS_NOT_STARTED: i64 = 0;

/// Контекст задания, общий для всех строк файла
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadContext {
    /// Имя файла, оно же название задания
    pub file_name: String,
    pub prefix: String,
    pub warehouse_code: Option<String>,
}

impl PayloadContext {
    pub fn new(file_name: impl Into<String>, warehouse_code: Option<String>) -> Self {
        let file_name = file_name.into();
        Self {
            prefix: extract_prefix(&file_name),
            file_name,
            warehouse_code: warehouse_code.filter(|w| !w.trim().is_empty()),
        }
    }
}

/// Префикс задания: всё до первого пробела в имени файла
pub fn extract_prefix(file_name: &str) -> String {
    file_name.split(' ').next().unwrap_or_default().to_string()
}

/// Сборщик тел запросов для одной схемы выгрузки
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    schema: SchemaId,
    policy: NormalizerPolicy,
}

impl PayloadBuilder {
    pub fn new(schema: SchemaId, policy: NormalizerPolicy) -> Self {
        Self { schema, policy }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn build(&self, row: &SpreadsheetRow, context: &PayloadContext) -> Record {
        let mut record = to_canonical(row, self.schema, &self.policy);

        for meta in &mapping(self.schema).meta {
            let value = match meta {
                MetaField::Prefix => Value::from(context.prefix.clone()),
                MetaField::Warehouse => context
                    .warehouse_code
                    .clone()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                MetaField::Status | MetaField::TaskStatus => Value::from(STATUS_NOT_STARTED),
                MetaField::TaskName => Value::from(context.file_name.clone()),
            };
            record.insert(meta.id().to_string(), value);
        }

        record
    }

    /// Все строки листа; проверки выполняются до любого сетевого запроса
    pub fn build_all(&self, sheet: &Sheet, context: &PayloadContext) -> PackerResult<Vec<Record>> {
        if self.schema.requires_warehouse() && context.warehouse_code.is_none() {
            return Err(PackerError::NoWarehouse);
        }
        if sheet.is_empty() {
            return Err(PackerError::EmptyFile);
        }

        Ok(sheet.rows.iter().map(|row| self.build(row, context)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::excel::RawCell;
    use serde_json::json;

    fn sheet(rows: Vec<SpreadsheetRow>) -> Sheet {
        Sheet {
            headers: vec![],
            rows,
        }
    }

    #[test]
    fn test_prefix_from_file_name() {
        assert_eq!(extract_prefix("1001 задание.xlsx"), "1001");
        assert_eq!(extract_prefix("WB-77 поставка 3.xlsx"), "WB-77");
        assert_eq!(extract_prefix("single.xlsx"), "single.xlsx");
    }

    #[test]
    fn test_basic_payload_metadata() {
        let builder = PayloadBuilder::new(SchemaId::BasicUpload, NormalizerPolicy::legacy());
        let ctx = PayloadContext::new("1001 задание.xlsx", Some("СПБ".into()));
        let row = SpreadsheetRow::new()
            .with("Артикул", RawCell::Text("A-1".into()))
            .with("Артикул Сырья", RawCell::Number(98765.0))
            .with("Оп 1 бл. 1 шт", RawCell::Text("V".into()))
            .with("Оп 469 Спецификация ТМ", RawCell::Text("нет".into()));

        let record = builder.build(&row, &ctx);
        assert_eq!(record["pref"], json!("1001"));
        assert_eq!(record["Scklad_Pref"], json!("СПБ"));
        assert_eq!(record["Status"], json!(0));
        assert_eq!(record["Status_Zadaniya"], json!(0));
        assert_eq!(record["Nazvanie_Zadaniya"], json!("1001 задание.xlsx"));
        assert_eq!(record["Artikul_Syrya"], json!("98765"));
        assert_eq!(record["Op_1_Bl_1_Sht"], json!(1));
        assert_eq!(record["Op_469_Spetsifikatsiya_TM"], Value::Null);
        assert_eq!(record["SHK"], Value::Null);

        for id in mapping(SchemaId::BasicUpload).vocabulary() {
            assert!(record.contains_key(id), "missing {id}");
        }
    }

    #[test]
    fn test_task_upload_has_no_warehouse_field() {
        let builder = PayloadBuilder::new(SchemaId::TaskUpload, NormalizerPolicy::passthrough());
        let ctx = PayloadContext::new("55 отбор.xlsx", None);
        let record = builder.build(&SpreadsheetRow::new(), &ctx);
        assert!(!record.contains_key("Scklad_Pref"));
        assert_eq!(record["pref"], json!("55"));
    }

    #[test]
    fn test_build_all_guards() {
        let builder = PayloadBuilder::new(SchemaId::BasicUpload, NormalizerPolicy::legacy());
        let one_row = sheet(vec![SpreadsheetRow::new().with("Артикул", RawCell::Text("A".into()))]);

        let err = builder
            .build_all(&one_row, &PayloadContext::new("1 a.xlsx", Some("  ".into())))
            .unwrap_err();
        assert!(matches!(err, PackerError::NoWarehouse));

        let err = builder
            .build_all(&sheet(vec![]), &PayloadContext::new("1 a.xlsx", Some("СПБ".into())))
            .unwrap_err();
        assert!(matches!(err, PackerError::EmptyFile));

        let vps = PayloadBuilder::new(SchemaId::VpsUpload, NormalizerPolicy::passthrough());
        let records = vps
            .build_all(&one_row, &PayloadContext::new("ВПС 1.xlsx", None))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["artikul"], json!("A"));
        assert_eq!(records[0]["shk"], json!(""));
    }
}
