use contracts::shared::{Record, RecordSet};
use contracts::usecases::u504_custom_report::ReportConfig;
use std::collections::BTreeSet;

use super::filters::{apply_date_range, apply_filters};
use super::grouping::{group_by_article, group_data, ARTICLE_RECORDS, ORDER_TOTAL};
use super::sorting::apply_sorting;
use crate::shared::error::{PackerError, PackerResult};

/// Конвейер отчёта: диапазон дат, фильтры, группировка, сортировка,
/// итоги по артикулу, выбор полей.
///
/// При итогах по артикулу к выбранным полям добавляются
/// «Всего в заказе» и «Количество записей».
pub fn process(rows: Vec<Record>, config: &ReportConfig) -> PackerResult<RecordSet> {
    validate(config)?;

    let mut set = RecordSet::from_rows(rows);
    let source_rows = set.len();

    if let Some(range) = &config.date_range {
        apply_date_range(&mut set, range)?;
    }
    apply_filters(&mut set, &config.filters);
    if !config.group_by.is_empty() {
        set = group_data(&set, &config.group_by);
    }
    apply_sorting(&mut set, &config.sorting);
    if config.group_by_article {
        set = group_by_article(&set);
    }

    if !config.fields.is_empty() {
        let mut columns: Vec<&str> = config.fields.iter().map(String::as_str).collect();
        if config.group_by_article {
            for extra in [ORDER_TOTAL, ARTICLE_RECORDS] {
                if !columns.contains(&extra) {
                    columns.push(extra);
                }
            }
        }
        set = set.select_columns(&columns);
    }

    tracing::info!(
        "Custom report: {} → {} rows, {} columns",
        source_rows,
        set.len(),
        set.columns.len()
    );
    Ok(set)
}

/// Все поля набора, по алфавиту
pub fn available_fields(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .flat_map(|r| r.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn validate(config: &ReportConfig) -> PackerResult<()> {
    let named = config
        .filters
        .iter()
        .map(|f| f.field.as_str())
        .chain(config.sorting.iter().map(|s| s.field.as_str()))
        .chain(config.group_by.iter().map(String::as_str))
        .chain(config.fields.iter().map(String::as_str));
    for field in named {
        if field.trim().is_empty() {
            return Err(PackerError::InvalidReportConfig("пустое имя поля".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u504_custom_report::{
        DateRange, FilterOperator, ReportFilter, ReportSort, SortDirection,
    };
    use serde_json::{json, Value};

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .filter_map(|v| match v {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn task_rows() -> Vec<Record> {
        records(vec![
            json!({"Artikul": "B", "Itog_Zakaz": 4, "Ispolnitel": "Петров", "Time_Start": "10:00:00 01.02.2024"}),
            json!({"Artikul": "A", "Itog_Zakaz": 2, "Ispolnitel": "Иванов", "Time_Start": "11:00:00 01.02.2024"}),
            json!({"Artikul": "A", "Itog_Zakaz": 3, "Ispolnitel": "Иванов", "Time_Start": "12:00:00 01.02.2024"}),
            json!({"Artikul": "C", "Itog_Zakaz": 9, "Ispolnitel": "Иванов", "Time_Start": "12:00:00 09.03.2024"}),
        ])
    }

    #[test]
    fn test_pipeline_order() {
        let config = ReportConfig {
            fields: vec!["Ispolnitel".into(), "Itog_Zakaz".into(), "Количество_записей".into()],
            filters: vec![ReportFilter {
                field: "Itog_Zakaz".into(),
                operator: FilterOperator::Greater,
                value: json!(1),
            }],
            sorting: vec![ReportSort {
                field: "Itog_Zakaz".into(),
                direction: SortDirection::Desc,
            }],
            group_by: vec!["Ispolnitel".into()],
            date_range: Some(DateRange {
                from: Some("2024-02-01".into()),
                to: Some("2024-02-29".into()),
            }),
            group_by_article: false,
        };
        let out = process(task_rows(), &config).unwrap();

        assert_eq!(out.columns, vec!["Ispolnitel", "Itog_Zakaz", "Количество_записей"]);
        assert_eq!(
            out.rows.iter().map(|r| r["Itog_Zakaz"].clone()).collect::<Vec<_>>(),
            vec![json!(5), json!(4)]
        );
        assert_eq!(out.rows[0]["Количество_записей"], json!(2));
    }

    #[test]
    fn test_article_totals_keep_their_columns() {
        let config = ReportConfig {
            fields: vec!["Artikul".into(), "Ispolnitel".into()],
            sorting: vec![ReportSort {
                field: "Artikul".into(),
                direction: SortDirection::Asc,
            }],
            group_by_article: true,
            ..ReportConfig::default()
        };
        let out = process(task_rows(), &config).unwrap();

        assert_eq!(out.columns, vec!["Artikul", "Ispolnitel", ORDER_TOTAL, ARTICLE_RECORDS]);
        let first = &out.rows[0];
        assert_eq!(first["Artikul"], json!("A"));
        assert_eq!(first[ORDER_TOTAL], json!(5));
        assert_eq!(first[ARTICLE_RECORDS], json!(2));
    }

    #[test]
    fn test_empty_config_keeps_rows() {
        let out = process(task_rows(), &ReportConfig::default()).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out.columns.len(), 4);
    }

    #[test]
    fn test_blank_field_rejected() {
        let config = ReportConfig {
            group_by: vec![" ".into()],
            ..ReportConfig::default()
        };
        let err = process(task_rows(), &config).unwrap_err();
        assert!(matches!(err, PackerError::InvalidReportConfig(_)));
    }

    #[test]
    fn test_available_fields_sorted() {
        let fields = available_fields(&records(vec![json!({"b": 1, "a": 2}), json!({"c": 3, "a": 4})]));
        assert_eq!(fields, vec!["a", "b", "c"]);
    }
}
