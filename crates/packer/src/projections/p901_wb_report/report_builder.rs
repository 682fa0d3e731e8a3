use contracts::enums::{ReportKind, SchemaId};
use contracts::shared::{Record, RecordSet, TimeWorkedSummary};
use contracts::usecases::u502_download_report::{DownloadDataResponse, VpsDataResponse};
use serde_json::Value;

use super::reshaper::{reshape, value_key, ReshapeOptions, STANDARD_ALIASES};
use crate::domain::a001_packing_record::column_mapper::{standardize, to_display};
use crate::domain::a001_packing_record::schemas::{mapping, BARCODE_COLUMNS, EXCLUDED_COLUMNS};
use crate::shared::error::{PackerError, PackerResult};
use crate::shared::excel::time_info;
use crate::shared::excel::SheetData;

pub const FULL_SHEET: &str = "Полный отчет";
pub const SHORT_SHEET: &str = "Краткий отчет";
pub const FLAT_SHEET: &str = "Отчет";

/// Готовый к записи отчёт
#[derive(Debug, Clone)]
pub struct BuiltReport {
    pub kind: ReportKind,
    pub sheets: Vec<SheetData>,
    pub time_info: TimeWorkedSummary,
    pub detail_rows: usize,
    pub summary_rows: usize,
    /// Колонки без отображаемого заголовка, по всем листам без повторов
    pub unmapped_columns: Vec<String>,
}

/// Отчёт по ответу `/download`: лист «Время работы» и один или два листа данных
pub fn build_report(
    task_name: &str,
    response: DownloadDataResponse,
    options: ReshapeOptions,
) -> PackerResult<BuiltReport> {
    let kind = ReportKind::resolve(
        response.report_kind,
        response.data_set2.is_some(),
        task_name,
    );

    let mut detail = RecordSet::from_rows(response.data_set1);
    let mut summary = response.data_set2.map(RecordSet::from_rows).unwrap_or_default();
    if detail.is_empty() && summary.is_empty() {
        return Err(PackerError::NoData(task_name.to_string()));
    }

    remove_excluded(&mut detail);
    remove_excluded(&mut summary);

    let summary_for_time = (!summary.is_empty()).then_some(&summary);
    let time_info = time_info::summarize(task_name, &detail, summary_for_time);
    let time_sheet = SheetData::from_rows(time_info::SHEET_NAME, time_info::sheet_rows(&time_info));

    tracing::info!(
        "Building {:?} report for {}: {} detail rows, {} summary rows",
        kind,
        task_name,
        detail.len(),
        summary.len()
    );

    let mut unmapped = Vec::new();
    let report = match kind {
        ReportKind::Compound => {
            let mut full = reshape(&detail, &summary, options)?;
            full.retain_rows(|row| !is_removed_line(row));

            let mut short = detail.clone();
            standardize(&mut short, &STANDARD_ALIASES);
            short.retain_rows(|row| {
                value_key(RecordSet::get(row, "Kolvo_Tovarov")).is_some()
                    && value_key(RecordSet::get(row, "Pallet_No")).is_some()
            });

            BuiltReport {
                kind,
                detail_rows: short.len(),
                summary_rows: full.len(),
                sheets: vec![
                    time_sheet,
                    display_sheet(SHORT_SHEET, &short, SchemaId::WbReport, &mut unmapped),
                    display_sheet(FULL_SHEET, &full, SchemaId::WbReport, &mut unmapped),
                ],
                time_info,
                unmapped_columns: unmapped,
            }
        }
        ReportKind::Flat => BuiltReport {
            kind,
            detail_rows: detail.len(),
            summary_rows: 0,
            sheets: vec![
                time_sheet,
                display_sheet(FLAT_SHEET, &detail, SchemaId::WbReport, &mut unmapped),
            ],
            time_info,
            unmapped_columns: unmapped,
        },
    };
    Ok(report)
}

/// Отчёт ВПС из `/downloadData`: один лист, служебный `id` удалён
pub fn build_vps_report(task_name: &str, response: VpsDataResponse) -> PackerResult<BuiltReport> {
    if !response.success || response.data.is_empty() {
        tracing::warn!("No data for task {}", task_name);
        return Err(PackerError::NoData(task_name.to_string()));
    }

    let set = RecordSet::from_rows(response.data);
    let mut unmapped = Vec::new();
    let sheet = display_sheet(FLAT_SHEET, &set, SchemaId::VpsReport, &mut unmapped);
    Ok(BuiltReport {
        kind: ReportKind::Flat,
        detail_rows: set.len(),
        summary_rows: 0,
        sheets: vec![sheet],
        time_info: TimeWorkedSummary::empty(task_name, set.len()),
        unmapped_columns: unmapped,
    })
}

fn remove_excluded(set: &mut RecordSet) {
    for column in EXCLUDED_COLUMNS {
        set.drop_column(column);
    }
}

/// Полностью снятая строка заказа: вложенность 0 и причина не указана
fn is_removed_line(row: &Record) -> bool {
    value_key(RecordSet::get(row, "Vlozhennost")).as_deref() == Some("0")
        && value_key(RecordSet::get(row, "reason")).is_none()
}

/// Лист с отображаемыми заголовками; колонки без заголовка добавляются в `unmapped`
pub(crate) fn display_sheet(
    name: &str,
    set: &RecordSet,
    schema: SchemaId,
    unmapped: &mut Vec<String>,
) -> SheetData {
    let mut set = set.clone();
    numeric_operations(&mut set, schema);
    let outcome = to_display(&set, schema);
    for column in outcome.unmapped {
        if !unmapped.contains(&column) {
            unmapped.push(column);
        }
    }
    SheetData::from_record_set(name, &outcome.set).with_text_columns(&BARCODE_COLUMNS)
}

/// Флаги операций, пришедшие строкой ("1", "2"), пишутся числами
fn numeric_operations(set: &mut RecordSet, schema: SchemaId) {
    let mapping = mapping(schema);
    let columns: Vec<String> = set
        .columns
        .iter()
        .filter(|c| mapping.field(c).map(|f| f.kind.is_operation()).unwrap_or(false))
        .cloned()
        .collect();

    for row in set.rows.iter_mut() {
        for column in &columns {
            if let Some(Value::String(s)) = row.get(column) {
                if let Ok(n) = s.trim().parse::<f64>() {
                    if let Some(number) = serde_json::Number::from_f64(n) {
                        row.insert(column.clone(), Value::Number(number));
                    }
                }
            }
        }
    }
}
