use contracts::shared::RecordSet;

/// Порядок колонок полного отчёта WB (идентификаторы)
pub const FULL_REPORT_COLUMNS: [&str; 41] = [
    "Nazvanie_Zadaniya",
    "Artikul",
    "Artikul_Syrya",
    "Nomenklatura",
    "Nazvanie_Tovara",
    "SHK",
    "SHK_Syrya",
    "SHK_SPO",
    "SHK_WPS",
    "Kol_vo_Syrya",
    "Itog_Zakaz",
    "SOH",
    "Tip_Postavki",
    "Srok_Godnosti",
    "Kolvo_Tovarov",
    "Mesto",
    "Vlozhennost",
    "Pallet_No",
    "Op_1_Bl_1_Sht",
    "Op_2_Bl_2_Sht",
    "Op_3_Bl_3_Sht",
    "Op_4_Bl_4_Sht",
    "Op_5_Bl_5_Sht",
    "Op_6_Blis_6_10_Sht",
    "Op_7_Pereschyot",
    "Op_9_Fasovka_Sborka",
    "Op_10_Markirovka_SHT",
    "Op_11_Markirovka_Prom",
    "Op_13_Markirovka_Fabr",
    "Op_16_TU_3_5",
    "Op_17_TU_6_8",
    "Op_468_Proverka_SHK",
    "Op_469_Spetsifikatsiya_TM",
    "Op_470_Dop_Upakovka",
    "Zakrytaya_Zona",
    "Upakovka_v_Gofro",
    "Upakovka_v_PE_Paket",
    "Ispolnitel",
    "reason",
    "Time_Start",
    "Time_End",
];

/// Приведение набора к шаблону: недостающие колонки заполняются `null`, лишние отбрасываются
pub fn apply_template(set: &RecordSet) -> RecordSet {
    let dropped: Vec<&str> = set
        .columns
        .iter()
        .map(String::as_str)
        .filter(|c| !FULL_REPORT_COLUMNS.contains(c))
        .collect();
    if !dropped.is_empty() {
        tracing::debug!("Columns outside report template: {}", dropped.join(", "));
    }
    set.select_columns(&FULL_REPORT_COLUMNS)
}
