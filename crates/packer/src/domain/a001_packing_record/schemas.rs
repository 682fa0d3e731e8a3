//! Таблицы соответствий «идентификатор поля ↔ заголовок колонки».
//!
//! У каждой схемы своя таблица: одинаковый заголовок ("Вложенность")
//! в разных схемах ведёт к разным идентификаторам.

use contracts::enums::SchemaId;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Как значение колонки приводится к полю канонической записи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Пусто → null, иначе как есть
    Plain,
    /// Флаг операции, обрабатывается политикой нормализации
    Flag,
    /// Только "V" сохраняется, остальное → null
    MarkerOnly,
    /// Артикул сырья: целое число без ".0", прочее строкой
    RawMaterialCode,
    /// Всегда строка, "" при отсутствии
    Stringified,
}

impl FieldKind {
    /// Флаговые колонки, которые в отчёте пишутся числами
    pub fn is_operation(&self) -> bool {
        matches!(self, FieldKind::Flag | FieldKind::MarkerOnly)
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: &'static str,
    /// Допустимые заголовки, первый отображается в отчёте
    pub labels: Vec<&'static str>,
    pub kind: FieldKind,
}

impl FieldSpec {
    fn new(id: &'static str, labels: &[&'static str], kind: FieldKind) -> Self {
        Self {
            id,
            labels: labels.to_vec(),
            kind,
        }
    }

    /// Сам идентификатор тоже принимается как заголовок (последним)
    fn with_id_alias(mut self) -> Self {
        if !self.labels.contains(&self.id) {
            self.labels.push(self.id);
        }
        self
    }

    pub fn display_label(&self) -> &'static str {
        self.labels.first().copied().unwrap_or(self.id)
    }
}

/// Метаданные задания, дописываемые к каждой строке выгрузки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Prefix,
    Warehouse,
    Status,
    TaskStatus,
    TaskName,
}

impl MetaField {
    pub fn id(&self) -> &'static str {
        match self {
            MetaField::Prefix => "pref",
            MetaField::Warehouse => "Scklad_Pref",
            MetaField::Status => "Status",
            MetaField::TaskStatus => "Status_Zadaniya",
            MetaField::TaskName => "Nazvanie_Zadaniya",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub schema: SchemaId,
    pub fields: Vec<FieldSpec>,
    pub meta: Vec<MetaField>,
    /// Колонки ответа сервера, которые не попадают в отчёт
    pub dropped: Vec<&'static str>,
}

impl ColumnMapping {
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Полный словарь схемы: поля данных + метаданные
    pub fn vocabulary(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .map(|f| f.id)
            .chain(self.meta.iter().map(|m| m.id()))
            .collect()
    }

    pub fn display_label(&self, id: &str) -> Option<&'static str> {
        self.field(id).map(|f| f.display_label())
    }
}

// ─── Общие наборы полей ─────────────────────────────────────────────────────

fn item_fields() -> Vec<FieldSpec> {
    use FieldKind::*;
    vec![
        FieldSpec::new("Artikul", &["Артикул"], Plain),
        FieldSpec::new("Artikul_Syrya", &["Артикул Сырья"], RawMaterialCode),
        FieldSpec::new("Nomenklatura", &["Номенклатура"], Plain),
        FieldSpec::new("Nazvanie_Tovara", &["Название товара"], Plain),
        FieldSpec::new("SHK", &["ШК", "Штрих-код"], Plain),
        FieldSpec::new("SHK_Syrya", &["ШК Сырья"], Plain),
        FieldSpec::new("SHK_SPO", &["ШК СПО"], Plain),
        FieldSpec::new("Kol_vo_Syrya", &["Кол-во сырья"], Plain),
        FieldSpec::new("Itog_Zakaz", &["Итог Заказ", "Итог заказа"], Plain),
        FieldSpec::new("SOH", &["СОХ"], Plain),
        FieldSpec::new("Tip_Postavki", &["тип поставки", "Тип поставки"], Plain),
        FieldSpec::new("Srok_Godnosti", &["Срок Годности", "Срок годности"], Plain),
    ]
}

/// Операции оператора: (идентификатор, заголовок, вид в базовой схеме)
const OPERATIONS: [(&str, &str, FieldKind); 18] = [
    ("Op_1_Bl_1_Sht", "Оп 1 бл. 1 шт", FieldKind::Flag),
    ("Op_2_Bl_2_Sht", "Оп 2 бл.2 шт", FieldKind::Flag),
    ("Op_3_Bl_3_Sht", "Оп 3 бл.3 шт", FieldKind::Flag),
    ("Op_4_Bl_4_Sht", "Оп 4 бл.4шт", FieldKind::Flag),
    ("Op_5_Bl_5_Sht", "Оп 5 бл.5 шт", FieldKind::Flag),
    ("Op_6_Blis_6_10_Sht", "Оп 6 блис.6-10шт", FieldKind::Flag),
    ("Op_7_Pereschyot", "Оп 7 пересчет", FieldKind::MarkerOnly),
    ("Op_9_Fasovka_Sborka", "Оп 9 фасовка/сборка", FieldKind::MarkerOnly),
    ("Op_10_Markirovka_SHT", "Оп 10 Маркировка ШТ", FieldKind::Flag),
    ("Op_11_Markirovka_Prom", "Оп 11 маркировка пром", FieldKind::Flag),
    ("Op_13_Markirovka_Fabr", "Оп 13 маркировка фабр", FieldKind::Flag),
    ("Op_14_TU_1_Sht", "Оп 14 ТУ 1 шт", FieldKind::Flag),
    ("Op_15_TU_2_Sht", "Оп 15 ТУ 2 шт", FieldKind::Flag),
    ("Op_16_TU_3_5", "Оп 16 ТУ 3-5", FieldKind::Flag),
    ("Op_17_TU_6_8", "Оп 17 ТУ 6-8", FieldKind::Flag),
    ("Op_468_Proverka_SHK", "Оп 468 проверка ШК", FieldKind::MarkerOnly),
    ("Op_469_Spetsifikatsiya_TM", "Оп 469 Спецификация ТМ", FieldKind::MarkerOnly),
    ("Op_470_Dop_Upakovka", "Оп 470 доп упаковка", FieldKind::Flag),
];

/// Колонки, которые сервер больше не принимает и которые убираются из отчётов
pub const EXCLUDED_COLUMNS: [&str; 9] = [
    "Op_14_TU_1_Sht",
    "Op_15_TU_2_Sht",
    "Pechat_Etiketki_s_SHK",
    "Pechat_Etiketki_s_Opisaniem",
    "Kompleksnaya_priemka_tovara",
    "Priemka_tovara_v_transportnykh_korobkakh",
    "Priemka_tovara_palletnaya",
    "Razbrakovka_tovara",
    "Sortiruemyi_Tovar",
];

/// Штрихкоды пишутся в Excel текстом (идентификаторы и заголовки)
pub const BARCODE_COLUMNS: [&str; 12] = [
    "SHK",
    "SHK_Syrya",
    "SHK_SPO",
    "SHK_WPS",
    "shk",
    "shk_wps",
    "ШК",
    "ШК Сырья",
    "ШК СПО",
    "ШК WPS",
    "ШК ВПС",
    "Штрих-код",
];

fn placement_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Mesto", &["Место"], FieldKind::Plain),
        FieldSpec::new("Vlozhennost", &["Вложенность"], FieldKind::Plain),
        FieldSpec::new("Pallet_No", &["Паллет №"], FieldKind::Plain),
    ]
}

/// Признаки товара и доп. работы расширенной схемы
fn extended_extra_fields() -> Vec<FieldSpec> {
    use FieldKind::*;
    vec![
        FieldSpec::new("Zakrytaya_Zona", &["Закрытая зона"], Flag),
        FieldSpec::new("Upakovka_v_Gofro", &["Упаковка в гофро"], Plain),
        FieldSpec::new("Upakovka_v_PE_Paket", &["Упаковка в ПЭ пакет"], Plain),
        FieldSpec::new("Ne_Sortiruemyi_Tovar", &["Не сортируемый товар"], Flag),
        FieldSpec::new("Produkty", &["Продукты"], Flag),
        FieldSpec::new("Opasnyi_Tovar", &["Опасный товар"], Flag),
        FieldSpec::new("Krupnogabaritnyi_Tovar", &["Крупногабаритный товар"], Flag),
        FieldSpec::new("Yuvelirnye_Izdelia", &["Ювелирные изделия"], Flag),
        FieldSpec::new("PriznakSortirovki", &["Признак сортировки"], Flag),
        FieldSpec::new(
            "Vlozhit_v_upakovku_pechatnyi_material",
            &["Вложить в упаковку печатный материал"],
            Plain,
        ),
        FieldSpec::new(
            "Izmerenie_VGH_i_peredacha_informatsii",
            &["Измерение ВГХ и передача информации"],
            Plain,
        ),
        FieldSpec::new("Indeks_za_srochnost_koeff_1_5", &["Индекс за срочность коэфф. 1,5"], Plain),
        FieldSpec::new(
            "Prochie_raboty_vklyuchaya_ustranenie_anomalii",
            &["Прочие работы, включая устранение аномалий"],
            Plain,
        ),
        FieldSpec::new(
            "Sborka_naborov_ot_2_shtuk_raznykh_tovarov",
            &["Сборка наборов от 2 штук разных товаров"],
            Plain,
        ),
        FieldSpec::new("Upakovka_tovara_v_gofromeyler", &["Упаковка товара в гофромейлер"], Plain),
        FieldSpec::new("Khranenie_tovara", &["Хранение товара"], Plain),
        FieldSpec::new("vp", &["ВП"], Plain),
        FieldSpec::new("Plan_Otkaz", &["План отказ"], Plain),
    ]
}

// ─── Схемы ──────────────────────────────────────────────────────────────────

fn basic_upload() -> ColumnMapping {
    let mut fields = item_fields();
    fields.extend(
        OPERATIONS
            .iter()
            .map(|&(id, label, kind)| FieldSpec::new(id, &[label], kind)),
    );
    fields.extend(placement_fields());

    ColumnMapping {
        schema: SchemaId::BasicUpload,
        fields,
        meta: vec![
            MetaField::Prefix,
            MetaField::Warehouse,
            MetaField::Status,
            MetaField::TaskStatus,
            MetaField::TaskName,
        ],
        dropped: vec![],
    }
}

/// Без исключённых операций; флаги однородны, заголовком может быть и сам идентификатор
fn extended_upload() -> ColumnMapping {
    let mut fields = item_fields();
    fields.extend(
        OPERATIONS
            .iter()
            .filter(|(id, _, _)| !EXCLUDED_COLUMNS.contains(id))
            .map(|&(id, label, _)| FieldSpec::new(id, &[label], FieldKind::Flag)),
    );
    fields.extend(placement_fields());
    fields.extend(extended_extra_fields());

    ColumnMapping {
        schema: SchemaId::ExtendedUpload,
        fields: fields.into_iter().map(FieldSpec::with_id_alias).collect(),
        ..basic_upload()
    }
}

fn task_upload() -> ColumnMapping {
    use FieldKind::*;
    ColumnMapping {
        schema: SchemaId::TaskUpload,
        fields: vec![
            FieldSpec::new("Artikul", &["Артикул"], Plain),
            FieldSpec::new("Nazvanie_Tovara", &["Название товара"], Plain),
            FieldSpec::new("SHK", &["ШК"], Plain),
            FieldSpec::new("Itog_Zakaz", &["Итог Заказ"], Plain),
            FieldSpec::new("Srok_Godnosti", &["Срок Годности"], Plain),
            FieldSpec::new("vp", &["ВП"], Plain),
        ],
        meta: vec![
            MetaField::Prefix,
            MetaField::Status,
            MetaField::TaskStatus,
            MetaField::TaskName,
        ],
        dropped: vec![],
    }
}

fn vps_upload() -> ColumnMapping {
    use FieldKind::*;
    ColumnMapping {
        schema: SchemaId::VpsUpload,
        fields: vec![
            FieldSpec::new("nazvanie_zdaniya", &["Название задания"], Stringified),
            FieldSpec::new("artikul", &["Артикул"], Stringified),
            FieldSpec::new("shk", &["Штрих-код"], Stringified),
            FieldSpec::new("mesto", &["Место"], Stringified),
            FieldSpec::new("vlozhennost", &["Вложенность"], Stringified),
            FieldSpec::new("pallet", &["Паллет"], Stringified),
            FieldSpec::new("size_vps", &["Размер ВПС"], Stringified),
            FieldSpec::new("vp", &["ВП"], Stringified),
            FieldSpec::new("itog_zakaza", &["Итог заказа"], Plain),
            FieldSpec::new("shk_wps", &["ШК ВПС"], Stringified),
        ],
        meta: vec![],
        dropped: vec![],
    }
}

fn wb_report() -> ColumnMapping {
    use FieldKind::*;
    let mut fields = vec![FieldSpec::new("Nazvanie_Zadaniya", &["Название задания"], Plain)];
    fields.extend(item_fields());
    fields.extend([
        FieldSpec::new("SHK_WPS", &["ШК WPS"], Plain),
        FieldSpec::new("Kolvo_Tovarov", &["Количество товаров"], Plain),
    ]);
    fields.extend(placement_fields());
    fields.extend(
        OPERATIONS
            .iter()
            .map(|&(id, label, kind)| FieldSpec::new(id, &[label], kind)),
    );
    fields.extend(extended_extra_fields());
    fields.extend([
        FieldSpec::new("Ispolnitel", &["Исполнитель"], Plain),
        FieldSpec::new("reason", &["Причина"], Plain),
        FieldSpec::new("Time_Start", &["Начало"], Plain),
        FieldSpec::new("Time_End", &["Окончание"], Plain),
        FieldSpec::new("pref", &["Префикс"], Plain),
        FieldSpec::new("Scklad_Pref", &["Склад"], Plain),
        FieldSpec::new("Status", &["Статус"], Plain),
        FieldSpec::new("Status_Zadaniya", &["Статус задания"], Plain),
    ]);

    ColumnMapping {
        schema: SchemaId::WbReport,
        fields,
        meta: vec![],
        dropped: vec!["id"],
    }
}

fn vps_report() -> ColumnMapping {
    use FieldKind::*;
    ColumnMapping {
        schema: SchemaId::VpsReport,
        fields: vec![
            FieldSpec::new("nazvanie_zdaniya", &["Название задания"], Plain),
            FieldSpec::new("vp", &["ВП"], Plain),
            FieldSpec::new("artikul", &["Артикул"], Plain),
            FieldSpec::new("nazvanie_tovara", &["Название товара"], Plain),
            FieldSpec::new("shk", &["Штрих-код"], Plain),
            FieldSpec::new("srok_godnosti", &["Срок годности"], Plain),
            FieldSpec::new("mesto", &["Место"], Plain),
            FieldSpec::new("vlozhennost", &["Вложенность"], Plain),
            FieldSpec::new("pallet", &["Паллет"], Plain),
            FieldSpec::new("shk_wps", &["ШК ВПС"], Plain),
            FieldSpec::new("size_vps", &["Размер ВПС"], Plain),
            FieldSpec::new("itog_zakaza", &["Итог заказа"], Plain),
        ],
        meta: vec![],
        dropped: vec!["id"],
    }
}

// ─── Реестр ─────────────────────────────────────────────────────────────────

pub struct SchemaRegistry {
    mappings: HashMap<SchemaId, ColumnMapping>,
}

pub static SCHEMA_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::build);

impl SchemaRegistry {
    fn build() -> Self {
        let mappings = [
            basic_upload(),
            extended_upload(),
            task_upload(),
            vps_upload(),
            wb_report(),
            vps_report(),
        ]
        .into_iter()
        .map(|m| (m.schema, m))
        .collect();
        Self { mappings }
    }

    pub fn get(&self, schema: SchemaId) -> &ColumnMapping {
        // реестр заполняется всеми вариантами SchemaId в build()
        &self.mappings[&schema]
    }
}

/// Таблица соответствий для схемы
pub fn mapping(schema: SchemaId) -> &'static ColumnMapping {
    SCHEMA_REGISTRY.get(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_schema_registered() {
        for schema in SchemaId::all() {
            assert_eq!(mapping(schema).schema, schema);
        }
    }

    #[test]
    fn test_identifiers_unique_per_schema() {
        for schema in SchemaId::all() {
            let vocab = mapping(schema).vocabulary();
            let unique: HashSet<_> = vocab.iter().collect();
            assert_eq!(unique.len(), vocab.len(), "duplicate identifier in {schema}");
        }
    }

    #[test]
    fn test_same_label_differs_between_schemas() {
        assert_eq!(
            mapping(SchemaId::BasicUpload).field("Vlozhennost").map(|f| f.display_label()),
            Some("Вложенность")
        );
        assert_eq!(
            mapping(SchemaId::VpsUpload).field("vlozhennost").map(|f| f.display_label()),
            Some("Вложенность")
        );
        assert!(mapping(SchemaId::VpsUpload).field("Vlozhennost").is_none());
    }

    #[test]
    fn test_extended_schema_drops_excluded_operations() {
        let extended = mapping(SchemaId::ExtendedUpload);
        assert!(extended.field("Op_14_TU_1_Sht").is_none());
        assert!(extended.field("Op_15_TU_2_Sht").is_none());
        assert!(extended.field("Zakrytaya_Zona").is_some());
        assert_eq!(
            extended.field("Op_7_Pereschyot").map(|f| f.kind),
            Some(FieldKind::Flag)
        );
        assert_eq!(
            mapping(SchemaId::BasicUpload).field("Op_7_Pereschyot").map(|f| f.kind),
            Some(FieldKind::MarkerOnly)
        );
    }
}
