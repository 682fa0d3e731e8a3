pub mod normalizer_preset;
pub mod report_kind;
pub mod schema_id;
pub mod task_list_kind;

pub use normalizer_preset::NormalizerPreset;
pub use report_kind::ReportKind;
pub use schema_id::SchemaId;
pub use task_list_kind::TaskListKind;
