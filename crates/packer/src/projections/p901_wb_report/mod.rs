//! Отчёт WB: пересчёт сводного набора и сборка листов Excel

pub mod report_builder;
pub mod reshaper;
pub mod template;

pub use report_builder::{build_report, build_vps_report, BuiltReport};
pub use reshaper::{reshape, PalletMergePolicy, ReshapeOptions};
