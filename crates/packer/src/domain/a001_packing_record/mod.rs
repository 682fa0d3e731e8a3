//! Строка исходной таблицы и её каноническое представление для выгрузки

pub mod column_mapper;
pub mod normalizer;
pub mod payload_builder;
pub mod schemas;

pub use normalizer::{NormalizedValue, NormalizerPolicy};
pub use payload_builder::{PayloadBuilder, PayloadContext};
