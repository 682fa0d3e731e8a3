//! Общие типаж и типы для всех UseCase

pub mod usecase_metadata;

pub use usecase_metadata::UseCaseMetadata;
