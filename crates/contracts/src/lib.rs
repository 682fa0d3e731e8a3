//! Общие DTO между ядром Packer Desktop и HTTP-бэкендом склада.

pub mod enums;
pub mod shared;
pub mod usecases;
