pub mod config;
pub mod error;
pub mod excel;
pub mod format;
pub mod logger;
pub mod packer_api;
pub mod shutdown;
