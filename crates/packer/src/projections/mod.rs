pub mod p901_wb_report;
pub mod p902_custom_report;
