pub mod u501_upload_task;
pub mod u502_download_report;
pub mod u503_task_lists;
pub mod u504_custom_report;
