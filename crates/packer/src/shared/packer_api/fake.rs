use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use contracts::enums::TaskListKind;
use contracts::shared::Record;
use contracts::usecases::u501_upload_task::DeleteUploadedDataRequest;
use contracts::usecases::u502_download_report::{DownloadDataResponse, VpsDataResponse};
use contracts::usecases::u503_task_lists::{ExpiryData, TaskInProgress};

use super::PackerApi;
use crate::shared::error::{PackerError, PackerResult};

/// Бэкенд в памяти: пишет все вызовы, ответы выгрузки задаются сценарием
#[derive(Default)]
pub struct FakeApi {
    pub uploads: Mutex<Vec<(String, Record)>>,
    pub deletes: Mutex<Vec<DeleteUploadedDataRequest>>,
    pub hidden: Mutex<Vec<String>>,
    /// Ответы на очередные `upload_row`; при пустом сценарии успех
    pub upload_script: Mutex<VecDeque<PackerResult<()>>>,
    /// Взводится при первой неудачной выгрузке
    pub cancel_on_failure: Option<Arc<AtomicBool>>,

    pub warehouses: Vec<String>,
    pub task_names: Vec<String>,
    pub in_progress: Vec<TaskInProgress>,
    pub download: Option<DownloadDataResponse>,
    pub vps: Option<VpsDataResponse>,
    pub expiry: Vec<ExpiryData>,
}

impl FakeApi {
    pub fn failing(script: Vec<PackerResult<()>>) -> Self {
        Self {
            upload_script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn uploaded(&self) -> Vec<(String, Record)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<DeleteUploadedDataRequest> {
        self.deletes.lock().unwrap().clone()
    }
}

pub fn server_error() -> PackerError {
    PackerError::Http {
        status: 500,
        body: "Internal Server Error".to_string(),
    }
}

impl PackerApi for FakeApi {
    fn upload_row(&self, endpoint: &str, payload: &Record) -> PackerResult<()> {
        self.uploads
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload.clone()));

        let result = self.upload_script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if result.is_err() {
            if let Some(flag) = &self.cancel_on_failure {
                flag.store(true, Ordering::SeqCst);
            }
        }
        result
    }

    fn delete_uploaded_data(&self, request: &DeleteUploadedDataRequest) -> PackerResult<()> {
        self.deletes.lock().unwrap().push(request.clone());
        Ok(())
    }

    fn warehouses(&self) -> PackerResult<Vec<String>> {
        Ok(self.warehouses.clone())
    }

    fn task_names(&self, _kind: TaskListKind) -> PackerResult<Vec<String>> {
        Ok(self.task_names.clone())
    }

    fn tasks_in_progress(&self) -> PackerResult<Vec<TaskInProgress>> {
        Ok(self.in_progress.clone())
    }

    fn download(&self, task_name: &str) -> PackerResult<DownloadDataResponse> {
        self.download
            .clone()
            .ok_or_else(|| PackerError::NoData(task_name.to_string()))
    }

    fn download_vps(&self, _task_name: &str) -> PackerResult<VpsDataResponse> {
        Ok(self.vps.clone().unwrap_or_default())
    }

    fn hide_task(&self, task_name: &str) -> PackerResult<()> {
        self.hidden.lock().unwrap().push(task_name.to_string());
        Ok(())
    }

    fn expiry_data(&self, _artikul: &str) -> PackerResult<Vec<ExpiryData>> {
        Ok(self.expiry.clone())
    }
}
