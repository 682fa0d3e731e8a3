use super::progress_tracker::ProgressTracker;
use contracts::shared::Record;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_upload_task::{
    DeleteUploadedDataRequest, UploadRequest, UploadResponse, UploadStatus, UploadTask,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::domain::a001_packing_record::{NormalizerPolicy, PayloadBuilder, PayloadContext};
use crate::shared::config::UploadConfig;
use crate::shared::error::{PackerError, PackerResult};
use crate::shared::excel::{read_first_sheet, Sheet};
use crate::shared::packer_api::PackerApi;

/// Шаг, с которым пауза проверяет флаг отмены
const PAUSE_SLICE: Duration = Duration::from_millis(100);

/// Executor для UseCase выгрузки задания: по одному POST на строку
pub struct UploadExecutor<A: PackerApi> {
    api: Arc<A>,
    config: UploadConfig,
    cancel: Arc<AtomicBool>,
    pub progress_tracker: Arc<ProgressTracker>,
}

impl<A: PackerApi> UploadExecutor<A> {
    pub fn new(api: Arc<A>, config: UploadConfig, progress_tracker: Arc<ProgressTracker>) -> Self {
        Self {
            api,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
            progress_tracker,
        }
    }

    /// Внешний флаг отмены, например от оболочки с кнопкой «Стоп»
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Флаг отмены; проверяется между попытками
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Выгрузить файл из запроса
    pub fn execute(&self, request: &UploadRequest) -> PackerResult<UploadResponse> {
        let path = Path::new(&request.file_path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.file_path.clone());

        let sheet = read_first_sheet(path)?;
        tracing::info!("Read {} rows from {}", sheet.len(), path.display());
        self.upload_sheet(&file_name, &sheet, request)
    }

    /// Выгрузить уже прочитанный лист под именем `file_name`
    pub fn upload_sheet(
        &self,
        file_name: &str,
        sheet: &Sheet,
        request: &UploadRequest,
    ) -> PackerResult<UploadResponse> {
        let schema = request.schema;
        let endpoint = schema
            .upload_endpoint()
            .ok_or(PackerError::NotUploadable(schema))?;

        let preset = request
            .preset
            .unwrap_or_else(|| self.config.preset_for(schema));
        tracing::info!(
            "{}: schema {}, endpoint {}, normalizer preset {}",
            UploadTask::full_name(),
            schema,
            endpoint,
            preset
        );

        let context = PayloadContext::new(file_name, request.warehouse.clone());
        let builder = PayloadBuilder::new(schema, NormalizerPolicy::from(preset));
        let payloads = builder.build_all(sheet, &context)?;

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        self.progress_tracker
            .set_total(&session_id, payloads.len() as i32);

        match self.upload_rows(&session_id, endpoint, &payloads) {
            Ok(retries) => {
                self.progress_tracker
                    .update_progress(&session_id, payloads.len() as i32, None);
                self.progress_tracker
                    .complete_session(&session_id, UploadStatus::Completed);
                tracing::info!(
                    "Uploaded {} rows of {} ({} retries)",
                    payloads.len(),
                    file_name,
                    retries
                );
                Ok(UploadResponse {
                    session_id,
                    status: UploadStatus::Completed,
                    task_name: context.file_name,
                    prefix: context.prefix,
                    rows_uploaded: payloads.len(),
                    retries,
                })
            }
            Err(PackerError::Cancelled) => {
                tracing::warn!("Upload of {} cancelled, rolling back", file_name);
                self.rollback(&context);
                self.progress_tracker
                    .complete_session(&session_id, UploadStatus::Cancelled);
                Err(PackerError::Cancelled)
            }
            Err(e) => {
                tracing::error!("Upload of {} failed: {}", file_name, e);
                self.progress_tracker
                    .add_error(&session_id, format!("Upload failed: {}", e));
                self.progress_tracker
                    .complete_session(&session_id, UploadStatus::Failed);
                Err(e)
            }
        }
    }

    /// Строки строго по очереди; возвращает число повторов
    fn upload_rows(&self, session_id: &str, endpoint: &str, payloads: &[Record]) -> PackerResult<usize> {
        let mut retries = 0;

        for (idx, payload) in payloads.iter().enumerate() {
            if idx > 0 {
                self.pause(self.config.row_pause_ms);
            }
            self.progress_tracker.update_progress(
                session_id,
                idx as i32,
                Some(format!("строка {}", idx + 1)),
            );
            retries += self.upload_with_retry(session_id, endpoint, idx, payload)?;
        }

        Ok(retries)
    }

    fn upload_with_retry(
        &self,
        session_id: &str,
        endpoint: &str,
        idx: usize,
        payload: &Record,
    ) -> PackerResult<usize> {
        let mut attempt: u32 = 0;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Err(PackerError::Cancelled);
            }
            attempt += 1;

            match self.api.upload_row(endpoint, payload) {
                Ok(()) => return Ok(attempt as usize - 1),
                Err(e) if e.is_transient() => {
                    let msg = format!("Row {} attempt {} failed: {}", idx + 1, attempt, e);
                    tracing::warn!("{}", msg);
                    self.progress_tracker.add_retry(session_id, msg);

                    if self.config.max_attempts.is_some_and(|max| attempt >= max) {
                        return Err(e);
                    }
                    self.pause(self.config.retry_delay_ms);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Удалить с сервера строки задания, выгруженные из файла `file_name`
    pub fn delete_uploaded(&self, file_name: &str) -> PackerResult<()> {
        let context = PayloadContext::new(file_name, None);
        let request = DeleteUploadedDataRequest {
            pref: context.prefix,
            task_name: context.file_name,
        };
        self.api.delete_uploaded_data(&request)?;
        tracing::info!("Deleted uploaded data of {}", file_name);
        Ok(())
    }

    // Ошибка отката только логируется
    fn rollback(&self, context: &PayloadContext) {
        if let Err(e) = self.delete_uploaded(&context.file_name) {
            tracing::error!("Failed to delete uploaded data of {}: {}", context.file_name, e);
        }
    }

    /// Пауза прерывается отменой
    fn pause(&self, millis: u64) {
        let deadline = Instant::now() + Duration::from_millis(millis);
        while !self.cancel.load(Ordering::SeqCst) {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            std::thread::sleep(left.min(PAUSE_SLICE));
        }
    }
}
