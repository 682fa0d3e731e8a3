use contracts::usecases::u501_upload_task::{UploadProgress, UploadStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Сколько последних сообщений об ошибках хранит сессия
pub const MAX_ERROR_MESSAGES: usize = 100;

fn push_message(progress: &mut UploadProgress, message: String) {
    progress.error_messages.push(message);
    let excess = progress.error_messages.len().saturating_sub(MAX_ERROR_MESSAGES);
    if excess > 0 {
        progress.error_messages.drain(..excess);
    }
}

/// Трекер прогресса выгрузки (in-memory)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, UploadProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, UploadProgress>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, UploadProgress>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    fn with_session(&self, session_id: &str, f: impl FnOnce(&mut UploadProgress)) {
        if let Some(p) = self.write().get_mut(session_id) {
            f(p);
            p.updated_at = chrono::Utc::now();
        }
    }

    pub fn create_session(&self, session_id: String) {
        self.write()
            .insert(session_id.clone(), UploadProgress::new(session_id));
    }

    pub fn get_progress(&self, session_id: &str) -> Option<UploadProgress> {
        self.read().get(session_id).cloned()
    }

    pub fn set_total(&self, session_id: &str, total: i32) {
        self.with_session(session_id, |p| p.total = Some(total));
    }

    pub fn update_progress(&self, session_id: &str, processed: i32, current_item: Option<String>) {
        self.with_session(session_id, |p| {
            p.processed = processed;
            p.current_item = current_item;
        });
    }

    /// Неудачная попытка, после которой строка уйдёт повторно
    pub fn add_retry(&self, session_id: &str, message: String) {
        self.with_session(session_id, |p| {
            p.retries += 1;
            push_message(p, message);
        });
    }

    pub fn add_error(&self, session_id: &str, message: String) {
        self.with_session(session_id, |p| push_message(p, message));
    }

    pub fn complete_session(&self, session_id: &str, status: UploadStatus) {
        self.with_session(session_id, |p| {
            p.status = status;
            p.completed_at = Some(chrono::Utc::now());
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let tracker = ProgressTracker::new();
        tracker.create_session("s1".into());
        tracker.set_total("s1", 4);
        tracker.update_progress("s1", 2, Some("строка 3".into()));
        tracker.add_retry("s1", "500".into());

        let p = tracker.get_progress("s1").unwrap();
        assert_eq!(p.status, UploadStatus::Running);
        assert_eq!(p.percent(), 50.0);
        assert_eq!(p.retries, 1);
        assert_eq!(p.current_item.as_deref(), Some("строка 3"));

        tracker.complete_session("s1", UploadStatus::Completed);
        let p = tracker.get_progress("s1").unwrap();
        assert_eq!(p.status, UploadStatus::Completed);
        assert!(p.completed_at.is_some());
    }

    #[test]
    fn test_error_messages_keep_only_latest() {
        let tracker = ProgressTracker::new();
        tracker.create_session("s1".into());
        let attempts = MAX_ERROR_MESSAGES + 25;
        for i in 0..attempts {
            tracker.add_retry("s1", format!("попытка {i}"));
        }
        tracker.add_error("s1", "отмена".into());

        let p = tracker.get_progress("s1").unwrap();
        assert_eq!(p.retries, attempts as i32);
        assert_eq!(p.error_messages.len(), MAX_ERROR_MESSAGES);
        assert_eq!(p.error_messages[0], "попытка 26");
        assert_eq!(p.error_messages.last().map(String::as_str), Some("отмена"));
    }

    #[test]
    fn test_unknown_session_is_ignored() {
        let tracker = ProgressTracker::default();
        tracker.set_total("missing", 1);
        assert!(tracker.get_progress("missing").is_none());
    }
}
