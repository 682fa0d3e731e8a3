use contracts::enums::TaskListKind;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u503_task_lists::{ExpiryData, TaskInProgress, TaskLists};
use std::sync::Arc;

use crate::shared::error::{PackerError, PackerResult};
use crate::shared::packer_api::PackerApi;

/// Справочные запросы: склады, списки заданий, сроки годности
pub struct TaskListsExecutor<A: PackerApi> {
    api: Arc<A>,
}

impl<A: PackerApi> TaskListsExecutor<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn warehouses(&self) -> PackerResult<Vec<String>> {
        let sklads = self.api.warehouses()?;
        tracing::debug!("{}: {} warehouses", TaskLists::full_name(), sklads.len());
        Ok(sklads)
    }

    /// Названия заданий списка, пустые отброшены
    pub fn task_names(&self, kind: TaskListKind) -> PackerResult<Vec<String>> {
        let names = match kind {
            TaskListKind::InProgress => self
                .api
                .tasks_in_progress()?
                .into_iter()
                .map(|t| t.name)
                .collect(),
            _ => self.api.task_names(kind)?,
        };
        let names: Vec<String> = names.into_iter().filter(|n| !n.trim().is_empty()).collect();
        tracing::debug!("{}: {} tasks", kind.display_name(), names.len());
        Ok(names)
    }

    pub fn tasks_in_progress(&self) -> PackerResult<Vec<TaskInProgress>> {
        self.api.tasks_in_progress()
    }

    /// Скрыть задание из списков
    pub fn hide_task(&self, task_name: &str) -> PackerResult<()> {
        let task_name = task_name.trim();
        if task_name.is_empty() {
            return Err(PackerError::NoTaskSelected);
        }
        self.api.hide_task(task_name)?;
        tracing::info!("Task {} hidden", task_name);
        Ok(())
    }

    pub fn expiry_data(&self, artikul: &str) -> PackerResult<Vec<ExpiryData>> {
        self.api.expiry_data(artikul.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::packer_api::fake::FakeApi;

    #[test]
    fn test_in_progress_names_come_from_progress_list() {
        let api = Arc::new(FakeApi {
            in_progress: vec![
                TaskInProgress {
                    name: "1001 WB.xlsx".into(),
                    progress: 50.0,
                    total_tasks: 10.0,
                    completed_tasks: 5.0,
                },
                TaskInProgress {
                    name: " ".into(),
                    progress: 0.0,
                    total_tasks: 0.0,
                    completed_tasks: 0.0,
                },
            ],
            task_names: vec!["other".into()],
            ..FakeApi::default()
        });
        let exec = TaskListsExecutor::new(api);

        assert_eq!(exec.task_names(TaskListKind::InProgress).unwrap(), vec!["1001 WB.xlsx"]);
        assert_eq!(exec.task_names(TaskListKind::Completed).unwrap(), vec!["other"]);
    }

    #[test]
    fn test_hide_task() {
        let api = Arc::new(FakeApi::default());
        let exec = TaskListsExecutor::new(api.clone());

        exec.hide_task(" 1001 WB.xlsx ").unwrap();
        assert!(matches!(exec.hide_task(""), Err(PackerError::NoTaskSelected)));
        assert_eq!(*api.hidden.lock().unwrap(), vec!["1001 WB.xlsx".to_string()]);
    }

    #[test]
    fn test_warehouses_and_expiry() {
        let api = Arc::new(FakeApi {
            warehouses: vec!["MSK".into(), "SPB".into()],
            expiry: vec![ExpiryData {
                artikul: "A-1".into(),
                expiry_date: "01.02.2026".into(),
            }],
            ..FakeApi::default()
        });
        let exec = TaskListsExecutor::new(api);

        assert_eq!(exec.warehouses().unwrap(), vec!["MSK", "SPB"]);
        assert_eq!(exec.expiry_data("A-1").unwrap()[0].expiry_date, "01.02.2026");
    }
}
