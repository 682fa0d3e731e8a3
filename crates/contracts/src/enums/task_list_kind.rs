use serde::{Deserialize, Serialize};

/// Списки заданий, которые отдаёт бэкенд
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskListKind {
    InProgress,
    Completed,
    Uploaded,
    /// Уникальные названия заданий ВПС
    Distinct,
}

impl TaskListKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            TaskListKind::InProgress => "/tasks-in-progress",
            TaskListKind::Completed => "/completed-tasks",
            TaskListKind::Uploaded => "/uploaded-tasks",
            TaskListKind::Distinct => "/distinctName",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskListKind::InProgress => "Задания в работе",
            TaskListKind::Completed => "Завершённые задания",
            TaskListKind::Uploaded => "Загруженные задания",
            TaskListKind::Distinct => "Задания ВПС",
        }
    }
}
