use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ответ `GET /sklads`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehousesResponse {
    #[serde(default)]
    pub sklads: Vec<String>,
}

/// Ответ списков заданий.
///
/// `/completed-tasks` и `/uploaded-tasks` отдают `{tasks}`,
/// `/distinctName` отдаёт `{success, data}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub tasks: Option<Vec<String>>,
    #[serde(default)]
    pub data: Option<Vec<String>>,
}

impl TaskListResponse {
    pub fn into_names(self) -> Vec<String> {
        self.tasks.or(self.data).unwrap_or_default()
    }
}

/// Ответ `GET /tasks-in-progress`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksInProgressResponse {
    #[serde(rename = "tasksInProgress", default)]
    pub tasks_in_progress: Vec<TaskInProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInProgress {
    #[serde(rename = "Nazvanie_Zadaniya", default)]
    pub name: String,
    /// Процент выполнения; сервер присылает то число, то строку
    #[serde(rename = "Progress", default, deserialize_with = "lenient_f64")]
    pub progress: f64,
    #[serde(rename = "TotalTasks", default, deserialize_with = "lenient_f64")]
    pub total_tasks: f64,
    #[serde(rename = "CompletedTasks", default, deserialize_with = "lenient_f64")]
    pub completed_tasks: f64,
}

/// Ответ `GET /expiry-data?artikul=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpiryDataResponse {
    #[serde(rename = "expiryData", default)]
    pub expiry_data: Vec<ExpiryData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryData {
    #[serde(rename = "Artikul", default)]
    pub artikul: String,
    #[serde(rename = "ExpiryDate", default)]
    pub expiry_date: String,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
