use contracts::enums::TaskListKind;
use contracts::shared::Record;
use contracts::usecases::u501_upload_task::DeleteUploadedDataRequest;
use contracts::usecases::u502_download_report::{DownloadDataResponse, VpsDataResponse};
use contracts::usecases::u503_task_lists::{
    ExpiryData, ExpiryDataResponse, HideTaskRequest, TaskInProgress, TaskListResponse,
    TasksInProgressResponse, WarehousesResponse,
};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::PackerApi;
use crate::shared::config::ServerConfig;
use crate::shared::error::{PackerError, PackerResult};

/// HTTP-клиент бэкенда склада (синхронный)
pub struct PackerApiClient {
    client: Client,
    base_url: String,
    upload_timeout: Duration,
    request_timeout: Duration,
}

impl PackerApiClient {
    pub fn new(server: &ServerConfig) -> PackerResult<Self> {
        let client = Client::builder().gzip(true).deflate(true).build()?;
        Ok(Self {
            client,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            upload_timeout: server.upload_timeout(),
            request_timeout: server.request_timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Отправка запроса; любой статус кроме 200 даёт ошибку `Http`
    fn send(&self, request: RequestBuilder, what: &str) -> PackerResult<String> {
        let response = request
            .send()
            .map_err(|e| PackerError::Network(format!("{}: {}", what, e)))?;

        let status = response.status();
        tracing::debug!("Packer API response: {} for {}", status, what);

        let body = response.text().unwrap_or_default();
        if status.as_u16() != 200 {
            return Err(PackerError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> PackerResult<T> {
        let request = self
            .client
            .get(self.url(path))
            .query(query)
            .timeout(self.request_timeout);
        let body = self.send(request, path)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> PackerResult<()> {
        let request = self.client.post(self.url(path)).json(body).timeout(timeout);
        self.send(request, path).map(|_| ())
    }
}

impl PackerApi for PackerApiClient {
    fn upload_row(&self, endpoint: &str, payload: &Record) -> PackerResult<()> {
        self.post_json(endpoint, payload, self.upload_timeout)
    }

    fn delete_uploaded_data(&self, request: &DeleteUploadedDataRequest) -> PackerResult<()> {
        tracing::info!(
            "Deleting uploaded data: pref={}, task={}",
            request.pref,
            request.task_name
        );
        self.post_json("/delete-uploaded-data", request, self.request_timeout)
    }

    fn warehouses(&self) -> PackerResult<Vec<String>> {
        let response: WarehousesResponse = self.get_json("/sklads", &[])?;
        Ok(response.sklads)
    }

    fn task_names(&self, kind: TaskListKind) -> PackerResult<Vec<String>> {
        let response: TaskListResponse = self.get_json(kind.endpoint(), &[])?;
        Ok(response.into_names())
    }

    fn tasks_in_progress(&self) -> PackerResult<Vec<TaskInProgress>> {
        let response: TasksInProgressResponse =
            self.get_json(TaskListKind::InProgress.endpoint(), &[])?;
        Ok(response.tasks_in_progress)
    }

    fn download(&self, task_name: &str) -> PackerResult<DownloadDataResponse> {
        self.get_json("/download", &[("task", task_name)])
    }

    fn download_vps(&self, task_name: &str) -> PackerResult<VpsDataResponse> {
        self.get_json("/downloadData", &[("task", task_name)])
    }

    fn hide_task(&self, task_name: &str) -> PackerResult<()> {
        let body = HideTaskRequest {
            nazvanie_zdaniya: task_name.to_string(),
        };
        self.post_json("/hideTask", &body, self.request_timeout)
    }

    fn expiry_data(&self, artikul: &str) -> PackerResult<Vec<ExpiryData>> {
        let response: ExpiryDataResponse = self.get_json("/expiry-data", &[("artikul", artikul)])?;
        Ok(response.expiry_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> PackerApiClient {
        PackerApiClient::new(&ServerConfig {
            base_url: server.url(),
            upload_timeout_secs: 5,
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_upload_row_posts_json() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/upload-data")
            .match_body(Matcher::Json(json!({"Artikul": "A1", "Status": 0})))
            .with_status(200)
            .create();

        let mut payload = Record::new();
        payload.insert("Artikul".into(), json!("A1"));
        payload.insert("Status".into(), json!(0));

        client_for(&server).upload_row("/upload-data", &payload).unwrap();
        mock.assert();
    }

    #[test]
    fn test_non_200_is_http_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/uploadData")
            .with_status(500)
            .with_body("db locked")
            .create();

        let err = client_for(&server)
            .upload_row("/uploadData", &Record::new())
            .unwrap_err();
        match err {
            PackerError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "db locked");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_download_passes_task_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/download")
            .match_query(Matcher::UrlEncoded("task".into(), "1001 WB.xlsx".into()))
            .with_status(200)
            .with_body(r#"{"dataSet1":[{"Artikul":"A"}],"dataSet2":[]}"#)
            .create();

        let response = client_for(&server).download("1001 WB.xlsx").unwrap();
        assert_eq!(response.data_set1.len(), 1);
        assert!(response.data_set2.is_some());
        mock.assert();
    }

    #[test]
    fn test_task_lists() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/sklads")
            .with_status(200)
            .with_body(r#"{"sklads":["СПБ","МСК"]}"#)
            .create();
        server
            .mock("GET", "/distinctName")
            .with_status(200)
            .with_body(r#"{"success":true,"data":["ВПС 1"]}"#)
            .create();

        let client = client_for(&server);
        assert_eq!(client.warehouses().unwrap(), vec!["СПБ", "МСК"]);
        assert_eq!(
            client.task_names(TaskListKind::Distinct).unwrap(),
            vec!["ВПС 1"]
        );
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/expiry-data")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>")
            .create();

        let err = client_for(&server).expiry_data("A1").unwrap_err();
        assert!(matches!(err, PackerError::Json(_)));
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        let client = PackerApiClient::new(&ServerConfig {
            base_url: "http://127.0.0.1:1".into(),
            upload_timeout_secs: 1,
            request_timeout_secs: 1,
        })
        .unwrap();
        let err = client.hide_task("x").unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(err, PackerError::Network(_)));
    }
}
