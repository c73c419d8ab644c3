// src/core/api_client.rs
//! Typed HTTP client for the EmpleosNG API - JSON everywhere except job posting

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::error::ClientError;
use crate::types::response::{CreateApplicationRequest, StatusUpdateRequest};
use crate::types::{
    Application, ApplicationStatus, CheckAppliedResponse, JobForm, JobImage, JobListing,
    LoginRequest, LoginResponse, MessageBody, RegisterRequest, RegisterResponse,
};

const JOBS_ENDPOINT: &str = "/jobs";
const APPLICATIONS_ENDPOINT: &str = "/aplicaciones";
const CHECK_APPLIED_ENDPOINT: &str = "/aplicaciones/check";
const USER_APPLICATIONS_ENDPOINT: &str = "/aplicaciones/usuario";
const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an asset path returned by the API (job images).
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // ===== Jobs =====

    /// All job listings. Failures degrade to an empty list.
    pub async fn list_jobs(&self) -> Vec<JobListing> {
        match self.get::<Vec<JobListing>>(JOBS_ENDPOINT).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!("Failed to list jobs, showing none: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_job(&self, id: i64) -> Result<JobListing, ClientError> {
        self.get(&format!("{}/{}", JOBS_ENDPOINT, id)).await
    }

    /// Post a job as multipart form data, with an optional image part.
    pub async fn create_job(
        &self,
        form: &JobForm,
        image: Option<JobImage>,
    ) -> Result<JobListing, ClientError> {
        let mut multipart = Form::new()
            .text("employerId", form.employer_id.clone())
            .text("title", form.title.clone())
            .text("description", form.description.clone());

        if let Some(image) = image {
            debug!(
                "Attaching image {} ({} bytes)",
                image.file_name,
                image.bytes.len()
            );
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(image.content_type)?;
            multipart = multipart.part("image", part);
        }

        let url = self.url(JOBS_ENDPOINT);
        info!("Creating job '{}' via {}", form.title, url);

        let request = self.client.post(&url).multipart(multipart);
        let response = self.send(request, &url).await?;
        Self::read_json(response).await
    }

    // ===== Applications =====

    pub async fn list_applications(&self) -> Result<Vec<Application>, ClientError> {
        self.get(APPLICATIONS_ENDPOINT).await
    }

    pub async fn list_applications_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<Application>, ClientError> {
        self.get(&format!("{}/{}", USER_APPLICATIONS_ENDPOINT, user_id))
            .await
    }

    pub async fn check_applied(&self, job_id: i64, worker_id: i64) -> Result<bool, ClientError> {
        let url = self.url(CHECK_APPLIED_ENDPOINT);
        let request = self
            .client
            .get(&url)
            .query(&[("jobId", job_id), ("workerId", worker_id)]);

        let response = self.send(request, &url).await?;
        let body: CheckAppliedResponse = Self::read_json(response).await?;
        Ok(body.aplicado)
    }

    /// Create an application. A success response that only carries a
    /// `message` is a refusal and comes back as `ClientError::Rejected`.
    pub async fn create_application(
        &self,
        job_id: i64,
        worker_id: i64,
    ) -> Result<Application, ClientError> {
        let payload = CreateApplicationRequest { job_id, worker_id };
        let response = self
            .send_json(Method::POST, APPLICATIONS_ENDPOINT, &payload)
            .await?;
        let text = Self::read_text(response).await?;

        if let Ok(application) = serde_json::from_str::<Application>(&text) {
            return Ok(application);
        }
        match serde_json::from_str::<MessageBody>(&text) {
            Ok(MessageBody {
                message: Some(message),
            }) => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::Decode(format!(
                "Unexpected create application response: {}",
                text
            ))),
        }
    }

    /// Request a status change. The returned entity is the new truth.
    pub async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Application, ClientError> {
        let endpoint = format!("{}/{}", APPLICATIONS_ENDPOINT, id);
        let response = self
            .send_json(Method::PATCH, &endpoint, &StatusUpdateRequest { status })
            .await?;
        Self::read_json(response).await
    }

    // ===== Auth =====

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send_json(Method::POST, LOGIN_ENDPOINT, &payload)
            .await?;
        Self::read_json(response).await
    }

    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let payload = RegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send_json(Method::POST, REGISTER_ENDPOINT, &payload)
            .await?;
        let text = Self::read_text(response).await?;

        if text.trim().is_empty() {
            return Ok(RegisterResponse::default());
        }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("{}. Raw response: {}", e, text)))
    }

    // ===== Plumbing =====

    /// Generic GET returning a JSON body
    pub async fn get<R>(&self, endpoint: &str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let response = self.send(self.client.get(&url), &url).await?;
        Self::read_json(response).await
    }

    async fn send_json<T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: &T,
    ) -> Result<Response, ClientError>
    where
        T: Serialize,
    {
        let url = self.url(endpoint);
        let request = self.client.request(method, &url).json(payload);
        self.send(request, &url).await
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ClientError> {
        trace!("Calling {}", url);
        let response = request.send().await?;
        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&error_text)
            .ok()
            .and_then(|body| body.message);
        warn!("API error {} from {}: {}", status, url, error_text);

        Err(ClientError::Status { status, message })
    }

    async fn read_text(response: Response) -> Result<String, ClientError> {
        Ok(response.text().await?)
    }

    async fn read_json<R>(response: Response) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let text = Self::read_text(response).await?;
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("{}. Raw response: {}", e, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.uri(), 5).unwrap()
    }

    fn application_json(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "status": status,
            "job": { "id": 7, "title": "Cocinero" },
            "worker": { "id": 3, "name": "Ana" }
        })
    }

    #[test]
    fn test_asset_url() {
        let client = ApiClient::new("http://localhost:4000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(
            client.asset_url("/uploads/a.png"),
            "http://localhost:4000/uploads/a.png"
        );
        assert_eq!(
            client.asset_url("uploads/a.png"),
            "http://localhost:4000/uploads/a.png"
        );
        assert_eq!(
            client.asset_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[tokio::test]
    async fn test_list_jobs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "title": "Chofer", "createdAt": "2025-01-01T00:00:00Z" },
                { "id": 2, "title": "Mesero", "description": "Turno noche" }
            ])))
            .mount(&server)
            .await;

        let jobs = client_for(&server).await.list_jobs().await;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].description.as_deref(), Some("Turno noche"));
    }

    #[tokio::test]
    async fn test_list_jobs_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        assert!(client_for(&server).await.list_jobs().await.is_empty());

        // nothing listening at all
        let unreachable = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
        assert!(unreachable.list_jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_job_not_found_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "No existe" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.get_job(99).await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(message.as_deref(), Some("No existe"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_applied_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/aplicaciones/check"))
            .and(query_param("jobId", "7"))
            .and(query_param("workerId", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "aplicado": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).await.check_applied(7, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_application_body_and_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/aplicaciones"))
            .and(body_json(json!({ "jobId": 7, "workerId": 3 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(application_json(11, "pending")))
            .mount(&server)
            .await;

        let app = client_for(&server)
            .await
            .create_application(7, 3)
            .await
            .unwrap();
        assert_eq!(app.id, 11);
        assert_eq!(app.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_application_message_only_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/aplicaciones"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": "Ya aplicaste a este trabajo" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .create_application(7, 3)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Error al aplicar."), "Ya aplicaste a este trabajo");
    }

    #[tokio::test]
    async fn test_update_status_patches_only_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/aplicaciones/4"))
            .and(body_json(json!({ "status": "approved" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(application_json(4, "approved")))
            .expect(1)
            .mount(&server)
            .await;

        let app = client_for(&server)
            .await
            .update_application_status(4, ApplicationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(app.status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_list_applications_for_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/aplicaciones/usuario/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "status": "rejected", "job": { "id": 2, "title": "Pintor" } }
            ])))
            .mount(&server)
            .await;

        let apps = client_for(&server)
            .await
            .list_applications_for_user(3)
            .await
            .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].status, ApplicationStatus::Rejected);
        assert!(apps[0].worker.is_none());
    }

    #[tokio::test]
    async fn test_create_job_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jobs"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"employerId\""))
            .and(body_string_contains("name=\"title\""))
            .and(body_string_contains("Albañil"))
            .and(body_string_contains("filename=\"obra.png\""))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "id": 30, "title": "Albañil", "imageUrl": "/uploads/obra.png" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let form = JobForm {
            employer_id: "5".to_string(),
            title: "Albañil".to_string(),
            description: "Obra en el centro".to_string(),
        };
        let image = JobImage {
            file_name: "obra.png".to_string(),
            content_type: "image/png",
            bytes: b"fake image bytes".to_vec(),
        };

        let job = client_for(&server)
            .await
            .create_job(&form, Some(image))
            .await
            .unwrap();
        assert_eq!(job.id, 30);
        assert_eq!(job.image_url.as_deref(), Some("/uploads/obra.png"));
    }

    #[tokio::test]
    async fn test_login_and_register() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({ "email": "a@b.com", "password": "123456" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "h.p.s" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({ "fullName": "Ana", "email": "a@b.com", "password": "123456" })))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let login = client.login("a@b.com", "123456").await.unwrap();
        assert_eq!(login.token.as_deref(), Some("h.p.s"));

        let registered = client.register("Ana", "a@b.com", "123456").await.unwrap();
        assert!(registered.message.is_none());
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/aplicaciones"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .list_applications()
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
