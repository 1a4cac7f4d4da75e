use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::models::pagination::{ListQuery, ListResponse};

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Thin JSON-over-HTTP client for the console backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AdminConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Http(format!("HTTP client error: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string());
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send_text(&self, builder: reqwest::RequestBuilder) -> AppResult<String> {
        let resp = builder
            .send()
            .await
            .map_err(|e| AppError::Http(format!("HTTP request error: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Http(format!("Read body error: {e}")))?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();
            let code = parsed.as_ref().and_then(|b| b.code.clone());
            let message = parsed
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            log::warn!("[ApiClient] HTTP {} code={:?} message={}", status, code, message);
            return Err(AppError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> AppResult<T> {
        let body = self.send_text(builder).await?;
        serde_json::from_str::<T>(&body).map_err(AppError::Serde)
    }

    /// Send `builder`, giving up as soon as `cancel` fires. Dropping the
    /// request future aborts the connection.
    async fn send_cancellable<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> AppResult<T> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = self.send_json::<T>(builder) => result,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send_json(self.request(reqwest::Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_string(body)?;
        self.send_json(
            self.request(reqwest::Method::POST, path)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_string(body)?;
        self.send_json(
            self.request(reqwest::Method::PUT, path)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let body = serde_json::to_string(body)?;
        self.send_json(
            self.request(reqwest::Method::PATCH, path)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }

    /// DELETE; the body (usually `{message}`) is returned verbatim.
    pub async fn delete(&self, path: &str) -> AppResult<String> {
        self.send_text(self.request(reqwest::Method::DELETE, path)).await
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<ListResponse<T>> {
        log::debug!(
            "[ApiClient] GET {} page={} page_size={} filters={:?}",
            path,
            query.page,
            query.page_size,
            query.filters
        );
        let builder = self
            .request(reqwest::Method::GET, path)
            .query(&query.to_query_pairs());
        self.send_cancellable(builder, cancel).await
    }
}
