//! The backend boundary and its reqwest implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use recon_config::ApiConfig;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::{check_response, location_header, read_body};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a path reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Straight to the absolute backend base, bypassing any local proxy.
    Direct,
    /// Through the application's normal relative routing.
    Proxied,
}

/// One request, described independently of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub route: Route,
    /// Path relative to the chosen base, starting with `/`.
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            route: Route::Proxied,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            body: Some(body),
            ..Self::get(path)
        }
    }

    #[must_use]
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            body: Some(body),
            ..Self::get(path)
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn direct(mut self) -> Self {
        self.route = Route::Direct;
        self
    }
}

/// A 2xx answer. Non-success statuses surface as [`ClientError`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// JSON body, `Value::String` for non-JSON text, `Value::Null` when empty.
    pub body: Value,
    /// `Location` header, if any.
    pub location: Option<String>,
}

/// Everything the resolution protocol needs from the backend.
///
/// Implementations must be cheap to share: one backend serves many
/// concurrent resolution runs.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Full URL a request would go to. Used for diagnostics.
    fn url_for(&self, route: Route, path: &str) -> String;

    /// Send one request, with `Authorization: Bearer <token>` when a token
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-2xx status.
    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, ClientError>;
}

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub base_url: String,
    pub local_base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl From<&ApiConfig> for BackendOptions {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            local_base_url: config.local_base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// reqwest-backed [`Backend`]. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    local_base_url: String,
}

impl HttpBackend {
    /// Build a backend from connection settings.
    ///
    /// An empty `local_base_url` routes proxied requests to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when no base URL is set, or
    /// [`ClientError::Http`] if the reqwest client cannot be built.
    pub fn new(options: &BackendOptions) -> Result<Self, ClientError> {
        let base_url = options.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::InvalidUrl("backend base URL is empty".into()));
        }
        let local_base_url = match options.local_base_url.trim().trim_end_matches('/') {
            "" => base_url.clone(),
            local => local.to_string(),
        };
        let http = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            local_base_url,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn url_for(&self, route: Route, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = match route {
            Route::Direct => &self.base_url,
            Route::Proxied => &self.local_base_url,
        };
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(request.route, &request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Patch => self.http.patch(&url),
        };
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!(method = %request.method, %url, "sending request");
        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Http(e)
            }
        })?;
        let resp = check_response(resp).await?;
        let status = resp.status().as_u16();
        let location = location_header(&resp);
        let body = read_body(resp).await?;
        Ok(ApiResponse {
            status,
            body,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(base: &str, local: &str) -> BackendOptions {
        BackendOptions {
            base_url: base.into(),
            local_base_url: local.into(),
            request_timeout: Duration::from_secs(5),
            user_agent: "recon-test".into(),
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = HttpBackend::new(&options("  ", "")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn url_for_picks_base_per_route() {
        let backend =
            HttpBackend::new(&options("https://api.example.org/api/", "http://localhost:5173/api"))
                .unwrap();
        assert_eq!(
            backend.url_for(Route::Direct, "/Evaluation/3/generate-pdf"),
            "https://api.example.org/api/Evaluation/3/generate-pdf"
        );
        assert_eq!(
            backend.url_for(Route::Proxied, "Evaluation/3"),
            "http://localhost:5173/api/Evaluation/3"
        );
    }

    #[test]
    fn empty_local_base_falls_back_to_backend() {
        let backend = HttpBackend::new(&options("https://api.example.org", "")).unwrap();
        assert_eq!(
            backend.url_for(Route::Proxied, "/Evaluation"),
            "https://api.example.org/Evaluation"
        );
    }

    #[test]
    fn absolute_paths_pass_through() {
        let backend = HttpBackend::new(&options("https://api.example.org", "")).unwrap();
        assert_eq!(
            backend.url_for(Route::Proxied, "https://files.example.org/x"),
            "https://files.example.org/x"
        );
    }

    #[test]
    fn request_builders_set_method_and_route() {
        let req = ApiRequest::post("/Evaluation/1/generate-pdf").direct();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.route, Route::Direct);
        assert!(req.body.is_none());

        let req = ApiRequest::patch("/Evaluation/update", serde_json::json!({"id": 1}));
        assert_eq!(req.method, Method::Patch);
        assert_eq!(req.route, Route::Proxied);
        assert!(req.body.is_some());
    }
}
