//! Authenticated requests and HTTP error mapping.
//!
//! # What this module handles:
//! - Building `<base_url>/<namespace prefix><path>` URLs
//! - Forcing `output_mode` and attaching the `Authorization` header
//! - Mapping send failures to `ConnectionFailed` and statuses >= 400 to `Api`
//!
//! # Invariants
//! - POST (and any other method with a body) sends parameters as a
//!   URL-encoded form body. GET and DELETE are the exception: their
//!   parameters go in the query string and they carry no body
//! - Error bodies that are not a message list still yield an `Api` error
//!   carrying the status
//! - `get`/`post`/`delete` drop the response stream on every path

use std::time::Instant;

use futures::TryStreamExt;
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::client::SplunkClient;
use crate::error::{ApiError, ClientError, Result};
use crate::namespace::Namespace;
use crate::params::Params;
use crate::results::{ByteStream, TokenReader};

/// Value forced into the `output_mode` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Json,
    JsonRows,
}

impl OutputMode {
    fn as_str(self) -> &'static str {
        match self {
            OutputMode::Json => "json",
            OutputMode::JsonRows => "json_rows",
        }
    }
}

impl SplunkClient {
    /// Full URL of `path` under `namespace`.
    pub fn endpoint_url(&self, namespace: &Namespace, path: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url,
            namespace.path_prefix(),
            path.trim_start_matches('/')
        )
    }

    /// Send an authenticated request with `output_mode=json` and return the
    /// response body as a stream.
    pub async fn request(
        &self,
        method: Method,
        namespace: &Namespace,
        path: &str,
        params: Params,
    ) -> Result<ByteStream> {
        self.send(method, namespace, path, params, OutputMode::Json)
            .await
    }

    /// GET and decode one JSON value.
    pub async fn get(
        &self,
        namespace: &Namespace,
        path: &str,
        params: Params,
    ) -> Result<serde_json::Value> {
        self.request_value(Method::GET, namespace, path, params)
            .await
    }

    /// POST and decode one JSON value.
    pub async fn post(
        &self,
        namespace: &Namespace,
        path: &str,
        params: Params,
    ) -> Result<serde_json::Value> {
        self.request_value(Method::POST, namespace, path, params)
            .await
    }

    /// DELETE and decode one JSON value.
    pub async fn delete(
        &self,
        namespace: &Namespace,
        path: &str,
        params: Params,
    ) -> Result<serde_json::Value> {
        self.request_value(Method::DELETE, namespace, path, params)
            .await
    }

    async fn request_value(
        &self,
        method: Method,
        namespace: &Namespace,
        path: &str,
        params: Params,
    ) -> Result<serde_json::Value> {
        let stream = self.request(method, namespace, path, params).await?;
        let mut reader = TokenReader::new(stream);
        reader.decode("JSON document").await
    }

    /// Send with the session's current `Authorization` header.
    pub(crate) async fn send(
        &self,
        method: Method,
        namespace: &Namespace,
        path: &str,
        params: Params,
        mode: OutputMode,
    ) -> Result<ByteStream> {
        let authorization = self.session.authorization_header();
        self.send_with_auth(method, namespace, path, params, mode, authorization)
            .await
    }

    /// Send with an explicit `Authorization` header value.
    pub(crate) async fn send_with_auth(
        &self,
        method: Method,
        namespace: &Namespace,
        path: &str,
        mut params: Params,
        mode: OutputMode,
        authorization: Option<String>,
    ) -> Result<ByteStream> {
        params.set("output_mode", mode.as_str());
        let url = self.endpoint_url(namespace, path);
        let method_label = method.as_str().to_string();

        debug!(method = %method, url = %url, "Sending request");
        if let Some(metrics) = &self.metrics {
            metrics.record_request(path, &method_label);
        }
        let started = Instant::now();

        let pairs = params.to_pairs();
        let mut builder = self.http.request(method.clone(), &url);
        builder = if method == Method::GET || method == Method::DELETE {
            builder.query(&pairs)
        } else {
            builder.form(&pairs)
        };
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::connection(&url, e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_request_duration(path, &method_label, started.elapsed(), None);
                    metrics.record_client_error(path, &method_label, &err);
                }
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        if let Some(metrics) = &self.metrics {
            metrics.record_request_duration(path, &method_label, started.elapsed(), Some(status));
        }

        if status >= 400 {
            let body = response.bytes().await.unwrap_or_default();
            let err = ClientError::Api(ApiError::from_body(status, &body));
            debug!(status, url = %url, "Request failed");
            if let Some(metrics) = &self.metrics {
                metrics.record_client_error(path, &method_label, &err);
            }
            return Err(err);
        }

        Ok(Box::pin(response.bytes_stream().map_err(ClientError::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SplunkClient {
        SplunkClient::builder()
            .base_url("https://localhost:8089/".to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_url_global() {
        assert_eq!(
            client().endpoint_url(&Namespace::global(), "search/jobs"),
            "https://localhost:8089/services/search/jobs"
        );
    }

    #[test]
    fn test_endpoint_url_namespaced() {
        assert_eq!(
            client().endpoint_url(&Namespace::new("admin", "search"), "/search/jobs/export"),
            "https://localhost:8089/servicesNS/admin/search/search/jobs/export"
        );
    }

    #[test]
    fn test_output_mode_values() {
        assert_eq!(OutputMode::Json.as_str(), "json");
        assert_eq!(OutputMode::JsonRows.as_str(), "json_rows");
    }
}
