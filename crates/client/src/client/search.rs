//! Blocking (oneshot) and export searches.
//!
//! # Invariants
//! - `search`, `exec_mode` and `output_mode` set here override same-named options
//! - The search text is never logged, only its length

use reqwest::Method;
use tracing::debug;

use crate::client::{OutputMode, SplunkClient};
use crate::error::Result;
use crate::namespace::Namespace;
use crate::options::SearchOptions;
use crate::results::{ExportJob, SearchResults, TokenReader, read_results};

const SEARCH_JOBS_PATH: &str = "search/jobs";
pub(crate) const SEARCH_EXPORT_PATH: &str = "search/jobs/export";

impl SplunkClient {
    /// Run a oneshot search and buffer the whole result.
    ///
    /// Not memory-bounded; use [`Self::search_export`] for large result sets.
    pub async fn search_blocking(
        &self,
        namespace: &Namespace,
        query: &str,
        options: SearchOptions,
    ) -> Result<SearchResults> {
        let mut params = options.into_params();
        params.set("exec_mode", "oneshot").set("search", query);

        debug!(query_len = query.len(), namespace = %namespace, "Running oneshot search");
        let stream = self
            .send(Method::POST, namespace, SEARCH_JOBS_PATH, params, OutputMode::Json)
            .await?;

        let mut reader = TokenReader::new(stream);
        let results = read_results(&mut reader).await?;
        debug!(rows = results.rows.len(), "Oneshot search complete");
        Ok(results)
    }

    /// Start an export search and return a job positioned at its first row.
    ///
    /// Fails with [`crate::ClientError::SearchFatal`] if the server reports a
    /// `FATAL` message before the rows start.
    pub async fn search_export(
        &self,
        namespace: &Namespace,
        query: &str,
        options: SearchOptions,
    ) -> Result<ExportJob> {
        let mut params = options.into_params();
        params.set("search", query);

        debug!(query_len = query.len(), namespace = %namespace, "Starting export search");
        let stream = self
            .send(
                Method::POST,
                namespace,
                SEARCH_EXPORT_PATH,
                params,
                OutputMode::JsonRows,
            )
            .await?;

        ExportJob::open(stream, self.metrics.clone())
            .await
            .inspect_err(|e| {
                if let Some(metrics) = &self.metrics {
                    metrics.record_client_error(SEARCH_EXPORT_PATH, "POST", e);
                }
            })
    }
}
