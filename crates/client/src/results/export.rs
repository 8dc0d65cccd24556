//! Streaming decoder for export search results.
//!
//! An export response is one JSON object: header keys (`preview`,
//! `init_offset`, `messages`, `fields`) in any order, then `rows`, an array
//! of positional row arrays. [`ExportJob`] parses the header when it is
//! created and then decodes one row per [`ExportJob::next`] call, pulling
//! bytes from the response only as needed.
//!
//! # Invariants
//! - `rows` is the last header key; anything after the row array except the
//!   closing `}` is malformed
//! - A `FATAL` message in the header aborts construction
//! - Every row has exactly as many values as the header has fields
//! - The response stream is released exactly once: on exhaustion, on the
//!   first error, on `close()`, or when the job is dropped
//! - After termination `next()` returns `Ok(None)` and the terminal error, if
//!   any, stays available through `last_error()`

use futures::Stream;
use tracing::debug;

use crate::client::SEARCH_EXPORT_PATH;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::results::header::SearchHeader;
use crate::results::tokens::{ByteStream, Token, TokenReader};
use crate::results::oneshot::read_positional_row;
use crate::results::value::Row;

/// Lifecycle of an [`ExportJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    /// Rows may still be available.
    Streaming,
    /// The row array and envelope closed cleanly.
    Exhausted,
    /// Decoding failed; see [`ExportJob::last_error`].
    Failed,
    /// The caller closed the job before the rows ran out.
    Closed,
}

/// Everything [`ExportJob::drain`] collected.
#[derive(Debug)]
pub struct Drained {
    pub rows: Vec<Row>,
    /// The error that terminated the job, if any.
    pub error: Option<ClientError>,
}

/// A streaming export search positioned inside its row array.
#[derive(Debug)]
pub struct ExportJob {
    header: SearchHeader,
    field_names: Vec<String>,
    reader: Option<TokenReader>,
    state: ExportState,
    last_error: Option<ClientError>,
    rows_read: u64,
    metrics: Option<MetricsCollector>,
}

impl ExportJob {
    /// Parse the header from `stream` and return a job ready to yield rows.
    ///
    /// On error the stream is dropped before returning.
    pub async fn from_stream(stream: ByteStream) -> Result<Self> {
        Self::open(stream, None).await
    }

    pub(crate) async fn open(stream: ByteStream, metrics: Option<MetricsCollector>) -> Result<Self> {
        let mut reader = TokenReader::new(stream);
        let header = read_header(&mut reader).await?;
        let field_names = header.field_names();
        debug!(
            fields = field_names.len(),
            preview = header.preview,
            init_offset = header.init_offset,
            "Export header parsed"
        );
        Ok(Self {
            header,
            field_names,
            reader: Some(reader),
            state: ExportState::Streaming,
            last_error: None,
            rows_read: 0,
            metrics,
        })
    }

    pub fn header(&self) -> &SearchHeader {
        &self.header
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Whether the response stream has been released.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Decode the next row.
    ///
    /// Returns `Ok(None)` once the rows are exhausted or the job has
    /// terminated. An error terminates the job and releases the stream.
    pub async fn next(&mut self) -> Result<Option<Row>> {
        if self.state != ExportState::Streaming {
            return Ok(None);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        match read_row(reader, &self.field_names).await {
            Ok(Some(row)) => {
                self.rows_read += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.record_export_rows(1);
                }
                Ok(Some(row))
            }
            Ok(None) => {
                self.terminate(ExportState::Exhausted);
                Ok(None)
            }
            Err(e) => {
                debug!(rows_read = self.rows_read, error = %e, "Export stream failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_client_error(SEARCH_EXPORT_PATH, "POST", &e);
                }
                self.last_error = Some(e.clone());
                self.terminate(ExportState::Failed);
                Err(e)
            }
        }
    }

    /// Read every remaining row, then report the error that ended the job.
    pub async fn drain(&mut self) -> Drained {
        let mut rows = Vec::new();
        loop {
            match self.next().await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) | Err(_) => break,
            }
        }
        Drained {
            rows,
            error: self.last_error.clone(),
        }
    }

    /// Release the response stream. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.state == ExportState::Streaming {
            self.terminate(ExportState::Closed);
        }
    }

    /// Adapt the job into a stream of rows. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Row>> + Send {
        futures::stream::unfold(self, |mut job| async move {
            match job.next().await {
                Ok(Some(row)) => Some((Ok(row), job)),
                Ok(None) => None,
                Err(e) => Some((Err(e), job)),
            }
        })
    }

    fn terminate(&mut self, state: ExportState) {
        if self.reader.take().is_some() {
            debug!(rows_read = self.rows_read, ?state, "Export stream released");
        }
        self.state = state;
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        if self.reader.take().is_some() {
            debug!(
                rows_read = self.rows_read,
                "Export job dropped while streaming; releasing stream"
            );
        }
    }
}

/// Parse header keys up to and including the opening `[` of `rows`.
async fn read_header(reader: &mut TokenReader) -> Result<SearchHeader> {
    reader.expect(Token::ObjectStart).await?;
    let mut header = SearchHeader::default();
    loop {
        let key = match reader.next_token().await? {
            Token::Str(key) => key,
            other => return Err(ClientError::malformed("header key", other)),
        };
        match key.as_str() {
            "preview" => header.preview = reader.decode("boolean").await?,
            "init_offset" => header.init_offset = reader.decode("integer").await?,
            "fields" => header.fields = reader.decode("list of fields").await?,
            "messages" => {
                header.messages = reader.decode("list of messages").await?;
                if let Some(fatal) = header.fatal_message() {
                    return Err(ClientError::SearchFatal(fatal.text.clone()));
                }
            }
            "rows" => {
                reader.expect(Token::ArrayStart).await?;
                return Ok(header);
            }
            _ => {
                return Err(ClientError::malformed(
                    "header key",
                    Token::Str(key),
                ));
            }
        }
    }
}

/// Decode one positional row, or close the envelope when the rows run out.
async fn read_row(reader: &mut TokenReader, names: &[String]) -> Result<Option<Row>> {
    if !reader.more().await? {
        reader.expect(Token::ArrayEnd).await?;
        reader.expect(Token::ObjectEnd).await?;
        return Ok(None);
    }

    reader.expect(Token::ArrayStart).await?;
    read_positional_row(reader, names).await.map(Some)
}
