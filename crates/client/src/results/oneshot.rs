//! Fully buffered results of a oneshot (blocking) search.
//!
//! The oneshot envelope carries the same header keys as an export, inline
//! with other keys this client does not use (skipped), and the rows under
//! `results` (or `rows`). A row may be an object of field to value, or a
//! positional array matched against the header's fields.

use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::results::header::SearchHeader;
use crate::results::tokens::{Token, TokenReader};
use crate::results::value::{Row, decode_value};

/// A complete search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub header: SearchHeader,
    pub rows: Vec<Row>,
}

/// Decode a whole result document.
pub(crate) async fn read_results(reader: &mut TokenReader) -> Result<SearchResults> {
    reader.expect(Token::ObjectStart).await?;
    let mut results = SearchResults::default();
    loop {
        match reader.next_token().await? {
            Token::ObjectEnd => break,
            Token::Str(key) => match key.as_str() {
                "preview" => results.header.preview = reader.decode("boolean").await?,
                "init_offset" => results.header.init_offset = reader.decode("integer").await?,
                "messages" => results.header.messages = reader.decode("list of messages").await?,
                "fields" => results.header.fields = reader.decode("list of fields").await?,
                "results" | "rows" => {
                    let names = results.header.field_names();
                    results.rows = read_rows(reader, &names).await?;
                }
                _ => reader.skip_value().await?,
            },
            other => return Err(ClientError::malformed("result key or '}'", other)),
        }
    }
    Ok(results)
}

async fn read_rows(reader: &mut TokenReader, names: &[String]) -> Result<Vec<Row>> {
    reader.expect(Token::ArrayStart).await?;
    let mut rows = Vec::new();
    while reader.more().await? {
        let row = match reader.next_token().await? {
            Token::ObjectStart => read_object_row(reader).await?,
            Token::ArrayStart => read_positional_row(reader, names).await?,
            other => return Err(ClientError::malformed("row object or array", other)),
        };
        rows.push(row);
    }
    reader.expect(Token::ArrayEnd).await?;
    Ok(rows)
}

async fn read_object_row(reader: &mut TokenReader) -> Result<Row> {
    let mut row = Row::new();
    loop {
        match reader.next_token().await? {
            Token::ObjectEnd => return Ok(row),
            Token::Str(name) => {
                let raw = reader.raw_value().await?;
                row.insert(name, decode_value(&raw)?);
            }
            other => return Err(ClientError::malformed("field name or '}'", other)),
        }
    }
}

/// Read the values of a positional row whose `[` was already consumed.
pub(crate) async fn read_positional_row(reader: &mut TokenReader, names: &[String]) -> Result<Row> {
    let mut raw_values = Vec::with_capacity(names.len());
    while reader.more().await? {
        raw_values.push(reader.raw_value().await?);
    }
    reader.expect(Token::ArrayEnd).await?;

    if raw_values.len() != names.len() {
        return Err(ClientError::RecordLength {
            found: raw_values.len(),
            expected: names.len(),
        });
    }
    names
        .iter()
        .zip(raw_values)
        .map(|(name, raw)| Ok((name.clone(), decode_value(&raw)?)))
        .collect()
}
