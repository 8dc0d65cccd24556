//! Pull-style JSON token reader over an async byte stream.
//!
//! The reader walks a JSON document one token at a time, fetching more bytes
//! from the underlying stream only when the current buffer runs out. It keeps
//! a small state machine of the enclosing containers so separators (`,` and
//! `:`) are consumed and checked implicitly: callers only see structural
//! tokens, strings and literals.
//!
//! # What this module does NOT handle:
//! - Mapping tokens to search results (see `export.rs` and `oneshot.rs`)
//!
//! # Invariants
//! - Bytes are only consumed for tokens that have been returned
//! - A token may span any number of stream chunks
//! - Any structural violation is reported as `ClientError::MalformedResponse`

use std::fmt;
use std::pin::Pin;

use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// A response body as a stream of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A single JSON token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    /// A string, already unescaped.
    Str(String),
    /// `true`, `false`, `null` or a number, as written.
    Literal(String),
    EndOfStream,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::ObjectStart => f.write_str("'{'"),
            Token::ObjectEnd => f.write_str("'}'"),
            Token::ArrayStart => f.write_str("'['"),
            Token::ArrayEnd => f.write_str("']'"),
            Token::Str(s) => write!(f, "string {s:?}"),
            Token::Literal(s) => f.write_str(s),
            Token::EndOfStream => f.write_str("end of stream"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Array,
    Object,
}

/// What the reader will accept next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value,
    ValueOrEnd,
    Key,
    KeyOrEnd,
    Colon,
    CommaOrEnd,
    Done,
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Expect::Value => "value",
            Expect::ValueOrEnd => "value or ']'",
            Expect::Key => "object key",
            Expect::KeyOrEnd => "object key or '}'",
            Expect::Colon => "':'",
            Expect::CommaOrEnd => "',' or closing bracket",
            Expect::Done => "end of stream",
        }
    }
}

/// Incremental scanner for the raw bytes of one token.
enum Scanner {
    String { escaped: bool },
    Container { depth: usize, in_string: bool, escaped: bool },
    Literal,
}

impl Scanner {
    /// Feed byte `b` at offset `i`; returns the token length once complete.
    fn step(&mut self, b: u8, i: usize) -> Option<usize> {
        match self {
            Scanner::String { escaped } => {
                if i == 0 {
                    return None;
                }
                if *escaped {
                    *escaped = false;
                } else if b == b'\\' {
                    *escaped = true;
                } else if b == b'"' {
                    return Some(i + 1);
                }
                None
            }
            Scanner::Container {
                depth,
                in_string,
                escaped,
            } => {
                if *in_string {
                    if *escaped {
                        *escaped = false;
                    } else if b == b'\\' {
                        *escaped = true;
                    } else if b == b'"' {
                        *in_string = false;
                    }
                    return None;
                }
                match b {
                    b'"' => *in_string = true,
                    b'[' | b'{' => *depth += 1,
                    b']' | b'}' => {
                        *depth = depth.saturating_sub(1);
                        if *depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    _ => {}
                }
                None
            }
            Scanner::Literal => is_delimiter(b).then_some(i),
        }
    }

    /// Token length if end of stream legitimately terminates the token.
    fn at_eof(&self, len: usize) -> Option<usize> {
        match self {
            Scanner::Literal if len > 0 => Some(len),
            _ => None,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Scanner::String { .. } => "closing '\"'",
            Scanner::Container { .. } => "closing bracket",
            Scanner::Literal => "literal",
        }
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_delimiter(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b',' | b':' | b'[' | b']' | b'{' | b'}' | b'"')
}

fn describe_byte(b: u8) -> String {
    if b.is_ascii_graphic() {
        format!("'{}'", b as char)
    } else {
        format!("byte 0x{b:02x}")
    }
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Reads JSON tokens from a [`ByteStream`] on demand.
pub struct TokenReader {
    stream: ByteStream,
    buf: BytesMut,
    eof: bool,
    scopes: Vec<Scope>,
    expect: Expect,
}

impl fmt::Debug for TokenReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenReader")
            .field("buffered", &self.buf.len())
            .field("eof", &self.eof)
            .field("depth", &self.scopes.len())
            .finish()
    }
}

impl TokenReader {
    pub fn new(stream: ByteStream) -> Self {
        Self {
            stream,
            buf: BytesMut::new(),
            eof: false,
            scopes: Vec::new(),
            expect: Expect::Value,
        }
    }

    /// Pull the next chunk into the buffer. Returns `false` at end of stream.
    async fn fill(&mut self) -> Result<bool> {
        while !self.eof {
            match self.stream.next().await {
                Some(Ok(chunk)) if chunk.is_empty() => continue,
                Some(Ok(chunk)) => {
                    self.buf.extend_from_slice(&chunk);
                    return Ok(true);
                }
                Some(Err(e)) => return Err(e),
                None => self.eof = true,
            }
        }
        Ok(false)
    }

    /// Skip whitespace and return the next byte without consuming it.
    async fn peek_non_ws(&mut self) -> Result<Option<u8>> {
        loop {
            while let Some(&b) = self.buf.first() {
                if !is_whitespace(b) {
                    return Ok(Some(b));
                }
                self.buf.advance(1);
            }
            if !self.fill().await? {
                return Ok(None);
            }
        }
    }

    /// Consume the separators the current state requires and return the
    /// first byte of the next token, unconsumed.
    async fn advance_to_token(&mut self) -> Result<Option<u8>> {
        loop {
            let Some(b) = self.peek_non_ws().await? else {
                return Ok(None);
            };
            match (self.expect, b) {
                (Expect::Colon, b':') => {
                    self.buf.advance(1);
                    self.expect = Expect::Value;
                }
                (Expect::CommaOrEnd, b',') => {
                    self.buf.advance(1);
                    self.expect = match self.scopes.last() {
                        Some(Scope::Object) => Expect::Key,
                        _ => Expect::Value,
                    };
                }
                (Expect::CommaOrEnd, b']' | b'}') => return Ok(Some(b)),
                (Expect::Colon | Expect::CommaOrEnd | Expect::Done, _) => {
                    return Err(ClientError::malformed(
                        self.expect.describe(),
                        describe_byte(b),
                    ));
                }
                _ => return Ok(Some(b)),
            }
        }
    }

    /// Consume the raw bytes of one token starting at the front of the buffer.
    async fn take_token(&mut self, mut scanner: Scanner) -> Result<BytesMut> {
        let mut i = 0;
        loop {
            while i < self.buf.len() {
                if let Some(len) = scanner.step(self.buf[i], i) {
                    return Ok(self.buf.split_to(len));
                }
                i += 1;
            }
            if !self.fill().await? {
                return match scanner.at_eof(i) {
                    Some(len) => Ok(self.buf.split_to(len)),
                    None => Err(ClientError::malformed(scanner.expected(), "end of stream")),
                };
            }
        }
    }

    /// State after a complete value.
    fn after_value(&mut self) {
        self.expect = if self.scopes.is_empty() {
            Expect::Done
        } else {
            Expect::CommaOrEnd
        };
    }

    fn close_scope(&mut self, scope: Scope, b: u8) -> Result<()> {
        let allowed = match scope {
            Scope::Array => matches!(self.expect, Expect::ValueOrEnd | Expect::CommaOrEnd),
            Scope::Object => matches!(self.expect, Expect::KeyOrEnd | Expect::CommaOrEnd),
        };
        if !allowed || self.scopes.last() != Some(&scope) {
            return Err(ClientError::malformed(
                self.expect.describe(),
                describe_byte(b),
            ));
        }
        self.buf.advance(1);
        self.scopes.pop();
        self.after_value();
        Ok(())
    }

    /// Read the next token.
    pub async fn next_token(&mut self) -> Result<Token> {
        let Some(b) = self.advance_to_token().await? else {
            return Ok(Token::EndOfStream);
        };

        let expecting_key = matches!(self.expect, Expect::Key | Expect::KeyOrEnd);
        match b {
            b'}' => {
                self.close_scope(Scope::Object, b)?;
                Ok(Token::ObjectEnd)
            }
            b']' => {
                self.close_scope(Scope::Array, b)?;
                Ok(Token::ArrayEnd)
            }
            b'"' => {
                let raw = self.take_token(Scanner::String { escaped: false }).await?;
                let s = serde_json::from_slice::<String>(&raw).map_err(|e| {
                    ClientError::InvalidResponse(format!("invalid JSON string: {e}"))
                })?;
                if expecting_key {
                    self.expect = Expect::Colon;
                } else {
                    self.after_value();
                }
                Ok(Token::Str(s))
            }
            _ if expecting_key => Err(ClientError::malformed(
                self.expect.describe(),
                describe_byte(b),
            )),
            b'{' | b'[' => {
                self.buf.advance(1);
                if b == b'{' {
                    self.scopes.push(Scope::Object);
                    self.expect = Expect::KeyOrEnd;
                    Ok(Token::ObjectStart)
                } else {
                    self.scopes.push(Scope::Array);
                    self.expect = Expect::ValueOrEnd;
                    Ok(Token::ArrayStart)
                }
            }
            b',' | b':' => Err(ClientError::malformed(
                self.expect.describe(),
                describe_byte(b),
            )),
            _ => {
                let raw = self.take_token(Scanner::Literal).await?;
                if serde_json::from_slice::<serde_json::Value>(&raw).is_err() {
                    return Err(ClientError::malformed("JSON literal", lossy(&raw)));
                }
                self.after_value();
                Ok(Token::Literal(lossy(&raw)))
            }
        }
    }

    /// Read the next token and fail unless it equals `want`.
    pub async fn expect(&mut self, want: Token) -> Result<()> {
        let got = self.next_token().await?;
        if got == want {
            Ok(())
        } else {
            Err(ClientError::malformed(want, got))
        }
    }

    /// Whether the current array or object has another element.
    ///
    /// Returns `false` at a closing bracket or at end of stream; does not
    /// consume anything but whitespace.
    pub async fn more(&mut self) -> Result<bool> {
        Ok(!matches!(self.peek_non_ws().await?, None | Some(b']') | Some(b'}')))
    }

    /// Read one complete value (scalar or container) as raw JSON bytes.
    pub async fn raw_value(&mut self) -> Result<Bytes> {
        let Some(b) = self.advance_to_token().await? else {
            return Err(ClientError::malformed(self.expect.describe(), Token::EndOfStream));
        };
        if matches!(self.expect, Expect::Key | Expect::KeyOrEnd)
            || matches!(b, b']' | b'}' | b',' | b':')
        {
            return Err(ClientError::malformed(
                self.expect.describe(),
                describe_byte(b),
            ));
        }

        let scanner = match b {
            b'"' => Scanner::String { escaped: false },
            b'{' | b'[' => Scanner::Container {
                depth: 0,
                in_string: false,
                escaped: false,
            },
            _ => Scanner::Literal,
        };
        let raw = self.take_token(scanner).await?;
        self.after_value();
        Ok(raw.freeze())
    }

    /// Read one value and deserialize it.
    ///
    /// `expected` names the shape for the error if deserialization fails.
    pub async fn decode<T: DeserializeOwned>(&mut self, expected: &str) -> Result<T> {
        let raw = self.raw_value().await?;
        serde_json::from_slice(&raw).map_err(|_| ClientError::malformed(expected, lossy(&raw)))
    }

    /// Read and discard one value.
    pub async fn skip_value(&mut self) -> Result<()> {
        self.raw_value().await.map(|_| ())
    }
}
