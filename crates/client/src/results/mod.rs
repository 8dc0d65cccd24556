//! Search result decoding.
//!
//! - `tokens`: pull-style JSON token reader over a byte stream
//! - `value`: field values and rows
//! - `header`: messages, field descriptors and result headers
//! - `oneshot`: fully buffered results of a blocking search
//! - `export`: the streaming export decoder

mod export;
mod header;
mod oneshot;
mod tokens;
mod value;

pub use export::{Drained, ExportJob, ExportState};
pub use header::{Field, Message, MessageType, SearchHeader};
pub use oneshot::SearchResults;
pub use tokens::{ByteStream, Token, TokenReader};
pub use value::{FieldValue, Row, decode_value};

pub(crate) use oneshot::read_results;
