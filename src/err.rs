use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors produced while decoding a single record payload.
///
/// Offsets are relative to the start of the payload being decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer too small for {what} at offset {offset} (need {need} bytes, have {have})")]
    Truncated {
        what: &'static str,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("invalid length for {what}: {len}")]
    InvalidLength { what: &'static str, len: usize },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("offset {offset}: failed to decode record {name} (0x{opcode:04X}), caused by: {source}")]
    Decode {
        opcode: u16,
        name: &'static str,
        offset: u64,
        #[source]
        source: DecodeError,
    },

    #[error("offset {offset}: malformed record stream, caused by: {source}")]
    Stream {
        offset: u64,
        #[source]
        source: DecodeError,
    },

    #[error("offset {offset}: unbalanced BEGIN/END ({reason}), last parsed record: {}", last_record.as_deref().unwrap_or("<none>"))]
    UnbalancedBracket {
        reason: &'static str,
        offset: u64,
        last_record: Option<String>,
    },

    #[error("offset {offset}: BEGIN nesting depth {depth} exceeds configured maximum")]
    NestingTooDeep { depth: usize, offset: u64 },

    #[error("invalid value `{value}` for {field} (expected {expected})")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("record 0x{opcode:04X} payload of {len} bytes does not fit a u16 length")]
    PayloadTooLarge { opcode: u16, len: usize },

    #[error("node handle does not refer to a live node")]
    StaleHandle,

    #[error("node is not a {expected} record")]
    UnexpectedKind { expected: &'static str },

    #[error("writing OOXML failed with: {message}")]
    XmlOutput { message: String },

    #[error("rendering JSON failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("an I/O error has occurred: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub(crate) fn invalid_value(
        field: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        ChartError::InvalidFieldValue {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

impl From<quick_xml::Error> for ChartError {
    fn from(err: quick_xml::Error) -> Self {
        ChartError::XmlOutput {
            message: err.to_string(),
        }
    }
}
