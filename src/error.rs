use thiserror::Error;

use crate::lookup::LookupStage;

/// Coarse classification of an [`UpstreamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    TransportError,
    ApiRejected,
    MalformedData,
    ProtocolError,
}

/// Failures talking to, or understanding, the lottery data provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Network failure, timeout or a non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered but flagged the request as failed.
    #[error("{0}")]
    ApiRejected(String),

    /// `t.issueList` was present but not an array.
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// The response could not be reconciled with the expected shape at all.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl UpstreamError {
    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            UpstreamError::Transport(_) => UpstreamErrorKind::TransportError,
            UpstreamError::ApiRejected(_) => UpstreamErrorKind::ApiRejected,
            UpstreamError::MalformedData(_) => UpstreamErrorKind::MalformedData,
            UpstreamError::Protocol(_) => UpstreamErrorKind::ProtocolError,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetailParseError {
    #[error("prize detail is not a JSON array of strings: {0}")]
    Decode(String),
}

/// Terminal failure of a single lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{source} (province: {province}, date: {date}, url: {url})")]
    Upstream {
        source: UpstreamError,
        province: String,
        date: String,
        url: String,
    },

    #[error("no results found for {province} on {date}; please pick another date")]
    NoDrawFound { province: String, date: String },

    #[error("could not parse the results for {province} on {date}; the data may be malformed")]
    DataFormat {
        province: String,
        date: String,
        source: DetailParseError,
    },
}

impl LookupError {
    /// Stage of the lookup state machine the failure occurred in.
    pub fn stage(&self) -> LookupStage {
        match self {
            LookupError::InvalidInput(_) => LookupStage::Validating,
            LookupError::Upstream { source, .. } => match source {
                UpstreamError::Transport(_) => LookupStage::Fetching,
                _ => LookupStage::Normalizing,
            },
            LookupError::NoDrawFound { .. } => LookupStage::LocatingDraw,
            LookupError::DataFormat { .. } => LookupStage::Parsing,
        }
    }

    /// Stable machine-readable status used by the CLI and MCP surfaces.
    pub fn status_label(&self) -> &'static str {
        match self {
            LookupError::InvalidInput(_) => "input_error",
            LookupError::Upstream { .. } => "upstream_error",
            LookupError::NoDrawFound { .. } => "no_draw_data",
            LookupError::DataFormat { .. } => "data_format_error",
        }
    }
}

/// Failures of the image-recognition backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TicketReaderError {
    #[error("could not reach the ticket reader: {0}")]
    Transport(String),

    #[error("ticket reader error: {0}")]
    Rejected(String),

    #[error("ticket reader returned an unreadable response: {0}")]
    Decode(String),
}
