//! Xổ số miền Nam ticket checker.
//!
//! This library provides:
//! - Normalization of the provider's draw-history payload
//! - Decoding of a draw's prize numbers into the 9 prize tiers
//! - Suffix matching of a ticket number against those tiers
//! - Trailing-digit highlighting for display
//! - A lookup orchestrator tying the above to an HTTP [`api::DrawSource`]
//! - Validation of image-recognition guesses before they reach the form
//!
//! # Example
//!
//! ```no_run
//! use xoso_lookup::api::LotteryApi;
//! use xoso_lookup::lookup::{Lookup, LookupRequest};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let lookup = Lookup::new(LotteryApi::from_config(&xoso_lookup::config::load()?)?);
//! let outcome = lookup.run(&LookupRequest::new("tphc", "2024-07-15", "123456")).await?;
//! println!("{}", outcome.status_label());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod highlight;
pub mod lookup;
pub mod matcher;
pub mod normalizer;
pub mod parser;
pub mod provinces;
pub mod reports;
pub mod suggestion;
pub mod ticket_reader;
pub mod types;
pub mod utils;

pub use error::{LookupError, UpstreamError, UpstreamErrorKind};
pub use highlight::{Highlight, highlight_suffix};
pub use lookup::{Lookup, LookupOutcome, LookupRequest, LookupSession, Verdict};
pub use matcher::match_ticket;
pub use normalizer::normalize;
pub use parser::parse_detail;
pub use types::{NormalizedPayload, ParsedPrizeDetail, WinningResult};
