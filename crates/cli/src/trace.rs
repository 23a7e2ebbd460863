//! Text trace format.
//!
//! One event per line:
//!
//! ```text
//! # kind  pc        address
//! A       0x400a10  0x7ffe0040
//! E       0x400a10  0x7ffe0000
//! ```
//!
//! `A` is a demand access, `E` ends the generation of the address's region.
//! Numbers are decimal or `0x`-prefixed hex. Anything after `#` is ignored, as
//! are blank lines.

use std::num::ParseIntError;

use thiserror::Error;

/// One parsed trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// Demand access to `addr` by the instruction at `pc`.
    Access {
        /// Instruction address.
        pc: u64,
        /// Byte address accessed.
        addr: u64,
    },
    /// End of the generation for the region containing `addr`.
    EndGeneration {
        /// Instruction address.
        pc: u64,
        /// Any byte address inside the region.
        addr: u64,
    },
}

/// A malformed trace line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TraceError {
    /// The first field is neither `A` nor `E`.
    #[error("unknown event kind `{0}` (expected `A` or `E`)")]
    UnknownKind(String),

    /// The line ended before a required field.
    #[error("missing {0}")]
    MissingField(&'static str),

    /// A numeric field did not parse.
    #[error("invalid {field} `{text}`: {source}")]
    BadNumber {
        /// Which field failed.
        field: &'static str,
        /// The offending text.
        text: String,
        /// Underlying parse error.
        #[source]
        source: ParseIntError,
    },

    /// Extra text after the address.
    #[error("unexpected trailing field `{0}`")]
    Trailing(String),
}

/// Parses one trace line.
///
/// # Returns
///
/// `Ok(None)` for blank and comment-only lines.
///
/// # Errors
///
/// Returns [`TraceError`] if the line is malformed.
pub fn parse_line(line: &str) -> Result<Option<TraceEvent>, TraceError> {
    let body = line.split_once('#').map_or(line, |(body, _)| body);
    let mut fields = body.split_whitespace();
    let Some(kind) = fields.next() else {
        return Ok(None);
    };
    let end = match kind {
        "A" | "a" => false,
        "E" | "e" => true,
        other => return Err(TraceError::UnknownKind(other.to_owned())),
    };

    let pc = parse_number(fields.next(), "pc")?;
    let addr = parse_number(fields.next(), "address")?;
    if let Some(extra) = fields.next() {
        return Err(TraceError::Trailing(extra.to_owned()));
    }

    Ok(Some(if end {
        TraceEvent::EndGeneration { pc, addr }
    } else {
        TraceEvent::Access { pc, addr }
    }))
}

fn parse_number(field: Option<&str>, name: &'static str) -> Result<u64, TraceError> {
    let text = field.ok_or(TraceError::MissingField(name))?;
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|source| TraceError::BadNumber {
        field: name,
        text: text.to_owned(),
        source,
    })
}
