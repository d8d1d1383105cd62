//! The arrival line protocol.
//!
//! ```text
//! SERVICE_REQUEST,<category>[,<device timestamp>]
//! ```
//!
//! Fields are trimmed.  Blank lines carry nothing.  Extra trailing fields
//! are ignored.

use crate::{InputError, InputResult};

pub const SERVICE_REQUEST: &str = "SERVICE_REQUEST";

/// One customer arrival reported by an input device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalRequest {
    pub category:         String,
    /// Opaque device-side timestamp, if the device sent one.
    pub device_timestamp: Option<String>,
}

/// Parse one protocol line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> InputResult<Option<ArrivalRequest>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(',').map(str::trim);
    let (Some(SERVICE_REQUEST), Some(category)) = (fields.next(), fields.next()) else {
        return Err(InputError::Malformed(line.to_owned()));
    };
    if category.is_empty() {
        return Err(InputError::Malformed(line.to_owned()));
    }

    Ok(Some(ArrivalRequest {
        category:         category.to_owned(),
        device_timestamp: fields.next().filter(|t| !t.is_empty()).map(str::to_owned),
    }))
}
