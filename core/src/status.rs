//! Status-code validation.

use tracing::warn;

use crate::error::{DocsError, Result};

/// Message used for status codes missing from the table.
// Historically this reads "Invalid API Key" for every unmapped code; kept
// as-is until the server's full code list is known.
pub const DEFAULT_STATUS_MESSAGE: &str = "Invalid API Key";

/// Human-readable message for a status code the docs API documents.
pub fn status_message(status: u16) -> Option<&'static str> {
    let message = match status {
        400 => "The request was not formatted correctly",
        401 => "Invalid API Key",
        402 => "API Key Suspended",
        403 => "Access Denied",
        404 => "Resource Not Found",
        405 => "Invalid Method Type",
        429 => "Throttle Limit Reached. Too many requests",
        500 => "Application Error or Server Error",
        503 => "Service Temporarily Unavailable",
        _ => return None,
    };
    Some(message)
}

/// Succeed when `observed == expected`, otherwise return `DocsError::Api`.
pub fn check_status(observed: u16, expected: u16) -> Result<()> {
    if observed == expected {
        return Ok(());
    }
    let message = status_message(observed).unwrap_or(DEFAULT_STATUS_MESSAGE);
    warn!(observed, expected, message, "unexpected status");
    Err(DocsError::Api {
        status: observed,
        message,
    })
}
