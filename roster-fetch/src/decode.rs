// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::ProviderError;
use roster_error::{IntoRosterError, Result, RosterError};
use serde::de::DeserializeOwned;

/// Turns a provider response into a decoded value or a classified error.
///
/// - body present and valid: the value
/// - body present but malformed: `InvalidData` with the decode error
/// - no body: `InvalidData` with the transport cause, if any
/// - any other transport failure: `Unknown` with the cause
///
/// # Errors
///
/// See above.
pub fn decode_response<T>(response: std::result::Result<Vec<u8>, ProviderError>) -> Result<T>
where
    T: DeserializeOwned,
{
    match response {
        Ok(body) => serde_json::from_slice(&body).map_err(IntoRosterError::into_invalid_data),
        Err(ProviderError::NoBody(cause)) => Err(RosterError::invalid_data_cause(cause)),
        Err(ProviderError::Transport(cause)) => Err(RosterError::unknown_cause(Some(cause))),
    }
}
