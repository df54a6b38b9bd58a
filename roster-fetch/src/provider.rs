// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! HTTP capability used by the fetch loops.
//!
//! The loops never talk to the network directly: they hand a URL to a
//! [`StudentProvider`] and decode whatever bytes come back. Production code
//! uses [`HttpProvider`](crate::HttpProvider); tests plug in a scripted double.

use async_trait::async_trait;
use roster_error::ErrorSource;
use std::sync::Arc;
use url::Url;

/// Transport-level failure reported by a provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The exchange finished without a usable body.
    #[error("response carried no body")]
    NoBody(#[source] Option<ErrorSource>),

    /// The request itself failed.
    #[error("transport failure: {0}")]
    Transport(#[source] ErrorSource),
}

impl ProviderError {
    pub fn no_body(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::NoBody(Some(Arc::new(error)))
    }

    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(error))
    }
}

/// Issues a single `GET` and returns the raw response body.
///
/// Implementations must not apply a request timeout: the new-records path
/// relies on the server holding the request open until a record exists.
#[async_trait]
pub trait StudentProvider: Send + Sync + 'static {
    async fn fetch(&self, url: Url) -> Result<Vec<u8>, ProviderError>;
}

#[async_trait]
impl<P: StudentProvider + ?Sized> StudentProvider for Arc<P> {
    async fn fetch(&self, url: Url) -> Result<Vec<u8>, ProviderError> {
        (**self).fetch(url).await
    }
}
