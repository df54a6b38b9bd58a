// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{ConfigError, ProviderError, RosterConfig, StudentProvider};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// [`StudentProvider`] backed by a `reqwest` client without a request timeout.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
}

impl HttpProvider {
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: &RosterConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps an existing client. It should not carry a request timeout.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StudentProvider for HttpProvider {
    async fn fetch(&self, url: Url) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::transport)?;

        let body = response.bytes().await.map_err(ProviderError::no_body)?;
        Ok(body.to_vec())
    }
}
