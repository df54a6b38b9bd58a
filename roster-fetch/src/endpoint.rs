// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use roster_error::{Result, RosterError};
use std::fmt::{self, Display};
use url::Url;

/// The two remote resources the fetch loops read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// One-shot list of every record the server already has.
    Existing,
    /// Long-poll resource answering with one new record per request.
    New,
}

impl Endpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Existing => "existentes",
            Self::New => "novos",
        }
    }

    /// Joins the endpoint path onto the server address.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::BadUrl`] carrying the joined address when the
    /// server address is not an absolute URL with a host, or the joined
    /// address does not parse.
    pub fn url(self, server_address: &str) -> Result<Url> {
        let address = format!("{}/{}", server_address.trim_end_matches('/'), self.path());
        let has_host = Url::parse(server_address).is_ok_and(|base| base.has_host());
        if !has_host {
            return Err(RosterError::bad_url(address));
        }
        Url::parse(&address).map_err(|_| RosterError::bad_url(address))
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
