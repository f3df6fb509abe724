//! Recordings and other media stored by the API.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::auth::BearerToken;
use crate::classify::Outcome;
use crate::client::Client;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::namespace::{Namespace, NamespaceConfig};

/// `/v1/files` operations. Authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct Files {
    namespace: Namespace,
}

impl Files {
    pub(crate) fn new(client: &Client) -> Self {
        Self {
            namespace: client.namespace(NamespaceConfig::default().with_authentication(BearerToken)),
        }
    }

    /// Fetch a file into memory. `id` may be a bare id or a full file URL.
    pub fn get(&self, id: &str) -> Result<Outcome, ApiError> {
        self.namespace.request(&file_path(id), None, HttpMethod::Get)
    }

    /// Stream a file to `filename` without buffering it in memory.
    ///
    /// The download lands in a temporary file beside `filename` and replaces
    /// it only once the whole body has arrived. On any error, or when the API
    /// answers with JSON instead of file data, `filename` is left untouched.
    pub fn save(&self, id: &str, filename: impl AsRef<Path>) -> Result<Outcome, ApiError> {
        let filename = filename.as_ref();
        let dir = match filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
        let mut write_chunk = |chunk: &[u8]| writer.write_all(chunk);
        let outcome = self
            .namespace
            .request_streaming(&file_path(id), None, HttpMethod::Get, &mut write_chunk)?;

        if outcome == Outcome::SuccessStream {
            let staged = writer.into_inner().map_err(|e| e.into_error())?;
            staged.persist(filename).map_err(|e| e.error)?;
        }
        Ok(outcome)
    }
}

fn file_path(id: &str) -> String {
    let id = id.rsplit('/').next().unwrap_or(id);
    format!("/v1/files/{id}")
}
