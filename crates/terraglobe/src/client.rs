//! Overlay data client.
//!
//! Fetches overlay listings and raster bytes from either a remote listing
//! endpoint or a local directory, behind one interface. Runtime-agnostic:
//! every method returns a plain future and decoding stays synchronous.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{Cache, NoCache};
use crate::catalog::{self, Listing};
use crate::error::{Error, Result};

/// Where overlay data comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// A server exposing `GET {base_url}/api/overlays?folder=` plus the
    /// overlay files themselves under `{base_url}/`.
    Remote {
        /// Base URL without a trailing slash.
        base_url: String,
    },
    /// A directory on the local filesystem.
    Local {
        /// The served root; folders are resolved beneath it.
        root: PathBuf,
    },
}

/// Client for fetching overlay listings and raster bytes.
///
/// Cheap to share via [`Arc`]; holds no mutable state of its own.
pub struct Client<C: Cache = NoCache> {
    http: reqwest::Client,
    cache: Arc<C>,
    source: Source,
}

impl Client<NoCache> {
    /// Client with no caching.
    #[must_use]
    pub fn new(source: Source) -> Self {
        Self {
            http: reqwest::Client::new(),
            cache: Arc::new(NoCache),
            source,
        }
    }
}

impl<C: Cache> Client<C> {
    /// Client with a custom cache.
    #[must_use]
    pub fn with_cache(source: Source, cache: C) -> Self {
        Self {
            http: reqwest::Client::new(),
            cache: Arc::new(cache),
            source,
        }
    }

    /// Client with a custom HTTP client and cache.
    #[must_use]
    pub fn with_http_and_cache(source: Source, http: reqwest::Client, cache: C) -> Self {
        Self {
            http,
            cache: Arc::new(cache),
            source,
        }
    }

    /// The configured source.
    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Fetch the listing for an overlay folder.
    ///
    /// Remote sources ask the listing endpoint; local sources scan the
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder is invalid or missing, the request
    /// fails, or the response is not a valid listing.
    pub async fn fetch_listing(&self, folder: &str) -> Result<Listing> {
        match &self.source {
            Source::Local { root } => catalog::list_folder(root, folder),
            Source::Remote { base_url } => {
                let url = format!("{base_url}/api/overlays");
                tracing::debug!(url, folder, "fetching listing");

                let response = self
                    .http
                    .get(&url)
                    .query(&[("folder", folder)])
                    .send()
                    .await
                    .map_err(|e| Error::Http {
                        url: url.clone(),
                        message: e.to_string(),
                    })?;

                let status = response.status();
                if status.as_u16() == 404 {
                    return Err(Error::ResourceNotFound {
                        path: folder.to_string(),
                    });
                }
                if !status.is_success() {
                    return Err(Error::HttpStatus {
                        url,
                        status: status.as_u16(),
                    });
                }

                let body = response.bytes().await.map_err(|e| Error::Http {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
                serde_json::from_slice(&body).map_err(|e| Error::InvalidData {
                    context: "overlay listing",
                    detail: e.to_string(),
                })
            }
        }
    }

    /// Fetch the listing, falling back to the folder's static
    /// `manifest.json` when the listing endpoint is unavailable.
    ///
    /// # Errors
    ///
    /// Returns the manifest error if both paths fail.
    pub async fn fetch_listing_or_manifest(&self, folder: &str) -> Result<Listing> {
        match self.fetch_listing(folder).await {
            Ok(listing) => Ok(listing),
            Err(e) => {
                tracing::debug!(folder, error = %e, "listing failed, trying manifest");
                let bytes = self.fetch_bytes(&format!("{folder}/manifest.json")).await?;
                Listing::from_manifest_json(folder, &bytes)
            }
        }
    }

    /// Fetch the raw bytes of an overlay resource by its served path.
    ///
    /// Checks the cache first; successful fetches are written back to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is missing or the fetch fails.
    pub async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let path = path.trim_start_matches('/');

        if let Some(data) = self.cache.get(path).await? {
            tracing::debug!(path, "cache hit");
            return Ok(data);
        }

        let data = match &self.source {
            Source::Local { root } => {
                // Manifest entries are untrusted; the same containment rule
                // the listing side enforces applies here.
                if std::path::Path::new(path)
                    .components()
                    .any(|c| !matches!(c, std::path::Component::Normal(_)))
                {
                    return Err(Error::InvalidPath {
                        path: path.to_string(),
                        reason: "must stay beneath the served root",
                    });
                }
                let full = root.join(path);
                tracing::debug!(path = %full.display(), "reading");
                if !full.exists() {
                    return Err(Error::ResourceNotFound {
                        path: full.display().to_string(),
                    });
                }
                std::fs::read(&full).map_err(|e| Error::Io {
                    path: full.display().to_string(),
                    message: e.to_string(),
                })?
            }
            Source::Remote { base_url } => {
                let url = format!("{base_url}/{path}");
                tracing::debug!(url, "fetching");

                let response = self.http.get(&url).send().await.map_err(|e| Error::Http {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

                let status = response.status();
                if status.as_u16() == 404 {
                    return Err(Error::ResourceNotFound { path: url });
                }
                if !status.is_success() {
                    return Err(Error::HttpStatus {
                        url,
                        status: status.as_u16(),
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| Error::Http {
                        url: url.clone(),
                        message: e.to_string(),
                    })?
                    .to_vec()
            }
        };

        self.cache.put(path, data.clone()).await?;
        Ok(data)
    }
}
