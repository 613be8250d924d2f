//! Bundle fetching from a remote catalog or a local bundle directory
//!
//! Both sources produce zip bytes:
//! - Remote: downloads pre-built zips, optionally through a disk cache
//! - Local: zips the bundle folder in memory first
//!
//! Extraction therefore takes the same path whatever the source.

use super::bundle::BundleId;
use super::extract;
use crate::catalog::{CatalogManifest, CATALOG_FILE};
use crate::error::FetchError;
use crate::product::ProductConfig;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Where bundles come from
#[derive(Debug, Clone)]
pub enum BundleSource {
    Remote(Url),
    Local(PathBuf),
}

impl BundleSource {
    /// Remote source from the product config, honoring its URL override env var
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, FetchError> {
        let url_str = std::env::var(config.catalog_url_env())
            .unwrap_or_else(|_| config.default_catalog_url().to_string());
        let url = Url::parse(&url_str).map_err(|_| FetchError::InvalidUrl(url_str.clone()))?;
        Ok(Self::Remote(url))
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local(path.into())
    }
}

/// Retrieves bundles and unpacks them into a project root
///
/// Archives are memoized by bundle id, so one fetcher never downloads or
/// builds the same bundle twice.
pub struct ArchiveFetcher {
    source: BundleSource,
    client: reqwest::Client,
    cache_dir: Option<PathBuf>,
    archives: HashMap<BundleId, Vec<u8>>,
}

impl ArchiveFetcher {
    pub fn new(source: BundleSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache_dir: None,
            archives: HashMap::new(),
        }
    }

    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, FetchError> {
        let source = BundleSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    pub fn from_local(path: impl Into<PathBuf>, user_agent: &str) -> Self {
        Self::new(BundleSource::local(path), user_agent)
    }

    /// Keep downloaded archives (and the last good catalog) under `dir`
    pub fn with_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cache_dir = dir;
        self
    }

    pub fn source(&self) -> &BundleSource {
        &self.source
    }

    /// Append path segments to the base URL, preserving query parameters
    fn build_url(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn download(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "downloading");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }

    async fn read_cached(&self, relative: &str) -> Option<Vec<u8>> {
        let path = self.cache_dir.as_ref()?.join(relative);
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), "cache hit");
                Some(bytes)
            }
            Err(_) => None,
        }
    }

    /// Best effort: a cache that cannot be written only costs a later download
    async fn write_cached(&self, relative: &str, bytes: &[u8]) {
        let Some(cache_dir) = &self.cache_dir else {
            return;
        };
        let path = cache_dir.join(relative);
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %e, "could not create cache directory");
                return;
            }
        }
        if let Err(e) = fs::write(&path, bytes).await {
            warn!(path = %path.display(), error = %e, "could not write cache entry");
        }
    }

    /// Load `catalog.yaml` from the source
    ///
    /// A remote catalog that cannot be reached falls back to the cached copy
    /// from an earlier run, when there is one.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) -> Result<CatalogManifest, FetchError> {
        let content = match &self.source {
            BundleSource::Remote(base_url) => {
                let url = Self::build_url(base_url, &[CATALOG_FILE])?;
                match self.download(url).await {
                    Ok(bytes) => {
                        self.write_cached(CATALOG_FILE, &bytes).await;
                        bytes
                    }
                    Err(e) => match self.read_cached(CATALOG_FILE).await {
                        Some(bytes) => {
                            warn!(error = %e, "catalog unreachable, using cached copy");
                            bytes
                        }
                        None => return Err(e),
                    },
                }
            }
            BundleSource::Local(path) => {
                let manifest_path = path.join(CATALOG_FILE);
                fs::read(&manifest_path)
                    .await
                    .map_err(|source| FetchError::Read {
                        path: manifest_path,
                        source,
                    })?
            }
        };

        let content = String::from_utf8_lossy(&content);
        CatalogManifest::from_yaml(&content).map_err(FetchError::Manifest)
    }

    /// Zip a local bundle folder in memory
    ///
    /// Entries are stored under `{bundle name}/`, exactly like the published
    /// archives, and keep their Unix permission bits.
    pub fn build_local_zip(bundle_root: &Path, bundle: &BundleId) -> Result<Vec<u8>, FetchError> {
        let bundle_dir = bundle
            .segments()
            .iter()
            .fold(bundle_root.to_path_buf(), |dir, segment| dir.join(segment));
        if !bundle_dir.is_dir() {
            return Err(FetchError::MissingBundle(bundle_dir));
        }

        let archive_err = |source| FetchError::Archive {
            bundle: bundle.to_string(),
            source,
        };

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));

            for entry in WalkDir::new(&bundle_dir).sort_by_file_name() {
                let entry = entry.map_err(|e| FetchError::Read {
                    path: bundle_dir.clone(),
                    source: e.into(),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative = entry
                    .path()
                    .strip_prefix(&bundle_dir)
                    .unwrap_or(entry.path());
                let zip_path = relative
                    .components()
                    .fold(bundle.name().to_string(), |acc, part| {
                        format!("{}/{}", acc, part.as_os_str().to_string_lossy())
                    });

                let content = std::fs::read(entry.path()).map_err(|source| FetchError::Read {
                    path: entry.path().to_path_buf(),
                    source,
                })?;

                let mut options = SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Deflated);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Ok(metadata) = entry.metadata() {
                        options = options.unix_permissions(metadata.permissions().mode() & 0o777);
                    }
                }

                zip.start_file(zip_path, options).map_err(archive_err)?;
                zip.write_all(&content)
                    .map_err(|e| archive_err(zip::result::ZipError::Io(e)))?;
            }

            zip.finish().map_err(archive_err)?;
        }

        Ok(zip_buffer)
    }

    /// Zip bytes of one bundle, fetched or built at most once
    async fn archive_bytes(&mut self, bundle: &BundleId) -> Result<&[u8], FetchError> {
        if !self.archives.contains_key(bundle) {
            let bytes = match &self.source {
                BundleSource::Remote(base_url) => {
                    let relative = bundle.archive_path();
                    match self.read_cached(&relative).await {
                        Some(bytes) => bytes,
                        None => {
                            let segments: Vec<&str> = relative.split('/').collect();
                            let url = Self::build_url(base_url, &segments)?;
                            let bytes = self.download(url).await?;
                            self.write_cached(&relative, &bytes).await;
                            bytes
                        }
                    }
                }
                BundleSource::Local(path) => Self::build_local_zip(path, bundle)?,
            };
            self.archives.insert(bundle.clone(), bytes);
        }

        self.archives
            .get(bundle)
            .map(Vec::as_slice)
            .ok_or_else(|| FetchError::MissingBundle(PathBuf::from(bundle.to_string())))
    }

    /// Retrieve a bundle and unpack it below `destination`
    ///
    /// Existing files are overwritten, so extracting a template after its
    /// framework overlays it. Returns the relative paths written.
    #[instrument(skip(self), fields(bundle = %bundle))]
    pub async fn fetch_and_extract(
        &mut self,
        destination: &Path,
        bundle: &BundleId,
    ) -> Result<Vec<PathBuf>, FetchError> {
        let name = bundle.name().to_string();
        let bytes = self.archive_bytes(bundle).await?;
        let entries = extract::read_archive(bytes, &name)?;
        let written = extract::write_entries(destination, &entries).await?;
        info!(files = written.len(), "bundle extracted");
        Ok(written)
    }
}
