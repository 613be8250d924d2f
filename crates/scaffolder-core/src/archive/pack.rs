//! Publishing a local bundle directory as a remote catalog layout

use super::bundle::BundleId;
use super::fetcher::ArchiveFetcher;
use crate::catalog::{CatalogManifest, CATALOG_FILE};
use crate::error::FetchError;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One archive written by [`pack_bundles`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBundle {
    pub bundle: BundleId,
    pub path: PathBuf,
    pub size: usize,
}

/// Outcome of [`pack_bundles`]
#[derive(Debug, Clone, Default)]
pub struct PackSummary {
    pub packed: Vec<PackedBundle>,
    /// Listed in the catalog but without a folder on disk
    pub missing: Vec<BundleId>,
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| FetchError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| FetchError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Zip every framework and template listed in `bundle_dir/catalog.yaml`
/// into `out_dir`, next to a copy of the catalog
///
/// The result can be served as-is as a remote catalog base URL.
pub fn pack_bundles(bundle_dir: &Path, out_dir: &Path) -> Result<PackSummary, FetchError> {
    let manifest_path = bundle_dir.join(CATALOG_FILE);
    let content = std::fs::read_to_string(&manifest_path).map_err(|source| FetchError::Read {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest = CatalogManifest::from_yaml(&content).map_err(FetchError::Manifest)?;

    let mut summary = PackSummary::default();
    for (framework, entry) in &manifest.frameworks {
        let bundles = std::iter::once(BundleId::framework(framework)).chain(
            entry
                .templates
                .iter()
                .map(|template| BundleId::template(framework, template)),
        );

        for bundle in bundles {
            let zip_bytes = match ArchiveFetcher::build_local_zip(bundle_dir, &bundle) {
                Ok(bytes) => bytes,
                Err(FetchError::MissingBundle(dir)) => {
                    warn!(bundle = %bundle, dir = %dir.display(), "bundle directory not found");
                    summary.missing.push(bundle);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let path = out_dir.join(bundle.archive_path());
            write_file(&path, &zip_bytes)?;
            info!(bundle = %bundle, size = zip_bytes.len(), "packed");
            summary.packed.push(PackedBundle {
                bundle,
                path,
                size: zip_bytes.len(),
            });
        }
    }

    write_file(&out_dir.join(CATALOG_FILE), content.as_bytes())?;
    Ok(summary)
}
