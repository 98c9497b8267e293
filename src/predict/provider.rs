use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::predict::{Catalog, ElementSource, PredictError, TleEntry};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

/// Loads a TLE catalog once per instance. Remote catalogs are cached on disk
/// and downloaded again when the cached copy is older than `max_age`.
pub struct CatalogProvider {
    source: CatalogSource,
    cache_dir: PathBuf,
    max_age: Duration,
    force_refresh: bool,
    catalog: Option<Catalog>,
}

impl CatalogProvider {
    pub fn new(source: CatalogSource, cache_dir: PathBuf, max_age: Duration) -> Self {
        Self {
            source,
            cache_dir,
            max_age,
            force_refresh: false,
            catalog: None,
        }
    }

    /// Ignore the age of the cached copy and download anyway.
    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    pub fn catalog(&mut self) -> Result<&Catalog, PredictError> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => {
                let catalog = Catalog::parse(&self.read_source()?);
                if catalog.is_empty() {
                    log::warn!("Catalog contains no element sets");
                } else {
                    log::info!("Loaded {} element sets", catalog.len());
                }
                catalog
            }
        };
        Ok(&*self.catalog.insert(catalog))
    }

    fn read_source(&self) -> Result<String, PredictError> {
        match &self.source {
            CatalogSource::File(path) => {
                log::debug!("Reading catalog from {}", path.display());
                Ok(fs::read_to_string(path)?)
            }
            CatalogSource::Url(url) => self.read_cached_url(url),
        }
    }

    fn read_cached_url(&self, url: &str) -> Result<String, PredictError> {
        let cache_path = self.cache_dir.join(cache_file_name(url));

        if !self.force_refresh && is_fresh(&cache_path, self.max_age) {
            log::debug!("Using cached catalog {}", cache_path.display());
            return Ok(fs::read_to_string(&cache_path)?);
        }

        settle_download(url, &cache_path, download(url))
    }
}

/// Cache a downloaded catalog, or fall back to the cached copy when the
/// download failed or returned no element sets.
fn settle_download(
    url: &str,
    cache_path: &Path,
    fetched: Result<String, PredictError>,
) -> Result<String, PredictError> {
    let fetched = fetched.and_then(|content| {
        if Catalog::parse(&content).is_empty() {
            Err(PredictError::Network(format!(
                "{} returned no element sets",
                url
            )))
        } else {
            Ok(content)
        }
    });

    match fetched {
        Ok(content) => {
            if let Err(e) = store(cache_path, &content) {
                log::warn!("Failed to cache catalog at {}: {}", cache_path.display(), e);
            }
            Ok(content)
        }
        Err(e) if cache_path.is_file() => {
            log::warn!(
                "Catalog download failed ({}), falling back to stale cache {}",
                e,
                cache_path.display()
            );
            Ok(fs::read_to_string(cache_path)?)
        }
        Err(e) => Err(e),
    }
}

impl ElementSource for CatalogProvider {
    fn element_set(&mut self, satellite: &str) -> Result<TleEntry, PredictError> {
        self.catalog()?.find(satellite)?.to_entry()
    }
}

fn download(url: &str) -> Result<String, PredictError> {
    log::info!("Downloading catalog from {}", url);
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(PredictError::Network(format!("{} returned {}", url, status)));
    }

    Ok(response.text()?)
}

fn store(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn is_fresh(path: &Path, max_age: Duration) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .map(|age| age <= max_age)
        .unwrap_or(false)
}

fn cache_file_name(url: &str) -> String {
    let stem: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("{}.tle", stem)
}
