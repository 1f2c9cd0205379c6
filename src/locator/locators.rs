use std::fs;
use std::path::{Path, PathBuf};

use super::error::{LocatorError, LocatorResult};
use super::location::{Location, MavenCoordinate};
use crate::config::{Configuration, user_home_dir};

/// Remote repository queried when none is configured
const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2";

/// Resolves abstract locations to concrete local files, downloading
/// repository artifacts into the local cache on demand.
///
/// A cached artifact is reused whenever its file exists; there is no
/// further invalidation.
#[derive(Debug, Clone)]
pub struct Locators {
    cache_dir: PathBuf,
    repository_url: String,
    client: reqwest::Client,
}

impl Locators {
    pub fn new(config: &Configuration) -> Self {
        let cache_dir = config
            .get_string_by_keys(&["maven.localRepository", "MAVEN_LOCAL_REPOSITORY"])
            .map(PathBuf::from)
            .unwrap_or_else(|| user_home_dir().join(".m2").join("repository"));
        let repository_url = config
            .get_string_or("orchestrator.mavenRepositoryUrl", DEFAULT_REPOSITORY_URL)
            .trim_end_matches('/')
            .to_string();

        Locators {
            cache_dir,
            repository_url,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a location to a local file path
    pub async fn locate(&self, location: &Location) -> LocatorResult<PathBuf> {
        match location {
            Location::File(path) => {
                if path.exists() {
                    Ok(path.clone())
                } else {
                    Err(LocatorError::not_found(&path.display().to_string()))
                }
            }
            Location::Resource(resource) => {
                // Embedded bytes have no standalone path; callers copy or read them
                Err(LocatorError::unsupported(resource.name(), "locate"))
            }
            Location::Maven(coordinate) => self.resolve_coordinate(coordinate).await,
            Location::Plugin(plugin) => self.resolve_coordinate(plugin.coordinate()).await,
        }
    }

    /// Read the full contents behind a location
    pub async fn read(&self, location: &Location) -> LocatorResult<Vec<u8>> {
        if let Location::Resource(resource) = location {
            return Ok(resource.bytes().to_vec());
        }
        let path = self.locate(location).await?;
        fs::read(&path).map_err(|e| LocatorError::io(&path.display().to_string(), "read", e))
    }

    /// Copy a location into a directory, keeping its natural file name
    pub async fn copy_to_directory(
        &self,
        location: &Location,
        dir: &Path,
    ) -> LocatorResult<PathBuf> {
        let file_name = match location {
            Location::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .ok_or_else(|| LocatorError::not_found(&path.display().to_string()))?,
            Location::Resource(resource) => Path::new(resource.name())
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| resource.name().to_string()),
            Location::Maven(coordinate) => coordinate.filename(),
            Location::Plugin(plugin) => plugin.coordinate().filename(),
        };
        self.copy_to_file(location, &dir.join(file_name)).await
    }

    /// Copy a location to an explicit target path
    pub async fn copy_to_file(&self, location: &Location, to: &Path) -> LocatorResult<PathBuf> {
        if let Location::Resource(resource) = location {
            fs::write(to, resource.bytes())
                .map_err(|e| LocatorError::io(&to.display().to_string(), "write", e))?;
            return Ok(to.to_path_buf());
        }
        let from = self.locate(location).await?;
        fs::copy(&from, to).map_err(|e| LocatorError::io(&to.display().to_string(), "copy", e))?;
        Ok(to.to_path_buf())
    }

    /// Cache-then-download resolution for repository coordinates
    async fn resolve_coordinate(&self, coordinate: &MavenCoordinate) -> LocatorResult<PathBuf> {
        let cached = self.cache_dir.join(coordinate.repository_path());
        if cached.exists() {
            return Ok(cached);
        }
        self.download(coordinate, &cached).await?;
        Ok(cached)
    }

    async fn download(&self, coordinate: &MavenCoordinate, to: &Path) -> LocatorResult<()> {
        let url = format!("{}/{}", self.repository_url, url_path(coordinate));
        let response = self.client.get(&url).send().await.map_err(|e| {
            LocatorError::resolution_failed(&coordinate.to_string(), &e.to_string())
        })?;
        if !response.status().is_success() {
            return Err(LocatorError::resolution_failed(
                &coordinate.to_string(),
                &format!("{} from {}", response.status(), url),
            ));
        }
        let bytes = response.bytes().await.map_err(|e| {
            LocatorError::resolution_failed(&coordinate.to_string(), &e.to_string())
        })?;

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LocatorError::io(&parent.display().to_string(), "create", e))?;
        }
        fs::write(to, &bytes)
            .map_err(|e| LocatorError::io(&to.display().to_string(), "write", e))?;
        Ok(())
    }
}

/// Repository path with URL separators, independent of the host OS
fn url_path(coordinate: &MavenCoordinate) -> String {
    format!(
        "{}/{}/{}/{}",
        coordinate.group_id().replace('.', "/"),
        coordinate.artifact_id(),
        coordinate.version(),
        coordinate.filename()
    )
}
