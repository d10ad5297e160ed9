use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::registry::GameConfig;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("aucune URL configurée pour {0}")]
    UnknownUrl(String),
    #[error("requête HTTP échouée : {0}")]
    Http(#[from] reqwest::Error),
    #[error("réponse HTTP {status} pour {url}")]
    Status { url: String, status: u16 },
    #[error("fichier inaccessible {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("fichier absent : {0}")]
    Missing(String),
}

/// Provides a local text file with the draw history of a game.
pub trait DrawSource {
    fn fetch(&self, game: &GameConfig) -> Result<PathBuf, SourceError>;
}

fn cache_file(dir: &Path, game: &GameConfig) -> PathBuf {
    dir.join(format!("{}.csv", game.id))
}

/// Downloads `game.url` into `<cache_dir>/<id>.csv` on every fetch.
pub struct HttpSource {
    cache_dir: PathBuf,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl DrawSource for HttpSource {
    fn fetch(&self, game: &GameConfig) -> Result<PathBuf, SourceError> {
        let url = game
            .url
            .as_deref()
            .ok_or_else(|| SourceError::UnknownUrl(game.id.clone()))?;

        log::info!("Téléchargement des données pour {}...", game.id);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes()?;

        std::fs::create_dir_all(&self.cache_dir).map_err(|source| SourceError::Io {
            path: self.cache_dir.display().to_string(),
            source,
        })?;
        let path = cache_file(&self.cache_dir, game);
        std::fs::write(&path, &body).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("{} octets écrits dans {}", body.len(), path.display());
        Ok(path)
    }
}

/// Serves `<dir>/<id>.csv` files already on disk.
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DrawSource for LocalSource {
    fn fetch(&self, game: &GameConfig) -> Result<PathBuf, SourceError> {
        let path = cache_file(&self.dir, game);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SourceError::Missing(path.display().to_string()))
        }
    }
}
