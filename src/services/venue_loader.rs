use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::models::Venue;
use super::generator::{generate, GeneratorSpec};

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("failed to read venue file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch venue data: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("venue endpoint responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("venue document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("venue document is invalid: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("seat id {0} appears more than once")]
    DuplicateSeat(String),
}

/// Откуда берётся описание площадки.
#[derive(Debug, Clone, PartialEq)]
pub enum VenueSource {
    File(PathBuf),
    Url(String),
    Synthetic(GeneratorSpec),
}

impl VenueSource {
    /// `synthetic`, `http(s)://...` или путь к файлу.
    pub fn parse(raw: &str, generator: GeneratorSpec) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("synthetic") {
            VenueSource::Synthetic(generator)
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            VenueSource::Url(raw.to_string())
        } else {
            VenueSource::File(PathBuf::from(raw))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            VenueSource::File(path) => format!("file {}", path.display()),
            VenueSource::Url(url) => format!("url {}", url),
            VenueSource::Synthetic(spec) => format!(
                "synthetic {}x{}x{} (seed {})",
                spec.sections, spec.rows, spec.cols, spec.seed
            ),
        }
    }
}

/// Проверка документа при загрузке: поля + уникальность id мест.
pub fn check_venue(venue: &Venue) -> Result<(), VenueError> {
    venue.validate()?;
    if let Some(id) = venue.duplicate_seat_id() {
        return Err(VenueError::DuplicateSeat(id.to_string()));
    }
    Ok(())
}

pub fn parse_venue(data: &[u8]) -> Result<Venue, VenueError> {
    let venue: Venue = serde_json::from_slice(data)?;
    check_venue(&venue)?;
    Ok(venue)
}

#[derive(Clone)]
pub struct VenueLoader {
    http: reqwest::Client,
}

impl Default for VenueLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VenueLoader {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { http }
    }

    pub async fn load(&self, source: &VenueSource) -> Result<Venue, VenueError> {
        info!("Loading venue from {}", source.describe());

        let venue = match source {
            VenueSource::File(path) => {
                let data = tokio::fs::read(path).await.map_err(|source| VenueError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_venue(&data)?
            }
            VenueSource::Url(url) => {
                let response = self.http.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(VenueError::Status(response.status()));
                }
                let data = response.bytes().await?;
                parse_venue(&data)?
            }
            VenueSource::Synthetic(spec) => {
                let venue = generate(spec);
                check_venue(&venue)?;
                venue
            }
        };

        info!(
            "Venue '{}' loaded: {} sections, {} seats",
            venue.name,
            venue.sections.len(),
            venue.seat_count()
        );
        Ok(venue)
    }
}
