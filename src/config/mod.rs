use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::services::generator::GeneratorSpec;
use crate::services::render::MAX_RENDERED_SEATS;
use crate::services::selection::{MAX_SELECTED_SEATS, STORAGE_KEY};
use crate::services::VenueSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} must be set")]
    Missing(&'static str),
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub venue: VenueConfig,
    pub selection: SelectionConfig,
    pub storage: StorageConfig,
    pub viewport: ViewportConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

// Откуда грузить площадку
#[derive(Debug, Clone)]
pub struct VenueConfig {
    pub source: String,
    pub generator: GeneratorSpec,
}

impl VenueConfig {
    pub fn source(&self) -> VenueSource {
        VenueSource::parse(&self.source, self.generator.clone())
    }
}

// Лимиты выбора
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub max_seats: usize,
    pub storage_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

// Где хранится выбор
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
    pub redis_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ViewportConfig {
    pub render_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "seatmap=debug,tower_http=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            venue: VenueConfig {
                source: "venue.json".to_string(),
                generator: GeneratorSpec::default(),
            },
            selection: SelectionConfig {
                max_seats: MAX_SELECTED_SEATS,
                storage_key: STORAGE_KEY.to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::File,
                path: "data/selection.json".to_string(),
                redis_url: None,
            },
            viewport: ViewportConfig {
                render_cap: MAX_RENDERED_SEATS,
            },
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let log_format = match var_or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    expected: "log format (pretty|json)",
                    value: other.to_string(),
                })
            }
        };

        let backend = match var_or("STORAGE_BACKEND", "file").to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File,
            "redis" => StorageBackend::Redis,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    expected: "storage backend (memory|file|redis)",
                    value: other.to_string(),
                })
            }
        };
        let redis_url = env::var("REDIS_URL").ok();
        if backend == StorageBackend::Redis && redis_url.is_none() {
            return Err(ConfigError::Missing("REDIS_URL"));
        }

        let generator = GeneratorSpec {
            sections: parse_var("SYNTHETIC_SECTIONS", defaults.venue.generator.sections, "number")?,
            rows: parse_var("SYNTHETIC_ROWS", defaults.venue.generator.rows, "number")?,
            cols: parse_var("SYNTHETIC_COLS", defaults.venue.generator.cols, "number")?,
            seed: parse_var("SYNTHETIC_SEED", defaults.venue.generator.seed, "number")?,
        };

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", &defaults.app.host),
                port: parse_var("PORT", defaults.app.port, "port number")?,
                environment: var_or("ENVIRONMENT", &defaults.app.environment),
                rust_log: var_or("RUST_LOG", &defaults.app.rust_log),
                log_format,
            },
            venue: VenueConfig {
                source: var_or("VENUE_SOURCE", &defaults.venue.source),
                generator,
            },
            selection: SelectionConfig {
                max_seats: parse_var("MAX_SELECTED_SEATS", defaults.selection.max_seats, "number")?,
                storage_key: var_or("SELECTION_STORAGE_KEY", &defaults.selection.storage_key),
            },
            storage: StorageConfig {
                backend,
                path: var_or("STORAGE_PATH", &defaults.storage.path),
                redis_url,
            },
            viewport: ViewportConfig {
                render_cap: parse_var("RENDER_CAP", defaults.viewport.render_cap, "number")?,
            },
        })
    }
}
