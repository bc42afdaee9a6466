//! Server configuration loader for Mirrorchat.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `config.toml` in the data directory (`~/.mirrorchat/` in production)
//! 3. environment variables (`GEMINI_API_KEY`, `FIREBASE_PROJECT_ID`, ...)
//!
//! CLI flags are applied on top by the binary. Missing credentials are not an
//! error here: the server starts and the affected endpoints report that they
//! are not configured.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use mirrorchat_core::chat::service::ConversationConfig;
use mirrorchat_types::message::DEFAULT_APP_ID;

use crate::llm::gemini::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::sqlite::pool::database_url_in;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Gemini connection settings.
pub struct GeminiSettings {
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
}

/// Fully resolved server configuration.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub database_url: String,
    pub static_dir: Option<PathBuf>,
    pub default_app_id: String,
    pub firebase_project_id: Option<String>,
    pub gemini: GeminiSettings,
    pub conversation: ConversationConfig,
}

// ---------------------------------------------------------------------------
// On-disk shape of config.toml (every key optional)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    database_url: Option<String>,
    static_dir: Option<PathBuf>,
    default_app_id: Option<String>,
    gemini: FileGemini,
    firebase: FileFirebase,
    conversation: FileConversation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileGemini {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileFirebase {
    project_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConversation {
    history_limit: Option<u32>,
    temperature: Option<f64>,
    question_interval: Option<u64>,
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `MIRRORCHAT_DATA_DIR` environment variable
/// 2. `~/.mirrorchat`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MIRRORCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".mirrorchat");
    }

    PathBuf::from(".mirrorchat")
}

/// Load configuration from `{data_dir}/config.toml` and the process environment.
pub async fn load_server_config(data_dir: &Path) -> ServerConfig {
    let file = read_file_config(data_dir).await;
    build_config(data_dir, file, |key| std::env::var(key).ok())
}

async fn read_file_config(data_dir: &Path) -> FileConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return FileConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return FileConfig::default();
        }
    };

    match toml::from_str::<FileConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            FileConfig::default()
        }
    }
}

/// Merge file values, environment values and defaults. Empty environment
/// values count as unset.
fn build_config(
    data_dir: &Path,
    file: FileConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ServerConfig {
    let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let defaults = ConversationConfig::default();

    let port = match env("PORT") {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!("Ignoring invalid PORT value {raw:?}");
                None
            }
        },
        None => None,
    };

    ServerConfig {
        host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: port.or(file.port).unwrap_or(DEFAULT_PORT),
        data_dir: data_dir.to_path_buf(),
        database_url: env("MIRRORCHAT_DATABASE_URL")
            .or(file.database_url)
            .unwrap_or_else(|| database_url_in(data_dir)),
        static_dir: env("MIRRORCHAT_STATIC_DIR")
            .map(PathBuf::from)
            .or(file.static_dir),
        default_app_id: env("MIRRORCHAT_APP_ID")
            .or(file.default_app_id)
            .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
        firebase_project_id: env("FIREBASE_PROJECT_ID")
            .or_else(|| env("GOOGLE_CLOUD_PROJECT"))
            .or(file.firebase.project_id),
        gemini: GeminiSettings {
            api_key: env("GEMINI_API_KEY")
                .or(file.gemini.api_key)
                .map(SecretString::from),
            model: env("GEMINI_MODEL")
                .or(file.gemini.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: file
                .gemini
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        },
        conversation: ConversationConfig {
            history_limit: file
                .conversation
                .history_limit
                .unwrap_or(defaults.history_limit),
            temperature: file
                .conversation
                .temperature
                .unwrap_or(defaults.temperature),
            question_interval: file
                .conversation
                .question_interval
                .filter(|n| *n > 0)
                .unwrap_or(defaults.question_interval),
        },
    }
}
