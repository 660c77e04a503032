use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    #[serde(default)]
    pub server_config: ServerConfig,

    #[serde(default)]
    pub model_config: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "https://trelix-livid.vercel.app".to_string(),
        "http://localhost:5173".to_string(),
        "https://trelix-xj5h.onrender.com".to_string(),
    ]
}

/// Where the model collaborators live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Models served by an HTTP inference service
    #[default]
    Remote,
    /// In-process stand-ins, no model server needed
    Mock,
}

impl ModelBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelBackend::Remote => "remote",
            ModelBackend::Mock => "mock",
        }
    }
}

impl FromStr for ModelBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(ModelBackend::Remote),
            "mock" => Ok(ModelBackend::Mock),
            other => Err(anyhow::anyhow!("Unsupported model backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: ModelBackend,
    #[serde(default = "default_inference_url")]
    pub inference_url: String,
    #[serde(default = "default_translation_model")]
    pub translation_model: String,
    #[serde(default = "default_ner_model")]
    pub ner_model: String,
}

fn default_inference_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_translation_model() -> String {
    "facebook/m2m100_418M".to_string()
}

fn default_ner_model() -> String {
    "en_core_web_trf".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            inference_url: default_inference_url(),
            translation_model: default_translation_model(),
            ner_model: default_ner_model(),
        }
    }
}

impl Config {
    /// Load a config file. `.jsonld`/`.json` parse as JSON, anything else as YAML.
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load a config file, resolving `${VAR}` placeholders through `lookup`.
    ///
    /// Placeholders are expanded inside parsed string values, so substituted text
    /// never has to be valid JSON or YAML syntax.
    pub fn load_with<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = read_config_text(path)?;

        let path_lower = path.to_lowercase();
        let mut value: serde_json::Value =
            if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
                serde_json::from_str(&content)?
            } else {
                serde_yaml::from_str(&content)?
            };
        substitute_in_value(&mut value, &lookup);

        Ok(serde_json::from_value(value)?)
    }

    /// Load `$CONFIG_PATH`, else the first of `conf.jsonld` and `conf.yaml` that exists,
    /// then apply environment overrides. Falls back to built-in defaults when no file exists.
    pub fn discover() -> Result<Self> {
        let explicit = std::env::var("CONFIG_PATH").ok();

        let mut config = match locate_config(explicit.as_deref())? {
            Some(path) => {
                let config = Config::load(&path)?;
                info!("Loaded configuration from: {}", path);
                config
            }
            None => {
                info!("No config file found (tried {:?}), using defaults", DEFAULT_CONFIG_PATHS);
                Config::default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.server_config.cors_origins = normalize_origins(&config.server_config.cors_origins);
        Ok(config)
    }

    /// Overlay `PORT`, `HOST`, `INFERENCE_SERVICE_URL`, `MODEL_BACKEND` and `CORS_ORIGINS`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server_config.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server_config.host = host;
        }
        if let Some(url) = lookup("INFERENCE_SERVICE_URL") {
            self.model_config.inference_url = url;
        }
        if let Some(backend) = lookup("MODEL_BACKEND") {
            self.model_config.backend = backend.parse::<ModelBackend>()?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server_config.cors_origins = vec![origins];
        }
        Ok(())
    }
}

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["conf.jsonld", "conf.yaml"];

/// Pick the config file to load.
///
/// An explicitly requested path must exist; the default locations are optional.
pub fn locate_config(explicit: Option<&str>) -> Result<Option<String>> {
    if let Some(path) = explicit {
        if !Path::new(path).exists() {
            anyhow::bail!("CONFIG_PATH points to a missing file: {}", path);
        }
        return Ok(Some(path.to_string()));
    }

    for path in DEFAULT_CONFIG_PATHS {
        if Path::new(path).exists() {
            return Ok(Some(path.to_string()));
        }
        debug!("No config file at {}", path);
    }
    Ok(None)
}

/// Read a config file as UTF-8, stripping a BOM.
pub fn read_config_text(config_path: &str) -> Result<String> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let bytes = fs::read(config_path)?;
    let (content, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        anyhow::bail!("Configuration file is not valid UTF-8: {}", config_path);
    }

    Ok(content.into_owned())
}

/// Expand placeholders in every string of a parsed config tree.
fn substitute_in_value<F>(value: &mut serde_json::Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        serde_json::Value::String(s) => *s = substitute_env_vars(s, lookup),
        serde_json::Value::Array(items) => {
            for item in items {
                substitute_in_value(item, lookup);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values_mut() {
                substitute_in_value(item, lookup);
            }
        }
        _ => {}
    }
}

/// Replace `${VAR_NAME}` placeholders; unknown variables are left as written.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Split comma-joined entries, trim, drop empties and de-duplicate keeping first occurrence.
pub fn normalize_origins(origins: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for origin in origins.iter().flat_map(|o| o.split(',')) {
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && !normalized.iter().any(|o| o == origin) {
            normalized.push(origin.to_string());
        }
    }
    normalized
}
