use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::errors::{AppError, Result};

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub github: GithubConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(".")
    }

    /// Process variables are read first and `.env` entries override them.
    /// Nothing is written back into the process environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut vars: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("GITHUB"))
            .collect();
        vars.extend(load_env_file(path.as_ref().join(".env"))?);
        Self::from_vars(path, vars)
    }

    pub fn from_vars<P: AsRef<Path>>(path: P, vars: HashMap<String, String>) -> Result<Self> {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();
        let config = Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__").source(Some(vars)))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::MissingCredential(TOKEN_VAR))
    }
}

/// Reads `KEY=value` pairs from a dotenv file. A missing file is an empty map.
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        vars.insert(key, value);
    }
    Ok(vars)
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "GithubConfig::default_api_url")]
    pub api_url: String,
    #[serde(default = "GithubConfig::default_user_agent")]
    pub user_agent: String,
    #[serde(default = "GithubConfig::default_per_page")]
    pub per_page: u32,
}

impl GithubConfig {
    fn default_api_url() -> String {
        "https://api.github.com/".to_string()
    }

    fn default_user_agent() -> String {
        "repo-miner".to_string()
    }

    const fn default_per_page() -> u32 {
        100
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: Self::default_api_url(),
            user_agent: Self::default_user_agent(),
            per_page: Self::default_per_page(),
        }
    }
}
