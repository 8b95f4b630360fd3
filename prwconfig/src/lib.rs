//! # Panta Rei Configuration Module
//!
//! This module provides configuration management for the Panta Rei site,
//! including:
//! - Embedded default configuration (YAML)
//! - Optional merging with an external `config.yaml`
//! - Environment variable overrides (generic prefix and deployment aliases)
//! - Type-safe getters for site metadata, social links and media credentials
//! - Thread-safe singleton access pattern
//!
//! Secrets (the media API key/secret) are readable only through
//! [`Config::get_cloudinary_credentials`] and are never part of the public
//! configuration payload.
//!
//! ## Usage
//!
//! ```no_run
//! use prwconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let site = config.get_site_metadata();
//! println!("{} on port {}", site.title, port);
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde::Serialize;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::info;

#[cfg(feature = "api")]
pub mod api;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pantarei.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load Panta Rei configuration"));
}

const ENV_CONFIG_DIR: &str = "PANTAREI_CONFIG";
const ENV_PREFIX: &str = "PANTAREI_CONFIG__";

/// Deployment-style environment variables mapped onto configuration paths.
///
/// These are the names the hosting platform exposes; they take precedence
/// over both the embedded defaults and the external config file.
const ENV_ALIASES: &[(&str, &[&str])] = &[
    ("CLOUDINARY_CLOUD_NAME", &["cloudinary", "cloud_name"]),
    ("CLOUDINARY_API_KEY", &["cloudinary", "api_key"]),
    ("CLOUDINARY_API_SECRET", &["cloudinary", "api_secret"]),
    ("CLOUDINARY_GALLERY_FOLDER", &["cloudinary", "gallery_folder"]),
    ("CLOUDINARY_TRACKS_FOLDER", &["cloudinary", "tracks_folder"]),
    ("SOCIAL_INSTAGRAM", &["social", "instagram"]),
    ("SOCIAL_SPOTIFY", &["social", "spotify"]),
    ("SOCIAL_YOUTUBE", &["social", "youtube"]),
    ("SOCIAL_EMAIL", &["social", "email"]),
    ("SITE_TITLE", &["site", "title"]),
    ("SITE_DESCRIPTION", &["site", "description"]),
    ("SITE_URL", &["site", "url"]),
    ("SITE_OG_IMAGE", &["site", "og_image"]),
    ("SITE_THEME_COLOR", &["site", "theme_color"]),
];

// Default values for configuration
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_BASE_URL: &str = "http://localhost";
const DEFAULT_SITE_TITLE: &str = "Panta Rei";
const DEFAULT_SITE_DESCRIPTION: &str = "Panta Rei — Official website";
const DEFAULT_OG_IMAGE: &str = "/images/og-default.jpg";
const DEFAULT_THEME_COLOR: &str = "#0d0d0d";

/// Public social links of the band, each `null` when unset.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SocialLinks {
    pub instagram: Option<String>,
    pub spotify: Option<String>,
    pub youtube: Option<String>,
    pub email: Option<String>,
}

/// Public site metadata used for titles, descriptions and social previews.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    #[serde(rename = "ogImage")]
    pub og_image: String,
    #[serde(rename = "themeColor")]
    pub theme_color: String,
}

/// Credentials for the hosted media API.
///
/// Deliberately not serializable: these values must never reach a client.
#[derive(Debug, Clone)]
pub struct MediaCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Configuration manager for the Panta Rei site
///
/// Holds the merged configuration tree (embedded defaults, optional external
/// file, environment overrides) and provides typed getters over it.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order.
    ///
    /// Returns `None` when no directory is configured anywhere; the site then
    /// runs purely from embedded defaults and environment variables, which is
    /// the normal mode on read-only deployments.
    fn find_config_dir(directory: &str) -> Option<String> {
        // 1. Provided directory
        if !directory.is_empty() {
            return Some(directory.to_string());
        }

        // 2. Environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return Some(env_path);
        }

        // 3. Current directory
        if Path::new(".pantarei").exists() {
            return Some(".pantarei".to_string());
        }

        // 4. Home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(".pantarei");
            if home_config.exists() {
                return Some(home_config.to_string_lossy().to_string());
            }
        }

        None
    }

    /// Loads the configuration
    ///
    /// This method:
    /// 1. Loads the default embedded configuration
    /// 2. Merges it with an external `config.yaml` if a config directory exists
    /// 3. Applies environment variable overrides (aliases, then generic prefix)
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory containing the config.yaml file, or empty
    ///   to search the usual locations
    pub fn load_config(directory: &str) -> Result<Self> {
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let (config_dir, path) = match Self::find_config_dir(directory) {
            Some(dir) => {
                let file = Path::new(&dir).join("config.yaml");
                (dir, file.to_string_lossy().to_string())
            }
            None => (String::new(), String::new()),
        };

        if !path.is_empty() {
            if let Ok(data) = fs::read(&path) {
                info!(config_file = %path, "Loaded config file");
                let external_value: Value = serde_yaml::from_slice(&data)?;
                merge_yaml(&mut default_value, &external_value);
            } else {
                info!(config_file = %path, "Config file not found, using default embedded config");
            }
        }

        let mut config_value = Self::lower_keys_value(default_value);
        Self::apply_env_overrides(&mut config_value);

        Ok(Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        })
    }

    /// Saves the current configuration to the config.yaml file
    ///
    /// No-op when the site runs without a config directory.
    pub fn save(&self) -> Result<()> {
        if self.path.is_empty() {
            return Ok(());
        }
        let data = self.data.lock().unwrap();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Returns the configuration directory, empty when running file-less.
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Sets a configuration value at the specified path and saves it
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        Self::set_value_internal(&mut data, path, value)?;
        drop(data);
        self.save()?;
        Ok(())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = path[0].to_lowercase();
            let key_value = Value::String(key.clone());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        // Deployment aliases first, always taken as plain strings.
        for (name, path) in ENV_ALIASES {
            if let Ok(value) = env::var(name) {
                if !value.is_empty() {
                    let _ = Self::set_value_internal(config, path, Value::String(value));
                }
            }
        }

        // Generic prefixed overrides, parsed as YAML scalars.
        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                let key_path = key
                    .trim_start_matches(ENV_PREFIX)
                    .split("__")
                    .collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        let new_key = Value::String(s.to_lowercase());
                        new_map.insert(new_key, Self::lower_keys_value(v));
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Returns a string value at `path`, `None` when null, missing or empty.
    fn get_opt_string(&self, path: &[&str]) -> Option<String> {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    fn get_string_or(&self, path: &[&str], default: &str) -> String {
        self.get_opt_string(path)
            .unwrap_or_else(|| default.to_string())
    }

    // ========================================================================
    // Server
    // ========================================================================

    /// Gets the HTTP port for the web server
    pub fn get_http_port(&self) -> u16 {
        match self.get_value(&["host", "http_port"]) {
            Ok(Value::Number(n)) => n
                .as_u64()
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(DEFAULT_HTTP_PORT),
            _ => DEFAULT_HTTP_PORT,
        }
    }

    /// Sets the HTTP port for the web server
    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(&["host", "http_port"], Value::Number(Number::from(port)))
    }

    /// Gets the base URL for the HTTP server
    pub fn get_base_url(&self) -> String {
        self.get_string_or(&["host", "base_url"], DEFAULT_BASE_URL)
    }

    // ========================================================================
    // Site metadata and social links
    // ========================================================================

    /// Gets the public social links, each absent entry mapped to `None`
    pub fn get_social_links(&self) -> SocialLinks {
        SocialLinks {
            instagram: self.get_opt_string(&["social", "instagram"]),
            spotify: self.get_opt_string(&["social", "spotify"]),
            youtube: self.get_opt_string(&["social", "youtube"]),
            email: self.get_opt_string(&["social", "email"]),
        }
    }

    /// Gets the public site metadata, with defaults applied for unset values
    pub fn get_site_metadata(&self) -> SiteMetadata {
        SiteMetadata {
            title: self.get_string_or(&["site", "title"], DEFAULT_SITE_TITLE),
            description: self.get_string_or(&["site", "description"], DEFAULT_SITE_DESCRIPTION),
            url: self.get_opt_string(&["site", "url"]),
            og_image: self.get_string_or(&["site", "og_image"], DEFAULT_OG_IMAGE),
            theme_color: self.get_string_or(&["site", "theme_color"], DEFAULT_THEME_COLOR),
        }
    }

    // ========================================================================
    // Media API
    // ========================================================================

    /// Gets the media API credentials
    ///
    /// # Errors
    ///
    /// Fails when any of the cloud name, API key or API secret is unset.
    /// Callers must treat this as a server configuration error and must not
    /// issue any upstream request.
    pub fn get_cloudinary_credentials(&self) -> Result<MediaCredentials> {
        let cloud_name = self.get_opt_string(&["cloudinary", "cloud_name"]);
        let api_key = self.get_opt_string(&["cloudinary", "api_key"]);
        let api_secret = self.get_opt_string(&["cloudinary", "api_secret"]);

        match (cloud_name, api_key, api_secret) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(MediaCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => Err(anyhow!("Missing Cloudinary configuration")),
        }
    }

    /// Optional folder prefix scoping the gallery image listing
    pub fn get_gallery_folder(&self) -> Option<String> {
        self.get_opt_string(&["cloudinary", "gallery_folder"])
    }

    /// Optional folder prefix scoping the audio track listing
    pub fn get_tracks_folder(&self) -> Option<String> {
        self.get_opt_string(&["cloudinary", "tracks_folder"])
    }
}

/// Merges the `other` YAML tree into `base`, `other` taking precedence
fn merge_yaml(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Mapping(base_map), Value::Mapping(other_map)) => {
            for (k, v) in other_map {
                match base_map.get_mut(k) {
                    Some(base_v) => merge_yaml(base_v, v),
                    None => {
                        base_map.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (base, other) => *base = other.clone(),
    }
}

/// Returns the global configuration singleton
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}
