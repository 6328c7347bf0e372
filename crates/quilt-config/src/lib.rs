//! Quilt configuration system
//!
//! This crate provides centralized configuration management for quilt,
//! loading settings from `quilt.toml` as an alternative to environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for quilt
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuiltConfig {
    /// Demo application settings
    pub demo: DemoConfig,
    /// Batching and buffer packing settings
    pub batching: BatchingConfig,
    /// Text layout settings
    pub text: TextConfig,
}

/// Demo application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Initial screen width in pixels
    pub screen_width: Option<f32>,
    /// Initial screen height in pixels
    pub screen_height: Option<f32>,
}

/// Batching and buffer packing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    /// Worker threads for the parallel geometry writers; `None` uses
    /// the global rayon pool
    pub worker_threads: Option<usize>,
    /// Verify span tiling after every flush (debug builds always do)
    pub validate_spans: bool,
}

/// Text layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Default text size in points
    pub text_size: Option<f32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            screen_width: None,
            screen_height: None,
        }
    }
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            validate_spans: false,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { text_size: None }
    }
}

impl QuiltConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the quilt.toml configuration file
    ///
    /// # Returns
    /// * `Ok(QuiltConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (quilt.toml in the
    /// current directory) or return default configuration if the file
    /// doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("quilt.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        // Demo settings
        if let Ok(val) = std::env::var("QUILT_SCREEN_WIDTH") {
            if let Ok(width) = val.parse::<f32>() {
                self.demo.screen_width = Some(width);
            }
        }
        if let Ok(val) = std::env::var("QUILT_SCREEN_HEIGHT") {
            if let Ok(height) = val.parse::<f32>() {
                self.demo.screen_height = Some(height);
            }
        }

        // Batching settings
        if let Ok(val) = std::env::var("QUILT_WORKERS") {
            if let Ok(threads) = val.parse::<usize>() {
                self.batching.worker_threads = Some(threads);
            }
        }
        if let Ok(val) = std::env::var("QUILT_VALIDATE") {
            self.batching.validate_spans = val == "1" || val.eq_ignore_ascii_case("true");
        }

        // Text settings
        if let Ok(val) = std::env::var("QUILT_TEXT_SIZE") {
            if let Ok(size) = val.parse::<f32>() {
                self.text.text_size = Some(size);
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from quilt.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
