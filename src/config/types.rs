//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::mission::{
    ParseOptions, DEFAULT_BIND_WINDOW, DEFAULT_CHUNK_BYTES, DEFAULT_COUNT,
    DEFAULT_MIN_DURATION_SEC,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Check every section, returning the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.parse.validate()
    }
}

/// Parsing defaults, overridable per invocation from the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Number of most recent valid missions to show
    #[serde(default = "default_count")]
    pub count: usize,
    /// Missions shorter than this (seconds) are excluded
    #[serde(default = "default_min_duration_sec")]
    pub min_duration_sec: f64,
    /// Bytes read per chunk
    #[serde(default = "default_chunk_bytes")]
    pub chunk_bytes: usize,
    /// Lines after a start marker in which the node may be bound
    #[serde(default = "default_bind_window")]
    pub bind_window: usize,
}

pub fn default_count() -> usize {
    DEFAULT_COUNT
}

pub fn default_min_duration_sec() -> f64 {
    DEFAULT_MIN_DURATION_SEC
}

pub fn default_chunk_bytes() -> usize {
    DEFAULT_CHUNK_BYTES
}

pub fn default_bind_window() -> usize {
    DEFAULT_BIND_WINDOW
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            min_duration_sec: default_min_duration_sec(),
            chunk_bytes: default_chunk_bytes(),
            bind_window: default_bind_window(),
        }
    }
}

impl ParseConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.count == 0 {
            return Err("parse.count must be at least 1".to_string());
        }
        if !self.min_duration_sec.is_finite() || self.min_duration_sec <= 0.0 {
            return Err(format!(
                "parse.min_duration_sec must be a positive number, got {}",
                self.min_duration_sec
            ));
        }
        if self.chunk_bytes == 0 {
            return Err("parse.chunk_bytes must be greater than 0".to_string());
        }
        if self.bind_window == 0 {
            return Err("parse.bind_window must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Library options carrying these values.
    pub fn to_options(&self) -> ParseOptions {
        ParseOptions {
            chunk_bytes: self.chunk_bytes,
            min_duration_sec: self.min_duration_sec,
            count: self.count,
            bind_window: self.bind_window,
        }
    }
}

/// Log file location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Path to EE.log; `~/` is expanded. Unset means the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
