//! Structured error types for the analysis engine.
//!
//! The analysis itself never fails; these cover reading input and config.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("config: {0}")]
  Config(String),
}

impl EngineError {
  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }
}

impl From<toml::de::Error> for EngineError {
  fn from(e: toml::de::Error) -> Self {
    Self::config(e.to_string())
  }
}
