//! Playlist Analysis Engine — deterministic, rule-based.
//!
//! Takes one raw catalog payload (playlist tracks, audio features, artist
//! details), drops malformed entries, and derives stats, ranked artists and
//! tracks, a release-era distribution, a mood profile and short facts.
//!
//! No DB, no network, no cache; pure computation, nothing kept between calls.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod era;
pub mod error;
pub mod facts;
pub mod genre;
pub mod mood;
pub mod normalize;
pub mod rank;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use types::{AnalysisSummary, CatalogPayload};
