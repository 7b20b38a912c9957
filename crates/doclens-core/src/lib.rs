pub mod config;
pub mod document;
pub mod history;
pub mod risk;
pub mod samples;
pub mod state;

pub use config::{ConfigError, DoclensConfig, RevealConfig};
pub use document::{FileHandle, ResultPayload, RiskBreakdown, RiskEntry, RiskLevel};
pub use history::{HistoryEntry, HistoryLog};
pub use risk::{RiskThresholds, ShieldLevel, ShieldThresholds, classify, guard_count, shield_level};
pub use samples::{CatalogError, SampleContract, catalog, find_sample};
pub use state::{Action, AppState, Phase, Presented, Tab, reduce};
