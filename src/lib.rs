pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{LocalStorage, MemoryStore, SqliteStore};
pub use config::TomlConfig;
pub use crate::core::registry::{HospitalRegistry, ImportSummary};
pub use crate::core::transfer::TransferFormat;
pub use domain::model::{HospitalPatch, HospitalRecord, HospitalTransport, SaveOutcome};
pub use domain::ports::{HospitalStore, SaveMode, Storage};
pub use utils::error::{HospitalError, Result};
