pub mod registry;
pub mod transfer;

pub use crate::domain::model::{HospitalPatch, HospitalRecord, HospitalTransport, SaveOutcome};
pub use crate::domain::ports::{HospitalStore, SaveMode, Storage};
pub use crate::utils::error::Result;
