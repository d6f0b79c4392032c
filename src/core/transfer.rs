use crate::domain::model::{HospitalRecord, HospitalTransport};
use crate::utils::error::{HospitalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const CSV_HEADER: [&str; 4] = [
    "hospitalName",
    "hospitalContact",
    "hospitalCoordinates",
    "hospitalDescription",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum TransferFormat {
    #[default]
    Json,
    /// Null descriptions become empty fields, so CSV is export-only.
    Csv,
}

pub fn encode_records(records: &[HospitalRecord], format: TransferFormat) -> Result<Vec<u8>> {
    let transports: Vec<HospitalTransport> =
        records.iter().map(HospitalRecord::to_transport_object).collect();

    match format {
        TransferFormat::Json => Ok(serde_json::to_vec_pretty(&transports)?),
        TransferFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(Vec::new());
            writer.write_record(CSV_HEADER)?;
            for transport in &transports {
                writer.serialize(transport)?;
            }
            writer
                .into_inner()
                .map_err(|e| HospitalError::Io(e.into_error()))
        }
    }
}

/// Decodes a JSON array of transport objects. Every entry is validated, and
/// names must be unique within the input, before anything is returned.
pub fn decode_records(data: &[u8]) -> Result<Vec<HospitalRecord>> {
    let transports: Vec<HospitalTransport> = serde_json::from_slice(data)?;
    let records = transports
        .into_iter()
        .map(HospitalRecord::try_from)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.name()) {
            return Err(HospitalError::validation(
                "hospitalName",
                format!("Duplicate hospitalName '{}' in input", record.name()),
            ));
        }
    }
    Ok(records)
}
