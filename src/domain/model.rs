use crate::utils::error::{HospitalError, Result};
use crate::utils::validation::{validate_optional_text, validate_required_text, Validate};
use serde::{Deserialize, Serialize};

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_CONTACT_CHARS: usize = 15;
pub const MAX_COORDINATES_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// One hospital's contact and location data.
///
/// Fields are private: a `HospitalRecord` can only come out of [`HospitalRecord::new`]
/// or one of the validated conversions, so every value satisfies the column limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalRecord {
    name: String,
    contact: String,
    coordinates: String,
    description: Option<String>,
}

/// Flat transport form of a record. Field names and null handling are the
/// JSON contract of the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HospitalTransport {
    pub hospital_name: String,
    pub hospital_contact: String,
    pub hospital_coordinates: String,
    #[serde(default)]
    pub hospital_description: Option<String>,
}

/// Partial update. `None` leaves a field unchanged; `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HospitalPatch {
    pub contact: Option<String>,
    pub coordinates: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

impl HospitalRecord {
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        coordinates: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let record = Self {
            name: name.into(),
            contact: contact.into(),
            coordinates: coordinates.into(),
            description,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn coordinates(&self) -> &str {
        &self.coordinates
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn to_transport_object(&self) -> HospitalTransport {
        HospitalTransport {
            hospital_name: self.name.clone(),
            hospital_contact: self.contact.clone(),
            hospital_coordinates: self.coordinates.clone(),
            hospital_description: self.description.clone(),
        }
    }

    /// Returns a new record with the patched fields replaced. The name is the key
    /// and never changes.
    pub fn apply(&self, patch: HospitalPatch) -> Result<Self> {
        let HospitalPatch {
            contact,
            coordinates,
            description,
        } = patch;

        Self::new(
            self.name.clone(),
            contact.unwrap_or_else(|| self.contact.clone()),
            coordinates.unwrap_or_else(|| self.coordinates.clone()),
            description.unwrap_or_else(|| self.description.clone()),
        )
    }
}

impl Validate for HospitalRecord {
    fn validate(&self) -> Result<()> {
        validate_required_text("hospitalName", &self.name, MAX_NAME_CHARS)?;
        validate_required_text("hospitalContact", &self.contact, MAX_CONTACT_CHARS)?;
        validate_required_text("hospitalCoordinates", &self.coordinates, MAX_COORDINATES_CHARS)?;
        validate_optional_text(
            "hospitalDescription",
            self.description.as_deref(),
            MAX_DESCRIPTION_CHARS,
        )
    }
}

impl TryFrom<HospitalTransport> for HospitalRecord {
    type Error = HospitalError;

    fn try_from(transport: HospitalTransport) -> Result<Self> {
        Self::new(
            transport.hospital_name,
            transport.hospital_contact,
            transport.hospital_coordinates,
            transport.hospital_description,
        )
    }
}

impl From<&HospitalRecord> for HospitalTransport {
    fn from(record: &HospitalRecord) -> Self {
        record.to_transport_object()
    }
}

impl HospitalPatch {
    pub fn is_empty(&self) -> bool {
        self.contact.is_none() && self.coordinates.is_none() && self.description.is_none()
    }
}

/// Each field is checked on its own, so a valid patch applied to a valid record
/// always yields a valid record.
impl Validate for HospitalPatch {
    fn validate(&self) -> Result<()> {
        if let Some(contact) = &self.contact {
            validate_required_text("hospitalContact", contact, MAX_CONTACT_CHARS)?;
        }
        if let Some(coordinates) = &self.coordinates {
            validate_required_text("hospitalCoordinates", coordinates, MAX_COORDINATES_CHARS)?;
        }
        if let Some(description) = &self.description {
            validate_optional_text(
                "hospitalDescription",
                description.as_deref(),
                MAX_DESCRIPTION_CHARS,
            )?;
        }
        Ok(())
    }
}
