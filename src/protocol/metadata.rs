//! Firmware metadata reported by a Harp device
//!
//! The text form is `name|hardware|firmware|assembly|id`, for example
//! `Behavior|1.1|2.3.1|0.4|1216`. Fields are split from the right, so the
//! name may itself contain `|`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::version::HarpVersion;
use crate::error::{Error, Result};

/// Field separator in the text form
pub const SEPARATOR: char = '|';

const FIELD_COUNT: usize = 5;

/// Name, versions and identifier of a device's firmware
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirmwareMetadata {
    name: String,
    hardware_version: HarpVersion,
    firmware_version: HarpVersion,
    assembly_version: HarpVersion,
    id: u32,
}

impl FirmwareMetadata {
    pub fn new(
        name: impl Into<String>,
        hardware_version: HarpVersion,
        firmware_version: HarpVersion,
        assembly_version: HarpVersion,
        id: u32,
    ) -> Self {
        Self {
            name: name.into(),
            hardware_version,
            firmware_version,
            assembly_version,
            id,
        }
    }

    /// Parse metadata from its `name|hardware|firmware|assembly|id` form
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hardware_version(&self) -> HarpVersion {
        self.hardware_version
    }

    pub fn firmware_version(&self) -> HarpVersion {
        self.firmware_version
    }

    /// Version of the Harp protocol core assembled into the firmware
    pub fn assembly_version(&self) -> HarpVersion {
        self.assembly_version
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Check whether two records describe compatible firmware
    ///
    /// The ids must match and each version must satisfy its counterpart.
    /// Names are not compared.
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.id == other.id
            && self.hardware_version.satisfies(&other.hardware_version)
            && self.firmware_version.satisfies(&other.firmware_version)
            && self.assembly_version.satisfies(&other.assembly_version)
    }
}

impl fmt::Display for FirmwareMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{name}{sep}{hw}{sep}{fw}{sep}{asm}{sep}{id}",
            name = self.name,
            hw = self.hardware_version,
            fw = self.firmware_version,
            asm = self.assembly_version,
            id = self.id,
            sep = SEPARATOR,
        )
    }
}

impl FromStr for FirmwareMetadata {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Fields come out in reverse order: id, assembly, firmware, hardware, name.
        let fields: Vec<&str> = s.rsplitn(FIELD_COUNT, SEPARATOR).collect();
        let [id, assembly, firmware, hardware, name] = fields[..] else {
            return Err(Error::invalid_metadata(
                s,
                format!("expected {FIELD_COUNT} fields separated by '{SEPARATOR}', found {}", fields.len()),
            ));
        };

        let version = |field: &str, text: &str| {
            HarpVersion::parse(text)
                .map_err(|e| Error::invalid_metadata(s, format!("{field} version: {e}")))
        };
        let hardware_version = version("hardware", hardware)?;
        let firmware_version = version("firmware", firmware)?;
        let assembly_version = version("assembly", assembly)?;

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_metadata(s, format!("id '{id}' is not a number")));
        }
        let id = id
            .parse()
            .map_err(|_| Error::invalid_metadata(s, format!("id '{id}' is out of range")))?;

        Ok(Self {
            name: name.to_string(),
            hardware_version,
            firmware_version,
            assembly_version,
            id,
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
