//! Supported device table
//!
//! Checks firmware metadata reported by a device against the versions a
//! host knows how to talk to.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocol::{FirmwareMetadata, HarpVersion};

/// Version constraints for one kind of device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedDevice {
    /// Device name as reported in its firmware metadata
    pub name: String,

    /// Device id; when absent any id with a matching name is accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    #[serde(default)]
    pub hardware: HarpVersion,

    #[serde(default)]
    pub firmware: HarpVersion,

    #[serde(default)]
    pub assembly: HarpVersion,
}

impl SupportedDevice {
    /// Create an entry accepting any version of the named device
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            hardware: HarpVersion::ANY,
            firmware: HarpVersion::ANY,
            assembly: HarpVersion::ANY,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_hardware(mut self, version: HarpVersion) -> Self {
        self.hardware = version;
        self
    }

    pub fn with_firmware(mut self, version: HarpVersion) -> Self {
        self.firmware = version;
        self
    }

    pub fn with_assembly(mut self, version: HarpVersion) -> Self {
        self.assembly = version;
        self
    }

    /// Check whether this entry describes the given device
    pub fn matches(&self, metadata: &FirmwareMetadata) -> bool {
        self.name == metadata.name() && self.id.map_or(true, |id| id == metadata.id())
    }

    /// Check a matching device's versions, hardware first
    pub fn check(&self, metadata: &FirmwareMetadata) -> Compatibility {
        let constraints = [
            (VersionKind::Hardware, self.hardware, metadata.hardware_version()),
            (VersionKind::Firmware, self.firmware, metadata.firmware_version()),
            (VersionKind::Assembly, self.assembly, metadata.assembly_version()),
        ];

        for (kind, required, actual) in constraints {
            if !required.satisfies(&actual) {
                return Compatibility::Mismatch {
                    kind,
                    required,
                    actual,
                };
            }
        }

        Compatibility::Supported
    }
}

/// Which of a device's versions failed a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionKind {
    Hardware,
    Firmware,
    Assembly,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionKind::Hardware => write!(f, "hardware"),
            VersionKind::Firmware => write!(f, "firmware"),
            VersionKind::Assembly => write!(f, "assembly"),
        }
    }
}

/// Outcome of checking a device against the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Compatibility {
    /// A matching entry accepts every version
    Supported,

    /// No entry matches the device's name and id
    UnknownDevice,

    /// The device is known but one of its versions is not accepted
    Mismatch {
        kind: VersionKind,
        required: HarpVersion,
        actual: HarpVersion,
    },
}

impl Compatibility {
    pub fn is_supported(&self) -> bool {
        matches!(self, Compatibility::Supported)
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Supported => write!(f, "supported"),
            Compatibility::UnknownDevice => write!(f, "unknown device"),
            Compatibility::Mismatch {
                kind,
                required,
                actual,
            } => write!(f, "{kind} version {actual} does not satisfy {required}"),
        }
    }
}

/// Table of devices a host supports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityTable {
    devices: Vec<SupportedDevice>,
}

impl CompatibilityTable {
    pub fn new(devices: Vec<SupportedDevice>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[SupportedDevice] {
        &self.devices
    }

    /// Find the first entry describing the device
    pub fn find(&self, metadata: &FirmwareMetadata) -> Option<&SupportedDevice> {
        self.devices.iter().find(|d| d.matches(metadata))
    }

    /// Check a device against every matching entry
    ///
    /// The device is supported if any matching entry accepts it. Otherwise
    /// the mismatch from the first matching entry is reported.
    pub fn check(&self, metadata: &FirmwareMetadata) -> Compatibility {
        let mut first_mismatch = None;

        for device in self.devices.iter().filter(|d| d.matches(metadata)) {
            let result = device.check(metadata);
            debug!(
                device = %device.name,
                metadata = %metadata,
                result = %result,
                "Checked device entry"
            );
            if result.is_supported() {
                return result;
            }
            first_mismatch.get_or_insert(result);
        }

        first_mismatch.unwrap_or_else(|| {
            debug!(metadata = %metadata, "No entry for device");
            Compatibility::UnknownDevice
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CompatibilityTable {
        CompatibilityTable::new(vec![
            SupportedDevice::new("Behavior")
                .with_id(1216)
                .with_hardware(HarpVersion::floating_minor(1))
                .with_firmware(HarpVersion::floating_patch(2, 3)),
            SupportedDevice::new("Behavior")
                .with_id(1216)
                .with_hardware(HarpVersion::floating_minor(2))
                .with_firmware(HarpVersion::floating_minor(3)),
            SupportedDevice::new("LoadCells").with_assembly(HarpVersion::floating_minor(1)),
        ])
    }

    fn metadata(text: &str) -> FirmwareMetadata {
        FirmwareMetadata::parse(text).unwrap()
    }

    #[test]
    fn test_supported_device() {
        let result = table().check(&metadata("Behavior|1.1|2.3.1|0.4|1216"));
        assert_eq!(result, Compatibility::Supported);
    }

    #[test]
    fn test_second_entry_can_accept() {
        let result = table().check(&metadata("Behavior|2.0|3.1.0|0.4|1216"));
        assert!(result.is_supported());
    }

    #[test]
    fn test_mismatch_reports_first_entry() {
        let result = table().check(&metadata("Behavior|1.1|2.4|0.4|1216"));
        assert_eq!(
            result,
            Compatibility::Mismatch {
                kind: VersionKind::Firmware,
                required: HarpVersion::floating_patch(2, 3),
                actual: HarpVersion::floating_patch(2, 4),
            }
        );
        assert_eq!(result.to_string(), "firmware version 2.4 does not satisfy 2.3");
    }

    #[test]
    fn test_hardware_checked_first() {
        let device = SupportedDevice::new("Behavior")
            .with_hardware(HarpVersion::floating_minor(1))
            .with_firmware(HarpVersion::floating_minor(2));
        let result = device.check(&metadata("Behavior|3.0|9.0|0.4|1216"));
        assert!(matches!(
            result,
            Compatibility::Mismatch {
                kind: VersionKind::Hardware,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_device() {
        assert_eq!(
            table().check(&metadata("Olfactometer|1.0|1.0|0.4|1140")),
            Compatibility::UnknownDevice
        );
        // Known name, wrong id
        assert_eq!(
            table().check(&metadata("Behavior|1.1|2.3.1|0.4|1")),
            Compatibility::UnknownDevice
        );
    }

    #[test]
    fn test_entry_without_id_matches_any_id() {
        let result = table().check(&metadata("LoadCells|0.1|0.2|1.3|1232"));
        assert!(result.is_supported());
        assert_eq!(table().find(&metadata("LoadCells|0.1|0.2|1.3|7")).unwrap().name, "LoadCells");
    }

    #[test]
    fn test_table_from_toml() {
        let table: CompatibilityTable = toml::from_str(
            r#"
[[devices]]
name = "Behavior"
id = 1216
hardware = "1"
firmware = "2.3.x"
"#,
        )
        .unwrap();

        let device = &table.devices()[0];
        assert_eq!(device.id, Some(1216));
        assert_eq!(device.firmware, HarpVersion::floating_patch(2, 3));
        assert_eq!(device.assembly, HarpVersion::ANY);
    }

    #[test]
    fn test_table_rejects_invalid_version() {
        let result: std::result::Result<CompatibilityTable, _> = toml::from_str(
            r#"
[[devices]]
name = "Behavior"
firmware = "x.2"
"#,
        );
        assert!(result.is_err());
    }
}
