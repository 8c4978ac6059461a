//! Harp device versions
//!
//! Value types for the hardware, firmware and protocol versions reported by
//! Harp devices:
//!
//! - [`HarpVersion`]: `major.minor.patch` with floating trailing components,
//!   a total order and a separate [`HarpVersion::satisfies`] relation.
//! - [`FirmwareMetadata`]: a device name, three versions and an id.
//! - [`CompatibilityTable`]: checks metadata against supported devices.
//!
//! ```
//! use harp_version::HarpVersion;
//!
//! let floating: HarpVersion = "2.1.x".parse().unwrap();
//! let concrete = HarpVersion::exact(2, 1, 0);
//!
//! assert!(floating < concrete);
//! assert!(floating.satisfies(&concrete));
//! assert_eq!(floating.to_string(), "2.1");
//! ```

pub mod compat;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;

pub use compat::{Compatibility, CompatibilityTable, SupportedDevice, VersionKind};
pub use error::{Error, ErrorCode, Result};
pub use protocol::{compare_optional, FirmwareMetadata, HarpVersion};
