//! Harp value types
//!
//! Versions and firmware metadata exchanged with Harp devices, together
//! with their text forms.

mod metadata;
mod version;

pub use metadata::*;
pub use version::*;
