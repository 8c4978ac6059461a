//! Harp device versions
//!
//! A [`HarpVersion`] is a `major.minor.patch` triple where any trailing
//! component may be left floating. Floating components act as wildcards for
//! [`HarpVersion::satisfies`] but still take part in the total order, where
//! they sort below any concrete value.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// Token accepted in place of the last component when parsing
pub const WILDCARD: &str = "x";

/// Version of a Harp device's hardware, firmware or protocol assembly
///
/// Components are stored as `Option<u32>`; `None` means the component is
/// floating. A finer component is never set while a coarser one floats.
///
/// A missing version altogether is modelled as `Option<HarpVersion>::None`,
/// which is distinct from [`HarpVersion::ANY`] and sorts below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HarpVersion {
    major: Option<u32>,
    minor: Option<u32>,
    patch: Option<u32>,
}

impl HarpVersion {
    /// Fully floating version, matching any other version
    pub const ANY: HarpVersion = HarpVersion {
        major: None,
        minor: None,
        patch: None,
    };

    /// Create a version from optional components
    ///
    /// Fails when a component is set after a floating one, e.g. a minor
    /// version without a major version.
    pub fn new(major: Option<u32>, minor: Option<u32>, patch: Option<u32>) -> Result<Self> {
        if major.is_none() && minor.is_some() {
            return Err(Error::invalid_version(
                describe_components(major, minor, patch),
                "minor version is set but major version is floating",
            ));
        }
        if minor.is_none() && patch.is_some() {
            return Err(Error::invalid_version(
                describe_components(major, minor, patch),
                "patch version is set but minor version is floating",
            ));
        }
        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    /// Create a fully specified version
    pub const fn exact(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            patch: Some(patch),
        }
    }

    /// Create a version whose patch component floats
    pub const fn floating_patch(major: u32, minor: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            patch: None,
        }
    }

    /// Create a version whose minor and patch components float
    pub const fn floating_minor(major: u32) -> Self {
        Self {
            major: Some(major),
            minor: None,
            patch: None,
        }
    }

    /// Parse a version such as `1`, `1.2`, `1.2.3` or `1.2.x`
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn major(&self) -> Option<u32> {
        self.major
    }

    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    /// Check whether every component is set
    pub fn is_exact(&self) -> bool {
        self.patch.is_some()
    }

    /// Check whether this is the fully floating version
    pub fn is_any(&self) -> bool {
        self.major.is_none()
    }

    /// Three-way comparison backing the `Ord` implementation
    ///
    /// Components are compared from major to patch. A floating component is
    /// less than any concrete one and equal to another floating one.
    pub fn compare(&self, other: &Self) -> Ordering {
        compare_component(self.major, other.major)
            .then_with(|| compare_component(self.minor, other.minor))
            .then_with(|| compare_component(self.patch, other.patch))
    }

    /// Check whether two versions are compatible
    ///
    /// Every component that is set on both sides must be equal; a floating
    /// component on either side matches anything. The relation is symmetric
    /// but not transitive: `1.0` and `1.1` both satisfy `1`, yet not each
    /// other.
    pub fn satisfies(&self, other: &Self) -> bool {
        component_satisfies(self.major, other.major)
            && component_satisfies(self.minor, other.minor)
            && component_satisfies(self.patch, other.patch)
    }
}

/// Compare two possibly absent versions
///
/// An absent version equals another absent version and is less than any
/// present one, including [`HarpVersion::ANY`].
pub fn compare_optional(a: Option<&HarpVersion>, b: Option<&HarpVersion>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.compare(b),
    }
}

fn compare_component(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

fn component_satisfies(a: Option<u32>, b: Option<u32>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn describe_components(major: Option<u32>, minor: Option<u32>, patch: Option<u32>) -> String {
    [major, minor, patch]
        .into_iter()
        .map(|c| c.map_or_else(|| WILDCARD.to_string(), |n| n.to_string()))
        .collect::<Vec<_>>()
        .join(".")
}

impl PartialOrd for HarpVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for HarpVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for HarpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.major, self.minor, self.patch) {
            (None, _, _) => f.write_str(WILDCARD),
            (Some(major), None, _) => write!(f, "{major}"),
            (Some(major), Some(minor), None) => write!(f, "{major}.{minor}"),
            (Some(major), Some(minor), Some(patch)) => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}

impl FromStr for HarpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > 3 {
            return Err(reject(s, format!("expected at most 3 components, found {}", parts.len())));
        }

        let last = parts.len() - 1;
        let mut components = [None; 3];
        for (i, part) in parts.iter().enumerate() {
            if part.eq_ignore_ascii_case(WILDCARD) {
                if i != last {
                    return Err(reject(s, "only the last component may be floating"));
                }
                break;
            }
            components[i] = Some(parse_component(s, part)?);
        }

        let [major, minor, patch] = components;
        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

fn parse_component(input: &str, part: &str) -> Result<u32> {
    if part.is_empty() {
        return Err(reject(input, "empty component"));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(reject(
            input,
            format!("'{part}' is neither a number nor '{WILDCARD}'"),
        ));
    }
    part.parse()
        .map_err(|_| reject(input, format!("'{part}' is out of range")))
}

fn reject(input: &str, reason: impl Into<String>) -> Error {
    let reason = reason.into();
    trace!(input = %input, reason = %reason, "Rejected version string");
    Error::invalid_version(input, reason)
}

impl TryFrom<String> for HarpVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HarpVersion> for String {
    fn from(version: HarpVersion) -> Self {
        version.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(s: &str) -> HarpVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_version_display() {
        assert_eq!(HarpVersion::exact(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(HarpVersion::floating_patch(1, 0).to_string(), "1.0");
        assert_eq!(HarpVersion::floating_minor(4).to_string(), "4");
        assert_eq!(HarpVersion::ANY.to_string(), "x");
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(v("1"), HarpVersion::floating_minor(1));
        assert_eq!(v("1.0"), HarpVersion::floating_patch(1, 0));
        assert_eq!(v("1.0.2"), HarpVersion::exact(1, 0, 2));
        assert_eq!(v("1.0.x"), HarpVersion::floating_patch(1, 0));
        assert_eq!(v("1.X"), HarpVersion::floating_minor(1));
        assert_eq!(v("x"), HarpVersion::ANY);
        assert_eq!(v("X"), HarpVersion::ANY);
    }

    #[test]
    fn test_floating_patch_renders_without_wildcard() {
        assert_eq!(v("1.0.x").to_string(), "1.0");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "1.xx", "1;2", "x.1", "1.x.0", "", "1.2.3.4", "1..2", "1.", ".1", "+1", "-1",
            " 1", "1.2 ", "99999999999", "v1.2", "x.x",
        ] {
            let err = HarpVersion::parse(input).unwrap_err();
            assert!(err.is_invalid_argument(), "{input:?} gave {err}");
        }
    }

    #[test]
    fn test_new_rejects_finer_component_after_floating() {
        assert!(HarpVersion::new(None, Some(1), None).is_err());
        assert!(HarpVersion::new(Some(1), None, Some(2)).is_err());
        assert!(HarpVersion::new(None, None, Some(2)).is_err());
        assert_eq!(HarpVersion::new(None, None, None).unwrap(), HarpVersion::ANY);
        assert_eq!(
            HarpVersion::new(Some(2), Some(1), None).unwrap(),
            HarpVersion::floating_patch(2, 1)
        );
    }

    #[test]
    fn test_floating_sorts_below_concrete() {
        let floating = HarpVersion::floating_patch(2, 1);
        let concrete = HarpVersion::exact(2, 1, 0);

        assert!(floating < concrete);
        assert!(concrete > floating);
        assert!(floating.satisfies(&concrete));
        assert!(concrete.satisfies(&floating));
    }

    #[test]
    fn test_minor_mismatch_is_ordered_and_incompatible() {
        let a = HarpVersion::floating_patch(2, 2);
        let b = HarpVersion::floating_patch(2, 1);

        assert!(a > b);
        assert!(!a.satisfies(&b));
        assert!(!b.satisfies(&a));
    }

    #[test]
    fn test_any_sorts_first_and_satisfies_everything() {
        assert!(HarpVersion::ANY < HarpVersion::floating_minor(0));
        assert!(HarpVersion::ANY.satisfies(&HarpVersion::exact(9, 9, 9)));
        assert!(HarpVersion::exact(9, 9, 9).satisfies(&HarpVersion::ANY));
    }

    #[test]
    fn test_absent_version_sorts_below_any() {
        let absent: Option<HarpVersion> = None;
        let any = Some(HarpVersion::ANY);

        assert_eq!(absent, None);
        assert_ne!(absent, any);
        assert!(absent < any);
        assert!(any > absent);
        assert_eq!(compare_optional(None, None), Ordering::Equal);
        assert_eq!(compare_optional(None, Some(&HarpVersion::ANY)), Ordering::Less);
        assert_eq!(compare_optional(Some(&HarpVersion::ANY), None), Ordering::Greater);
    }

    #[test]
    fn test_satisfies_is_not_transitive() {
        let a = v("1.0");
        let b = v("1");
        let c = v("1.1");

        assert!(a.satisfies(&b));
        assert!(b.satisfies(&c));
        assert!(!a.satisfies(&c));
    }

    #[test]
    fn test_sorting() {
        let mut versions = vec![v("1.1"), v("1"), v("1.0.3"), v("x"), v("0.9.9"), v("1.0")];
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["x", "0.9.9", "1", "1.0", "1.0.3", "1.1"]);
    }

    #[test]
    fn test_version_serialize() {
        let json = serde_json::to_string(&v("1.2")).unwrap();
        assert_eq!(json, "\"1.2\"");

        let parsed: HarpVersion = serde_json::from_str("\"3.0.x\"").unwrap();
        assert_eq!(parsed, HarpVersion::floating_patch(3, 0));

        assert!(serde_json::from_str::<HarpVersion>("\"x.1\"").is_err());
    }

    fn components() -> impl Strategy<Value = (Option<u32>, Option<u32>, Option<u32>)> {
        (
            any::<Option<u32>>(),
            any::<Option<u32>>(),
            any::<Option<u32>>(),
        )
            .prop_map(|(major, minor, patch)| {
                let minor = major.and(minor);
                let patch = minor.and(patch);
                (major, minor, patch)
            })
    }

    fn version() -> impl Strategy<Value = HarpVersion> {
        components().prop_map(|(major, minor, patch)| {
            HarpVersion::new(major, minor, patch).unwrap()
        })
    }

    proptest! {
        #[test]
        fn proptest_construct_and_roundtrip((major, minor, patch) in components()) {
            let version = HarpVersion::new(major, minor, patch);
            prop_assert!(version.is_ok());
            let version = version.unwrap();
            prop_assert_eq!(HarpVersion::parse(&version.to_string()).unwrap(), version);
        }

        #[test]
        fn proptest_operators_agree_with_compare(a in version(), b in version()) {
            let ord = a.compare(&b);
            prop_assert_eq!(a == b, ord == Ordering::Equal);
            prop_assert_eq!(a != b, ord != Ordering::Equal);
            prop_assert_eq!(a < b, ord == Ordering::Less);
            prop_assert_eq!(a >= b, ord != Ordering::Less);
            prop_assert_eq!(a > b, ord == Ordering::Greater);
            prop_assert_eq!(a <= b, ord != Ordering::Greater);
            prop_assert_eq!(b.compare(&a), ord.reverse());
        }

        #[test]
        fn proptest_satisfies_is_symmetric(a in version(), b in version()) {
            prop_assert_eq!(a.satisfies(&b), b.satisfies(&a));
        }

        #[test]
        fn proptest_equal_implies_satisfies(a in version()) {
            let b = a;
            prop_assert!(a.satisfies(&b));
            prop_assert!(b.satisfies(&a));
        }
    }
}
