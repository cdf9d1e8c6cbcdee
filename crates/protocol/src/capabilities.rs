//! Capability trees and the merge rules that produce them.
//!
//! A capability set is a JSON mapping from capability name to value, where
//! values may be scalars, lists, or nested vendor option blocks
//! (`chromeOptions`, `moz:firefoxOptions`, ...). Two logical variants
//! exist: the *desired* set computed locally before any network call, and
//! the *negotiated* set returned by the driver once a session exists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::dialect::ProtocolDialect;

/// A capability set: named capabilities with scalar, list, or nested
/// mapping values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(Map<String, Value>);

impl Capabilities {
    /// Creates an empty capability set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// The fixed default capability set every session attempt starts from.
    pub fn default_set() -> Self {
        let mut map = Map::new();
        map.insert("browserName".into(), json!("firefox"));
        map.insert("platform".into(), json!("ANY"));
        Self(map)
    }

    /// Computes the desired capability set for a session attempt.
    ///
    /// Seeds from [`Capabilities::default_set`] and overlays the user set
    /// shallowly: user values win on key collision, and nested vendor
    /// blocks are replaced wholesale rather than deep-merged. Always
    /// succeeds; an empty user set yields the defaults unchanged.
    pub fn desired(user: &Capabilities) -> Self {
        let mut merged = Self::default_set();
        for (key, value) in &user.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Returns the `browserName` capability, if set to a string.
    pub fn browser_name(&self) -> Option<&str> {
        self.0.get("browserName").and_then(Value::as_str)
    }

    /// Returns a capability value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Sets a capability value, replacing any existing one.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Returns true when no capabilities are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying JSON mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Mutably borrows the underlying JSON mapping.
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Converts into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Capabilities {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Recursive last-write-wins merge of `src` into `dest`.
///
/// Mappings merge key-by-key; any other pairing (scalar, list, or type
/// mismatch) is resolved by replacing the destination value with a clone
/// of the source. Lists are replaced wholesale, never concatenated — the
/// append rule for launch args lives in [`crate::headless`], not here.
/// Merging the same source twice yields the same result.
pub fn deep_merge(dest: &mut Map<String, Value>, src: &Map<String, Value>) {
    for (key, src_value) in src {
        match (dest.get_mut(key), src_value) {
            (Some(Value::Object(dest_obj)), Value::Object(src_obj)) => {
                deep_merge(dest_obj, src_obj);
            }
            _ => {
                dest.insert(key.clone(), src_value.clone());
            }
        }
    }
}

/// Browser family derived from the desired `browserName`.
///
/// Determines which nested option path receives headless launch-argument
/// mutations and how dialect detection proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    /// Unrecognized or unspecified browser; no vendor option path known.
    Other,
}

impl BrowserFamily {
    /// Derives the family from a capability set's `browserName`.
    pub fn from_capabilities(caps: &Capabilities) -> Self {
        match caps.browser_name() {
            Some(name) if name.eq_ignore_ascii_case("chrome") => Self::Chrome,
            Some(name) if name.eq_ignore_ascii_case("firefox") => Self::Firefox,
            _ => Self::Other,
        }
    }
}

/// The capability payload handed to the transport for a session attempt.
///
/// Owns the desired set, the detected dialect, and the W3C wire block.
/// The wire block is an explicit field rather than a mutation of shared
/// settings; the transport receives it through this struct.
#[derive(Debug, Clone)]
pub struct CapabilityRequest {
    desired: Capabilities,
    wire: Capabilities,
    dialect: ProtocolDialect,
}

impl CapabilityRequest {
    /// Computes the request for one session attempt.
    ///
    /// `user` is overlaid onto the defaults (shallow, user wins) and the
    /// dialect is detected from the result. `wire_seed` carries any
    /// pre-existing wire capability block; when the dialect is W3C the
    /// desired set is deep-merged into it (additive union, desired wins
    /// per leaf key).
    pub fn compute(user: &Capabilities, wire_seed: &Capabilities) -> Self {
        let desired = Capabilities::desired(user);
        let dialect = ProtocolDialect::detect(&desired);

        let mut wire = wire_seed.clone();
        if dialect == ProtocolDialect::W3C {
            deep_merge(wire.as_map_mut(), desired.as_map());
        }

        Self {
            desired,
            wire,
            dialect,
        }
    }

    /// The desired capability set for this attempt.
    pub fn desired(&self) -> &Capabilities {
        &self.desired
    }

    /// Mutable access for launch-time mutation (headless injection).
    pub fn desired_mut(&mut self) -> &mut Capabilities {
        &mut self.desired
    }

    /// The W3C wire capability block.
    pub fn wire(&self) -> &Capabilities {
        &self.wire
    }

    /// The wire dialect in effect for this attempt.
    pub fn dialect(&self) -> ProtocolDialect {
        self.dialect
    }

    /// Browser family derived from the desired set.
    pub fn browser_family(&self) -> BrowserFamily {
        BrowserFamily::from_capabilities(&self.desired)
    }

    /// Folds the desired set into the wire block.
    ///
    /// Called after launch-time mutation so the wire block reflects the
    /// final desired tree. Recursive last-write-wins per leaf key, so
    /// merging twice with the same desired set is idempotent.
    pub fn sync_wire(&mut self) {
        let desired = self.desired.clone();
        deep_merge(self.wire.as_map_mut(), desired.as_map());
    }
}
