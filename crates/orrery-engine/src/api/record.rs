//! Celestial body records as supplied by the host application.
//!
//! Records come from catalog CSV rows or hand-built lists, so the same
//! quantity can live under several column names and numbers can arrive as
//! strings. The record keeps every original field so the selection callback
//! can hand back exactly what the caller supplied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::types::{BodyId, ResolvedId};

/// Identifier columns, highest priority first.
pub const ID_FIELDS: [&str; 8] = [
    "id", "kepoi_name", "pl_name", "toidisplay", "toi", "tid", "koi_name", "kepid",
];

pub const PERIOD_FIELDS: [&str; 3] = ["orbitalPeriodDays", "pl_orbper", "koi_period"];
pub const SEMI_MAJOR_AXIS_FIELDS: [&str; 3] = ["semiMajorAxisAU", "pl_orbsmax", "koi_sma"];
pub const RADIUS_FIELDS: [&str; 4] = ["radiusEarthUnits", "koi_radius", "pl_rade", "koi_prad"];
pub const ECCENTRICITY_FIELDS: [&str; 1] = ["eccentricity"];
pub const NAME_FIELDS: [&str; 4] = ["name", "pl_name", "kepoi_name", "koi_name"];

/// One body record. Immutable from the engine's point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CelestialBodyRecord {
    fields: Map<String, Value>,
}

impl CelestialBodyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build from an arbitrary JSON value (must be an object).
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Parse a single record from a JSON object string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a JSON array of records.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        // A string-keyed map always serializes.
        serde_json::to_string(&self.fields).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// First numeric value among `keys`, accepting numeric strings.
    /// The value is returned as parsed; callers clamp.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| match self.fields.get(*key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    /// First non-empty string value among `keys`.
    pub fn text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| match self.fields.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        })
    }

    pub fn orbital_period_days(&self) -> Option<f64> {
        self.number(&PERIOD_FIELDS)
    }

    pub fn semi_major_axis_au(&self) -> Option<f64> {
        self.number(&SEMI_MAJOR_AXIS_FIELDS)
    }

    pub fn radius_earth_units(&self) -> Option<f64> {
        self.number(&RADIUS_FIELDS)
    }

    pub fn eccentricity(&self) -> Option<f64> {
        self.number(&ECCENTRICITY_FIELDS)
    }

    /// Texture URL display hint.
    pub fn texture(&self) -> Option<&str> {
        self.text(&["texture"])
    }

    /// Color display hint, `#rrggbb` or `rrggbb`, as linear-ish RGB in [0, 1].
    pub fn color(&self) -> Option<[f32; 3]> {
        parse_hex_color(self.text(&["color"])?)
    }

    /// Human-readable label for logs.
    pub fn display_name(&self) -> String {
        self.text(&NAME_FIELDS)
            .map(str::to_owned)
            .unwrap_or_else(|| self.resolve_id().into_id().0)
    }

    /// Resolve the body's stable id.
    ///
    /// Walks [`ID_FIELDS`] in order; if none holds a usable value the id is
    /// synthesized from a hash of its fields in sorted key order, so the same
    /// record resolves to the same id on every pass regardless of its
    /// position in the list.
    pub fn resolve_id(&self) -> ResolvedId {
        for field in ID_FIELDS {
            let id = match self.fields.get(field) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
                Some(Value::Number(n)) => n.to_string(),
                _ => continue,
            };
            return ResolvedId::Catalog { field, id: BodyId(id) };
        }
        let mut hash = Fnv1a::new();
        hash_object(&self.fields, &mut hash);
        ResolvedId::Synthesized(BodyId(format!("body-{:016x}", hash.0)))
    }
}

/// 64-bit FNV-1a.
struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Self(0xcbf2_9ce4_8422_2325)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.write(&(s.len() as u64).to_le_bytes());
        self.write(s.as_bytes());
    }
}

/// Hash object entries in sorted key order, whatever order the map keeps.
fn hash_object(map: &Map<String, Value>, hash: &mut Fnv1a) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    hash.write(b"{");
    for (key, value) in entries {
        hash.write_str(key);
        hash_value(value, hash);
    }
    hash.write(b"}");
}

fn hash_value(value: &Value, hash: &mut Fnv1a) {
    match value {
        Value::Object(map) => hash_object(map, hash),
        Value::Array(items) => {
            hash.write(b"[");
            for item in items {
                hash_value(item, hash);
            }
            hash.write(b"]");
        }
        Value::String(s) => {
            hash.write(b"s");
            hash.write_str(s);
        }
        // Null, bools and numbers print unambiguously.
        leaf => hash.write_str(&leaf.to_string()),
    }
}

pub(crate) fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(|v| v as f32 / 255.0);
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> CelestialBodyRecord {
        CelestialBodyRecord::from_value(v).unwrap()
    }

    #[test]
    fn id_prefers_explicit_field() {
        let r = record(json!({ "id": "A", "kepoi_name": "K00001.01" }));
        assert_eq!(r.resolve_id(), ResolvedId::Catalog { field: "id", id: BodyId::from("A") });
    }

    #[test]
    fn id_falls_back_through_catalog_columns() {
        let r = record(json!({ "id": "", "pl_name": null, "kepid": 10797460 }));
        assert_eq!(
            r.resolve_id(),
            ResolvedId::Catalog { field: "kepid", id: BodyId::from("10797460") }
        );
    }

    #[test]
    fn synthesized_id_is_deterministic() {
        let a = record(json!({ "orbitalPeriodDays": 10.0, "radiusEarthUnits": 1.0 }));
        let b = record(json!({ "radiusEarthUnits": 1.0, "orbitalPeriodDays": 10.0 }));
        let ra = a.resolve_id();
        assert!(ra.is_synthesized());
        assert_eq!(ra, b.resolve_id(), "key order must not change the id");

        let c = record(json!({ "orbitalPeriodDays": 11.0, "radiusEarthUnits": 1.0 }));
        assert_ne!(ra, c.resolve_id());
    }

    #[test]
    fn synthesized_id_ignores_nested_key_order() {
        let a = CelestialBodyRecord::new().with("orbit", json!({ "a": 1.5, "e": 0.1 })).with("mass", 3.0);
        let b = CelestialBodyRecord::new().with("mass", 3.0).with("orbit", json!({ "e": 0.1, "a": 1.5 }));
        assert_eq!(a.resolve_id(), b.resolve_id());

        let c = CelestialBodyRecord::new().with("mass", 3.0).with("orbit", json!({ "e": 0.1, "a": 1.6 }));
        assert_ne!(a.resolve_id(), c.resolve_id());
    }

    #[test]
    fn numbers_accept_strings_and_aliases() {
        let r = record(json!({ "koi_period": " 9.488 ", "pl_rade": 2.26 }));
        assert_eq!(r.orbital_period_days(), Some(9.488));
        assert_eq!(r.radius_earth_units(), Some(2.26));
        assert_eq!(r.semi_major_axis_au(), None);
    }

    #[test]
    fn primary_field_wins_over_alias() {
        let r = record(json!({ "orbitalPeriodDays": 10, "koi_period": 99 }));
        assert_eq!(r.orbital_period_days(), Some(10.0));
    }

    #[test]
    fn garbage_numbers_are_none() {
        let r = record(json!({ "orbitalPeriodDays": "n/a", "radiusEarthUnits": true }));
        assert_eq!(r.orbital_period_days(), None);
        assert_eq!(r.radius_earth_units(), None);
    }

    #[test]
    fn color_hint_parses_hex() {
        let r = record(json!({ "color": "#ff8000" }));
        let c = r.color().unwrap();
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert!(parse_hex_color("#12345").is_none());
        assert!(parse_hex_color("zzzzzz").is_none());
    }

    #[test]
    fn round_trip_keeps_unknown_fields() {
        let r = record(json!({ "kepoi_name": "K1", "koi_disposition": "CANDIDATE" }));
        let back = CelestialBodyRecord::from_json(&r.to_json()).unwrap();
        assert_eq!(back.get("koi_disposition"), Some(&json!("CANDIDATE")));
    }

    #[test]
    fn list_rejects_non_objects() {
        assert!(CelestialBodyRecord::list_from_json(r#"[{"id":"a"},{"id":"b"}]"#).is_ok());
        assert!(CelestialBodyRecord::list_from_json(r#"[1, 2]"#).is_err());
    }
}
