//! Lookup of stored control values in the preset catalog, for display.
//!
//! A catalog is an ordered list of named groups. A group is either a literal value
//! (a named shortcut) or a list of preset records. Lookup walks the groups in order
//! and the first exact `value` match wins.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::clamp::{self, ClampValues};
use crate::unit::DEFAULT_UNIT;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub min_size: Option<String>,
    #[serde(default)]
    pub min_unit: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub max_size: Option<String>,
    #[serde(default)]
    pub max_unit: Option<String>,
}

impl PresetRecord {
    fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| self.value.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupEntry {
    Literal(String),
    Presets(Vec<PresetRecord>),
}

impl GroupEntry {
    /// Reads one group's payload. Malformed records are dropped, and a payload that
    /// is neither a string nor a list drops the whole group, so the rest of the
    /// catalog stays usable.
    fn from_json(group: &str, value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(literal) => Some(GroupEntry::Literal(literal)),
            serde_json::Value::Array(items) => Some(GroupEntry::Presets(
                items
                    .into_iter()
                    .filter_map(|item| {
                        serde_json::from_value(item)
                            .inspect_err(|e| {
                                log::warn!("Skipping malformed preset in group '{group}': {e}")
                            })
                            .ok()
                    })
                    .collect(),
            )),
            other => {
                log::warn!(
                    "Skipping preset group '{group}': expected a string or a list, got {other}"
                );
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogGroup {
    pub name: String,
    pub entry: GroupEntry,
}

impl CatalogGroup {
    fn from_json(name: String, value: serde_json::Value) -> Option<Self> {
        let entry = GroupEntry::from_json(&name, value)?;
        Some(Self { name, entry })
    }
}

#[derive(Deserialize)]
struct RawGroup {
    name: String,
    value: serde_json::Value,
}

/// Ordered preset groups; the order is the match priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    groups: Vec<CatalogGroup>,
}

/// A fluid preset with explicit bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexPreset {
    pub group: String,
    pub id: Option<String>,
    pub name: String,
    pub value: String,
    pub min_size: String,
    pub min_unit: String,
    pub max_size: String,
    pub max_unit: String,
}

/// A named entry without bounds: a literal shortcut or a non-fluid custom value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplePreset {
    pub group: String,
    pub id: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PresetMatch {
    Complex(ComplexPreset),
    Simple(SimplePreset),
}

impl PresetMatch {
    pub fn name(&self) -> &str {
        match self {
            PresetMatch::Complex(p) => &p.name,
            PresetMatch::Simple(p) => &p.name,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PresetMatch::Complex(p) => format!(
                "{} ({}{} ~ {}{})",
                p.name, p.min_size, p.min_unit, p.max_size, p.max_unit
            ),
            PresetMatch::Simple(p) => p.name.clone(),
        }
    }
}

impl Catalog {
    pub fn new(groups: Vec<CatalogGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Find the preset `stored` refers to. `None` means the caller should treat the
    /// value as an inline formula or an unrecognized string.
    pub fn lookup(&self, stored: &str) -> Option<PresetMatch> {
        self.groups
            .iter()
            .find_map(|group| match_group(group, stored))
    }
}

fn match_group(group: &CatalogGroup, stored: &str) -> Option<PresetMatch> {
    match &group.entry {
        GroupEntry::Literal(value) => (value == stored).then(|| {
            PresetMatch::Simple(SimplePreset {
                group: group.name.clone(),
                id: None,
                name: group.name.clone(),
                value: value.clone(),
            })
        }),
        GroupEntry::Presets(records) => {
            let record = records.iter().find(|r| r.value == stored)?;
            Some(classify(&group.name, record))
        }
    }
}

fn classify(group: &str, record: &PresetRecord) -> PresetMatch {
    match (&record.min_size, &record.max_size) {
        (Some(min_size), Some(max_size)) => PresetMatch::Complex(ComplexPreset {
            group: group.to_string(),
            id: record.id.clone(),
            name: record.display_name(),
            value: record.value.clone(),
            min_size: min_size.clone(),
            min_unit: record
                .min_unit
                .clone()
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            max_size: max_size.clone(),
            max_unit: record
                .max_unit
                .clone()
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        }),
        _ => PresetMatch::Simple(SimplePreset {
            group: group.to_string(),
            id: record.id.clone(),
            name: record.display_name(),
            value: record.value.clone(),
        }),
    }
}

/// Source of the catalog for [`lookup_async`].
#[allow(async_fn_in_trait)]
pub trait CatalogProvider {
    /// Resolves to `None` when the catalog could not be obtained; never an error.
    async fn fetch_catalog(&self) -> Option<Catalog>;
}

/// Fetch the catalog, then match exactly like [`Catalog::lookup`].
pub async fn lookup_async<P: CatalogProvider>(stored: &str, provider: &P) -> Option<PresetMatch> {
    let Some(catalog) = provider.fetch_catalog().await else {
        log::warn!("Preset catalog unavailable, '{stored}' left unresolved");
        return None;
    };
    catalog.lookup(stored)
}

/// How a stored value should be presented to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "display", rename_all = "lowercase")]
pub enum ValueDisplay {
    Preset(PresetMatch),
    Inline(ClampValues),
    Raw { value: String },
}

impl ValueDisplay {
    pub fn label(&self) -> String {
        match self {
            ValueDisplay::Preset(m) => m.label(),
            ValueDisplay::Inline(v) => format!("Custom ({} ~ {})", v.min(), v.max()),
            ValueDisplay::Raw { value } => value.clone(),
        }
    }
}

/// Preset match first, then an inline clamp formula, then the raw string.
pub fn describe(stored: &str, catalog: Option<&Catalog>) -> ValueDisplay {
    if let Some(found) = catalog.and_then(|c| c.lookup(stored)) {
        return ValueDisplay::Preset(found);
    }
    if let Some(values) = clamp::decode(stored) {
        return ValueDisplay::Inline(values);
    }
    log::debug!("'{stored}' is neither a preset nor a clamp formula");
    ValueDisplay::Raw {
        value: stored.to_string(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

// Catalogs arrive either as a JSON object keyed by group name or as a list of
// `{name, value}` groups. Object key order is kept since it is the match priority.
impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of preset groups or a list of {name, value} groups")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Catalog, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::new();
                while let Some((name, value)) = map.next_entry::<String, serde_json::Value>()? {
                    groups.extend(CatalogGroup::from_json(name, value));
                }
                Ok(Catalog { groups })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Catalog, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut groups = Vec::new();
                while let Some(raw) = seq.next_element::<RawGroup>()? {
                    groups.extend(CatalogGroup::from_json(raw.name, raw.value));
                }
                Ok(Catalog { groups })
            }

            fn visit_unit<E: de::Error>(self) -> Result<Catalog, E> {
                Ok(Catalog::default())
            }
        }

        deserializer.deserialize_any(CatalogVisitor)
    }
}
