//! Inheritance of responsive control values along an ordered breakpoint chain.
//!
//! Breakpoints are listed largest to smallest with `desktop` as the root. A control
//! named `gap_mobile` with no value of its own shows the value of the nearest
//! ancestor breakpoint that has one (`gap_tablet`, then `gap`). `widescreen` is a
//! side branch of the root: it inherits straight from desktop and is never an
//! ancestor of any other breakpoint.

use serde::Serialize;

/// Settings values are JSON objects whose fields depend on the control type.
pub type ValueObject = serde_json::Map<String, serde_json::Value>;

pub const DESKTOP: &str = "desktop";
pub const WIDESCREEN: &str = "widescreen";

/// A control name split into its base name and breakpoint suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlName<'a> {
    pub base_name: &'a str,
    pub device_suffix: Option<&'a str>,
}

/// Value a breakpoint shows through inheritance, with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InheritedValue {
    #[serde(flatten)]
    pub value: ValueObject,
    /// Breakpoint that actually supplied the value.
    #[serde(rename = "__inheritedFrom")]
    pub inherited_from: String,
    /// Structural parent, which differs from `inherited_from` when the parent was empty.
    #[serde(rename = "__directParentDevice")]
    pub direct_parent: String,
    /// Breakpoints consulted, nearest first.
    #[serde(rename = "__inheritPath")]
    pub inherit_path: Vec<String>,
    #[serde(rename = "__sourceUnit", skip_serializing_if = "Option::is_none")]
    pub source_unit: Option<String>,
}

impl InheritedValue {
    fn new(
        mut value: ValueObject,
        inherited_from: &str,
        direct_parent: &str,
        path: Vec<String>,
    ) -> Self {
        // Provenance of a value that was itself inherited is replaced, not duplicated.
        value.retain(|key, _| !key.starts_with("__"));
        let source_unit = value
            .get("unit")
            .and_then(|u| u.as_str())
            .map(str::to_string);
        Self {
            value,
            inherited_from: inherited_from.to_string(),
            direct_parent: direct_parent.to_string(),
            inherit_path: path,
            source_unit,
        }
    }

    /// True when the supplying breakpoint used a different unit than the control's own.
    pub fn has_mixed_units(&self, own_unit: &str) -> bool {
        self.source_unit
            .as_deref()
            .is_some_and(|unit| !unit.eq_ignore_ascii_case(own_unit))
    }
}

/// Breakpoint identifiers ordered largest to smallest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointOrder {
    order: Vec<String>,
}

impl BreakpointOrder {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    /// Settings key of `base_name` at `breakpoint`.
    pub fn control_name(base_name: &str, breakpoint: &str) -> String {
        if breakpoint == DESKTOP {
            base_name.to_string()
        } else {
            format!("{base_name}_{breakpoint}")
        }
    }

    /// Strip a known breakpoint suffix off `name`. The first matching breakpoint in
    /// the order wins, so suffixes must not overlap.
    pub fn parse_control_name<'a>(&self, name: &'a str) -> ControlName<'a> {
        for device in self.order.iter().filter(|d| *d != DESKTOP) {
            let Some(base) = name.strip_suffix(device.as_str()) else {
                continue;
            };
            if let Some(base_name) = base.strip_suffix('_') {
                return ControlName {
                    base_name,
                    device_suffix: Some(&name[name.len() - device.len()..]),
                };
            }
        }

        ControlName {
            base_name: name,
            device_suffix: None,
        }
    }

    /// Breakpoints `device` inherits through, furthest first; the direct parent is last.
    fn ancestors(&self, device: &str) -> &[String] {
        let index = self
            .order
            .iter()
            .position(|d| d == device)
            .unwrap_or(0);
        &self.order[..index]
    }

    /// Resolve the value the control `name` inherits.
    ///
    /// Returns `None` for root (desktop) controls and when no ancestor holds any value.
    /// When every ancestor is empty but the direct parent exists, its empty value is
    /// still returned so callers can tell "inherits nothing yet" from "nothing to inherit".
    pub fn resolve<G, E>(&self, name: &str, get_value: G, is_empty: E) -> Option<InheritedValue>
    where
        G: Fn(&str) -> Option<ValueObject>,
        E: Fn(&ValueObject) -> bool,
    {
        let ControlName {
            base_name,
            device_suffix,
        } = self.parse_control_name(name);
        let device = device_suffix?;

        if device == WIDESCREEN {
            let value = get_value(base_name)?;
            log::trace!("{name}: widescreen inherits from {}", DESKTOP);
            return Some(InheritedValue::new(
                value,
                DESKTOP,
                DESKTOP,
                vec![DESKTOP.to_string()],
            ));
        }

        let ancestors: Vec<&str> = self
            .ancestors(device)
            .iter()
            .map(String::as_str)
            .filter(|d| *d != WIDESCREEN)
            .collect();
        let (&direct_parent, rest) = ancestors.split_last()?;

        let parent_value = get_value(&Self::control_name(base_name, direct_parent));
        if let Some(value) = &parent_value {
            if !is_empty(value) {
                log::trace!("{name}: inherits from direct parent {direct_parent}");
                return Some(InheritedValue::new(
                    value.clone(),
                    direct_parent,
                    direct_parent,
                    vec![direct_parent.to_string()],
                ));
            }
        }

        let mut path = vec![direct_parent.to_string()];
        for &ancestor in rest.iter().rev() {
            path.push(ancestor.to_string());
            let Some(value) = get_value(&Self::control_name(base_name, ancestor)) else {
                continue;
            };
            if !is_empty(&value) {
                log::debug!("{name}: {direct_parent} is empty, inherits from {ancestor}");
                return Some(InheritedValue::new(value, ancestor, direct_parent, path));
            }
        }

        log::debug!("{name}: no ancestor of {device} has a value");
        parent_value.map(|value| {
            InheritedValue::new(
                value,
                direct_parent,
                direct_parent,
                vec![direct_parent.to_string()],
            )
        })
    }
}

fn is_blank(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Emptiness of single-axis controls: the `size` field is blank.
pub fn size_is_empty(value: &ValueObject) -> bool {
    is_blank(value.get("size"))
}

/// Emptiness of box controls: all four sides are blank.
pub fn dimensions_is_empty(value: &ValueObject) -> bool {
    ["top", "right", "bottom", "left"]
        .iter()
        .all(|side| is_blank(value.get(*side)))
}
