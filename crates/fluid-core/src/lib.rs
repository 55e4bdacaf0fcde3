//! Fluid value engine for responsive page-builder controls.
//!
//! * [`unit`] parses and validates `number+unit` input such as `16px` or `1.5rem`.
//! * [`clamp`] encodes a min/max pair as a CSS `clamp()` formula and decodes it back.
//! * [`breakpoint`] resolves the value a breakpoint inherits from its ancestors.
//! * [`preset`] maps stored values to catalog presets for display.
//!
//! Everything here is a pure function of its inputs. Malformed input yields `None`
//! (or an `Err` for pair validation) and never panics.

pub mod breakpoint;
pub mod clamp;
pub mod config;
pub mod preset;
pub mod unit;

pub use breakpoint::{BreakpointOrder, ControlName, InheritedValue, ValueObject};
pub use clamp::{ClampCodec, ClampValues, ViewportRefs};
pub use config::FluidToml;
pub use preset::{Catalog, CatalogProvider, PresetMatch, ValueDisplay};
pub use unit::{PairError, SizeUnit};
