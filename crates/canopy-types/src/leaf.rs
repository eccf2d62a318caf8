//! Leaf records and their display positions.
//!
//! A [`LeafRecord`] is one entry in the persisted collection: a single
//! interactive leaf on the tree plus the hints the page needs to draw it.
//! Records are insertion-ordered; the `index` field is the de facto unique
//! key, enforced only by the create operation's duplicate check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag assigned to leaves created without an explicit `source`.
pub const DEFAULT_SOURCE: &str = "manual";

// ---------------------------------------------------------------------------
// LeafPosition
// ---------------------------------------------------------------------------

/// Display-hint strings for placing a leaf on the rendered tree.
///
/// The values are CSS fragments consumed verbatim by the front-end, e.g.
/// `left: "28%"`, `top: "36%"`, `rotation: "180deg"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPosition {
    /// Offset from the left edge of the tree area.
    pub left: String,
    /// Offset from the top edge of the tree area.
    pub top: String,
    /// Rotation applied to the leaf sprite.
    pub rotation: String,
}

impl LeafPosition {
    /// Derive the default position for a leaf from its index.
    ///
    /// - `left = 20 + 2 * index` percent
    /// - `top = 30 + 1.5 * index` percent
    /// - `rotation = 45 * index` degrees
    ///
    /// Values format like `JavaScript` numbers: integral results carry no
    /// decimal point (`"36%"`), fractional results keep their fraction
    /// (`"34.5%"`).
    #[must_use]
    pub fn for_index(index: u32) -> Self {
        let i = f64::from(index);
        Self {
            left: format!("{}%", 2.0_f64.mul_add(i, 20.0)),
            top: format!("{}%", 1.5_f64.mul_add(i, 30.0)),
            rotation: format!("{}deg", 45.0_f64.mul_add(i, 0.0)),
        }
    }
}

// ---------------------------------------------------------------------------
// LeafRecord
// ---------------------------------------------------------------------------

/// One entry in the persisted leaf collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    /// Position of this leaf in the collection's key space. Intended to be
    /// unique; either caller-supplied or auto-assigned to the smallest
    /// unused value.
    pub index: u32,
    /// Creation time, assigned at insertion. Serialized ISO-8601.
    pub timestamp: DateTime<Utc>,
    /// Free-form descriptive tag for where the leaf came from.
    #[serde(default = "default_source")]
    pub source: String,
    /// Display hints for the rendered tree.
    pub position: LeafPosition,
}

fn default_source() -> String {
    String::from(DEFAULT_SOURCE)
}

impl LeafRecord {
    /// Build a new record for insertion, stamping the current time and
    /// filling in the defaults for any hint the caller omitted.
    #[must_use]
    pub fn new(index: u32, position: Option<LeafPosition>, source: Option<String>) -> Self {
        Self {
            index,
            timestamp: Utc::now(),
            source: source.unwrap_or_else(default_source),
            position: position.unwrap_or_else(|| LeafPosition::for_index(index)),
        }
    }
}
