use crate::exb::{Element, Node};

use super::error::TagError;

/// Tag name of the annotation nodes inside a tier.
pub const EVENT_TAG: &str = "event";

/// Prefix in front of the integer part of a time point attribute
/// (`T20` decodes to 20).
pub const TIMEPOINT_PREFIX: char = 'T';

/// One time-aligned annotation slot in a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub tier: String,
    pub start: u32,
    pub end: u32,
    pub value: String,
}

impl Cell {
    pub fn new(tier: &str, start: u32, end: u32, value: &str) -> Self {
        Cell {
            tier: tier.to_string(),
            start,
            end,
            value: value.to_string(),
        }
    }

    /// True iff this cell's span ends strictly before `other`'s begins.
    /// Spans are normalized through min/max, so the result does not depend
    /// on attribute order. Cells sharing a boundary compare as ties.
    pub fn precedes(&self, other: &Cell) -> bool {
        self.start.max(self.end) < other.start.min(other.end)
    }

    /// The cell right before this one in `cells`. `Ok(None)` when this is
    /// the first cell, `CellNotFound` when it is not a member at all.
    pub fn previous_in<'a>(&self, cells: &'a [Cell]) -> Result<Option<&'a Cell>, TagError> {
        let idx = cells
            .iter()
            .position(|cell| cell == self)
            .ok_or(TagError::CellNotFound)?;
        Ok(idx.checked_sub(1).map(|previous| &cells[previous]))
    }

    /// The cell right after this one in `cells`.
    pub fn next_in<'a>(&self, cells: &'a [Cell]) -> Result<Option<&'a Cell>, TagError> {
        let idx = cells
            .iter()
            .position(|cell| cell == self)
            .ok_or(TagError::CellNotFound)?;
        Ok(cells.get(idx + 1))
    }

    /// Elementary node form: `<event start="T0" end="T10">value</event>`.
    pub fn as_event(&self) -> Element {
        Element {
            name: EVENT_TAG.to_string(),
            attrs: vec![
                ("start".to_string(), format!("{TIMEPOINT_PREFIX}{}", self.start)),
                ("end".to_string(), format!("{TIMEPOINT_PREFIX}{}", self.end)),
            ],
            children: vec![Node::Text(self.value.clone())],
            self_closing: false,
        }
    }
}

/// Decode `T20` into 20, rejecting anything without the fixed prefix or a
/// non-integer remainder.
pub fn parse_timepoint(raw: &str) -> Result<u32, TagError> {
    raw.strip_prefix(TIMEPOINT_PREFIX)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| TagError::InvalidTimepoint(raw.to_string()))
}
