use crate::exb::{Document, Node};

use super::cell::Cell;
use super::error::TagError;
use super::query::{indexed_cells, neighboring};

/// Insert a freshly built cell into its tier at the temporally correct
/// position. The tier's cells are re-read from the document first, so
/// earlier insertions are always accounted for.
///
/// Whitespace between events stays where it was: the new node goes in
/// directly after its predecessor element, or directly before its
/// successor, or as the tier's last child when the tier has no cells yet.
pub fn insert_cell(document: &mut Document, cell: &Cell) -> Result<(), TagError> {
    let tier = document
        .tier_mut(&cell.tier)
        .ok_or_else(|| TagError::TierNotFound(cell.tier.clone()))?;

    let existing = indexed_cells(tier, &cell.tier)?;
    let cells: Vec<Cell> = existing
        .iter()
        .map(|indexed| indexed.cell.clone())
        .collect();
    let (previous, next) = neighboring(cell, &cells);

    let node = Node::Element(cell.as_event());
    if let Some(previous) = previous {
        tier.children.insert(existing[previous].child_index + 1, node);
    } else if let Some(next) = next {
        tier.children.insert(existing[next].child_index, node);
    } else {
        tier.children.push(node);
    }
    Ok(())
}
