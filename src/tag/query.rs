//! Read-only queries over tiers: cell extraction and the containment,
//! intersection, surrounding and neighboring relations between cells.

use crate::exb::{Document, Element, Node};

use super::cell::{Cell, EVENT_TAG, parse_timepoint};
use super::error::TagError;

/// A cell plus the index of its `<event>` element within the tier's
/// children. The index is the cell's identity for structural edits, so
/// nothing ever has to re-find a node by comparing its contents.
#[derive(Debug, Clone)]
pub struct IndexedCell {
    pub child_index: usize,
    pub cell: Cell,
}

/// Every cell of the named tier, in document order. Callers are expected
/// to gate on [`Document::has_tier`]; a missing tier is an invariant
/// violation here.
pub fn cells_in_tier(document: &Document, tier_name: &str) -> Result<Vec<Cell>, TagError> {
    let tier = document
        .tier(tier_name)
        .ok_or_else(|| TagError::TierNotFound(tier_name.to_string()))?;
    let cells = indexed_cells(tier, tier_name)?
        .into_iter()
        .map(|indexed| indexed.cell)
        .collect();
    Ok(cells)
}

/// Cells of a tier element together with their child positions. Rejects
/// events with missing or malformed time points and spans that end before
/// they start.
pub fn indexed_cells(tier: &Element, tier_name: &str) -> Result<Vec<IndexedCell>, TagError> {
    let mut cells = Vec::new();
    for (child_index, child) in tier.children.iter().enumerate() {
        let Node::Element(event) = child else { continue };
        if event.name != EVENT_TAG {
            continue;
        }

        let start = event
            .attr("start")
            .ok_or(TagError::MissingAttribute("start"))?;
        let end = event.attr("end").ok_or(TagError::MissingAttribute("end"))?;
        let start = parse_timepoint(start)?;
        let end = parse_timepoint(end)?;
        if start > end {
            return Err(TagError::InvertedSpan { start, end });
        }

        cells.push(IndexedCell {
            child_index,
            cell: Cell::new(tier_name, start, end, &event.text()),
        });
    }
    Ok(cells)
}

/// All candidates lying entirely inside `parent`'s span. An empty result
/// is what marks a gap slot.
pub fn cells_within(parent: &Cell, candidates: &[Cell]) -> Vec<Cell> {
    candidates
        .iter()
        .filter(|candidate| parent.start <= candidate.start && candidate.end <= parent.end)
        .cloned()
        .collect()
}

/// All candidates whose span touches `cell`'s span, boundaries included.
pub fn cells_intersecting(cell: &Cell, candidates: &[Cell]) -> Vec<Cell> {
    candidates
        .iter()
        .filter(|candidate| {
            (cell.start <= candidate.start && candidate.start <= cell.end)
                || (cell.start <= candidate.end && candidate.end <= cell.end)
                || (candidate.start <= cell.start && cell.start <= candidate.end)
                || (candidate.start <= cell.end && cell.end <= candidate.end)
        })
        .cloned()
        .collect()
}

/// First candidate, in candidate order, that contains `cell`'s start, is
/// contained by `cell`, or contains `cell`'s end. Stops at the first match.
pub fn cells_surrounding(cell: &Cell, candidates: &[Cell]) -> Option<Cell> {
    candidates
        .iter()
        .find(|candidate| {
            (candidate.start <= cell.start && cell.start <= candidate.end)
                || (cell.start <= candidate.start && candidate.end <= cell.end)
                || (candidate.start <= cell.end && cell.end <= candidate.end)
        })
        .cloned()
}

/// Indices in `cells` of the immediate predecessor and successor of `cell`
/// once it is notionally placed into the sequence. The new cell lands
/// after every cell it does not strictly precede, so a cell starting at an
/// existing cell's end point goes after that cell.
pub fn neighboring(cell: &Cell, cells: &[Cell]) -> (Option<usize>, Option<usize>) {
    let insert_at = cells.partition_point(|existing| !cell.precedes(existing));
    let previous = insert_at.checked_sub(1);
    let next = (insert_at < cells.len()).then_some(insert_at);
    (previous, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exb::Document;

    fn cell(start: u32, end: u32) -> Cell {
        Cell::new("ref-mod1", start, end, "b")
    }

    #[test]
    fn extraction_preserves_document_order() {
        let document = Document::parse(
            "<tier category=\"ref-form1\">\
             <event start=\"T0\" end=\"T10\">one</event>\
             <event start=\"T10\" end=\"T20\">two</event>\
             </tier>",
        )
        .unwrap();

        let cells = cells_in_tier(&document, "ref-form1").unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], Cell::new("ref-form1", 0, 10, "one"));
        assert_eq!(cells[1], Cell::new("ref-form1", 10, 20, "two"));
    }

    #[test]
    fn extraction_skips_non_event_children() {
        let document = Document::parse(
            "<tier category=\"ref-form1\">\n\
             <ud-information>x</ud-information>\
             <event start=\"T0\" end=\"T10\">one</event>\n\
             </tier>",
        )
        .unwrap();

        let cells = cells_in_tier(&document, "ref-form1").unwrap();
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn missing_tier_is_an_error() {
        let document = Document::parse("<tier category=\"other\"/>").unwrap();
        assert_eq!(
            cells_in_tier(&document, "ref-form1"),
            Err(TagError::TierNotFound("ref-form1".to_string()))
        );
    }

    #[test]
    fn malformed_time_points_are_rejected() {
        let document = Document::parse(
            "<tier category=\"ref-form1\"><event start=\"X0\" end=\"T10\">a</event></tier>",
        )
        .unwrap();
        assert_eq!(
            cells_in_tier(&document, "ref-form1"),
            Err(TagError::InvalidTimepoint("X0".to_string()))
        );

        let document = Document::parse(
            "<tier category=\"ref-form1\"><event start=\"T10\" end=\"T0\">a</event></tier>",
        )
        .unwrap();
        assert_eq!(
            cells_in_tier(&document, "ref-form1"),
            Err(TagError::InvertedSpan { start: 10, end: 0 })
        );
    }

    #[test]
    fn missing_attributes_are_rejected() {
        let document =
            Document::parse("<tier category=\"ref-form1\"><event end=\"T10\">a</event></tier>")
                .unwrap();
        assert_eq!(
            cells_in_tier(&document, "ref-form1"),
            Err(TagError::MissingAttribute("start"))
        );
    }

    #[test]
    fn within_returns_only_contained_cells() {
        let parent = Cell::new("ref-form1", 10, 30, "a");
        let candidates = vec![cell(0, 10), cell(10, 20), cell(20, 30), cell(30, 40)];

        let within = cells_within(&parent, &candidates);
        assert_eq!(within, vec![cell(10, 20), cell(20, 30)]);
        for found in &within {
            assert!(parent.start <= found.start && found.end <= parent.end);
        }
    }

    #[test]
    fn within_is_empty_for_no_candidates() {
        let parent = Cell::new("ref-form1", 0, 10, "a");
        assert!(cells_within(&parent, &[]).is_empty());
    }

    #[test]
    fn intersecting_includes_boundary_overlaps() {
        let target = Cell::new("ref-form1", 10, 30, "a");
        let candidates = vec![cell(0, 12), cell(15, 25), cell(28, 40), cell(41, 50)];

        let hits = cells_intersecting(&target, &candidates);
        assert_eq!(hits, vec![cell(0, 12), cell(15, 25), cell(28, 40)]);
    }

    #[test]
    fn surrounding_takes_the_first_match_only() {
        let target = cell(10, 20);
        let candidates = vec![
            Cell::new("ref-form1", 0, 15, "first"),
            Cell::new("ref-form1", 5, 25, "second"),
        ];

        let found = cells_surrounding(&target, &candidates).unwrap();
        assert_eq!(found.value, "first");
    }

    #[test]
    fn surrounding_finds_nothing_for_disjoint_cells() {
        let target = cell(10, 20);
        let candidates = vec![Cell::new("ref-form1", 30, 40, "far")];
        assert_eq!(cells_surrounding(&target, &candidates), None);
    }

    #[test]
    fn neighboring_in_the_middle() {
        let cells = vec![cell(0, 10), cell(20, 30)];
        let (previous, next) = neighboring(&cell(12, 18), &cells);
        assert_eq!(previous, Some(0));
        assert_eq!(next, Some(1));
    }

    #[test]
    fn neighboring_after_a_touching_cell() {
        // A new cell starting exactly where the last one ends goes after it.
        let cells = vec![cell(0, 10)];
        let (previous, next) = neighboring(&cell(10, 20), &cells);
        assert_eq!(previous, Some(0));
        assert_eq!(next, None);
    }

    #[test]
    fn neighboring_at_the_boundaries() {
        let cells = vec![cell(10, 20)];

        let (previous, next) = neighboring(&cell(0, 5), &cells);
        assert_eq!(previous, None);
        assert_eq!(next, Some(0));

        let (previous, next) = neighboring(&cell(30, 40), &cells);
        assert_eq!(previous, Some(0));
        assert_eq!(next, None);
    }

    #[test]
    fn neighboring_in_an_empty_tier() {
        assert_eq!(neighboring(&cell(0, 10), &[]), (None, None));
    }
}
