//! Candidate page-break discovery.

use serde::Serialize;

use crate::layout::{NodeRef, RenderedDocument};
use crate::orphans::filter_orphans;

/// A section closer than this to a card boundary adds no new candidate.
pub const SECTION_TOLERANCE_PX: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Card,
    Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakPoint {
    pub id: String,
    /// Offset from the top of the exported subtree, in document pixels.
    pub y: f32,
    pub kind: BreakKind,
    pub priority: BreakPriority,
    #[serde(skip)]
    pub node: NodeRef,
}

/// Every card boundary, plus section boundaries not already near a card,
/// ordered by offset (document order on ties).
pub fn find_break_points<D: RenderedDocument + ?Sized>(doc: &D) -> Vec<BreakPoint> {
    let origin = doc.measure(doc.root()).top;
    let mut points = Vec::new();

    for (index, card) in doc.cards().into_iter().enumerate() {
        points.push(BreakPoint {
            id: doc
                .node_id(card)
                .unwrap_or_else(|| format!("report-card-{index}")),
            y: doc.measure(card).top - origin,
            kind: BreakKind::Card,
            priority: BreakPriority::High,
            node: card,
        });
    }

    let card_count = points.len();
    for (index, section) in doc.sections().into_iter().enumerate() {
        let y = doc.measure(section).top - origin;
        let covered = points[..card_count]
            .iter()
            .any(|card| (card.y - y).abs() < SECTION_TOLERANCE_PX);
        if covered {
            continue;
        }
        points.push(BreakPoint {
            id: doc
                .node_id(section)
                .unwrap_or_else(|| format!("section-{index}")),
            y,
            kind: BreakKind::Section,
            priority: BreakPriority::Medium,
            node: section,
        });
    }

    // sort_by is stable
    points.sort_by(|a, b| a.y.total_cmp(&b.y));
    points
}

/// Break candidates with orphan/widow-producing ones removed.
pub fn calculate_optimal_breaks<D: RenderedDocument + ?Sized>(
    doc: &D,
    page_height: f32,
) -> Vec<BreakPoint> {
    let candidates = find_break_points(doc);
    let total = candidates.len();
    let kept = filter_orphans(doc, candidates, page_height);
    tracing::debug!(candidates = total, kept = kept.len(), "Computed page break points");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixtureDoc;

    #[test]
    fn test_cards_are_high_priority() {
        let doc = FixtureDoc::new(600.0)
            .card(0.0, 150.0)
            .card(150.0, 150.0)
            .card(300.0, 150.0);
        let points = find_break_points(&doc);
        assert_eq!(points.len(), 3);
        for (i, bp) in points.iter().enumerate() {
            assert_eq!(bp.kind, BreakKind::Card);
            assert_eq!(bp.priority, BreakPriority::High);
            assert_eq!(bp.id, format!("report-card-{i}"));
        }
    }

    #[test]
    fn test_section_near_card_is_skipped() {
        let doc = FixtureDoc::new(800.0)
            .section(100.0, 30.0)
            .card(140.0, 200.0)
            .section(400.0, 30.0);
        let points = find_break_points(&doc);
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["report-card-0", "section-1"]);
        assert_eq!(points[1].priority, BreakPriority::Medium);
        assert_eq!(points[1].y, 400.0);
    }

    #[test]
    fn test_offsets_are_relative_to_root_and_sorted() {
        let doc = FixtureDoc::new(900.0)
            .with_origin(1000.0)
            .card(1500.0, 100.0)
            .card(1100.0, 100.0)
            .section(1300.0, 20.0);
        let points = find_break_points(&doc);
        let ys: Vec<f32> = points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![100.0, 300.0, 500.0]);
        assert!(points.windows(2).all(|w| w[0].y <= w[1].y));
    }

    #[test]
    fn test_ties_keep_document_order() {
        let doc = FixtureDoc::new(400.0)
            .card(200.0, 50.0)
            .card(200.0, 60.0);
        let points = find_break_points(&doc);
        assert_eq!(points[0].id, "report-card-0");
        assert_eq!(points[1].id, "report-card-1");
    }

    #[test]
    fn test_named_nodes_keep_their_ids() {
        let doc = FixtureDoc::new(400.0).named_card("summary", 10.0, 100.0);
        assert_eq!(find_break_points(&doc)[0].id, "summary");
    }
}
