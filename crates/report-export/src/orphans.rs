//! Orphan/widow pruning of break candidates.

use crate::breaks::BreakPoint;
use crate::layout::Measure;

/// Fragments shorter than this are not left alone at a page edge.
pub const MIN_FRAGMENT_HEIGHT: f32 = 100.0;

/// Drop candidates that would strand a small fragment at the bottom of a
/// page (orphan) or push a tiny lead-in ahead of a larger unit (widow).
/// Input must be sorted by offset; output stays sorted.
pub fn filter_orphans<M: Measure + ?Sized>(
    doc: &M,
    breaks: Vec<BreakPoint>,
    page_height: f32,
) -> Vec<BreakPoint> {
    if !(page_height > 0.0) {
        return breaks;
    }

    let mut kept = Vec::with_capacity(breaks.len());
    for (i, current) in breaks.iter().enumerate() {
        let height = doc.measure(current.node).height;
        let remaining = page_height - current.y.rem_euclid(page_height);
        if height > remaining && remaining < MIN_FRAGMENT_HEIGHT {
            continue;
        }

        if let Some(next) = breaks.get(i + 1) {
            let next_height = doc.measure(next.node).height;
            let gap = next.y - current.y;
            if next_height > gap && gap < MIN_FRAGMENT_HEIGHT {
                continue;
            }
        }

        kept.push(current.clone());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaks::find_break_points;
    use crate::testing::FixtureDoc;

    #[test]
    fn test_orphan_at_page_bottom_is_dropped() {
        // Card starts 40px before the page edge and is 200px tall.
        let doc = FixtureDoc::new(1000.0)
            .card(0.0, 300.0)
            .card(360.0, 200.0)
            .card(600.0, 150.0);
        let kept = filter_orphans(&doc, find_break_points(&doc), 400.0);
        let ys: Vec<f32> = kept.iter().map(|b| b.y).collect();
        assert_eq!(ys, vec![0.0, 600.0]);
    }

    #[test]
    fn test_small_card_fitting_near_bottom_is_kept() {
        let doc = FixtureDoc::new(600.0).card(0.0, 300.0).card(340.0, 50.0);
        let kept = filter_orphans(&doc, find_break_points(&doc), 400.0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_widow_lead_in_is_dropped() {
        // Short heading group directly above a tall card.
        let doc = FixtureDoc::new(1200.0)
            .card(0.0, 200.0)
            .section(200.0, 30.0)
            .card(260.0, 400.0);
        let kept = filter_orphans(&doc, find_break_points(&doc), 1000.0);
        let ids: Vec<&str> = kept.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["report-card-0", "report-card-1"]);
    }

    #[test]
    fn test_retained_breaks_leave_no_small_gap_before_page_end() {
        let doc = (0..12).fold(FixtureDoc::new(2400.0), |d, i| {
            d.card(i as f32 * 190.0, 180.0)
        });
        let page = 500.0;
        let kept = filter_orphans(&doc, find_break_points(&doc), page);
        for bp in &kept {
            let remaining = page - bp.y.rem_euclid(page);
            let height = 180.0;
            assert!(!(height > remaining && remaining < MIN_FRAGMENT_HEIGHT));
        }
        assert!(kept.windows(2).all(|w| w[0].y <= w[1].y));
    }

    #[test]
    fn test_degenerate_page_height_keeps_everything() {
        let doc = FixtureDoc::new(300.0).card(0.0, 100.0).card(10.0, 100.0);
        assert_eq!(filter_orphans(&doc, find_break_points(&doc), 0.0).len(), 2);
    }
}
