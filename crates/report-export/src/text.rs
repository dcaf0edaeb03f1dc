//! Plain-text rendering of a report, for the clipboard.

use std::fmt::Write;

use chess_core::Report;

const TITLE: &str = "ChessTrax AI Coach - Analysis Report";

pub fn plain_text_report(report: &Report) -> String {
    let data = &report.data;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}\n", "=".repeat(38));
    let _ = writeln!(out, "Lichess Username: {}", report.player);
    let _ = writeln!(out, "Analysis Date: {}", report.analysis_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Game Period Covered: {}", report.game_date_range);
    let _ = writeln!(
        out,
        "Analysis powered by: ChessTrax AI Coach. No engines were used.\n"
    );

    let _ = writeln!(out, "--- PRIMARY FOCUS ---\n{}\n", data.summary);

    let _ = writeln!(out, "--- OPENING ANALYSIS ---");
    let _ = writeln!(out, "As White:\n{}\n", data.opening_analysis.as_white);
    let _ = writeln!(out, "As Black:\n{}\n", data.opening_analysis.as_black);

    let _ = writeln!(out, "--- TACTICAL BLIND-SPOTS ---");
    for m in &data.tactical_motifs {
        let _ = writeln!(out, "* {}:\n{}\n", m.motif, m.explanation);
    }

    let _ = writeln!(out, "--- STRATEGIC WEAKNESSES ---");
    for w in &data.strategic_weaknesses {
        let _ = writeln!(out, "* {}:\n{}\n", w.weakness, w.explanation);
    }

    let _ = writeln!(out, "--- ENDGAME TRAINING ---");
    for e in &data.endgame_practice {
        let _ = writeln!(out, "* {}:\n{}\n", e.endgame_type, e.explanation);
    }

    out
}
