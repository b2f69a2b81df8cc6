//! Plain-text rendering of a board snapshot.

use tilemerge_core::{BoardView, EMPTY_TILE};

const EMPTY_MARKER: &str = ".";

/// Formats the board as right-aligned columns below a score line.
pub(crate) fn render(view: &BoardView, score: u64) -> String {
    let width = view
        .values()
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);

    let mut output = format!("score {score}");
    for row in view.rows() {
        output.push('\n');
        let cells: Vec<String> = row
            .iter()
            .map(|value| {
                if *value == EMPTY_TILE {
                    format!("{EMPTY_MARKER:>width$}")
                } else {
                    format!("{value:>width$}")
                }
            })
            .collect();
        output.push_str(&cells.join(" "));
    }
    output
}
