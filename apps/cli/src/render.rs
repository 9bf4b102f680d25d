//! Plain-text rendering of a run for terminals.

use shared::{domain::ElementState, protocol::StatusLevel};
use stepper::{Bar, Board};

pub const MAX_BAR_ROWS: usize = 8;

pub fn level_prefix(level: StatusLevel) -> &'static str {
    match level {
        StatusLevel::Info => "  ",
        StatusLevel::Warning => "! ",
        StatusLevel::Error => "x ",
        StatusLevel::Success => "* ",
    }
}

fn state_glyph(bar: &Bar) -> char {
    match bar.primary_state() {
        Some(ElementState::Shifting) => '>',
        Some(ElementState::Comparing) => '?',
        Some(ElementState::KeySelected) => 'K',
        Some(ElementState::Sorted) => '#',
        None => '|',
    }
}

/// Scales `value` to `0..=rows` against the board maximum; non-positive values get one row.
pub fn bar_rows(value: i64, max_value: i64, rows: usize) -> usize {
    let max_value = max_value.max(1) as f64;
    let scaled = (value as f64 / max_value * rows as f64).round();
    (scaled.max(1.0) as usize).min(rows)
}

/// Vertical bar chart followed by a label row, one column group per position.
pub fn render_board(board: &Board) -> String {
    if board.is_empty() {
        return String::from("(empty)\n");
    }

    let max_value = board.max_value().unwrap_or(1);
    let labels: Vec<String> = board.bars().iter().map(|bar| bar.value.to_string()).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(1).max(1);
    let heights: Vec<usize> = board
        .bars()
        .iter()
        .map(|bar| bar_rows(bar.value, max_value, MAX_BAR_ROWS))
        .collect();

    let mut out = String::new();
    for row in (1..=MAX_BAR_ROWS).rev() {
        if heights.iter().all(|height| *height < row) {
            continue;
        }
        let line: Vec<String> = board
            .bars()
            .iter()
            .zip(&heights)
            .map(|(bar, height)| {
                let cell = if *height >= row { state_glyph(bar) } else { ' ' };
                format!("{:^width$}", cell)
            })
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }
    let label_line: Vec<String> = labels
        .iter()
        .map(|label| format!("{label:^width$}"))
        .collect();
    out.push_str(label_line.join(" ").trim_end());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{StateDelta, VisualStep};

    #[test]
    fn scales_rows_against_maximum() {
        assert_eq!(bar_rows(8, 8, 8), 8);
        assert_eq!(bar_rows(4, 8, 8), 4);
        assert_eq!(bar_rows(0, 8, 8), 1);
        assert_eq!(bar_rows(-3, 8, 8), 1);
        assert_eq!(bar_rows(5, 0, 8), 8);
    }

    #[test]
    fn renders_state_glyphs_and_labels() {
        let mut board = Board::new(&[2, 1]);
        board.apply(&VisualStep {
            index: 0,
            value: 2,
            delta: StateDelta::add(&[ElementState::Sorted]),
        });

        let rendered = render_board(&board);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.first(), Some(&"#"));
        assert_eq!(lines.last(), Some(&"2 1"));
        assert!(lines.contains(&"# |"));
    }

    #[test]
    fn empty_board_renders_placeholder() {
        assert_eq!(render_board(&Board::default()), "(empty)\n");
    }
}
