use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Cursor cell `column` characters right of and `row` lines below the top-left
/// of `inner`, clamped so it never leaves the box.
pub(crate) fn cursor_in(inner: Rect, column: usize, row: usize) -> (u16, u16) {
    let column = u16::try_from(column).unwrap_or(u16::MAX);
    let row = u16::try_from(row).unwrap_or(u16::MAX);
    (
        inner
            .x
            .saturating_add(column.min(inner.width.saturating_sub(1))),
        inner
            .y
            .saturating_add(row.min(inner.height.saturating_sub(1))),
    )
}

/// Build a footer line of `[key] Action` pairs.
pub(crate) fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (idx, (key, action)) in hints.iter().enumerate() {
        spans.push(Span::styled(*key, key_style));
        if idx + 1 == hints.len() {
            spans.push(Span::raw(format!(" {action}")));
        } else {
            spans.push(Span::raw(format!(" {action}   ")));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_the_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn cursor_stays_inside_the_box() {
        let inner = Rect::new(10, 5, 20, 4);
        assert_eq!(cursor_in(inner, 3, 1), (13, 6));
        assert_eq!(cursor_in(inner, 250, 1), (29, 6));
        assert_eq!(cursor_in(inner, 0, 9), (10, 8));
        assert_eq!(cursor_in(Rect::new(u16::MAX - 1, 0, 1, 1), 70_000, 0), (u16::MAX - 1, 0));
    }

    #[test]
    fn hint_line_separates_pairs() {
        let line = hint_line(&[("[a]", "Add"), ("[q]", "Quit")]);
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, "[a] Add   [q] Quit");
    }
}
