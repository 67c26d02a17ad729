use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::{GLYPH_TABLE_SEPARATOR, Theme};
use crate::engine::Snapshot;

const IDLE_HINT: &str = "Arrows/WASD to move";

/// Renders the one-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, theme: &Theme) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let dimensions = format!("{}x{}", snapshot.bounds.width, snapshot.bounds.height);
    let length = snapshot.snake.len();
    let compact =
        info_width(snapshot.score, length, &dimensions, false) > usize::from(hud_area.width);
    let info_cols = info_width(snapshot.score, length, &dimensions, compact)
        .min(usize::from(u16::MAX)) as u16;
    let [hint_area, info_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(info_cols)]).areas(hud_area);

    frame.render_widget(
        Paragraph::new(info_line(
            snapshot.score,
            length,
            &dimensions,
            compact,
            theme.hud_score,
        ))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray)),
        info_area,
    );

    let is_idle = snapshot.running && snapshot.direction.is_none();
    if is_idle && usize::from(hint_area.width) > IDLE_HINT.width() {
        frame.render_widget(
            Paragraph::new(IDLE_HINT)
                .alignment(Alignment::Left)
                .style(Style::default().fg(theme.menu_footer)),
            hint_area,
        );
    }

    play_area
}

fn labels(compact: bool) -> (&'static str, &'static str) {
    if compact {
        ("S", "L")
    } else {
        ("Score", "Length")
    }
}

fn info_line(
    score: u32,
    length: usize,
    dimensions: &str,
    compact: bool,
    value_color: Color,
) -> Line<'static> {
    let (score_label, length_label) = labels(compact);
    let sep = format!(" {GLYPH_TABLE_SEPARATOR} ");
    let value_style = Style::default().fg(value_color);

    let mut spans = vec![
        Span::raw(format!("{score_label}: ")),
        Span::styled(score.to_string(), value_style),
        Span::raw(sep.clone()),
        Span::raw(format!("{length_label}: ")),
        Span::styled(length.to_string(), value_style),
    ];

    if !compact {
        spans.push(Span::raw(sep));
        spans.push(Span::raw(dimensions.to_owned()));
    }

    Line::from(spans)
}

fn info_width(score: u32, length: usize, dimensions: &str, compact: bool) -> usize {
    let (score_label, length_label) = labels(compact);
    let sep_width = format!(" {GLYPH_TABLE_SEPARATOR} ").width();

    let width = format!("{score_label}: {score}").width()
        + sep_width
        + format!("{length_label}: {length}").width();

    if compact {
        width
    } else {
        width + sep_width + dimensions.width()
    }
}

#[cfg(test)]
mod tests {
    use super::info_width;

    #[test]
    fn full_line_width_counts_every_field() {
        // "Score: 12 │ Length: 3 │ 20x20"
        assert_eq!(info_width(12, 3, "20x20", false), 29);
    }

    #[test]
    fn compact_line_drops_dimensions() {
        // "S: 12 │ L: 3"
        assert_eq!(info_width(12, 3, "20x20", true), 12);
    }
}
