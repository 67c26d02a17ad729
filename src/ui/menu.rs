use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::engine::EndReason;

/// Draws the end-of-run screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    end_reason: Option<EndReason>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let won = end_reason == Some(EndReason::BoardFilled);
    let title = if won { "BOARD CLEARED" } else { "GAME OVER" };

    let lines = vec![
        Line::styled(
            title,
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(match end_reason {
            Some(EndReason::WallCollision) => "Cause: hit wall",
            Some(EndReason::SelfCollision) => "Cause: hit yourself",
            Some(EndReason::BoardFilled) => "No room left for food",
            None => "",
        }),
        Line::from(""),
        Line::styled("[Enter]/[R] Play again", Style::default().fg(theme.menu_footer)),
        Line::styled("[Q]/[Esc] Quit", Style::default().fg(theme.menu_footer)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(if won { " you win " } else { " game over " })),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
