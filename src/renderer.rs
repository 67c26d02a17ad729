use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    BORDER_HALF_BLOCK, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, GridSize, Theme,
};
use crate::engine::Snapshot;
use crate::snake::Cell;
use crate::ui::hud::render_hud;
use crate::ui::menu::render_game_over_menu;

/// Renders the full game frame from a snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, theme: &Theme) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, theme);

    let board_area = board_rect(play_area, snapshot.bounds);
    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().bg(theme.play_bg));

    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    if !snapshot.running {
        render_game_over_menu(frame, play_area, snapshot.score, snapshot.end_reason, theme);
    }
}

/// Centers a bordered board of `bounds` cells inside `area`, clipped to fit.
fn board_rect(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds.width.saturating_add(2).min(area.width);
    let height = bounds.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food).bg(theme.play_bg));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let buffer = frame.buffer_mut();

    // Paint tail to head so the head wins if cells ever coincide.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(theme.snake_head)
                    .bg(theme.play_bg)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_BODY,
                Style::new().fg(theme.snake_body).bg(theme.play_bg),
            );
        }
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
