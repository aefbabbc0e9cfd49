use std::collections::HashSet;

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::highlight_substring;

use super::Component;
use crate::action::Action;
use crate::state::PokemonBasic;

pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 4;

/// Columns that fit in a row of the given width.
pub fn columns_for(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// Grid of catalog cards over the displayed list. A card shows a skeleton
/// until its artwork signals ready, matching the web original's image
/// placeholder behavior.
#[derive(Default)]
pub struct CardGrid;

pub struct CardGridProps<'a> {
    pub items: &'a [&'a PokemonBasic],
    pub cursor: usize,
    pub query: &'a str,
    pub image_ready: &'a HashSet<u32>,
    pub columns: usize,
    pub is_focused: bool,
}

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.items.is_empty() {
            return None;
        }

        let columns = props.columns.max(1) as i16;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left => Some(Action::CursorMove(-1)),
                KeyCode::Right => Some(Action::CursorMove(1)),
                KeyCode::Up => Some(Action::CursorMove(-columns)),
                KeyCode::Down => Some(Action::CursorMove(columns)),
                KeyCode::Enter => props
                    .items
                    .get(props.cursor)
                    .map(|item| Action::DetailOpen(item.id)),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.items.is_empty() || area.height < CARD_HEIGHT {
            return;
        }

        let columns = props.columns.max(1);
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let cursor_row = props.cursor / columns;
        // Scroll just enough to keep the cursored row on screen.
        let first_row = cursor_row.saturating_sub(visible_rows.saturating_sub(1));

        for (index, item) in props.items.iter().enumerate() {
            let row = index / columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let column = index % columns;
            let card = Rect {
                x: area.x + column as u16 * CARD_WIDTH,
                y: area.y + (row - first_row) as u16 * CARD_HEIGHT,
                width: CARD_WIDTH.min(area.width.saturating_sub(column as u16 * CARD_WIDTH)),
                height: CARD_HEIGHT,
            };
            if card.width < 4 {
                continue;
            }
            let is_cursor = props.is_focused && index == props.cursor;
            render_card(frame, card, item, props.query, props.image_ready, is_cursor);
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    item: &PokemonBasic,
    query: &str,
    image_ready: &HashSet<u32>,
    is_cursor: bool,
) {
    let border = if is_cursor {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = if image_ready.contains(&item.id) {
        let base = Style::default().fg(Color::Reset);
        let highlight = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let name = if query.trim().is_empty() {
            Line::from(Span::styled(
                item.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
        } else {
            highlight_substring(&item.name, query.trim(), base, highlight)
        };
        vec![
            name,
            Line::from(Span::styled(
                format!("#{:03}", item.id),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        // Skeleton until the artwork signal lands.
        vec![
            Line::from(Span::styled("▒▒▒▒▒▒▒▒", Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled("▒▒▒▒", Style::default().fg(Color::DarkGray))),
        ]
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn basic(id: u32, name: &str) -> PokemonBasic {
        PokemonBasic {
            id,
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    #[test]
    fn test_enter_activates_cursored_item() {
        let mut component = CardGrid;
        let first = basic(1, "bulbasaur");
        let second = basic(2, "ivysaur");
        let items = [&first, &second];
        let ready = HashSet::new();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("enter")),
                CardGridProps {
                    items: &items,
                    cursor: 1,
                    query: "",
                    image_ready: &ready,
                    columns: 3,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();

        actions.assert_first(Action::DetailOpen(2));
    }

    #[test]
    fn test_vertical_moves_jump_a_full_row() {
        let mut component = CardGrid;
        let first = basic(1, "bulbasaur");
        let items = [&first];
        let ready = HashSet::new();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("down")),
                CardGridProps {
                    items: &items,
                    cursor: 0,
                    query: "",
                    image_ready: &ready,
                    columns: 4,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();

        actions.assert_first(Action::CursorMove(4));
    }

    #[test]
    fn test_empty_grid_ignores_keys() {
        let mut component = CardGrid;
        let ready = HashSet::new();

        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("enter")),
                CardGridProps {
                    items: &[],
                    cursor: 0,
                    query: "",
                    image_ready: &ready,
                    columns: 3,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();

        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_name_when_ready_and_skeleton_before() {
        let mut render = RenderHarness::new(50, 10);
        let mut component = CardGrid;
        let first = basic(1, "bulbasaur");
        let items = [&first];
        let mut ready = HashSet::new();

        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                CardGridProps {
                    items: &items,
                    cursor: 0,
                    query: "",
                    image_ready: &ready,
                    columns: 2,
                    is_focused: true,
                },
            );
        });
        assert!(!output.contains("bulbasaur"), "skeleton hides the name");

        ready.insert(1);
        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                CardGridProps {
                    items: &items,
                    cursor: 0,
                    query: "",
                    image_ready: &ready,
                    columns: 2,
                    is_focused: true,
                },
            );
        });
        assert!(output.contains("bulbasaur"));
        assert!(output.contains("#001"));
    }
}
