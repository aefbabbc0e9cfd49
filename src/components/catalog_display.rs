use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::card_grid::columns_for;
use super::{CardGrid, CardGridProps, Component};
use crate::action::Action;
use crate::state::AppState;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Props for CatalogDisplay - read-only view of state
pub struct CatalogDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main catalog view: card grid, status line, key hints.
#[derive(Default)]
pub struct CatalogDisplay {
    grid: CardGrid,
}

impl Component<Action> for CatalogDisplay {
    type Props<'a> = CatalogDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let state = props.state;
        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Char('/') => return vec![Action::SearchFocus],
                KeyCode::Char('r') | KeyCode::F(5) => return vec![Action::PageFetch],
                KeyCode::Char('q') | KeyCode::Esc => return vec![Action::Quit],
                KeyCode::Char('[') => {
                    // Page keys only drive the real window, not search results.
                    if !state.search_active() && state.page > 0 {
                        return vec![Action::PageChange(state.page)];
                    }
                    return Vec::new();
                }
                KeyCode::Char(']') => {
                    if !state.search_active() && state.page + 1 < state.total_pages {
                        return vec![Action::PageChange(state.page + 2)];
                    }
                    return Vec::new();
                }
                _ => {}
            }
        }

        let displayed = state.displayed();
        self.grid
            .handle_event(
                event,
                CardGridProps {
                    items: &displayed,
                    cursor: state.cursor,
                    query: &state.committed_query,
                    image_ready: &state.image_ready,
                    columns: columns_for(state.terminal_size.0),
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CatalogDisplayProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Card grid
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let state = props.state;
        let displayed = state.displayed();
        self.grid.render(
            frame,
            chunks[0],
            CardGridProps {
                items: &displayed,
                cursor: state.cursor,
                query: &state.committed_query,
                image_ready: &state.image_ready,
                columns: columns_for(chunks[0].width),
                is_focused: props.is_focused,
            },
        );

        frame.render_widget(Paragraph::new(status_line(state)), chunks[1]);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("[ ]", "page"),
                    StatusBarHint::new("enter", "details"),
                    StatusBarHint::new("r", "retry"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

/// Loading takes the line over; otherwise the error, otherwise the window
/// summary (hidden while nothing is displayed, like the web original).
fn status_line(state: &AppState) -> Line<'static> {
    if state.loading {
        let frame = SPINNER_FRAMES[(state.tick % SPINNER_FRAMES.len() as u64) as usize];
        return Line::from(Span::styled(
            format!("{frame} Cargando..."),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(error) = &state.error {
        return Line::from(Span::styled(
            error.message().to_string(),
            Style::default().fg(Color::Red),
        ));
    }

    let summary = state.pagination();
    if state.displayed().is_empty() {
        return Line::default();
    }

    let mut spans = vec![Span::raw(format!(
        "Showing {} to {} of {} results",
        summary.start, summary.end, summary.total
    ))];
    if !state.search_active() {
        spans.push(Span::styled(
            format!("   Page {} of {}", state.page + 1, summary.page_count),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
