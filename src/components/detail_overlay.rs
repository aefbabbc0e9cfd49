use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::Component;
use crate::action::Action;
use crate::state::PokemonDetails;

/// Modal overlay with the full record of the activated item.
pub struct DetailOverlay {
    modal: Modal,
}

pub struct DetailOverlayProps<'a> {
    pub detail: &'a PokemonDetails,
    pub is_focused: bool,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn content_lines(detail: &PokemonDetails) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    detail.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  #{:03}", detail.id), dim),
            ]),
            Line::default(),
            Line::from(vec![
                Span::styled("Types: ", label),
                Span::raw(detail.types.join(", ")),
            ]),
            Line::from(Span::styled("Abilities:", label)),
        ];
        for ability in &detail.abilities {
            let mut spans = vec![Span::raw(format!("  {}", ability.name))];
            if ability.is_hidden {
                spans.push(Span::styled(" (hidden)", dim));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(Span::styled("Base Stats:", label)));
        for stat in &detail.stats {
            lines.push(Line::from(format!(
                "  {:<16} {:>3}",
                stat.name.replace('-', " "),
                stat.value
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Height: ", label),
            Span::raw(format!("{:.1}m", detail.height as f32 / 10.0)),
            Span::styled("   Weight: ", label),
            Span::raw(format!("{:.1}kg", detail.weight as f32 / 10.0)),
        ]));
        lines
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::DetailClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 12 {
            return;
        }

        let lines = Self::content_lines(props.detail);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            frame.render_widget(Paragraph::new(lines.clone()), content_area);
        };

        let modal_area = centered_rect(44, 18, area);
        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}
