//! pokegrid - PokeAPI catalog browser TUI

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api;
use pokegrid::components::{
    CatalogDisplay, CatalogDisplayProps, Component, DetailOverlay, DetailOverlayProps, SearchBar,
    SearchBarProps,
};
use pokegrid::effect::Effect;
use pokegrid::reducer::reducer;
use pokegrid::state::{AppState, DisplayError, LOADING_ANIM_TICK_MS, SEARCH_DEBOUNCE_MS};

/// PokeAPI catalog browser TUI
#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "A paginated PokeAPI catalog with debounced search")]
struct Args {
    /// 1-based page to open at startup
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    page: u64,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    Catalog,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    Main,
    Search,
    Detail,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        if self.selected.is_some() {
            Some(PokeComponentId::Detail)
        } else if self.search_focus {
            Some(PokeComponentId::Search)
        } else {
            Some(PokeComponentId::Catalog)
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.selected.is_some() {
            Some(PokeComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Catalog => PokeContext::Main,
            PokeComponentId::Search => PokeContext::Search,
            PokeComponentId::Detail => PokeContext::Detail,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        page,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(page as usize - 1))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct PokeUi {
    display: CatalogDisplay,
    search: SearchBar,
    detail: DetailOverlay,
}

impl PokeUi {
    fn new() -> Self {
        Self {
            display: CatalogDisplay::default(),
            search: SearchBar::new(),
            detail: DetailOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Search bar
            Constraint::Min(1),    // Catalog
        ])
        .split(area);

        event_ctx.set_component_area(PokeComponentId::Search, chunks[0]);
        event_ctx.set_component_area(PokeComponentId::Catalog, chunks[1]);

        self.search.render(
            frame,
            chunks[0],
            SearchBarProps {
                value: &state.search_input,
                is_focused: state.search_focus && state.selected.is_none(),
            },
        );

        self.display.render(
            frame,
            chunks[1],
            CatalogDisplayProps {
                state,
                is_focused: render_ctx.is_focused()
                    && !state.search_focus
                    && state.selected.is_none(),
            },
        );

        if let Some(detail) = &state.selected {
            let modal_area = centered_rect(44, 18, area);
            event_ctx.set_component_area(PokeComponentId::Detail, modal_area);
            self.detail.render(
                frame,
                area,
                DetailOverlayProps {
                    detail,
                    is_focused: render_ctx.is_focused(),
                },
            );
        } else {
            event_ctx.component_areas.remove(&PokeComponentId::Detail);
        }
    }

    fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            value: &state.search_input,
            is_focused: state.search_focus,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(detail) = &state.selected else {
            return HandlerResponse::ignored();
        };
        let props = DetailOverlayProps {
            detail,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(PokeComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokeComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokeComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::PageFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPage { page, generation } => {
            ctx.tasks().spawn("page", async move {
                match api::fetch_page(page).await {
                    Ok(data) => Action::PageDidLoad {
                        generation,
                        count: data.count,
                        results: data.entries,
                    },
                    Err(e) => Action::PageDidError {
                        generation,
                        error: DisplayError::from_message(e.to_string()),
                    },
                }
            });
        }
        Effect::ScheduleSearch { input } => {
            // Each keystroke lands here and re-arms the same key, which is
            // the debounce contract: only the last input commits.
            ctx.tasks().debounce(
                "search_commit",
                Duration::from_millis(SEARCH_DEBOUNCE_MS),
                async move { Action::SearchCommit(input) },
            );
        }
        Effect::FetchSearch { query, generation } => {
            ctx.tasks().spawn("search", async move {
                match api::fetch_by_query(&query).await {
                    Ok(detail) => Action::SearchDidLoad { generation, detail },
                    Err(e) => Action::SearchDidError {
                        generation,
                        error: DisplayError::from_message(e.to_string()),
                    },
                }
            });
        }
        Effect::FetchDetail { id, generation } => {
            ctx.tasks().spawn("detail", async move {
                match api::fetch_by_id(id).await {
                    Ok(detail) => Action::DetailDidLoad { generation, detail },
                    Err(e) => Action::DetailDidError {
                        generation,
                        error: DisplayError::from_message(e.to_string()),
                    },
                }
            });
        }
        Effect::FetchArtwork { id } => {
            let key = format!("artwork_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                // A failed probe is the fallback-image path; either way the
                // card stops showing its skeleton.
                let _ = api::fetch_artwork(id).await;
                Action::ImageDidLoad(id)
            });
        }
    }
}
