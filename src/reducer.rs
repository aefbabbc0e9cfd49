//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{id_from_url, AppState, ListEntry, PokemonBasic, PAGE_SIZE};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Page actions =====
        Action::PageFetch => start_page_fetch(state),

        Action::PageChange(number) => {
            let page = number.saturating_sub(1);
            if page == state.page {
                return DispatchResult::unchanged();
            }
            state.page = page;
            start_page_fetch(state)
        }

        Action::PageDidLoad {
            generation,
            count,
            results,
        } => {
            if generation != state.list_gen {
                return DispatchResult::unchanged();
            }
            state.pokemons = decode_entries(results);
            state.total_count = count;
            state.total_pages = count.div_ceil(PAGE_SIZE);
            state.error = None;
            state.loading = false;
            state.clamp_cursor();
            let effects = artwork_effects(state);
            if effects.is_empty() {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with_many(effects)
            }
        }

        Action::PageDidError { generation, error } => {
            if generation != state.list_gen {
                return DispatchResult::unchanged();
            }
            // Full reset: the held list and all pagination state go blank together.
            state.pokemons.clear();
            state.total_pages = 0;
            state.total_count = 0;
            state.cursor = 0;
            state.error = Some(error);
            state.loading = false;
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchFocus => {
            if state.search_focus {
                return DispatchResult::unchanged();
            }
            state.search_focus = true;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.search_focus {
                return DispatchResult::unchanged();
            }
            state.search_focus = false;
            DispatchResult::changed()
        }

        Action::SearchInput(text) => {
            state.search_input = text.clone();
            DispatchResult::changed_with(Effect::ScheduleSearch { input: text })
        }

        Action::SearchCommit(query) => resolve_search(state, query),

        Action::SearchDidLoad { generation, detail } => {
            if generation != state.search_gen {
                return DispatchResult::unchanged();
            }
            let found = detail.to_basic();
            let id = found.id;
            state.searched = Some(found);
            state.loading = false;
            state.clamp_cursor();
            if state.is_image_ready(id) {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with(Effect::FetchArtwork { id })
            }
        }

        Action::SearchDidError { generation, error } => {
            if generation != state.search_gen {
                return DispatchResult::unchanged();
            }
            // The held page and its pagination stay untouched.
            state.error = Some(error);
            state.loading = false;
            DispatchResult::changed()
        }

        // ===== Detail actions =====
        Action::DetailOpen(id) => {
            state.loading = true;
            state.error = None;
            state.detail_gen += 1;
            DispatchResult::changed_with(Effect::FetchDetail {
                id,
                generation: state.detail_gen,
            })
        }

        Action::DetailDidLoad { generation, detail } => {
            if generation != state.detail_gen {
                return DispatchResult::unchanged();
            }
            state.selected = Some(detail);
            state.loading = false;
            DispatchResult::changed()
        }

        Action::DetailDidError { generation, error } => {
            if generation != state.detail_gen {
                return DispatchResult::unchanged();
            }
            state.error = Some(error);
            state.loading = false;
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if state.selected.is_none() {
                return DispatchResult::unchanged();
            }
            state.selected = None;
            DispatchResult::changed()
        }

        // ===== Grid actions =====
        Action::CursorMove(delta) => {
            let mut index = state.cursor as i16 + delta;
            if index < 0 {
                index = 0;
            }
            if !state.set_cursor(index as usize) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::ImageDidLoad(id) => {
            // Ready never reverts; a repeated signal is a no-op.
            if !state.image_ready.insert(id) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if !state.loading {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_page_fetch(state: &mut AppState) -> DispatchResult<Effect> {
    state.loading = true;
    state.error = None;
    state.list_gen += 1;
    DispatchResult::changed_with(Effect::FetchPage {
        page: state.page,
        generation: state.list_gen,
    })
}

/// Entries whose URL carries no decodable identifier are dropped.
fn decode_entries(entries: Vec<ListEntry>) -> Vec<PokemonBasic> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let id = id_from_url(&entry.url)?;
            Some(PokemonBasic {
                id,
                name: entry.name,
                url: entry.url,
            })
        })
        .collect()
}

/// Resolution order on a committed query: blank clears, a local hit wins,
/// only then does the remote lookup go out (with the trimmed text).
fn resolve_search(state: &mut AppState, query: String) -> DispatchResult<Effect> {
    state.committed_query = query;
    state.searched = None;

    if state.committed_query.trim().is_empty() {
        state.error = None;
        state.clamp_cursor();
        return DispatchResult::changed();
    }

    if !state.local_matches().is_empty() {
        state.error = None;
        state.clamp_cursor();
        return DispatchResult::changed();
    }

    state.loading = true;
    state.error = None;
    state.search_gen += 1;
    let query = state.committed_query.trim().to_string();
    DispatchResult::changed_with(Effect::FetchSearch {
        query,
        generation: state.search_gen,
    })
}

fn artwork_effects(state: &AppState) -> Vec<Effect> {
    state
        .pokemons
        .iter()
        .filter(|pokemon| !state.is_image_ready(pokemon.id))
        .map(|pokemon| Effect::FetchArtwork { id: pokemon.id })
        .collect()
}
