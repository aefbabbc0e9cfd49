//! Application state - single source of truth

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Items per page, fixed by how the list endpoint is consumed.
pub const PAGE_SIZE: usize = 20;

/// Delay between the last keystroke and the search commit.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Spinner frame period while a fetch is in flight.
pub const LOADING_ANIM_TICK_MS: u64 = 120;

/// Fallback text for failures that carry no message.
pub const UNKNOWN_ERROR: &str = "Error desconocido";

/// Minimal card-shaped record for a catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonBasic {
    pub id: u32,
    pub name: String,
    pub url: String,
}

/// Raw list entry as returned by the provider; decoded into
/// [`PokemonBasic`] by the reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatValue {
    pub name: String,
    pub value: u16,
}

/// Full record shown in the detail overlay. Fields are stored as the
/// provider returned them and never mutated locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetails {
    pub id: u32,
    pub name: String,
    pub abilities: Vec<Ability>,
    pub types: Vec<String>,
    pub stats: Vec<StatValue>,
    pub height: u16,
    pub weight: u16,
}

impl PokemonDetails {
    /// Project to the card shape. The url is re-derived from the
    /// provider's id, never from the query that found it.
    pub fn to_basic(&self) -> PokemonBasic {
        PokemonBasic {
            id: self.id,
            name: self.name.clone(),
            url: crate::api::detail_url(self.id),
        }
    }
}

/// The one error kind that reaches the user. The fixed fallback text is
/// rendered only for `Unknown`; provider messages pass through verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum DisplayError {
    Provider(String),
    Unknown,
}

impl DisplayError {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            DisplayError::Unknown
        } else {
            DisplayError::Provider(message)
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DisplayError::Provider(message) => message,
            DisplayError::Unknown => UNKNOWN_ERROR,
        }
    }
}

/// Window summary shown under the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaginationSummary {
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub page_count: usize,
}

/// Extract the identifier from a resource URL: the numeric segment at
/// index 6 ("https://pokeapi.co/api/v2/pokemon/25/" -> 25).
pub fn id_from_url(url: &str) -> Option<u32> {
    url.split('/').nth(6).and_then(|segment| segment.parse().ok())
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Held page of catalog entries
    #[debug(skip)]
    pub pokemons: Vec<PokemonBasic>,

    /// Zero-based page index
    #[debug(section = "List", label = "Page")]
    pub page: usize,

    #[debug(section = "List", label = "Pages")]
    pub total_pages: usize,

    #[debug(section = "List", label = "Count")]
    pub total_count: usize,

    /// Raw input text, updated on every keystroke
    #[debug(section = "Search", label = "Input")]
    pub search_input: String,

    /// Debounced query that actually drives resolution
    #[debug(section = "Search", label = "Committed")]
    pub committed_query: String,

    /// Single item resolved by a remote lookup
    #[debug(section = "Search", label = "Resolved", debug_fmt)]
    pub searched: Option<PokemonBasic>,

    /// Whether keystrokes go to the search bar
    #[debug(section = "Search", label = "Focused")]
    pub search_focus: bool,

    /// Detail overlay content; `None` means closed
    #[debug(skip)]
    pub selected: Option<PokemonDetails>,

    /// Identifiers whose artwork loaded or fell back. Append-only.
    #[debug(skip)]
    pub image_ready: HashSet<u32>,

    /// Grid cursor over the displayed list
    #[debug(skip)]
    pub cursor: usize,

    #[debug(section = "Status", label = "Loading")]
    pub loading: bool,

    #[debug(section = "Status", label = "Error", debug_fmt)]
    pub error: Option<DisplayError>,

    // --- Request generations, one per fetch category (skipped) ---
    #[debug(skip)]
    pub list_gen: u64,
    #[debug(skip)]
    pub search_gen: u64,
    #[debug(skip)]
    pub detail_gen: u64,

    #[debug(skip)]
    pub terminal_size: (u16, u16),

    /// Spinner frame counter
    #[debug(skip)]
    pub tick: u64,
}

impl AppState {
    /// Create state opened at the given zero-based page.
    pub fn new(page: usize) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Whether a committed query currently drives the displayed set.
    /// Whitespace-only input is preserved in the raw field but does not
    /// count as an active search.
    pub fn search_active(&self) -> bool {
        !self.committed_query.trim().is_empty()
    }

    /// Case-insensitive substring matches in the held page, recomputed
    /// fresh on every call.
    pub fn local_matches(&self) -> Vec<&PokemonBasic> {
        let query = self.committed_query.to_lowercase();
        self.pokemons
            .iter()
            .filter(|pokemon| pokemon.name.to_lowercase().contains(&query))
            .collect()
    }

    /// The displayed list: the resolved search item, the local filtered
    /// subset, or the held page - exactly one of the three.
    pub fn displayed(&self) -> Vec<&PokemonBasic> {
        if !self.search_active() {
            return self.pokemons.iter().collect();
        }
        if let Some(found) = &self.searched {
            return vec![found];
        }
        self.local_matches()
    }

    /// Pagination summary for the current mode. All zeros when no list
    /// state is held (initial, or after a failed page fetch).
    pub fn pagination(&self) -> PaginationSummary {
        if self.search_active() {
            let shown = self.displayed().len();
            return PaginationSummary {
                start: if shown > 0 { 1 } else { 0 },
                end: shown,
                total: shown,
                page_count: shown.div_ceil(PAGE_SIZE),
            };
        }
        if self.total_count == 0 {
            return PaginationSummary::default();
        }
        PaginationSummary {
            start: self.page * PAGE_SIZE + 1,
            end: ((self.page + 1) * PAGE_SIZE).min(self.total_count),
            total: self.total_count,
            page_count: self.total_pages,
        }
    }

    pub fn is_image_ready(&self, id: u32) -> bool {
        self.image_ready.contains(&id)
    }

    pub fn cursor_item(&self) -> Option<&PokemonBasic> {
        self.displayed().get(self.cursor).copied()
    }

    pub fn set_cursor(&mut self, index: usize) -> bool {
        let len = self.displayed().len();
        if len == 0 {
            self.cursor = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.cursor {
            self.cursor = bounded;
            return true;
        }
        false
    }

    pub fn clamp_cursor(&mut self) {
        if self.cursor >= self.displayed().len() {
            self.cursor = 0;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            pokemons: Vec::new(),
            page: 0,
            total_pages: 0,
            total_count: 0,
            search_input: String::new(),
            committed_query: String::new(),
            searched: None,
            search_focus: false,
            selected: None,
            image_ready: HashSet::new(),
            cursor: 0,
            loading: false,
            error: None,
            list_gen: 0,
            search_gen: 0,
            detail_gen: 0,
            terminal_size: (80, 24),
            tick: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(id: u32, name: &str) -> PokemonBasic {
        PokemonBasic {
            id,
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    #[test]
    fn test_id_from_url() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/1/"), Some(1));
        assert_eq!(
            id_from_url("https://pokeapi.co/api/v2/pokemon/10277/"),
            Some(10277)
        );
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/"), None);
        assert_eq!(id_from_url("not a url"), None);
    }

    #[test]
    fn test_display_error_fallback() {
        let from_provider = DisplayError::from_message("Fallo la red");
        assert_eq!(from_provider.message(), "Fallo la red");

        assert_eq!(DisplayError::from_message("").message(), UNKNOWN_ERROR);
        assert_eq!(DisplayError::from_message("   ").message(), UNKNOWN_ERROR);
        assert_eq!(DisplayError::Unknown.message(), "Error desconocido");
    }

    #[test]
    fn test_displayed_without_search_is_held_page() {
        let state = AppState {
            pokemons: vec![basic(1, "bulbasaur"), basic(2, "ivysaur")],
            ..Default::default()
        };
        let names: Vec<_> = state.displayed().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bulbasaur", "ivysaur"]);
    }

    #[test]
    fn test_displayed_with_query_filters_locally() {
        let state = AppState {
            pokemons: vec![basic(1, "bulbasaur"), basic(2, "ivysaur")],
            committed_query: "BULBA".to_string(),
            ..Default::default()
        };
        let names: Vec<_> = state.displayed().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bulbasaur"]);
    }

    #[test]
    fn test_displayed_prefers_resolved_item() {
        let state = AppState {
            pokemons: vec![basic(1, "bulbasaur")],
            committed_query: "pikachu".to_string(),
            searched: Some(basic(25, "pikachu")),
            ..Default::default()
        };
        let shown = state.displayed();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, 25);
    }

    #[test]
    fn test_whitespace_query_is_not_active() {
        let state = AppState {
            pokemons: vec![basic(1, "bulbasaur")],
            committed_query: "   ".to_string(),
            ..Default::default()
        };
        assert!(!state.search_active());
        assert_eq!(state.displayed().len(), 1);
    }

    #[test]
    fn test_pagination_list_mode() {
        let state = AppState {
            page: 2,
            total_count: 1302,
            total_pages: 66,
            ..Default::default()
        };
        let summary = state.pagination();
        assert_eq!(summary.start, 41);
        assert_eq!(summary.end, 60);
        assert_eq!(summary.total, 1302);
        assert_eq!(summary.page_count, 66);
    }

    #[test]
    fn test_pagination_clamps_last_page() {
        let state = AppState {
            page: 65,
            total_count: 1302,
            total_pages: 66,
            ..Default::default()
        };
        let summary = state.pagination();
        assert_eq!(summary.start, 1301);
        assert_eq!(summary.end, 1302);
    }

    #[test]
    fn test_pagination_search_mode() {
        let state = AppState {
            pokemons: vec![basic(1, "bulbasaur"), basic(2, "ivysaur")],
            committed_query: "saur".to_string(),
            total_count: 1302,
            total_pages: 66,
            ..Default::default()
        };
        let summary = state.pagination();
        assert_eq!(summary.start, 1);
        assert_eq!(summary.end, 2);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.page_count, 1);
    }

    #[test]
    fn test_pagination_search_mode_no_results() {
        let state = AppState {
            pokemons: vec![basic(1, "bulbasaur")],
            committed_query: "mewtwo".to_string(),
            total_count: 1302,
            total_pages: 66,
            ..Default::default()
        };
        let summary = state.pagination();
        assert_eq!(summary.start, 0);
        assert_eq!(summary.end, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.page_count, 0);
    }

    #[test]
    fn test_pagination_zeroed_when_nothing_held() {
        let state = AppState::default();
        assert_eq!(state.pagination(), PaginationSummary::default());
    }

    #[test]
    fn test_to_basic_rederives_url_from_id() {
        let detail = PokemonDetails {
            id: 25,
            name: "pikachu".to_string(),
            abilities: Vec::new(),
            types: Vec::new(),
            stats: Vec::new(),
            height: 4,
            weight: 60,
        };
        let basic = detail.to_basic();
        assert_eq!(basic.id, 25);
        assert_eq!(basic.url, "https://pokeapi.co/api/v2/pokemon/25");
    }
}
