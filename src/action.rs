//! Actions demonstrating category inference and async patterns

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{DisplayError, ListEntry, PokemonDetails};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Page category =====
    /// Intent: fetch the current page (startup and retry)
    PageFetch,

    /// Page-change request from the presentation layer (1-based)
    PageChange(usize),

    /// Result: a page of list entries arrived
    PageDidLoad {
        generation: u64,
        count: usize,
        results: Vec<ListEntry>,
    },

    /// Result: page fetch failed
    PageDidError {
        generation: u64,
        error: DisplayError,
    },

    // ===== Search category =====
    /// Move keyboard focus into the search bar
    SearchFocus,

    /// Leave the search bar
    SearchBlur,

    /// Raw input text changed (every keystroke)
    SearchInput(String),

    /// The debounce timer fired with the settled query
    SearchCommit(String),

    /// Result: remote lookup resolved a single item
    SearchDidLoad {
        generation: u64,
        detail: PokemonDetails,
    },

    /// Result: remote lookup failed
    SearchDidError {
        generation: u64,
        error: DisplayError,
    },

    // ===== Detail category =====
    /// A displayed item was activated (by identifier)
    DetailOpen(u32),

    /// Result: full record arrived, overlay opens
    DetailDidLoad {
        generation: u64,
        detail: PokemonDetails,
    },

    /// Result: detail fetch failed, overlay stays closed
    DetailDidError {
        generation: u64,
        error: DisplayError,
    },

    /// Close the overlay without further calls
    DetailClose,

    // ===== Grid category =====
    /// Move the grid cursor by a signed offset
    CursorMove(i16),

    /// Artwork for an identifier finished loading (or fell back)
    ImageDidLoad(u32),

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Periodic tick for the loading spinner
    Tick,

    #[action(category = "ui")]
    UiTerminalResize(u16, u16),

    /// Exit the application
    Quit,
}
