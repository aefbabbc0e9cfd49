//! Render snapshot tests using RenderHarness
//!
//! FRAMEWORK PATTERN: RenderHarness
//! - Create harness with terminal dimensions
//! - Render component to test buffer
//! - Convert to string for snapshot testing

use tui_dispatch::testing::*;

use pokegrid::{
    components::{
        CatalogDisplay, CatalogDisplayProps, Component, DetailOverlay, DetailOverlayProps,
        SearchBar, SearchBarProps,
    },
    state::{Ability, AppState, DisplayError, PokemonBasic, PokemonDetails, StatValue},
};

fn basic(id: u32, name: &str) -> PokemonBasic {
    PokemonBasic {
        id,
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    }
}

fn state_with_page() -> AppState {
    let mut state = AppState {
        pokemons: vec![basic(1, "bulbasaur"), basic(2, "ivysaur")],
        total_count: 2,
        total_pages: 1,
        ..Default::default()
    };
    state.image_ready.insert(1);
    state.image_ready.insert(2);
    state
}

#[test]
fn test_render_initial_state() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let state = AppState::default();

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    // Nothing held yet - only the help bar shows.
    assert!(output.contains("search"), "Should show search hint");
    assert!(output.contains("quit"), "Should show quit hint");
}

#[test]
fn test_render_loaded_cards() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let state = state_with_page();

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("bulbasaur"), "Should show first card");
    assert!(output.contains("ivysaur"), "Should show second card");
    assert!(output.contains("#001"), "Should show padded id");
    assert!(
        output.contains("Showing 1 to 2 of 2 results"),
        "Should show the window summary:\n{}",
        output
    );
}

#[test]
fn test_render_skeleton_before_artwork_signal() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let mut state = state_with_page();
    state.image_ready.clear();

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(
        !output.contains("bulbasaur"),
        "Names stay hidden behind skeletons until ready"
    );
}

#[test]
fn test_render_error_state() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let state = AppState {
        error: Some(DisplayError::Provider(
            "No pudimos cargar los pokemones. Por favor, intenta de nuevo más tarde.".to_string(),
        )),
        ..Default::default()
    };

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(
        output.contains("No pudimos cargar los pokemones."),
        "Should show provider message:\n{}",
        output
    );
}

#[test]
fn test_render_unknown_error_fallback() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let state = AppState {
        error: Some(DisplayError::Unknown),
        ..Default::default()
    };

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("Error desconocido"), "Should show fallback");
}

#[test]
fn test_render_loading_spinner() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let state = AppState {
        loading: true,
        ..Default::default()
    };

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("Cargando"), "Should show loading text");
}

#[test]
fn test_render_search_results_summary() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CatalogDisplay::default();

    let mut state = state_with_page();
    state.committed_query = "bulba".to_string();

    let output = render.render_to_string_plain(|frame| {
        let props = CatalogDisplayProps {
            state: &state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("bulbasaur"));
    assert!(!output.contains("ivysaur"), "Filtered out by the query");
    assert!(
        output.contains("Showing 1 to 1 of 1 results"),
        "Summary describes the search-mode list:\n{}",
        output
    );
}

#[test]
fn test_render_search_bar_placeholder_and_value() {
    let mut render = RenderHarness::new(60, 5);
    let mut component = SearchBar::new();

    let output = render.render_to_string_plain(|frame| {
        let props = SearchBarProps {
            value: "",
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });
    assert!(
        output.contains("Buscar pok"),
        "Empty input shows the placeholder:\n{}",
        output
    );

    let output = render.render_to_string_plain(|frame| {
        let props = SearchBarProps {
            value: "   ",
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });
    assert!(
        !output.contains("Buscar pok"),
        "Whitespace-only input is preserved verbatim, not treated as empty"
    );
}

#[test]
fn test_render_detail_overlay() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = DetailOverlay::new();

    let detail = PokemonDetails {
        id: 6,
        name: "charizard".to_string(),
        abilities: vec![Ability {
            name: "blaze".to_string(),
            is_hidden: false,
        }],
        types: vec!["fire".to_string(), "flying".to_string()],
        stats: vec![StatValue {
            name: "special-attack".to_string(),
            value: 109,
        }],
        height: 17,
        weight: 905,
    };

    let output = render.render_to_string_plain(|frame| {
        let props = DetailOverlayProps {
            detail: &detail,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    });

    assert!(output.contains("charizard"));
    assert!(output.contains("#006"));
    assert!(output.contains("fire, flying"));
    assert!(output.contains("special attack"));
    assert!(output.contains("109"));
    assert!(output.contains("1.7m"));
    assert!(output.contains("90.5kg"));
}
