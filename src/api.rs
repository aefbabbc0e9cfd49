//! PokeAPI client

use std::sync::OnceLock;

use serde::Deserialize;

use crate::state::{Ability, ListEntry, PokemonDetails, StatValue, PAGE_SIZE};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

// Fixed per-operation messages; any transport or decode failure inside an
// operation surfaces as that operation's message.
pub const LIST_ERROR: &str =
    "No pudimos cargar los pokemones. Por favor, intenta de nuevo más tarde.";
pub const DETAIL_ERROR: &str =
    "No pudimos cargar el pokémon. Por favor, intenta de nuevo más tarde.";
pub const SEARCH_ERROR: &str =
    "No pudimos encontrar el pokémon. Por favor, intenta de nuevo más tarde.";

/// Fetch failure carrying the failing operation's fixed message.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: reqwest::Error,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    count: usize,
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct StatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u16,
    weight: u16,
    abilities: Vec<AbilitySlot>,
    types: Vec<TypeSlot>,
    stats: Vec<StatSlot>,
}

/// One page of raw list entries plus the collection total.
#[derive(Clone, Debug, PartialEq)]
pub struct PageData {
    pub count: usize,
    pub entries: Vec<ListEntry>,
}

// ============================================================================
// Operations
// ============================================================================

/// Fetch one page of the catalog (zero-based page index, fixed page size).
pub async fn fetch_page(page: usize) -> Result<PageData, ApiError> {
    let offset = page * PAGE_SIZE;
    let url = format!("{API_BASE}/pokemon?offset={offset}&limit={PAGE_SIZE}");
    let response: ListResponse = fetch_json(&url, LIST_ERROR).await?;
    Ok(PageData {
        count: response.count,
        entries: response
            .results
            .into_iter()
            .map(|entry| ListEntry {
                name: entry.name,
                url: entry.url,
            })
            .collect(),
    })
}

/// Fetch the full record for a known identifier.
pub async fn fetch_by_id(id: u32) -> Result<PokemonDetails, ApiError> {
    let url = format!("{API_BASE}/pokemon/{id}");
    let response: PokemonResponse = fetch_json(&url, DETAIL_ERROR).await?;
    Ok(map_detail(response))
}

/// Name-or-id lookup. The text is lowercased here, on the provider side.
pub async fn fetch_by_query(query: &str) -> Result<PokemonDetails, ApiError> {
    let url = format!(
        "{API_BASE}/pokemon/{}",
        urlencoding::encode(&query.to_lowercase())
    );
    let response: PokemonResponse = fetch_json(&url, SEARCH_ERROR).await?;
    Ok(map_detail(response))
}

/// Probe the official artwork for an identifier. Callers treat a failure
/// as the fallback-image path; the item still counts as ready.
pub async fn fetch_artwork(id: u32) -> Result<(), reqwest::Error> {
    let url = artwork_url(id);
    http_client()
        .get(&url)
        .send()
        .await?
        .error_for_status()
        .map(|_| ())
}

pub fn detail_url(id: u32) -> String {
    format!("{API_BASE}/pokemon/{id}")
}

pub fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_BASE}/other/official-artwork/{id}.png")
}

// ============================================================================
// Helpers
// ============================================================================

fn map_detail(response: PokemonResponse) -> PokemonDetails {
    PokemonDetails {
        id: response.id,
        name: response.name,
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                is_hidden: slot.is_hidden,
            })
            .collect(),
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| StatValue {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        height: response.height,
        weight: response.weight,
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    url: &str,
    message: &'static str,
) -> Result<T, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|source| ApiError { message, source })?;
    let response = response
        .error_for_status()
        .map_err(|source| ApiError { message, source })?;
    response
        .json()
        .await
        .map_err(|source| ApiError { message, source })
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
