//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch one page of list entries
    FetchPage { page: usize, generation: u64 },
    /// (Re)arm the debounce timer with the latest raw input
    ScheduleSearch { input: String },
    /// Remote name-or-id lookup for a query with no local hit
    FetchSearch { query: String, generation: u64 },
    /// Fetch the full record for the overlay
    FetchDetail { id: u32, generation: u64 },
    /// Probe the artwork for an identifier to drive the ready signal
    FetchArtwork { id: u32 },
}
