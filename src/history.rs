//! Navigation stacks
//!
//! The router keeps two index-aligned sequences:
//! - the match stack, one resolved [`RouteMatchList`] per entry
//! - the location stack, the raw location and payload each entry came from
//!
//! Every mutation goes through [`NavigationStack`] so both always have the
//! same length.

use crate::matcher::RouteMatchList;
use crate::Extra;

/// Raw location and payload of a stack entry
#[derive(Debug, Clone)]
pub struct LocationEntry {
    pub location: String,
    pub extra: Option<Extra>,
}

impl LocationEntry {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            extra: None,
        }
    }

    pub fn with_extra(location: impl Into<String>, extra: Option<Extra>) -> Self {
        Self {
            location: location.into(),
            extra,
        }
    }
}

/// The two aligned stacks
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    matches: Vec<RouteMatchList>,
    locations: Vec<LocationEntry>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to both stacks
    pub fn push(&mut self, matches: RouteMatchList, location: LocationEntry) {
        self.matches.push(matches);
        self.locations.push(location);
    }

    /// Remove the top entry from both stacks
    pub fn pop(&mut self) -> Option<(RouteMatchList, LocationEntry)> {
        let matches = self.matches.pop()?;
        let location = self.locations.pop()?;
        Some((matches, location))
    }

    /// Replace the top entry, or push onto an empty stack
    pub fn replace_top(&mut self, matches: RouteMatchList, location: LocationEntry) {
        self.pop();
        self.push(matches, location);
    }

    /// Clear both stacks and push a single entry
    pub fn reset(&mut self, matches: RouteMatchList, location: LocationEntry) {
        self.clear();
        self.push(matches, location);
    }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.locations.clear();
    }

    pub fn top_match(&self) -> Option<&RouteMatchList> {
        self.matches.last()
    }

    pub fn top_location(&self) -> Option<&LocationEntry> {
        self.locations.last()
    }

    pub fn matches(&self) -> &[RouteMatchList] {
        &self.matches
    }

    pub fn locations(&self) -> &[LocationEntry] {
        &self.locations
    }

    /// Raw location strings, bottom to top
    pub fn location_strings(&self) -> Vec<String> {
        self.locations.iter().map(|e| e.location.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Whether an entry above the first can be popped
    pub fn can_pop(&self) -> bool {
        self.len() > 1
    }
}
