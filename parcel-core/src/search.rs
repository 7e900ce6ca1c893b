//! Search/select over a static reference list.
//!
//! Each dropdown is a two-state machine driven by abstract events:
//!
//! | From     | Event               | To       |
//! |----------|---------------------|----------|
//! | `Closed` | `Focus`             | `Open`   |
//! | any      | `TextChanged`       | `Open`   |
//! | `Open`   | `OptionChosen`      | `Closed` |
//! | any      | `OutsideActivation` | `Closed` |
//!
//! Options are only visible while `Open`, and are re-filtered from the full
//! list on every call.

use tracing::debug;

/// Anything that can be searched by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Returns the entries whose name contains `term`, ignoring case, in list order.
///
/// An empty term matches every entry.
pub fn filter_by_name<'a, T: Named>(
    entries: &'a [T],
    term: &str,
) -> Vec<&'a T> {
    let needle = term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name().to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// Input events for a reference dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Focus,
    TextChanged(String),
    /// The user picked the option with this name from the visible list.
    OptionChosen(String),
    /// A pointer or activation event outside the control's region.
    OutsideActivation,
}

/// Per-dropdown search state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownSearchState {
    pub search_term: String,
    pub state: DropdownState,
    pub selected_name: Option<String>,
}

impl DropdownSearchState {
    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }
}

/// A dropdown bound to a reference list.
#[derive(Debug, Clone)]
pub struct ReferenceSearch<'a, T> {
    entries: &'a [T],
    state: DropdownSearchState,
}

impl<'a, T: Named> ReferenceSearch<'a, T> {
    pub fn new(entries: &'a [T]) -> Self {
        Self {
            entries,
            state: DropdownSearchState::default(),
        }
    }

    pub fn state(&self) -> &DropdownSearchState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Options currently shown to the user; empty while closed.
    pub fn visible_options(&self) -> Vec<&'a T> {
        if self.is_open() {
            filter_by_name(self.entries, &self.state.search_term)
        } else {
            Vec::new()
        }
    }

    /// Feeds one event into the state machine.
    ///
    /// Returns the chosen entry when the event completes a selection; the
    /// caller applies the corresponding bulk overwrite. Choosing a name that
    /// is not currently visible is ignored.
    pub fn handle(
        &mut self,
        event: SearchEvent,
    ) -> Option<&'a T> {
        match event {
            SearchEvent::Focus => {
                self.state.state = DropdownState::Open;
                None
            }
            SearchEvent::TextChanged(text) => {
                self.state.search_term = text;
                self.state.state = DropdownState::Open;
                None
            }
            SearchEvent::OptionChosen(name) => {
                let chosen = self
                    .visible_options()
                    .into_iter()
                    .find(|entry| entry.name() == name)?;

                debug!(name = %chosen.name(), "reference option chosen");
                self.state.search_term = chosen.name().to_string();
                self.state.selected_name = Some(chosen.name().to_string());
                self.state.state = DropdownState::Closed;
                Some(chosen)
            }
            SearchEvent::OutsideActivation => {
                self.state.state = DropdownState::Closed;
                None
            }
        }
    }
}
