//! Find-in-table
//!
//! Case-insensitive substring search over every semantic column of every
//! row, collapsed or not. Navigation walks the ordered result list without
//! wrapping and reveals each hit (opens its ancestors, selects it, scrolls to
//! it).

use crate::column::ColumnSet;
use crate::entity::Entity;
use crate::node::NodeId;
use crate::provider::TableProvider;
use crate::table::Table;

/// Shown in the match counter when there is nothing to navigate
pub const NO_MATCHES: &str = "-";

/// Whether any semantic column of `entity` contains `query_lower`
pub fn entity_matches<E: Entity>(entity: &E, query_lower: &str) -> bool {
    <E::Column as ColumnSet>::ALL
        .iter()
        .any(|&column| entity.cell_data(column).contains(query_lower))
}

/// Search state attached to one table
#[derive(Debug, Clone, Default)]
pub struct Finder {
    query: String,
    results: Vec<NodeId>,
    cursor: usize,
}

impl Finder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[NodeId] {
        &self.results
    }

    pub fn cursor(&self) -> Option<usize> {
        if self.results.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Row the cursor is on
    pub fn current(&self) -> Option<NodeId> {
        self.results.get(self.cursor).copied()
    }

    /// Replace the query and rerun the search. The cursor goes back to the
    /// first result, which is revealed.
    pub fn set_query<Pr: TableProvider, P>(&mut self, table: &mut Table<Pr, P>, query: &str) {
        self.query = query.to_string();
        self.run(table);
    }

    /// Rerun the current query, e.g. after the table was resynced
    pub fn refresh<Pr: TableProvider, P>(&mut self, table: &mut Table<Pr, P>) {
        self.run(table);
    }

    fn run<Pr: TableProvider, P>(&mut self, table: &mut Table<Pr, P>) {
        self.cursor = 0;
        if self.query.is_empty() {
            self.results.clear();
            return;
        }
        let needle = self.query.to_lowercase();
        self.results = table.collect_matching(|entity| entity_matches(entity, &needle));
        log::debug!("search {:?}: {} matches", self.query, self.results.len());
        if let Some(first) = self.current() {
            if let Err(e) = table.reveal(first) {
                log::debug!("search {:?}: first match not revealed: {e}", self.query);
            }
        }
    }

    pub fn can_next(&self) -> bool {
        !self.results.is_empty() && self.cursor + 1 < self.results.len()
    }

    pub fn can_previous(&self) -> bool {
        !self.results.is_empty() && self.cursor > 0
    }

    /// Move to the next match. At the last match this does nothing.
    pub fn next_match<Pr: TableProvider, P>(&mut self, table: &mut Table<Pr, P>) -> bool {
        if !self.can_next() {
            return false;
        }
        self.cursor += 1;
        self.reveal_current(table)
    }

    /// Move to the previous match. At the first match this does nothing.
    pub fn previous_match<Pr: TableProvider, P>(&mut self, table: &mut Table<Pr, P>) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.cursor -= 1;
        self.reveal_current(table)
    }

    fn reveal_current<Pr: TableProvider, P>(&mut self, table: &mut Table<Pr, P>) -> bool {
        match self.current() {
            Some(id) => table.reveal(id).is_ok(),
            None => false,
        }
    }

    /// "2/5" style counter, or `NO_MATCHES`
    pub fn match_counter(&self) -> String {
        if self.results.is_empty() {
            NO_MATCHES.to_string()
        } else {
            format!("{}/{}", self.cursor + 1, self.results.len())
        }
    }
}
