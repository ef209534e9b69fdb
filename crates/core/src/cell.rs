//! Renderable cell content
//!
//! `CellData` is what a row hands to the table for one cell. It carries no
//! toolkit types, so it can be compared, cached and searched cheaply.

/// What kind of widget a cell renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    /// Primary text with an optional smaller detail line
    #[default]
    Text,
    /// Checkbox-style toggle (e.g. "equipped")
    Toggle,
    /// One or more page references (e.g. "B22,MA45")
    PageRef,
}

/// Horizontal alignment of cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Start,
    Middle,
    End,
}

/// Content of one table cell.
///
/// `secondary` is only meaningful for `CellKind::Text`, where it is drawn in a
/// smaller font under `primary`. `checked` is only meaningful for
/// `CellKind::Toggle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CellData {
    pub kind: CellKind,
    pub primary: String,
    pub secondary: String,
    pub alignment: Alignment,
    pub tooltip: String,
    pub checked: bool,
}

impl CellData {
    /// Plain text cell
    pub fn text(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            ..Self::default()
        }
    }

    /// Right-aligned text cell, used for numbers
    pub fn number(primary: impl Into<String>) -> Self {
        Self::text(primary).aligned(Alignment::End)
    }

    pub fn toggle(checked: bool) -> Self {
        Self {
            kind: CellKind::Toggle,
            checked,
            alignment: Alignment::Middle,
            ..Self::default()
        }
    }

    /// Page reference cell; `refs` is the raw reference list ("B22,MA45")
    pub fn page_ref(refs: impl Into<String>) -> Self {
        Self {
            kind: CellKind::PageRef,
            primary: refs.into(),
            alignment: Alignment::Start,
            ..Self::default()
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = secondary.into();
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// True for the empty text cell a view gets for an unmapped column
    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Text && self.primary.is_empty() && self.secondary.is_empty()
    }

    /// Case-insensitive substring test against the cell's textual form.
    ///
    /// `query_lower` must already be lowercased. Toggles have no text and
    /// never match; tooltips are not searched.
    pub fn contains(&self, query_lower: &str) -> bool {
        match self.kind {
            CellKind::Toggle => false,
            CellKind::PageRef => self.primary.to_lowercase().contains(query_lower),
            CellKind::Text => {
                self.primary.to_lowercase().contains(query_lower)
                    || (!self.secondary.is_empty()
                        && self.secondary.to_lowercase().contains(query_lower))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_text() {
        let cell = CellData::default();
        assert_eq!(cell.kind, CellKind::Text);
        assert!(cell.is_empty());
    }

    #[test]
    fn test_contains_checks_secondary_line() {
        let cell = CellData::text("Broadsword").with_secondary("Cutting, thrust");
        assert!(cell.contains("sword"));
        assert!(cell.contains("thrust"));
        assert!(!cell.contains("axe"));
    }

    #[test]
    fn test_toggle_never_matches() {
        let cell = CellData::toggle(true);
        assert!(!cell.contains(""));
        assert!(!cell.contains("true"));
    }

    #[test]
    fn test_tooltip_not_searched() {
        let cell = CellData::text("Shield").with_tooltip("Medium shield, DB 2");
        assert!(!cell.contains("medium"));
    }

    #[test]
    fn test_page_ref_matches_code() {
        let cell = CellData::page_ref("B22,MA45");
        assert!(cell.contains("ma4"));
        assert_eq!(cell.alignment, Alignment::Start);
    }
}
