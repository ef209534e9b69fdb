//! Column semantics and per-view column maps
//!
//! Each entity kind names its columns with a `ColumnSet` enum. A view (the
//! flat list editor or the character sheet) shows a subset of those columns in
//! its own order; `ColumnMapper` holds the two static tables that translate a
//! view column index into the semantic column.

use std::fmt::Debug;

use crate::cell::Alignment;

/// Which view a table is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewContext {
    /// Flat list editor (library files)
    #[default]
    List,
    /// Character sheet page. For equipment this is the carried view.
    Sheet,
}

/// Icon drawn in place of a header title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderIcon {
    /// Page reference column ("book" glyph)
    PageRef,
    /// Equipped toggle column ("check" glyph)
    Equipped,
    /// Trait modifier enabled toggle
    Enabled,
}

/// One column header as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub title: String,
    pub tooltip: String,
    pub icon: Option<HeaderIcon>,
    pub alignment: Alignment,
}

impl ColumnHeader {
    pub fn new(title: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tooltip: tooltip.into(),
            icon: None,
            alignment: Alignment::Start,
        }
    }

    /// Header with no title, only an icon; the tooltip explains it
    pub fn icon(icon: HeaderIcon, tooltip: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            tooltip: tooltip.into(),
            icon: Some(icon),
            alignment: Alignment::Middle,
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// The semantic columns one entity kind can produce.
pub trait ColumnSet: Copy + Eq + Debug + 'static {
    /// Every semantic column, in declaration order. Search walks this list.
    const ALL: &'static [Self];

    /// The description column; it carries the disclosure triangle.
    const DESCRIPTION: Self;

    /// Header shown for this column in the given view
    fn header(self, ctx: ViewContext) -> ColumnHeader;
}

/// Static view-index → semantic-column tables for one entity kind
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapper<C: 'static> {
    list: &'static [C],
    sheet: &'static [C],
}

impl<C: ColumnSet> ColumnMapper<C> {
    pub const fn new(list: &'static [C], sheet: &'static [C]) -> Self {
        Self { list, sheet }
    }

    /// All mapped columns for a view, in view order
    pub fn columns(&self, ctx: ViewContext) -> &'static [C] {
        match ctx {
            ViewContext::List => self.list,
            ViewContext::Sheet => self.sheet,
        }
    }

    /// Number of columns the view shows
    pub fn size(&self, ctx: ViewContext) -> usize {
        self.columns(ctx).len()
    }

    /// Semantic column at `index`.
    ///
    /// Headers and maps are built together, so an out-of-range index is a
    /// misconfigured provider and panics.
    pub fn map(&self, index: usize, ctx: ViewContext) -> C {
        let columns = self.columns(ctx);
        assert!(
            index < columns.len(),
            "view column {index} out of range for {ctx:?} map of {} columns",
            columns.len()
        );
        columns[index]
    }

    /// Lenient lookup used by rows: `None` when the view has no such column
    pub fn get(&self, index: usize, ctx: ViewContext) -> Option<C> {
        self.columns(ctx).get(index).copied()
    }

    /// View index of a semantic column, if the view shows it
    pub fn index_of(&self, column: C, ctx: ViewContext) -> Option<usize> {
        self.columns(ctx).iter().position(|&c| c == column)
    }

    /// Headers for a view, in view order
    pub fn headers(&self, ctx: ViewContext) -> Vec<ColumnHeader> {
        self.columns(ctx).iter().map(|c| c.header(ctx)).collect()
    }

    /// Index of the column carrying the disclosure triangle
    pub fn hierarchy_column_index(&self, ctx: ViewContext) -> Option<usize> {
        self.index_of(C::DESCRIPTION, ctx)
    }
}
