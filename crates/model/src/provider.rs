//! One table provider shape shared by every entity kind

use charsheet_core::{ColumnMapper, Entity, ItemVariant, TableProvider, ViewContext};

/// What a kind contributes to its provider
pub trait Kind: Entity {
    /// Static list and sheet column tables
    fn mapper() -> &'static ColumnMapper<Self::Column>;

    /// Variants the editor may create; empty means read-only
    fn variants() -> &'static [ItemVariant] {
        &[ItemVariant::Item, ItemVariant::Container]
    }

    fn variant_label(variant: ItemVariant) -> &'static str;

    fn new_item(variant: ItemVariant) -> Option<Self>;
}

/// Owns one entity collection and presents it to a table
#[derive(Debug, Clone)]
pub struct ListProvider<E> {
    rows: Vec<E>,
    context: ViewContext,
}

impl<E: Kind> ListProvider<E> {
    pub fn new(rows: Vec<E>, context: ViewContext) -> Self {
        Self { rows, context }
    }

    /// Provider for the flat list editor
    pub fn list(rows: Vec<E>) -> Self {
        Self::new(rows, ViewContext::List)
    }

    /// Provider for the character sheet
    pub fn sheet(rows: Vec<E>) -> Self {
        Self::new(rows, ViewContext::Sheet)
    }

    pub fn into_rows(self) -> Vec<E> {
        self.rows
    }
}

impl<E: Kind> TableProvider for ListProvider<E> {
    type Entity = E;

    fn mapper(&self) -> &'static ColumnMapper<E::Column> {
        E::mapper()
    }

    fn context(&self) -> ViewContext {
        self.context
    }

    fn rows(&self) -> &[E] {
        &self.rows
    }

    fn rows_mut(&mut self) -> &mut Vec<E> {
        &mut self.rows
    }

    fn item_variants(&self) -> &'static [ItemVariant] {
        E::variants()
    }

    fn variant_label(&self, variant: ItemVariant) -> &'static str {
        E::variant_label(variant)
    }

    fn new_item(&self, variant: ItemVariant) -> Option<E> {
        E::new_item(variant)
    }
}
