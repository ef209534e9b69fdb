//! Per-entity-kind table providers

use crate::column::{ColumnHeader, ColumnMapper, ViewContext};
use crate::entity::Entity;
use crate::error::TableError;

/// Row variants a provider may be asked to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemVariant {
    /// Plain item
    Item,
    /// Container of like items
    Container,
    /// Kind-specific alternate (technique for skills, ritual magic for spells)
    Alternate,
}

/// Supplies one entity collection to a `Table`.
///
/// A provider owns its collection; the table reaches entities through it.
pub trait TableProvider {
    type Entity: Entity;

    /// Static column tables for the entity kind
    fn mapper(&self) -> &'static ColumnMapper<<Self::Entity as Entity>::Column>;

    /// Which view the table is shown in
    fn context(&self) -> ViewContext;

    /// Top-level entities
    fn rows(&self) -> &[Self::Entity];

    fn rows_mut(&mut self) -> &mut Vec<Self::Entity>;

    /// Variants this provider can create; empty means read-only
    fn item_variants(&self) -> &'static [ItemVariant] {
        &[]
    }

    /// Menu label for a variant
    fn variant_label(&self, variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Item => "Item",
            ItemVariant::Container => "Container",
            ItemVariant::Alternate => "Alternate",
        }
    }

    /// Fresh entity for a variant. Only called for variants in `item_variants`.
    fn new_item(&self, _variant: ItemVariant) -> Option<Self::Entity> {
        None
    }

    fn headers(&self) -> Vec<ColumnHeader> {
        self.mapper().headers(self.context())
    }

    fn column_count(&self) -> usize {
        self.mapper().size(self.context())
    }

    /// View column carrying the disclosure triangle
    fn hierarchy_column_index(&self) -> Option<usize> {
        self.mapper().hierarchy_column_index(self.context())
    }

    fn accepts(&self, variant: ItemVariant) -> bool {
        self.item_variants().contains(&variant)
    }

    /// Capability-gated creation
    fn create_item(&self, variant: ItemVariant) -> Result<Self::Entity, TableError> {
        if !self.accepts(variant) {
            return Err(TableError::UnsupportedVariant(variant));
        }
        self.new_item(variant)
            .ok_or(TableError::UnsupportedVariant(variant))
    }
}
