//! Equipment
//!
//! The list view shows catalog data. The sheet view is the carried view: it
//! adds the equipped toggle, quantity and extended value and weight.

use charsheet_core::{
    Alignment, CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, HeaderIcon, ItemVariant,
    ViewContext,
};
use serde::{Deserialize, Serialize};

use crate::common::{format_number, format_tags, format_weight, is_false, is_one, is_true, new_id, one, yes};
use crate::provider::{Kind, ListProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default = "new_id")]
    pub id: EntityId,
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tech_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub legality_class: String,
    /// Unit value
    #[serde(default)]
    pub value: f64,
    /// Unit weight in pounds
    #[serde(default)]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default = "yes", skip_serializing_if = "is_true")]
    pub equipped: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Equipment>,
}

impl Equipment {
    pub fn new(description: &str, value: f64, weight: f64) -> Self {
        Self {
            id: new_id(),
            description: description.to_string(),
            notes: String::new(),
            quantity: 1,
            uses: None,
            max_uses: None,
            tech_level: String::new(),
            legality_class: String::new(),
            value,
            weight,
            categories: Vec::new(),
            equipped: true,
            reference: String::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn container(description: &str, value: f64, weight: f64, children: Vec<Equipment>) -> Self {
        Self {
            container: true,
            children,
            ..Self::new(description, value, weight)
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// `quantity × value` plus every child's extended value
    pub fn extended_value(&self) -> f64 {
        let own = f64::from(self.quantity) * self.value;
        own + self.children.iter().map(Equipment::extended_value).sum::<f64>()
    }

    /// `quantity × weight` plus every child's extended weight
    pub fn extended_weight(&self) -> f64 {
        let own = f64::from(self.quantity) * self.weight;
        own + self.children.iter().map(Equipment::extended_weight).sum::<f64>()
    }

    /// `3/5` when the item has limited uses
    fn uses_text(&self) -> String {
        match (self.uses, self.max_uses) {
            (Some(uses), Some(max)) if max > 0 => format!("{uses}/{max}"),
            (Some(uses), None) => uses.to_string(),
            _ => String::new(),
        }
    }
}

/// Extended totals for a whole equipment list
pub fn totals(rows: &[Equipment]) -> (f64, f64) {
    rows.iter()
        .fold((0.0, 0.0), |(v, w), e| (v + e.extended_value(), w + e.extended_weight()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentColumn {
    Equipped,
    Quantity,
    Description,
    Uses,
    TechLevel,
    LegalityClass,
    Value,
    Weight,
    ExtendedValue,
    ExtendedWeight,
    Category,
    Reference,
}

impl ColumnSet for EquipmentColumn {
    const ALL: &'static [Self] = &[
        EquipmentColumn::Equipped,
        EquipmentColumn::Quantity,
        EquipmentColumn::Description,
        EquipmentColumn::Uses,
        EquipmentColumn::TechLevel,
        EquipmentColumn::LegalityClass,
        EquipmentColumn::Value,
        EquipmentColumn::Weight,
        EquipmentColumn::ExtendedValue,
        EquipmentColumn::ExtendedWeight,
        EquipmentColumn::Category,
        EquipmentColumn::Reference,
    ];
    const DESCRIPTION: Self = EquipmentColumn::Description;

    fn header(self, ctx: ViewContext) -> ColumnHeader {
        match self {
            EquipmentColumn::Equipped => {
                ColumnHeader::icon(HeaderIcon::Equipped, "Whether this item is equipped or just carried")
            }
            EquipmentColumn::Quantity => ColumnHeader::new("#", "Quantity").aligned(Alignment::End),
            EquipmentColumn::Description => match ctx {
                ViewContext::List => ColumnHeader::new("Equipment", "The name and notes of the item"),
                ViewContext::Sheet => ColumnHeader::new("Carried Equipment", "The name and notes of the item"),
            },
            EquipmentColumn::Uses => ColumnHeader::new("Uses", "The number of uses remaining").aligned(Alignment::End),
            EquipmentColumn::TechLevel => ColumnHeader::new("TL", "Tech Level"),
            EquipmentColumn::LegalityClass => ColumnHeader::new("LC", "Legality Class"),
            EquipmentColumn::Value => ColumnHeader::new("$", "The value of one of these items").aligned(Alignment::End),
            EquipmentColumn::Weight => ColumnHeader::new("W", "The weight of one of these items").aligned(Alignment::End),
            EquipmentColumn::ExtendedValue => {
                ColumnHeader::new("Σ $", "The value of all of these items, including contents").aligned(Alignment::End)
            }
            EquipmentColumn::ExtendedWeight => {
                ColumnHeader::new("Σ W", "The weight of all of these items, including contents").aligned(Alignment::End)
            }
            EquipmentColumn::Category => ColumnHeader::new("Category", "The categories this item belongs to"),
            EquipmentColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "A reference to the book and page"),
        }
    }
}

pub static EQUIPMENT_COLUMNS: ColumnMapper<EquipmentColumn> = ColumnMapper::new(
    &[
        EquipmentColumn::Description,
        EquipmentColumn::Uses,
        EquipmentColumn::TechLevel,
        EquipmentColumn::LegalityClass,
        EquipmentColumn::Value,
        EquipmentColumn::Weight,
        EquipmentColumn::Category,
        EquipmentColumn::Reference,
    ],
    &[
        EquipmentColumn::Equipped,
        EquipmentColumn::Quantity,
        EquipmentColumn::Description,
        EquipmentColumn::Uses,
        EquipmentColumn::Value,
        EquipmentColumn::Weight,
        EquipmentColumn::ExtendedValue,
        EquipmentColumn::ExtendedWeight,
        EquipmentColumn::Reference,
    ],
);

impl Entity for Equipment {
    type Column = EquipmentColumn;

    fn id(&self) -> EntityId {
        self.id
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn cell_data(&self, column: EquipmentColumn) -> CellData {
        match column {
            EquipmentColumn::Equipped => CellData::toggle(self.equipped),
            EquipmentColumn::Quantity => CellData::number(self.quantity.to_string()),
            EquipmentColumn::Description => CellData::text(&self.description).with_secondary(&self.notes),
            EquipmentColumn::Uses => CellData::number(self.uses_text()),
            EquipmentColumn::TechLevel => CellData::text(&self.tech_level),
            EquipmentColumn::LegalityClass => CellData::text(&self.legality_class),
            EquipmentColumn::Value => CellData::number(format_number(self.value)),
            EquipmentColumn::Weight => CellData::number(format_weight(self.weight)),
            EquipmentColumn::ExtendedValue => CellData::number(format_number(self.extended_value())),
            EquipmentColumn::ExtendedWeight => CellData::number(format_weight(self.extended_weight())),
            EquipmentColumn::Category => CellData::text(format_tags(&self.categories)),
            EquipmentColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

impl Kind for Equipment {
    fn mapper() -> &'static ColumnMapper<EquipmentColumn> {
        &EQUIPMENT_COLUMNS
    }

    fn variant_label(variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Container => "New Equipment Container",
            _ => "New Equipment",
        }
    }

    fn new_item(variant: ItemVariant) -> Option<Self> {
        match variant {
            ItemVariant::Item => Some(Equipment::new("Equipment", 0.0, 0.0)),
            ItemVariant::Container => Some(Equipment::container("Equipment Container", 0.0, 0.0, Vec::new())),
            ItemVariant::Alternate => None,
        }
    }
}

pub type EquipmentProvider = ListProvider<Equipment>;

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_core::{CellKind, TableProvider};

    fn backpack() -> Equipment {
        Equipment::container(
            "Backpack",
            60.0,
            3.0,
            vec![
                Equipment::new("Rope, 10 yards", 5.0, 1.5).with_quantity(2),
                Equipment::container("Pouch", 10.0, 0.5, vec![Equipment::new("Coin", 1.0, 0.02).with_quantity(50)]),
            ],
        )
    }

    #[test]
    fn test_extended_values_sum_children() {
        let pack = backpack();
        assert_eq!(pack.extended_value(), 60.0 + 10.0 + 10.0 + 50.0);
        assert!((pack.extended_weight() - (3.0 + 3.0 + 0.5 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_quantity_multiplies_own_value_only() {
        let pack = backpack().with_quantity(2);
        assert_eq!(pack.extended_value(), 120.0 + 10.0 + 10.0 + 50.0);
    }

    #[test]
    fn test_totals() {
        let (value, _) = totals(&[backpack(), Equipment::new("Sword", 500.0, 3.0)]);
        assert_eq!(value, 630.0);
    }

    #[test]
    fn test_carried_view_columns() {
        let provider = EquipmentProvider::sheet(vec![backpack()]);
        assert_eq!(provider.column_count(), 9);
        assert_eq!(provider.hierarchy_column_index(), Some(2));

        let pack = &provider.rows()[0];
        let equipped = pack.cell_data(EQUIPMENT_COLUMNS.map(0, ViewContext::Sheet));
        assert_eq!(equipped.kind, CellKind::Toggle);
        assert!(equipped.checked);
        assert_eq!(pack.cell_data(EquipmentColumn::ExtendedValue).primary, "130");
        assert_eq!(pack.cell_data(EquipmentColumn::ExtendedWeight).primary, "7.5 lb");
    }

    #[test]
    fn test_list_view_has_no_toggle() {
        let provider = EquipmentProvider::list(Vec::new());
        assert_eq!(provider.column_count(), 8);
        assert_eq!(provider.hierarchy_column_index(), Some(0));
        assert_eq!(EQUIPMENT_COLUMNS.index_of(EquipmentColumn::Equipped, ViewContext::List), None);
    }

    #[test]
    fn test_uses_text() {
        let mut torch = Equipment::new("Torch", 3.0, 1.0);
        assert_eq!(torch.cell_data(EquipmentColumn::Uses).primary, "");
        torch.uses = Some(3);
        torch.max_uses = Some(5);
        assert_eq!(torch.cell_data(EquipmentColumn::Uses).primary, "3/5");
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let item: Equipment = serde_json::from_str(r#"{"description": "Knife"}"#).unwrap();
        assert_eq!(item.quantity, 1);
        assert!(item.equipped);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("quantity").is_none());
    }
}
