//! Trait modifiers (enhancements and limitations)

use charsheet_core::{
    Alignment, CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, HeaderIcon, ItemVariant,
    ViewContext,
};
use serde::{Deserialize, Serialize};

use crate::common::{format_tags, is_false, new_id};
use crate::provider::{Kind, ListProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    /// `+10%`
    #[default]
    Percentage,
    /// `+5`
    Points,
    /// `x2`
    Multiplier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitModifier {
    #[serde(default = "new_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub cost_type: CostType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TraitModifier>,
}

impl TraitModifier {
    pub fn new(name: &str, cost: f64, cost_type: CostType) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            notes: String::new(),
            cost,
            cost_type,
            disabled: false,
            tags: Vec::new(),
            reference: String::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn container(name: &str, children: Vec<TraitModifier>) -> Self {
        Self {
            container: true,
            children,
            ..Self::new(name, 0.0, CostType::Percentage)
        }
    }

    pub fn enabled(&self) -> bool {
        !self.disabled
    }

    /// `+10%`, `-5`, `x1.5`
    pub fn cost_description(&self) -> String {
        if self.container {
            return String::new();
        }
        let amount = crate::common::format_number(self.cost.abs());
        match self.cost_type {
            CostType::Percentage => format!("{}{amount}%", sign(self.cost)),
            CostType::Points => format!("{}{amount}", sign(self.cost)),
            CostType::Multiplier => format!("x{}", crate::common::format_number(self.cost)),
        }
    }

    /// `Name (notes)`, used when listing a trait's active modifiers
    pub fn summary(&self) -> String {
        if self.notes.is_empty() {
            format!("{}, {}", self.name, self.cost_description())
        } else {
            format!("{} ({}), {}", self.name, self.notes, self.cost_description())
        }
    }
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        "+"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierColumn {
    Enabled,
    Name,
    Cost,
    Tags,
    Reference,
}

impl ColumnSet for ModifierColumn {
    const ALL: &'static [Self] = &[
        ModifierColumn::Enabled,
        ModifierColumn::Name,
        ModifierColumn::Cost,
        ModifierColumn::Tags,
        ModifierColumn::Reference,
    ];
    const DESCRIPTION: Self = ModifierColumn::Name;

    fn header(self, _ctx: ViewContext) -> ColumnHeader {
        match self {
            ModifierColumn::Enabled => ColumnHeader::icon(HeaderIcon::Enabled, "Whether this modifier is enabled"),
            ModifierColumn::Name => ColumnHeader::new("Trait Modifier", "The name and notes of the modifier"),
            ModifierColumn::Cost => ColumnHeader::new("Cost Modifier", "The cost modifier").aligned(Alignment::End),
            ModifierColumn::Tags => ColumnHeader::new("Tags", "The set of tags this modifier has"),
            ModifierColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "A reference to the book and page"),
        }
    }
}

pub static MODIFIER_COLUMNS: ColumnMapper<ModifierColumn> = ColumnMapper::new(
    &[ModifierColumn::Name, ModifierColumn::Cost, ModifierColumn::Tags, ModifierColumn::Reference],
    &[ModifierColumn::Enabled, ModifierColumn::Name, ModifierColumn::Cost, ModifierColumn::Reference],
);

impl Entity for TraitModifier {
    type Column = ModifierColumn;

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

    fn cell_data(&self, column: ModifierColumn) -> CellData {
        match column {
            ModifierColumn::Enabled => CellData::toggle(self.enabled()),
            ModifierColumn::Name => CellData::text(&self.name).with_secondary(&self.notes),
            ModifierColumn::Cost => CellData::number(self.cost_description()),
            ModifierColumn::Tags => CellData::text(format_tags(&self.tags)),
            ModifierColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

impl Kind for TraitModifier {
    fn mapper() -> &'static ColumnMapper<ModifierColumn> {
        &MODIFIER_COLUMNS
    }

    fn variant_label(variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Container => "New Trait Modifier Container",
            _ => "New Trait Modifier",
        }
    }

    fn new_item(variant: ItemVariant) -> Option<Self> {
        match variant {
            ItemVariant::Item => Some(TraitModifier::new("Trait Modifier", 0.0, CostType::Percentage)),
            ItemVariant::Container => Some(TraitModifier::container("Trait Modifier Container", Vec::new())),
            ItemVariant::Alternate => None,
        }
    }
}

pub type TraitModifierProvider = ListProvider<TraitModifier>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_description() {
        assert_eq!(TraitModifier::new("Ranged", 40.0, CostType::Percentage).cost_description(), "+40%");
        assert_eq!(TraitModifier::new("Costs FP", -5.0, CostType::Percentage).cost_description(), "-5%");
        assert_eq!(TraitModifier::new("Extra", 3.0, CostType::Points).cost_description(), "+3");
        assert_eq!(TraitModifier::new("Double", 1.5, CostType::Multiplier).cost_description(), "x1.5");
        assert_eq!(TraitModifier::container("Group", Vec::new()).cost_description(), "");
    }

    #[test]
    fn test_sheet_view_starts_with_toggle() {
        let mut m = TraitModifier::new("Ranged", 40.0, CostType::Percentage);
        m.disabled = true;
        let column = MODIFIER_COLUMNS.map(0, ViewContext::Sheet);
        let cell = m.cell_data(column);
        assert_eq!(cell.kind, charsheet_core::CellKind::Toggle);
        assert!(!cell.checked);
        assert_eq!(MODIFIER_COLUMNS.size(ViewContext::List), 4);
    }

    #[test]
    fn test_cost_type_serializes_snake_case() {
        let m = TraitModifier::new("Double", 2.0, CostType::Multiplier);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["cost_type"], "multiplier");
        assert!(json.get("disabled").is_none());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_summary() {
        let mut m = TraitModifier::new("Ranged", 40.0, CostType::Percentage);
        assert_eq!(m.summary(), "Ranged, +40%");
        m.notes = "10 yards".to_string();
        assert_eq!(m.summary(), "Ranged (10 yards), +40%");
    }
}
