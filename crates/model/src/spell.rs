//! Spells and ritual magic spells

use charsheet_core::{
    Alignment, CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, HeaderIcon, ItemVariant,
    ViewContext,
};
use serde::{Deserialize, Serialize};

use crate::common::{format_signed, format_tags, is_false, is_zero, new_id};
use crate::provider::{Kind, ListProvider};
use crate::skill::{Difficulty, DifficultyLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    #[default]
    Spell,
    /// Learned as a technique of a ritual magic base skill
    RitualMagic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    #[serde(default = "new_id")]
    pub id: EntityId,
    #[serde(default)]
    pub kind: SpellKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub college: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resist: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub casting_cost: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub maintenance_cost: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub casting_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub duration: String,
    #[serde(default = "spell_difficulty")]
    pub difficulty: Difficulty,
    /// Base skill for ritual magic spells
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_skill: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Spell>,
}

fn spell_difficulty() -> Difficulty {
    Difficulty::new("IQ", DifficultyLevel::Hard)
}

impl Spell {
    pub fn new(name: &str) -> Self {
        Self {
            id: new_id(),
            kind: SpellKind::Spell,
            name: name.to_string(),
            notes: String::new(),
            college: Vec::new(),
            resist: String::new(),
            class: String::new(),
            casting_cost: String::new(),
            maintenance_cost: String::new(),
            casting_time: String::new(),
            duration: String::new(),
            difficulty: spell_difficulty(),
            base_skill: String::new(),
            points: 0,
            level: None,
            relative_level: None,
            tags: Vec::new(),
            reference: String::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn ritual_magic(name: &str, base_skill: &str) -> Self {
        Self {
            kind: SpellKind::RitualMagic,
            base_skill: base_skill.to_string(),
            ..Self::new(name)
        }
    }

    pub fn container(name: &str, children: Vec<Spell>) -> Self {
        Self {
            container: true,
            children,
            ..Self::new(name)
        }
    }

    pub fn is_ritual_magic(&self) -> bool {
        self.kind == SpellKind::RitualMagic
    }

    pub fn total_points(&self) -> i32 {
        if self.container {
            self.children.iter().map(Spell::total_points).sum()
        } else {
            self.points
        }
    }

    fn leaf_text(&self, text: &str) -> String {
        if self.container {
            String::new()
        } else {
            text.to_string()
        }
    }

    fn relative_level_text(&self) -> String {
        match (self.container, self.relative_level) {
            (false, Some(rsl)) if self.is_ritual_magic() => format!("{}{}", self.base_skill, format_signed(rsl)),
            (false, Some(rsl)) => format!("{}{}", self.difficulty.attribute, format_signed(rsl)),
            _ => String::new(),
        }
    }

    fn level_text(&self) -> String {
        match (self.container, self.level) {
            (true, _) => String::new(),
            (false, Some(level)) => level.to_string(),
            (false, None) => "-".to_string(),
        }
    }

    fn secondary_text(&self) -> String {
        if self.is_ritual_magic() && !self.base_skill.is_empty() {
            if self.notes.is_empty() {
                format!("Ritual magic; {}", self.base_skill)
            } else {
                format!("Ritual magic; {}; {}", self.base_skill, self.notes)
            }
        } else {
            self.notes.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpellColumn {
    Name,
    College,
    Resist,
    Class,
    CastingCost,
    MaintenanceCost,
    CastingTime,
    Duration,
    Difficulty,
    Level,
    RelativeLevel,
    Points,
    Tags,
    Reference,
}

impl ColumnSet for SpellColumn {
    const ALL: &'static [Self] = &[
        SpellColumn::Name,
        SpellColumn::College,
        SpellColumn::Resist,
        SpellColumn::Class,
        SpellColumn::CastingCost,
        SpellColumn::MaintenanceCost,
        SpellColumn::CastingTime,
        SpellColumn::Duration,
        SpellColumn::Difficulty,
        SpellColumn::Level,
        SpellColumn::RelativeLevel,
        SpellColumn::Points,
        SpellColumn::Tags,
        SpellColumn::Reference,
    ];
    const DESCRIPTION: Self = SpellColumn::Name;

    fn header(self, ctx: ViewContext) -> ColumnHeader {
        match self {
            SpellColumn::Name => match ctx {
                ViewContext::List => ColumnHeader::new("Spell", "The name, tech level and notes of the spell"),
                ViewContext::Sheet => ColumnHeader::new("Spells", "The name, tech level and notes of the spell"),
            },
            SpellColumn::College => ColumnHeader::new("College", "The college(s) the spell belongs to"),
            SpellColumn::Resist => ColumnHeader::new("Resist", "The resistance roll, if any"),
            SpellColumn::Class => ColumnHeader::new("Class", "The class of the spell"),
            SpellColumn::CastingCost => ColumnHeader::new("Cost", "The casting cost of the spell"),
            SpellColumn::MaintenanceCost => ColumnHeader::new("Maintain", "The cost to maintain the spell"),
            SpellColumn::CastingTime => ColumnHeader::new("Time", "The time required to cast the spell"),
            SpellColumn::Duration => ColumnHeader::new("Duration", "The duration of the spell once it is cast"),
            SpellColumn::Difficulty => ColumnHeader::new("Diff", "The difficulty of learning the spell"),
            SpellColumn::Level => ColumnHeader::new("SL", "The spell level").aligned(Alignment::End),
            SpellColumn::RelativeLevel => ColumnHeader::new("RSL", "The relative spell level"),
            SpellColumn::Points => ColumnHeader::new("Pts", "The points spent in the spell").aligned(Alignment::End),
            SpellColumn::Tags => ColumnHeader::new("Tags", "The set of tags this spell has"),
            SpellColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "A reference to the book and page"),
        }
    }
}

pub static SPELL_COLUMNS: ColumnMapper<SpellColumn> = ColumnMapper::new(
    &[
        SpellColumn::Name,
        SpellColumn::College,
        SpellColumn::Resist,
        SpellColumn::Class,
        SpellColumn::CastingCost,
        SpellColumn::MaintenanceCost,
        SpellColumn::CastingTime,
        SpellColumn::Duration,
        SpellColumn::Difficulty,
        SpellColumn::Tags,
        SpellColumn::Reference,
    ],
    &[
        SpellColumn::Name,
        SpellColumn::Level,
        SpellColumn::RelativeLevel,
        SpellColumn::Points,
        SpellColumn::Reference,
    ],
);

impl Entity for Spell {
    type Column = SpellColumn;

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

    fn cell_data(&self, column: SpellColumn) -> CellData {
        match column {
            SpellColumn::Name => CellData::text(&self.name).with_secondary(self.secondary_text()),
            SpellColumn::College => CellData::text(self.college.join(", ")),
            SpellColumn::Resist => CellData::text(self.leaf_text(&self.resist)),
            SpellColumn::Class => CellData::text(self.leaf_text(&self.class)),
            SpellColumn::CastingCost => CellData::text(self.leaf_text(&self.casting_cost)),
            SpellColumn::MaintenanceCost => CellData::text(self.leaf_text(&self.maintenance_cost)),
            SpellColumn::CastingTime => CellData::text(self.leaf_text(&self.casting_time)),
            SpellColumn::Duration => CellData::text(self.leaf_text(&self.duration)),
            SpellColumn::Difficulty => CellData::text(self.leaf_text(&self.difficulty.to_string())),
            SpellColumn::Level => CellData::number(self.level_text()),
            SpellColumn::RelativeLevel => CellData::text(self.relative_level_text()),
            SpellColumn::Points => CellData::number(self.total_points().to_string()),
            SpellColumn::Tags => CellData::text(format_tags(&self.tags)),
            SpellColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

impl Kind for Spell {
    fn mapper() -> &'static ColumnMapper<SpellColumn> {
        &SPELL_COLUMNS
    }

    fn variants() -> &'static [ItemVariant] {
        &[ItemVariant::Item, ItemVariant::Container, ItemVariant::Alternate]
    }

    fn variant_label(variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Item => "New Spell",
            ItemVariant::Container => "New Spell Container",
            ItemVariant::Alternate => "New Ritual Magic Spell",
        }
    }

    fn new_item(variant: ItemVariant) -> Option<Self> {
        Some(match variant {
            ItemVariant::Item => Spell::new("Spell"),
            ItemVariant::Container => Spell::container("Spell Container", Vec::new()),
            ItemVariant::Alternate => Spell::ritual_magic("Ritual Magic Spell", "Ritual Magic"),
        })
    }
}

pub type SpellProvider = ListProvider<Spell>;
