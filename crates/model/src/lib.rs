// Character data: one entity kind per list, each with its columns and provider

pub mod common;
pub mod equipment;
pub mod library;
pub mod modifier;
pub mod note;
pub mod provider;
pub mod skill;
pub mod spell;
pub mod traits;

pub use equipment::{Equipment, EquipmentColumn, EquipmentProvider};
pub use library::{EntryKind, LibraryColumn, LibraryEntry, LibraryProvider, ListKind};
pub use modifier::{CostType, ModifierColumn, TraitModifier, TraitModifierProvider};
pub use note::{Note, NoteColumn, NoteProvider};
pub use provider::{Kind, ListProvider};
pub use skill::{Difficulty, DifficultyLevel, Skill, SkillColumn, SkillKind, SkillProvider};
pub use spell::{Spell, SpellColumn, SpellKind, SpellProvider};
pub use traits::{Trait, TraitColumn, TraitProvider};
