// Settings: factory defaults plus user overrides, one JSON file per kind

pub mod colors;
pub mod context;
pub mod error;
pub mod fonts;
pub mod keybindings;
pub mod overridable;
pub mod page_refs;
pub mod persistence;
pub mod recent_files;
pub mod settings;
pub mod window_positions;

pub use colors::{Appearance, Color, Palette, ThemeColors, ThemedColor};
pub use context::SettingsContext;
pub use error::ConfigError;
pub use fonts::{FontDescriptor, Fonts};
pub use keybindings::{KeyBindings, KeyChord};
pub use overridable::{ApplyTarget, KeyPolicy, OverridableSet};
pub use page_refs::{PageRef, PageRefs, Resolution};
pub use recent_files::RecentFiles;
pub use settings::Settings;
pub use window_positions::{WindowPosition, WindowPositions};
