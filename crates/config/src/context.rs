//! Every settings kind, loaded together from one directory and passed to
//! whoever needs it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};

use crate::colors::{self, ThemeColors, ThemedColor};
use crate::error::ConfigError;
use crate::fonts::{self, FontDescriptor, Fonts};
use crate::keybindings::{self, KeyBindings, KeyChord};
use crate::overridable::{ApplyTarget, KeyPolicy, OverridableSet};
use crate::page_refs::{self, PageRefs};
use crate::persistence::default_config_dir;
use crate::settings::{self, Settings};
use crate::window_positions::{self, WindowPositions};

#[derive(Debug, Clone)]
pub struct SettingsContext {
    dir: PathBuf,
    pub general: Settings,
    pub keys: KeyBindings,
    pub colors: ThemeColors,
    pub fonts: Fonts,
    pub page_refs: PageRefs,
    pub window_positions: WindowPositions,
    /// File names whose load failed; `save` leaves those files alone
    failed: BTreeSet<&'static str>,
}

impl SettingsContext {
    /// All-default settings rooted at `dir`; nothing is read
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            general: Settings::default(),
            keys: keybindings::default_bindings(),
            colors: colors::default_colors(),
            fonts: fonts::default_fonts(),
            page_refs: page_refs::empty_page_refs(),
            window_positions: window_positions::empty_window_positions(),
            failed: BTreeSet::new(),
        }
    }

    /// Load every file under `dir`. A bad file leaves its kind at the
    /// defaults and adds to the returned error list; the rest still load.
    pub fn load(dir: &Path) -> (Self, Vec<ConfigError>) {
        let mut errors = Vec::new();
        let mut failed = BTreeSet::new();
        let mut note = |file_name: &'static str, err: Option<ConfigError>| {
            if let Some(err) = err {
                failed.insert(file_name);
                errors.push(err);
            }
        };

        let (general, err) = Settings::load(&dir.join(settings::FILE_NAME));
        note(settings::FILE_NAME, err);
        let (keys, err) = OverridableSet::load(keybindings::factory(), KeyPolicy::Closed, &dir.join(keybindings::FILE_NAME));
        note(keybindings::FILE_NAME, err);
        let (colors, err) = OverridableSet::load(colors::factory(), KeyPolicy::Closed, &dir.join(colors::FILE_NAME));
        note(colors::FILE_NAME, err);
        let (fonts, err) = OverridableSet::load(fonts::factory(), KeyPolicy::Closed, &dir.join(fonts::FILE_NAME));
        note(fonts::FILE_NAME, err);
        let (page_refs, err) = OverridableSet::load(
            page_refs::factory(),
            KeyPolicy::Open,
            &dir.join(page_refs::FILE_NAME),
        );
        note(page_refs::FILE_NAME, err);
        let (window_positions, err) = OverridableSet::load(
            window_positions::factory(),
            KeyPolicy::Open,
            &dir.join(window_positions::FILE_NAME),
        );
        note(window_positions::FILE_NAME, err);

        log::debug!("loaded settings from {} ({} errors)", dir.display(), errors.len());
        (
            Self {
                dir: dir.to_path_buf(),
                general,
                keys,
                colors,
                fonts,
                page_refs,
                window_positions,
                failed,
            },
            errors,
        )
    }

    /// Load from the platform config directory
    pub fn load_default() -> (Self, Vec<ConfigError>) {
        Self::load(&default_config_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Whether `file_name` failed to load and is being left untouched
    pub fn load_failed(&self, file_name: &str) -> bool {
        self.failed.contains(file_name)
    }

    /// Let the next `save` overwrite `file_name` even though it failed to
    /// load. Call this after an explicit reset of that kind.
    pub fn forget_failure(&mut self, file_name: &str) {
        self.failed.remove(file_name);
    }

    /// Write every kind except those that failed to load. Stale window
    /// positions are pruned first. Stops at the first failure.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match Duration::try_days(self.general.window_position_max_age_days) {
            Some(max_age) => {
                window_positions::prune(&mut self.window_positions, max_age, Utc::now());
            }
            None => log::warn!(
                "not pruning window positions: max age of {} days is out of range",
                self.general.window_position_max_age_days
            ),
        }

        if self.writable(settings::FILE_NAME) {
            self.general.save(&self.path(settings::FILE_NAME))?;
        }
        if self.writable(keybindings::FILE_NAME) {
            self.keys.save(&self.path(keybindings::FILE_NAME))?;
        }
        if self.writable(colors::FILE_NAME) {
            self.colors.save(&self.path(colors::FILE_NAME))?;
        }
        if self.writable(fonts::FILE_NAME) {
            self.fonts.save(&self.path(fonts::FILE_NAME))?;
        }
        if self.writable(page_refs::FILE_NAME) {
            self.page_refs.save(&self.path(page_refs::FILE_NAME))?;
        }
        if self.writable(window_positions::FILE_NAME) {
            self.window_positions.save(&self.path(window_positions::FILE_NAME))?;
        }
        Ok(())
    }

    fn writable(&self, file_name: &str) -> bool {
        if self.load_failed(file_name) {
            log::warn!("not saving {file_name}: it failed to load; fix or remove it");
            return false;
        }
        true
    }

    /// Push keys, colors and fonts into the live UI
    pub fn apply<T>(&self, target: &mut T)
    where
        T: ApplyTarget<Option<KeyChord>> + ApplyTarget<ThemedColor> + ApplyTarget<FontDescriptor>,
    {
        self.keys.apply(target);
        self.colors.apply(target);
        self.fonts.apply(target);
    }
}
