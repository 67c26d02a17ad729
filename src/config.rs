use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::snake::Cell;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true when both dimensions are non-zero.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Default board width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Default head position for a fresh game.
pub const DEFAULT_START: Cell = Cell { x: 10, y: 10 };

/// Simulation cadence in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Paint cadence in milliseconds, independent of the simulation cadence.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Random probes before food placement falls back to enumerating free cells.
pub const FOOD_SAMPLE_ATTEMPTS: usize = 32;

/// Colors applied to the board and HUD.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake on black, red food.
pub const THEME_CLASSIC: Theme = Theme {
    name: "classic",
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::White,
    hud_score: Color::White,
    menu_title: Color::Red,
    menu_footer: Color::DarkGray,
};

/// Ocean cyan theme.
pub const THEME_OCEAN: Theme = Theme {
    name: "ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    food: Color::Yellow,
    play_bg: Color::Black,
    border_fg: Color::Cyan,
    hud_score: Color::Cyan,
    menu_title: Color::Cyan,
    menu_footer: Color::DarkGray,
};

/// Neon magenta/yellow theme.
pub const THEME_NEON: Theme = Theme {
    name: "neon",
    snake_head: Color::White,
    snake_body: Color::Magenta,
    food: Color::Yellow,
    play_bg: Color::Black,
    border_fg: Color::Magenta,
    hud_score: Color::Magenta,
    menu_title: Color::Magenta,
    menu_footer: Color::DarkGray,
};

/// All available themes.
pub const THEMES: &[Theme] = &[THEME_CLASSIC, THEME_OCEAN, THEME_NEON];

/// Looks up a theme by its case-insensitive name.
#[must_use]
pub fn theme_by_name(name: &str) -> Option<&'static Theme> {
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(name))
}

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

pub const GLYPH_SNAKE_HEAD: &str = "■";
pub const GLYPH_SNAKE_BODY: &str = "▪";
pub const GLYPH_FOOD: &str = "●";
pub const GLYPH_TABLE_SEPARATOR: &str = "│";

/// Session settings after layering defaults, the config file and CLI flags.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub start_x: i32,
    pub start_y: i32,
    pub tick_ms: u64,
    pub seed: Option<u64>,
    pub theme: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            start_x: DEFAULT_START.x,
            start_y: DEFAULT_START.y,
            tick_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: None,
            theme: THEME_CLASSIC.name.to_owned(),
        }
    }
}

/// Values supplied on the command line; `None` keeps the layered value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub start_x: Option<i32>,
    pub start_y: Option<i32>,
    pub tick_ms: Option<u64>,
    pub seed: Option<u64>,
    pub theme: Option<String>,
}

impl GameConfig {
    /// Loads the config file, falling back to defaults.
    ///
    /// An explicit path must exist. The default location is optional: a
    /// missing file there yields [`GameConfig::default`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses JSON config text. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Applies command-line overrides on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(start_x) = overrides.start_x {
            self.start_x = start_x;
        }
        if let Some(start_y) = overrides.start_y {
            self.start_y = start_y;
        }
        if let Some(tick_ms) = overrides.tick_ms {
            self.tick_ms = tick_ms;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        self
    }

    /// Rejects settings the engine or the driver cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = self.bounds();
        if !bounds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        if !self.start().is_within_bounds(bounds) {
            return Err(ConfigError::Invalid(format!(
                "start ({}, {}) is outside the {}x{} grid",
                self.start_x, self.start_y, self.width, self.height
            )));
        }

        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick interval must be at least 1 ms".to_owned(),
            ));
        }

        if theme_by_name(&self.theme).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown theme '{}'",
                self.theme
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        GridSize {
            width: self.width,
            height: self.height,
        }
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        Cell {
            x: self.start_x,
            y: self.start_y,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Returns the selected theme, or the classic one for an unknown name.
    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        theme_by_name(&self.theme).unwrap_or(&THEME_CLASSIC)
    }
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push("grid-snake.log");
    base
}

/// Creates the parent directory of `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
