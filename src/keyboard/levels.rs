use serde::{Deserialize, Serialize};

use crate::error::{TutorError, TutorResult};

/// Highest level with its own character set. Level 7 is "all words".
pub const LEVEL_COUNT: u8 = 7;

/// UI-only alias for full sentence mode; filters like level 7.
pub const SENTENCE_LEVEL: u8 = 8;

/// Map a selectable level onto the level whose character set it uses.
pub fn charset_level(level: u8) -> u8 {
    if level == SENTENCE_LEVEL {
        LEVEL_COUNT
    } else {
        level
    }
}

// Each entry lists only the characters newly introduced at that level.
// Cumulative sets are built by the consumer.
const COLEMAK: [&str; 7] = ["arstneio", "dh", "fplu", "wgjy", "cvkm", "bqxz", ""];
const COLEMAK_DH: [&str; 7] = ["arstneio", "gm", "fplu", "wbjy", "cdvkh", "qxz", ""];
const QWERTY: [&str; 7] = ["asdfjkl", "ghru", "eiwo", "tyqp", "vbnm", "zxc", ""];
const DVORAK: [&str; 7] = ["aoeuhtns", "id", "pgcr", "yfl", "jkbm", "qxwvz", ""];
const WORKMAN: [&str; 7] = ["ashtneoi", "gy", "drup", "wbjf", "mcvkl", "qzx", ""];

const BUILTIN_LAYOUTS: &[(&str, [&str; 7])] = &[
    ("colemak", COLEMAK),
    ("colemakdh", COLEMAK_DH),
    ("qwerty", QWERTY),
    ("dvorak", DVORAK),
    ("workman", WORKMAN),
    ("custom", QWERTY),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutLevels {
    pub name: String,
    pub levels: Vec<String>,
}

/// Read-only layout -> level -> characters table, loaded once per session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelRegistry {
    layouts: Vec<LayoutLevels>,
}

impl LevelRegistry {
    pub fn empty() -> Self {
        Self {
            layouts: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        let layouts = BUILTIN_LAYOUTS
            .iter()
            .map(|(name, levels)| LayoutLevels {
                name: name.to_string(),
                levels: levels.iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        Self { layouts }
    }

    /// Builtin registry with the `custom` entry replaced.
    pub fn with_custom(levels: Vec<String>) -> Self {
        let mut registry = Self::builtin();
        registry.insert("custom", levels);
        registry
    }

    /// Add a layout, or replace an existing one of the same name.
    pub fn insert(&mut self, name: &str, levels: Vec<String>) {
        match self.layouts.iter_mut().find(|l| l.name == name) {
            Some(existing) => existing.levels = levels,
            None => self.layouts.push(LayoutLevels {
                name: name.to_string(),
                levels,
            }),
        }
    }

    pub fn layouts(&self) -> Vec<&str> {
        self.layouts.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn contains(&self, layout: &str) -> bool {
        self.layouts.iter().any(|l| l.name == layout)
    }

    /// Layout after `current` in registry order, wrapping around.
    pub fn next_layout(&self, current: &str) -> Option<&str> {
        let idx = self.layouts.iter().position(|l| l.name == current)?;
        let next = (idx + 1) % self.layouts.len();
        Some(self.layouts[next].name.as_str())
    }

    pub fn prev_layout(&self, current: &str) -> Option<&str> {
        let idx = self.layouts.iter().position(|l| l.name == current)?;
        let prev = if idx == 0 {
            self.layouts.len() - 1
        } else {
            idx - 1
        };
        Some(self.layouts[prev].name.as_str())
    }

    /// Characters introduced at exactly `level`.
    pub fn level_characters(&self, layout: &str, level: u8) -> TutorResult<&str> {
        let entry = self
            .layouts
            .iter()
            .find(|l| l.name == layout)
            .ok_or_else(|| TutorError::UnknownLayout(layout.to_string()))?;

        let unknown = || TutorError::UnknownLevel {
            layout: layout.to_string(),
            level,
        };
        if level == 0 || level > SENTENCE_LEVEL {
            return Err(unknown());
        }
        let idx = (charset_level(level) - 1) as usize;
        entry.levels.get(idx).map(|s| s.as_str()).ok_or_else(unknown)
    }

    /// Union of levels 1..=level, in introduction order. Fails on the first
    /// level that cannot be looked up.
    pub fn cumulative_characters(&self, layout: &str, level: u8) -> TutorResult<String> {
        if level == 0 {
            return Err(TutorError::UnknownLevel {
                layout: layout.to_string(),
                level,
            });
        }
        let mut chars = String::new();
        for lvl in 1..=charset_level(level) {
            chars.push_str(self.level_characters(layout, lvl)?);
        }
        Ok(chars)
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
