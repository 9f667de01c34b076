use std::collections::BTreeSet;

use crate::engine::settings::Settings;
use crate::error::TutorResult;
use crate::keyboard::levels::LevelRegistry;

/// Legal and required characters for one (layout, level, settings) triple.
/// Recomputed on every change; it is a handful of short strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Charset {
    pub legal: BTreeSet<char>,
    pub required: BTreeSet<char>,
}

impl Charset {
    pub fn for_level(
        registry: &LevelRegistry,
        layout: &str,
        level: u8,
        settings: &Settings,
    ) -> TutorResult<Self> {
        let cumulative = registry.cumulative_characters(layout, level)?;
        let introduced = registry.level_characters(layout, level)?;
        let allow_capitals = !settings.only_lowercase;

        let mut legal: BTreeSet<char> = cumulative.chars().collect();
        // Capitals only widen what is legal; the rotation stays on the
        // letters the level introduces.
        let mut required: BTreeSet<char> = introduced.chars().collect();

        if allow_capitals {
            legal.extend(uppercase_variants(&cumulative));
        }

        legal.extend(settings.punctuation.chars());
        required.extend(settings.punctuation.chars());

        Ok(Self { legal, required })
    }

    pub fn is_empty(&self) -> bool {
        self.legal.is_empty()
    }

    pub fn legal_chars(&self) -> Vec<char> {
        self.legal.iter().copied().collect()
    }

    pub fn required_chars(&self) -> Vec<char> {
        self.required.iter().copied().collect()
    }
}

fn uppercase_variants(chars: &str) -> impl Iterator<Item = char> + '_ {
    chars
        .chars()
        .filter(|c| c.is_lowercase())
        .flat_map(|c| c.to_uppercase())
}
