use std::collections::BTreeSet;

use banpick_roster::{find, Character, ROSTER};

const COLUMNS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("there is no character with id {0}")]
    Unknown(u8),
    #[error("character {0} is banned")]
    Disabled(u8),
}

/// Selection-screen state: the current ban set plus what the player is
/// pointing at or has picked.
#[derive(Debug, Default)]
pub struct Board {
    disabled: BTreeSet<u8>,
    selected: Option<u8>,
    hovered: Option<u8>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the ban set wholesale. A pick already made stays picked.
    pub fn set_disabled(&mut self, disabled: BTreeSet<u8>) {
        self.disabled = disabled;
        if self.hovered.is_some_and(|id| self.disabled.contains(&id)) {
            self.hovered = None;
        }
    }

    pub fn is_disabled(&self, id: u8) -> bool {
        self.disabled.contains(&id)
    }

    pub fn disabled(&self) -> &BTreeSet<u8> {
        &self.disabled
    }

    pub fn select(&mut self, id: u8) -> Result<&'static Character, SelectError> {
        let character = find(id).ok_or(SelectError::Unknown(id))?;
        if self.is_disabled(id) {
            return Err(SelectError::Disabled(id));
        }
        self.selected = Some(id);
        Ok(character)
    }

    pub fn selected(&self) -> Option<&'static Character> {
        self.selected.and_then(find)
    }

    pub fn hover(&mut self, id: u8) -> bool {
        if find(id).is_none() || self.is_disabled(id) {
            return false;
        }
        self.hovered = Some(id);
        true
    }

    pub fn hovered(&self) -> Option<u8> {
        self.hovered
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    pub fn back(&mut self) {
        self.selected = None;
    }

    /// One line per roster row, or the detail view when a pick is made.
    /// Every line ends in a newline.
    pub fn render(&self) -> String {
        let lines: Vec<String> = match self.selected() {
            Some(character) => vec![
                character.name.clone(),
                format!(
                    "  class: {}  rarity: {:?}",
                    character.class, character.rarity
                ),
                format!("  art: {}", character.large_image),
                "(back) to return to the roster".to_owned(),
            ],
            None => ROSTER
                .chunks(COLUMNS)
                .map(|row| {
                    row.iter()
                        .map(|c| self.render_cell(c))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .chain([format!("{} banned", self.disabled.len())])
                .collect(),
        };

        lines.into_iter().map(|line| line + "\n").collect()
    }

    fn render_cell(&self, character: &Character) -> String {
        if self.is_disabled(character.id) {
            format!("[{:>2} ######]", character.id)
        } else {
            format!("[{:>2} {:<6}]", character.id, character.class)
        }
    }
}
