use once_cell::sync::Lazy;

pub const ROSTER_SIZE: usize = 24;

const CLASSES: [&str; 5] = ["Warrior", "Mage", "Archer", "Priest", "Thief"];
const RARITIES: [Rarity; 4] = [
    Rarity::Common,
    Rarity::Rare,
    Rarity::Epic,
    Rarity::Legendary,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Character {
    pub id: u8,
    pub name: String,
    pub class: &'static str,
    pub rarity: Rarity,
    pub image: String,
    pub large_image: String,
    pub name_image: String,
}

impl Character {
    fn new(id: u8) -> Self {
        let index = usize::from(id - 1);
        Character {
            id,
            name: format!("Character {id}"),
            class: CLASSES[index % CLASSES.len()],
            rarity: RARITIES[index % RARITIES.len()],
            image: format!("/characters/character{id}.png"),
            large_image: format!("/characters/large/character{id}_large.png"),
            name_image: format!("/characters/names/character{id}_name.png"),
        }
    }

    /// Generated stand-in image served by the placeholder endpoint.
    pub fn placeholder_url(&self, width: u32, height: u32) -> String {
        format!(
            "/api/placeholder/{width}/{height}?text=Chara%20{id}",
            id = self.id
        )
    }
}

pub static ROSTER: Lazy<Vec<Character>> =
    Lazy::new(|| (1..=ROSTER_SIZE as u8).map(Character::new).collect());

pub fn find(id: u8) -> Option<&'static Character> {
    ROSTER.iter().find(|character| character.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_has_sequential_ids() {
        let ids: Vec<u8> = ROSTER.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=24).collect::<Vec<u8>>());
    }

    #[test]
    fn classes_and_rarities_cycle() {
        let sixth = find(6).unwrap();
        assert_eq!(sixth.class, "Warrior");
        assert_eq!(sixth.rarity, Rarity::Rare);
        assert_eq!(find(4).unwrap().rarity, Rarity::Legendary);
        assert_eq!(find(5).unwrap().class, "Thief");
    }

    #[test]
    fn image_paths_follow_layout() {
        let c = find(12).unwrap();
        assert_eq!(c.name, "Character 12");
        assert_eq!(c.image, "/characters/character12.png");
        assert_eq!(c.large_image, "/characters/large/character12_large.png");
        assert_eq!(c.name_image, "/characters/names/character12_name.png");
        assert_eq!(
            c.placeholder_url(120, 120),
            "/api/placeholder/120/120?text=Chara%2012"
        );
    }

    #[test]
    fn unknown_ids_are_absent() {
        assert!(find(0).is_none());
        assert!(find(25).is_none());
    }
}
