use serde::{Deserialize, Serialize};

pub use arcana_core::{Card, Deck, DrawConfig};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Minor,
}

/// Deck record as served by `/api/deck`. The core only reads `id` and `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TarotCard {
    pub id: u32,
    pub name: String,
    pub en: String,
    #[serde(rename = "type")]
    pub arcana: Arcana,
}

impl TarotCard {
    pub fn to_card(&self) -> Card {
        Card::new(self.id, self.name.clone())
    }
}
