use crate::schema::{Arcana, Card, TarotCard};

const MAJOR_ARCANA: [(&str, &str); 22] = [
    ("The Fool", "愚者"),
    ("The Magician", "魔術師"),
    ("The High Priestess", "女祭司"),
    ("The Empress", "皇后"),
    ("The Emperor", "皇帝"),
    ("The Hierophant", "教皇"),
    ("The Lovers", "戀人"),
    ("The Chariot", "戰車"),
    ("Strength", "力量"),
    ("The Hermit", "隱士"),
    ("Wheel of Fortune", "命運之輪"),
    ("Justice", "正義"),
    ("The Hanged Man", "吊人"),
    ("Death", "死神"),
    ("Temperance", "節制"),
    ("The Devil", "惡魔"),
    ("The Tower", "高塔"),
    ("The Star", "星星"),
    ("The Moon", "月亮"),
    ("The Sun", "太陽"),
    ("Judgement", "審判"),
    ("The World", "世界"),
];

const SUITS: [(&str, &str); 4] = [
    ("Wands", "權杖"),
    ("Cups", "聖杯"),
    ("Swords", "寶劍"),
    ("Pentacles", "錢幣"),
];

const RANKS: [(&str, &str); 14] = [
    ("Ace", "A"),
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "6"),
    ("7", "7"),
    ("8", "8"),
    ("9", "9"),
    ("10", "10"),
    ("Page", "侍者"),
    ("Knight", "騎士"),
    ("Queen", "皇后"),
    ("King", "國王"),
];

pub const TAROT_DECK_SIZE: usize = 78;

/// The 78-card tarot: major arcana first, then each suit Ace..King.
pub fn tarot_deck() -> Vec<TarotCard> {
    let mut deck = Vec::with_capacity(TAROT_DECK_SIZE);
    let mut next_id = 0u32;
    for (en, name) in MAJOR_ARCANA {
        deck.push(TarotCard {
            id: next_id,
            name: name.to_string(),
            en: en.to_string(),
            arcana: Arcana::Major,
        });
        next_id += 1;
    }
    for (suit_en, suit_zh) in SUITS {
        for (rank_en, rank_zh) in RANKS {
            deck.push(TarotCard {
                id: next_id,
                name: format!("{suit_zh} {rank_zh}"),
                en: format!("{rank_en} of {suit_en}"),
                arcana: Arcana::Minor,
            });
            next_id += 1;
        }
    }
    deck
}

pub fn tarot_cards() -> Vec<Card> {
    tarot_deck().iter().map(TarotCard::to_card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_full_deck_with_sequential_ids() {
        let deck = tarot_deck();
        assert_eq!(deck.len(), TAROT_DECK_SIZE);
        assert!(deck.iter().enumerate().all(|(idx, card)| card.id == idx as u32));
        assert_eq!(deck.iter().filter(|card| card.arcana == Arcana::Major).count(), 22);
    }

    #[test]
    fn names_follow_suit_then_rank() {
        let deck = tarot_deck();
        assert_eq!(deck[0].name, "愚者");
        assert_eq!(deck[21].en, "The World");
        assert_eq!(deck[22].name, "權杖 A");
        assert_eq!(deck[22].en, "Ace of Wands");
        assert_eq!(deck[77].name, "錢幣 國王");
        assert_eq!(deck[77].en, "King of Pentacles");
    }

    #[test]
    fn serializes_with_type_field() {
        let body = serde_json::to_string(&tarot_deck()[0]).expect("json");
        assert!(body.contains(r#""type":"major""#));
    }
}
