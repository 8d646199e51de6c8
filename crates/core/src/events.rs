use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    DeckLoaded { cards: usize },
    DeckLoadFailed { reason: String },
    DrawStarted {
        session: u64,
        cards: usize,
        slots: usize,
    },
    CardSelected {
        card_id: u32,
        slot: usize,
        selected: usize,
    },
    CardSeated { card_id: u32, slot: usize },
    CardRevealed { card_id: u32, slot: usize },
    CardTurned { slot: usize, face_up: bool },
    InvariantViolation { detail: String },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
