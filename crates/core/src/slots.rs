use crate::{Card, DrawConfig, DrawError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlotPhase {
    Empty,
    Flying,
    Seated,
    Flipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub occupant: Option<Card>,
    pub phase: SlotPhase,
    /// Fraction of the slot height the slot is lifted by.
    #[serde(default)]
    pub raise: f64,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn label(&self) -> String {
        format!("Card {}", self.index + 1)
    }
}

/// Fixed-capacity, fill-once slots. Occupancy only grows until `reset`.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
    extremal_raise: f64,
}

impl SlotRegistry {
    pub fn new(capacity: usize) -> Self {
        let mut registry = Self::default();
        registry.reset(capacity);
        registry
    }

    pub fn with_config(config: &DrawConfig) -> Self {
        let mut registry = Self {
            slots: Vec::new(),
            extremal_raise: config.extremal_slot_raise,
        };
        registry.reset(config.max_selection);
        registry
    }

    /// Empties every slot. The first and last slot of the new row keep the
    /// registry's extremal raise.
    pub fn reset(&mut self, capacity: usize) {
        let raise = self.extremal_raise;
        self.slots = (0..capacity)
            .map(|index| Slot {
                index,
                occupant: None,
                phase: SlotPhase::Empty,
                raise: if index == 0 || index + 1 == capacity {
                    raise
                } else {
                    0.0
                },
            })
            .collect();
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn holds(&self, card_id: u32) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.occupant.as_ref().map(|card| card.id) == Some(card_id))
    }

    /// Seats `card` in the lowest empty slot and marks it in flight.
    pub fn assign_next(&mut self, card: Card) -> Result<&Slot, DrawError> {
        if self.holds(card.id) {
            return Err(DrawError::AlreadySeated(card.id));
        }
        let capacity = self.capacity();
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_empty())
            .ok_or(DrawError::SlotsFull { capacity })?;
        slot.occupant = Some(card);
        slot.phase = SlotPhase::Flying;
        Ok(&*slot)
    }

    pub fn slot_at(&self, index: usize) -> Result<&Slot, DrawError> {
        self.slots.get(index).ok_or(DrawError::SlotOutOfRange(index))
    }

    /// Moves an occupied slot forward to `phase`. Never moves backwards and
    /// never touches empty slots.
    pub(crate) fn advance_phase(&mut self, index: usize, phase: SlotPhase) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if !slot.is_empty() && phase > slot.phase => {
                slot.phase = phase;
                true
            }
            _ => false,
        }
    }

    /// Top padding hint for the slot row, present when any slot is raised.
    pub fn padding_hint(&self, config: &DrawConfig) -> Option<f64> {
        self.slots
            .iter()
            .any(|slot| slot.raise > 0.0)
            .then_some(config.slot_area_padding_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_in_index_order_until_full() {
        let mut registry = SlotRegistry::new(2);
        assert_eq!(registry.assign_next(Card::new(4, "a")).expect("slot").index, 0);
        assert_eq!(registry.assign_next(Card::new(9, "b")).expect("slot").index, 1);
        let err = registry.assign_next(Card::new(1, "c")).expect_err("full");
        assert_eq!(err, DrawError::SlotsFull { capacity: 2 });
        assert_eq!(registry.filled(), 2);
    }

    #[test]
    fn refuses_the_same_card_twice() {
        let mut registry = SlotRegistry::new(3);
        registry.assign_next(Card::new(4, "a")).expect("slot");
        let err = registry.assign_next(Card::new(4, "a")).expect_err("dup");
        assert_eq!(err, DrawError::AlreadySeated(4));
        assert_eq!(registry.filled(), 1);
    }

    #[test]
    fn phases_only_move_forward() {
        let mut registry = SlotRegistry::new(2);
        registry.assign_next(Card::new(1, "a")).expect("slot");
        assert!(registry.advance_phase(0, SlotPhase::Flipped));
        assert!(!registry.advance_phase(0, SlotPhase::Seated));
        assert!(!registry.advance_phase(1, SlotPhase::Seated));
        assert_eq!(registry.slot_at(0).expect("slot").phase, SlotPhase::Flipped);
        assert_eq!(registry.slot_at(1).expect("slot").phase, SlotPhase::Empty);
        assert_eq!(registry.slot_at(2), Err(DrawError::SlotOutOfRange(2)));
    }

    #[test]
    fn reset_empties_everything() {
        let mut registry = SlotRegistry::with_config(&DrawConfig::default());
        registry.assign_next(Card::new(1, "a")).expect("slot");
        registry.reset(5);
        assert_eq!(registry.filled(), 0);
        assert!(registry.slots().iter().all(|slot| slot.phase == SlotPhase::Empty));
    }

    #[test]
    fn reset_keeps_the_end_slots_raised() {
        let config = DrawConfig::default();
        let mut registry = SlotRegistry::with_config(&config);
        registry.assign_next(Card::new(1, "a")).expect("slot");
        registry.reset(config.max_selection);
        let raises: Vec<f64> = registry.slots().iter().map(|slot| slot.raise).collect();
        assert_eq!(raises, vec![0.30, 0.0, 0.0, 0.0, 0.30]);
        assert_eq!(registry.padding_hint(&config), Some(60.0));

        registry.reset(3);
        let raises: Vec<f64> = registry.slots().iter().map(|slot| slot.raise).collect();
        assert_eq!(raises, vec![0.30, 0.0, 0.30]);
    }

    #[test]
    fn padding_hint_follows_raised_slots() {
        let config = DrawConfig::default();
        assert_eq!(SlotRegistry::with_config(&config).padding_hint(&config), Some(60.0));
        assert_eq!(SlotRegistry::new(5).padding_hint(&config), None);
        assert_eq!(SlotRegistry::with_config(&config).slots()[0].label(), "Card 1");
    }
}
