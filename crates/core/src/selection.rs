use crate::{
    layout_with_curvature, AnimationSequencer, Card, Departure, DrawConfig, DrawError, Event,
    EventBus, Placement, Slot, SlotRegistry, Viewport,
};
use serde::{Deserialize, Serialize};

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpreadState {
    Spread,
    Selected,
}

/// One card of the fan for the current draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpreadCard {
    pub card: Card,
    pub arc_index: usize,
    pub angle: f64,
    pub vertical_offset: f64,
    pub state: SpreadState,
    /// Set once the deal has moved the card from the origin into the fan.
    #[serde(default)]
    pub placed: bool,
}

impl SpreadCard {
    pub fn is_selected(&self) -> bool {
        self.state == SpreadState::Selected
    }
}

/// State of one draw cycle: the fan, the slots and the running count.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    id: SessionId,
    spread: Vec<SpreadCard>,
    slots: SlotRegistry,
    selected_count: usize,
}

impl SelectionSession {
    pub fn new(id: SessionId, shuffled: Vec<Card>, config: &DrawConfig) -> Self {
        let positions = layout_with_curvature(shuffled.len(), config.arc_width_deg, config.curvature);
        let spread = shuffled
            .into_iter()
            .zip(positions)
            .enumerate()
            .map(|(arc_index, (card, position))| SpreadCard {
                card,
                arc_index,
                angle: position.angle_deg,
                vertical_offset: position.vertical_offset,
                state: SpreadState::Spread,
                placed: false,
            })
            .collect();
        Self {
            id,
            spread,
            slots: SlotRegistry::with_config(config),
            selected_count: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn spread(&self) -> &[SpreadCard] {
        &self.spread
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    pub fn max_selection(&self) -> usize {
        self.slots.capacity()
    }

    pub fn is_complete(&self) -> bool {
        self.selected_count >= self.max_selection()
    }

    pub fn spread_card(&self, card_id: u32) -> Option<&SpreadCard> {
        self.spread.iter().find(|item| item.card.id == card_id)
    }

    /// Cards in the order they were accepted.
    pub fn selected_cards(&self) -> Vec<&Card> {
        self.slots
            .slots()
            .iter()
            .filter_map(|slot| slot.occupant.as_ref())
            .collect()
    }

    pub(crate) fn slots_mut(&mut self) -> &mut SlotRegistry {
        &mut self.slots
    }

    pub(crate) fn mark_placed(&mut self, arc_index: usize) -> Option<&SpreadCard> {
        let item = self.spread.get_mut(arc_index)?;
        item.placed = true;
        Some(&*item)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectOutcome {
    Accepted { slot: usize },
    AtCapacity,
    AlreadySelected,
    UnknownCard,
}

impl SelectOutcome {
    pub fn accepted(self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// "Card X was clicked", resolved against the current session by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardClick {
    pub card_id: u32,
    pub now_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    config: DrawConfig,
}

impl SelectionController {
    pub fn new(config: DrawConfig) -> Self {
        Self { config }
    }

    /// Applies one click. Capacity and re-clicks are ordinary no-op outcomes;
    /// an `Err` means the count and the slot registry disagree.
    pub fn handle_click(
        &self,
        session: &mut SelectionSession,
        sequencer: &mut AnimationSequencer,
        click: CardClick,
        viewport: &dyn Viewport,
        events: &mut EventBus,
    ) -> Result<SelectOutcome, DrawError> {
        if session.selected_count >= session.max_selection() {
            return Ok(SelectOutcome::AtCapacity);
        }
        let Some(pos) = session
            .spread
            .iter()
            .position(|item| item.card.id == click.card_id)
        else {
            return Ok(SelectOutcome::UnknownCard);
        };
        if session.spread[pos].is_selected() {
            return Ok(SelectOutcome::AlreadySelected);
        }

        session.spread[pos].state = SpreadState::Selected;
        let card = session.spread[pos].card.clone();
        let slot: Slot = match session.slots.assign_next(card.clone()) {
            Ok(slot) => slot.clone(),
            Err(err) => {
                session.spread[pos].state = SpreadState::Spread;
                let detail = format!(
                    "slot assignment failed for card {} with {} selected: {err}",
                    card.id, session.selected_count
                );
                log::error!("{detail}");
                events.push(Event::InvariantViolation { detail });
                return Err(err);
            }
        };
        session.selected_count += 1;

        let source = &session.spread[pos];
        let from = Placement::departure(viewport.spread_card_rect(source), source);
        let to = Placement::slot_center(
            viewport.slot_rect(&slot, session.max_selection()),
            &self.config,
        );
        sequencer.depart(
            Departure {
                session: session.id,
                card_id: card.id,
                slot: slot.index,
                from,
                to,
            },
            click.now_ms,
        );
        events.push(Event::CardSelected {
            card_id: card.id,
            slot: slot.index,
            selected: session.selected_count,
        });
        Ok(SelectOutcome::Accepted { slot: slot.index })
    }
}
