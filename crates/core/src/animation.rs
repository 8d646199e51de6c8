//! Per-card timelines. Every step is scheduled at a fixed offset from the
//! moment the card departs, so timelines never depend on one another.

use crate::{
    DrawConfig, Event, EventBus, Placement, SelectionSession, SessionId, SlotPhase,
    SpreadTransform, VisualBus, VisualCommand,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimelineStep {
    Place { card_id: u32, arc_index: usize },
    Travel { slot: usize },
    Seat { slot: usize },
    Reveal { slot: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    NextFrame,
    At(u64),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    session: SessionId,
    seq: u64,
    trigger: Trigger,
    step: TimelineStep,
}

/// Everything captured when a selected card leaves the fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    pub session: SessionId,
    pub card_id: u32,
    pub slot: usize,
    pub from: Placement,
    pub to: Placement,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InFlightVisual {
    pub card_id: u32,
    pub slot: usize,
    pub from: Placement,
    pub to: Placement,
    pub departed_ms: u64,
    pub travel_started_ms: Option<u64>,
    pub travel_ms: u64,
}

impl InFlightVisual {
    pub fn placement_at(&self, now_ms: u64) -> Placement {
        let Some(start) = self.travel_started_ms else {
            return self.from;
        };
        if self.travel_ms == 0 {
            return self.to;
        }
        let t = now_ms.saturating_sub(start) as f64 / self.travel_ms as f64;
        self.from.lerp(self.to, t)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeatedVisual {
    pub card_id: u32,
    pub slot: usize,
    pub shown_ms: u64,
    pub fade_ms: u64,
    pub face_up: bool,
}

impl SeatedVisual {
    pub fn opacity_at(&self, now_ms: u64) -> f64 {
        if self.fade_ms == 0 {
            return 1.0;
        }
        (now_ms.saturating_sub(self.shown_ms) as f64 / self.fade_ms as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct AnimationSequencer {
    config: DrawConfig,
    session: Option<SessionId>,
    queue: Vec<Scheduled>,
    next_seq: u64,
    in_flight: BTreeMap<usize, InFlightVisual>,
    seated: BTreeMap<usize, SeatedVisual>,
    visuals: VisualBus,
}

impl AnimationSequencer {
    pub fn new(config: DrawConfig) -> Self {
        Self {
            config,
            session: None,
            queue: Vec::new(),
            next_seq: 0,
            in_flight: BTreeMap::new(),
            seated: BTreeMap::new(),
            visuals: VisualBus::default(),
        }
    }

    /// Switches to `session`: drops the old visuals, resets the slot row and
    /// schedules the staggered deal. Steps still queued for older sessions
    /// stay queued but are discarded when they come due.
    pub fn begin_session(&mut self, session: &SelectionSession, now_ms: u64) {
        self.session = Some(session.id());
        self.in_flight.clear();
        self.seated.clear();
        self.visuals.push(VisualCommand::SpreadCleared);
        self.visuals.push(VisualCommand::SlotsReset {
            capacity: session.max_selection(),
            padding_top_px: session.slots().padding_hint(&self.config),
        });
        for item in session.spread() {
            let due = now_ms + item.arc_index as u64 * self.config.deal_stagger_ms;
            self.schedule(
                session.id(),
                Trigger::At(due),
                TimelineStep::Place {
                    card_id: item.card.id,
                    arc_index: item.arc_index,
                },
            );
        }
    }

    /// Depart step: spawn the in-flight visual at the source and queue the
    /// rest of the timeline at fixed offsets from `now_ms`.
    pub fn depart(&mut self, departure: Departure, now_ms: u64) {
        let Departure {
            session,
            card_id,
            slot,
            from,
            to,
        } = departure;
        self.in_flight.insert(
            slot,
            InFlightVisual {
                card_id,
                slot,
                from,
                to,
                departed_ms: now_ms,
                travel_started_ms: None,
                travel_ms: self.config.travel_ms,
            },
        );
        self.visuals.push(VisualCommand::SpreadCardSelected { card_id });
        self.visuals.push(VisualCommand::InFlightSpawned {
            card_id,
            slot,
            at: from,
        });
        self.schedule(session, Trigger::NextFrame, TimelineStep::Travel { slot });
        self.schedule(
            session,
            Trigger::At(now_ms + self.config.travel_ms),
            TimelineStep::Seat { slot },
        );
        self.schedule(
            session,
            Trigger::At(now_ms + self.config.reveal_at_ms()),
            TimelineStep::Reveal { slot },
        );
    }

    /// One frame boundary: next-frame steps first, then timed steps due by
    /// `now_ms` in due order.
    pub fn advance(
        &mut self,
        now_ms: u64,
        selection: &mut SelectionSession,
        events: &mut EventBus,
    ) -> Vec<TimelineStep> {
        let pending = std::mem::take(&mut self.queue);
        let (mut ready, rest): (Vec<_>, Vec<_>) =
            pending.into_iter().partition(|item| match item.trigger {
                Trigger::NextFrame => true,
                Trigger::At(due) => due <= now_ms,
            });
        self.queue = rest;
        ready.sort_by_key(|item| match item.trigger {
            Trigger::NextFrame => (0, 0, item.seq),
            Trigger::At(due) => (1, due, item.seq),
        });

        let mut fired = Vec::with_capacity(ready.len());
        for item in ready {
            if Some(item.session) != self.session || item.session != selection.id() {
                log::debug!(
                    "dropping {:?} from superseded session {}",
                    item.step,
                    item.session
                );
                continue;
            }
            self.fire(item.step, now_ms, selection, events);
            fired.push(item.step);
        }
        fired
    }

    /// Face toggle for a revealed seated card. `None` until Reveal has run.
    pub fn toggle_face(&mut self, slot: usize, selection: &SelectionSession) -> Option<bool> {
        let phase = selection.slots().slot_at(slot).ok()?.phase;
        if phase != SlotPhase::Flipped {
            return None;
        }
        let seated = self.seated.get_mut(&slot)?;
        seated.face_up = !seated.face_up;
        let face_up = seated.face_up;
        self.visuals.push(VisualCommand::SeatedFace { slot, face_up });
        Some(face_up)
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &InFlightVisual> {
        self.in_flight.values()
    }

    pub fn seated(&self, slot: usize) -> Option<&SeatedVisual> {
        self.seated.get(&slot)
    }

    pub fn pending_steps(&self) -> usize {
        self.queue.len()
    }

    pub fn drain_visuals(&mut self) -> Vec<VisualCommand> {
        self.visuals.drain().collect()
    }

    fn schedule(&mut self, session: SessionId, trigger: Trigger, step: TimelineStep) {
        self.queue.push(Scheduled {
            session,
            seq: self.next_seq,
            trigger,
            step,
        });
        self.next_seq += 1;
    }

    fn fire(
        &mut self,
        step: TimelineStep,
        now_ms: u64,
        selection: &mut SelectionSession,
        events: &mut EventBus,
    ) {
        match step {
            TimelineStep::Place { card_id, arc_index } => {
                if let Some(item) = selection.mark_placed(arc_index) {
                    let transform = SpreadTransform::for_card(item, &self.config);
                    self.visuals.push(VisualCommand::SpreadCardPlaced {
                        card_id,
                        arc_index,
                        transform,
                    });
                }
            }
            TimelineStep::Travel { slot } => {
                if let Some(visual) = self.in_flight.get_mut(&slot) {
                    visual.travel_started_ms = Some(now_ms);
                    self.visuals.push(VisualCommand::InFlightMoved {
                        card_id: visual.card_id,
                        slot,
                        to: visual.to,
                        duration_ms: visual.travel_ms,
                    });
                }
            }
            TimelineStep::Seat { slot } => {
                let Some(visual) = self.in_flight.remove(&slot) else {
                    return;
                };
                let card_id = visual.card_id;
                self.visuals
                    .push(VisualCommand::InFlightRemoved { card_id, slot });
                self.seated.insert(
                    slot,
                    SeatedVisual {
                        card_id,
                        slot,
                        shown_ms: now_ms,
                        fade_ms: self.config.seat_fade_ms,
                        face_up: false,
                    },
                );
                self.visuals.push(VisualCommand::SeatedShown {
                    card_id,
                    slot,
                    opacity: 0.0,
                });
                self.visuals.push(VisualCommand::SeatedFade {
                    slot,
                    opacity: 1.0,
                    duration_ms: self.config.seat_fade_ms,
                });
                selection.slots_mut().advance_phase(slot, SlotPhase::Seated);
                events.push(Event::CardSeated { card_id, slot });
            }
            TimelineStep::Reveal { slot } => {
                let Some(seated) = self.seated.get_mut(&slot) else {
                    return;
                };
                seated.face_up = true;
                let card_id = seated.card_id;
                self.visuals.push(VisualCommand::SeatedFace {
                    slot,
                    face_up: true,
                });
                selection.slots_mut().advance_phase(slot, SlotPhase::Flipped);
                events.push(Event::CardRevealed { card_id, slot });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Card, Rect};

    fn placement(left: f64) -> Placement {
        Placement {
            left,
            top: 0.0,
            rotation_deg: 30.0,
            scale: 1.0,
        }
    }

    fn session(id: SessionId) -> SelectionSession {
        let cards = (0..4).map(|id| Card::new(id, format!("c{id}"))).collect();
        SelectionSession::new(id, cards, &DrawConfig::default())
    }

    fn depart_into_slot(
        sequencer: &mut AnimationSequencer,
        selection: &mut SelectionSession,
        card_id: u32,
        now_ms: u64,
    ) -> usize {
        let slot = selection
            .slots_mut()
            .assign_next(Card::new(card_id, "x"))
            .expect("slot")
            .index;
        sequencer.depart(
            Departure {
                session: selection.id(),
                card_id,
                slot,
                from: placement(0.0),
                to: placement(400.0),
            },
            now_ms,
        );
        slot
    }

    #[test]
    fn deal_places_cards_on_a_stagger() {
        let mut selection = session(1);
        let mut sequencer = AnimationSequencer::new(DrawConfig::default());
        let mut events = EventBus::default();
        sequencer.begin_session(&selection, 0);
        let fired = sequencer.advance(20, &mut selection, &mut events);
        assert_eq!(fired.len(), 2);
        assert!(selection.spread()[1].placed);
        assert!(!selection.spread()[2].placed);
        sequencer.advance(60, &mut selection, &mut events);
        assert!(selection.spread().iter().all(|item| item.placed));
    }

    #[test]
    fn timeline_runs_travel_seat_reveal() {
        let mut selection = session(1);
        let mut sequencer = AnimationSequencer::new(DrawConfig::default());
        let mut events = EventBus::default();
        sequencer.begin_session(&selection, 0);
        sequencer.advance(100, &mut selection, &mut events);
        sequencer.drain_visuals();

        let slot = depart_into_slot(&mut sequencer, &mut selection, 2, 1000);
        assert_eq!(
            sequencer.advance(1016, &mut selection, &mut events),
            vec![TimelineStep::Travel { slot }]
        );
        let flying = *sequencer.in_flight().next().expect("in flight");
        assert_eq!(flying.placement_at(1016).left, 0.0);
        assert_eq!(flying.placement_at(1616).left, 200.0);

        assert!(sequencer.advance(2199, &mut selection, &mut events).is_empty());
        assert_eq!(
            sequencer.advance(2200, &mut selection, &mut events),
            vec![TimelineStep::Seat { slot }]
        );
        assert_eq!(sequencer.in_flight().count(), 0);
        let seated = *sequencer.seated(slot).expect("seated");
        assert_eq!(seated.opacity_at(2200), 0.0);
        assert_eq!(seated.opacity_at(2300), 0.5);
        assert!(!seated.face_up);
        assert_eq!(selection.slots().slots()[slot].phase, SlotPhase::Seated);

        sequencer.advance(2250, &mut selection, &mut events);
        assert!(sequencer.seated(slot).expect("seated").face_up);
        assert_eq!(selection.slots().slots()[slot].phase, SlotPhase::Flipped);
    }

    #[test]
    fn late_tick_still_fires_in_order() {
        let mut selection = session(1);
        let mut sequencer = AnimationSequencer::new(DrawConfig::default());
        let mut events = EventBus::default();
        sequencer.begin_session(&selection, 0);
        let slot = depart_into_slot(&mut sequencer, &mut selection, 0, 0);
        let fired = sequencer.advance(5000, &mut selection, &mut events);
        let tail: Vec<_> = fired
            .into_iter()
            .filter(|step| !matches!(step, TimelineStep::Place { .. }))
            .collect();
        assert_eq!(
            tail,
            vec![
                TimelineStep::Travel { slot },
                TimelineStep::Seat { slot },
                TimelineStep::Reveal { slot }
            ]
        );
    }

    #[test]
    fn face_toggle_waits_for_reveal() {
        let mut selection = session(1);
        let mut sequencer = AnimationSequencer::new(DrawConfig::default());
        let mut events = EventBus::default();
        sequencer.begin_session(&selection, 0);
        let slot = depart_into_slot(&mut sequencer, &mut selection, 1, 0);
        sequencer.advance(1200, &mut selection, &mut events);
        assert_eq!(sequencer.toggle_face(slot, &selection), None);
        sequencer.advance(1250, &mut selection, &mut events);
        assert_eq!(sequencer.toggle_face(slot, &selection), Some(false));
        assert_eq!(sequencer.toggle_face(slot, &selection), Some(true));
        assert_eq!(sequencer.toggle_face(4, &selection), None);
    }

    #[test]
    fn superseded_steps_are_dropped() {
        let mut old = session(1);
        let mut sequencer = AnimationSequencer::new(DrawConfig::default());
        let mut events = EventBus::default();
        sequencer.begin_session(&old, 0);
        depart_into_slot(&mut sequencer, &mut old, 3, 0);

        let mut fresh = session(2);
        sequencer.begin_session(&fresh, 10);
        let fired = sequencer.advance(3000, &mut fresh, &mut events);
        assert!(fired
            .iter()
            .all(|step| matches!(step, TimelineStep::Place { .. })));
        assert_eq!(fired.len(), 4);
        assert!(sequencer.seated(0).is_none());
        assert!(fresh.slots().slots().iter().all(|slot| slot.is_empty()));
        assert!(events.is_empty());
        assert_eq!(sequencer.pending_steps(), 0);
    }

    #[test]
    fn unplaced_departure_has_no_rotation() {
        let selection = session(1);
        let item = &selection.spread()[0];
        let from = Placement::departure(Rect::default(), item);
        assert_eq!(from.rotation_deg, 0.0);
    }
}
