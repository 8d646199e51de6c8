use crate::LaunchOptions;
use anyhow::{Context, Result};
use arcana_core::{
    DeckSession, DrawConfig, Event, FanViewport, RngState, SelectOutcome, SpreadCard,
};
use arcana_data::{load_draw_config, open_source};
use std::collections::VecDeque;
use std::time::Instant;

const MAX_EVENT_LOG: usize = 200;
const VIEWPORT_WIDTH: f64 = 1280.0;

pub struct App {
    pub session: DeckSession,
    pub viewport: FanViewport,
    pub started: Instant,
    pub deck_label: String,
    pub cursor: usize,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(options: &LaunchOptions) -> Result<Self> {
        let config = match options.config.as_ref() {
            Some(path) => load_draw_config(path)
                .with_context(|| format!("load draw config from {}", path.display()))?,
            None => DrawConfig::default(),
        };
        let rng = match options.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        let viewport = FanViewport::new(VIEWPORT_WIDTH, &config);
        let mut source = open_source(options.deck.as_deref());
        let mut app = Self {
            session: DeckSession::new(config, rng),
            viewport,
            started: Instant::now(),
            deck_label: source.describe(),
            cursor: 0,
            event_log: VecDeque::new(),
            status_line: "loading deck".to_string(),
            show_help: false,
            should_quit: false,
        };

        let loaded = app.session.load(source.as_mut()).map(|_| ());
        match loaded {
            Ok(()) => app.redraw(),
            Err(err) => app.status_line = format!("cannot load deck: {err}"),
        }
        app.flush_events();
        Ok(app)
    }

    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn on_tick(&mut self) {
        let now = self.now_ms();
        self.session.tick(now);
        self.flush_events();
    }

    pub fn spread(&self) -> &[SpreadCard] {
        self.session
            .selection()
            .map(|selection| selection.spread())
            .unwrap_or(&[])
    }

    pub fn cursor_card(&self) -> Option<&SpreadCard> {
        self.spread().get(self.cursor)
    }

    pub fn move_cursor(&mut self, forward: bool) {
        let len = self.spread().len();
        if len == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    pub fn jump_cursor(&mut self, to_end: bool) {
        self.cursor = if to_end {
            self.spread().len().saturating_sub(1)
        } else {
            0
        };
    }

    pub fn select_under_cursor(&mut self) {
        let Some(card_id) = self.cursor_card().map(|item| item.card.id) else {
            self.status_line = "nothing to pick".to_string();
            return;
        };
        let now = self.now_ms();
        match self.session.click_card(card_id, now, &self.viewport) {
            Ok(SelectOutcome::Accepted { slot }) => {
                let complete = self
                    .session
                    .selection()
                    .is_some_and(|selection| selection.is_complete());
                self.status_line = if complete {
                    format!("card sent to slot {}; all slots taken", slot + 1)
                } else {
                    format!("card sent to slot {}", slot + 1)
                };
            }
            Ok(SelectOutcome::AtCapacity) => {
                self.status_line = "all slots are taken; press r to draw again".to_string();
            }
            Ok(SelectOutcome::AlreadySelected) => {
                self.status_line = "that card is already picked".to_string();
            }
            Ok(SelectOutcome::UnknownCard) => {
                self.status_line = "card is not part of this draw".to_string();
            }
            Err(err) => self.status_line = format!("error: {err}"),
        }
        self.flush_events();
    }

    pub fn click_slot(&mut self, index: usize) {
        if !self.session.click_slot(index) {
            self.status_line = format!("slot {} has no revealed card", index + 1);
        }
        self.flush_events();
    }

    pub fn redraw(&mut self) {
        let now = self.now_ms();
        match self.session.start_draw(now) {
            Ok(_) => {
                self.cursor = self.spread().len() / 2;
                self.status_line = "pick your cards".to_string();
            }
            Err(err) => self.status_line = format!("cannot draw: {err}"),
        }
        self.flush_events();
    }

    fn flush_events(&mut self) {
        // the terminal view renders from session state, not from commands
        self.session.drain_visuals();
        for event in self.session.drain_events() {
            let line = self.event_line(&event);
            self.push_event_line(line);
        }
    }

    fn event_line(&self, event: &Event) -> String {
        match event {
            Event::DeckLoaded { cards } => format!("deck loaded: {cards} cards"),
            Event::DeckLoadFailed { reason } => format!("deck load failed: {reason}"),
            Event::DrawStarted { session, cards, slots } => {
                format!("draw #{session}: {cards} cards, {slots} slots")
            }
            Event::CardSelected {
                card_id,
                slot,
                selected,
            } => format!("picked card {card_id} -> slot {} ({selected})", slot + 1),
            Event::CardSeated { slot, .. } => format!("slot {} seated", slot + 1),
            Event::CardRevealed { card_id, slot } => {
                let name = self
                    .session
                    .deck()
                    .and_then(|deck| deck.find(*card_id))
                    .map(|card| card.name.as_str())
                    .unwrap_or("?");
                format!("slot {} revealed: {name}", slot + 1)
            }
            Event::CardTurned { slot, face_up } => format!(
                "slot {} turned {}",
                slot + 1,
                if *face_up { "up" } else { "down" }
            ),
            Event::InvariantViolation { detail } => format!("BUG: {detail}"),
        }
    }

    fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tarot_app() -> App {
        App::bootstrap(&LaunchOptions {
            deck: Some("tarot".to_string()),
            config: None,
            seed: Some(5),
        })
        .expect("bootstrap")
    }

    #[test]
    fn bootstrap_deals_and_centres_cursor() {
        let app = tarot_app();
        assert_eq!(app.spread().len(), 78);
        assert_eq!(app.cursor, 39);
        assert!(app.event_log.iter().any(|line| line.contains("deck loaded")));
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut app = tarot_app();
        app.jump_cursor(false);
        app.move_cursor(false);
        assert_eq!(app.cursor, 77);
        app.move_cursor(true);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn picking_twice_reports_already_picked() {
        let mut app = tarot_app();
        app.select_under_cursor();
        assert_eq!(app.status_line, "card sent to slot 1");
        app.select_under_cursor();
        assert_eq!(app.status_line, "that card is already picked");
        let selection = app.session.selection().expect("selection");
        assert_eq!(selection.selected_count(), 1);
    }

    #[test]
    fn last_pick_says_the_slots_are_full() {
        let mut app = tarot_app();
        for _ in 0..5 {
            app.select_under_cursor();
            app.move_cursor(true);
        }
        assert_eq!(app.status_line, "card sent to slot 5; all slots taken");
        app.select_under_cursor();
        assert_eq!(app.status_line, "all slots are taken; press r to draw again");
    }

    #[test]
    fn redraw_clears_previous_picks() {
        let mut app = tarot_app();
        app.select_under_cursor();
        app.redraw();
        assert_eq!(app.session.selection().expect("selection").selected_count(), 0);
    }

    #[test]
    fn unreadable_deck_leaves_app_without_a_draw() {
        let app = App::bootstrap(&LaunchOptions {
            deck: Some("/nonexistent/arcana/deck.json".to_string()),
            config: None,
            seed: Some(1),
        })
        .expect("bootstrap still succeeds");
        assert!(app.status_line.starts_with("cannot load deck"));
        assert!(app.spread().is_empty());
    }
}
