use crate::{
    AnimationSequencer, Card, CardClick, Deck, DrawConfig, DrawError, Event, EventBus, RngState,
    SelectOutcome, SelectionController, SelectionSession, SessionId, SourceError, TimelineStep,
    Viewport, VisualCommand,
};

/// Where deck records come from. Implementations live outside the core.
pub trait DeckSource {
    fn fetch(&mut self) -> Result<Vec<Card>, SourceError>;

    fn describe(&self) -> String {
        "deck source".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Deck),
    Failed(String),
}

/// Owns the deck for the lifetime of the page and the current draw.
#[derive(Debug)]
pub struct DeckSession {
    config: DrawConfig,
    rng: RngState,
    load: LoadState,
    generation: SessionId,
    selection: Option<SelectionSession>,
    sequencer: AnimationSequencer,
    controller: SelectionController,
    events: EventBus,
}

impl DeckSession {
    pub fn new(config: DrawConfig, rng: RngState) -> Self {
        Self {
            sequencer: AnimationSequencer::new(config.clone()),
            controller: SelectionController::new(config.clone()),
            config,
            rng,
            load: LoadState::Idle,
            generation: 0,
            selection: None,
            events: EventBus::default(),
        }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn deck(&self) -> Option<&Deck> {
        match &self.load {
            LoadState::Ready(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Marks the request as outstanding. Only an idle session starts a load:
    /// a loaded deck is never re-fetched and a failure is final.
    pub fn begin_load(&mut self) -> bool {
        if self.load != LoadState::Idle {
            return false;
        }
        self.load = LoadState::Loading;
        true
    }

    /// Resolves an outstanding load. Failures stick until the page reloads.
    /// Without an outstanding load the current state is returned untouched.
    pub fn finish_load(&mut self, result: Result<Vec<Card>, SourceError>) -> Result<&Deck, DrawError> {
        if self.load != LoadState::Loading {
            log::debug!("ignoring load result with no load outstanding");
            return self.settled();
        }
        match result {
            Ok(cards) => {
                log::info!("deck loaded with {} cards", cards.len());
                self.events.push(Event::DeckLoaded { cards: cards.len() });
                self.load = LoadState::Ready(Deck::from_cards(cards));
            }
            Err(err) => {
                let reason = err.to_string();
                log::warn!("deck load failed: {reason}");
                self.events.push(Event::DeckLoadFailed {
                    reason: reason.clone(),
                });
                self.load = LoadState::Failed(reason);
            }
        }
        self.settled()
    }

    fn settled(&self) -> Result<&Deck, DrawError> {
        match &self.load {
            LoadState::Ready(deck) => Ok(deck),
            LoadState::Failed(reason) => Err(DrawError::LoadFailed(reason.clone())),
            LoadState::Idle | LoadState::Loading => Err(DrawError::NotLoaded),
        }
    }

    /// Fetches the deck once. No retry on failure.
    pub fn load(&mut self, source: &mut dyn DeckSource) -> Result<&Deck, DrawError> {
        if !self.begin_load() {
            return self.settled();
        }
        log::info!("loading deck from {}", source.describe());
        let result = source.fetch();
        self.finish_load(result)
    }

    /// New shuffle, new fan, empty slots. Supersedes any previous draw along
    /// with its pending animation steps.
    pub fn start_draw(&mut self, now_ms: u64) -> Result<SessionId, DrawError> {
        let cards = match &self.load {
            LoadState::Ready(deck) if deck.is_empty() => return Err(DrawError::EmptyDeck),
            LoadState::Ready(deck) => deck.cards(),
            LoadState::Failed(reason) => return Err(DrawError::LoadFailed(reason.clone())),
            LoadState::Idle | LoadState::Loading => return Err(DrawError::NotLoaded),
        };
        let shuffled = self.rng.shuffle(cards);
        self.generation += 1;
        let selection = SelectionSession::new(self.generation, shuffled, &self.config);
        self.sequencer.begin_session(&selection, now_ms);
        self.events.push(Event::DrawStarted {
            session: selection.id(),
            cards: selection.spread().len(),
            slots: selection.max_selection(),
        });
        log::info!(
            "draw {} started with {} cards",
            selection.id(),
            selection.spread().len()
        );
        self.selection = Some(selection);
        Ok(self.generation)
    }

    pub fn click_card(
        &mut self,
        card_id: u32,
        now_ms: u64,
        viewport: &dyn Viewport,
    ) -> Result<SelectOutcome, DrawError> {
        let selection = self.selection.as_mut().ok_or(DrawError::NotLoaded)?;
        self.controller.handle_click(
            selection,
            &mut self.sequencer,
            CardClick { card_id, now_ms },
            viewport,
            &mut self.events,
        )
    }

    /// Turns a revealed seated card over. False before its Reveal step.
    pub fn click_slot(&mut self, index: usize) -> bool {
        let Some(selection) = self.selection.as_ref() else {
            return false;
        };
        match self.sequencer.toggle_face(index, selection) {
            Some(face_up) => {
                self.events.push(Event::CardTurned {
                    slot: index,
                    face_up,
                });
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<TimelineStep> {
        match self.selection.as_mut() {
            Some(selection) => self.sequencer.advance(now_ms, selection, &mut self.events),
            None => Vec::new(),
        }
    }

    pub fn selection(&self) -> Option<&SelectionSession> {
        self.selection.as_ref()
    }

    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.selection.as_ref().map(SelectionSession::id)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }

    pub fn drain_visuals(&mut self) -> Vec<VisualCommand> {
        self.sequencer.drain_visuals()
    }
}
