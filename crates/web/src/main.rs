use arcana_core::{
    Card, DeckSession, DrawConfig, Event, FanViewport, LoadState, Placement, RngState,
    SelectOutcome, SlotPhase, SpreadTransform, VisualCommand,
};
use arcana_data::{load_draw_config, open_source, tarot_deck};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tiny_http::{Header, Method, Response, Server, StatusCode};

const DEFAULT_ADDR: &str = "0.0.0.0:7878";
const VIEWPORT_WIDTH: f64 = 1280.0;

fn main() {
    env_logger::init();
    let options = parse_options(std::env::args().skip(1).collect());
    let config = match options.config.as_ref() {
        Some(path) => load_draw_config(path).unwrap_or_else(|err| {
            log::warn!("falling back to default config: {err:#}");
            DrawConfig::default()
        }),
        None => DrawConfig::default(),
    };
    let server = Server::http(options.addr.as_str()).expect("start server");
    log::info!("arcana web server on http://{}", options.addr);
    let state = Arc::new(Mutex::new(AppState::new(config, &options)));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            log::error!("request error: {err}");
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Options {
    addr: String,
    deck: Option<String>,
    config: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_options(args: Vec<String>) -> Options {
    let mut options = Options {
        addr: std::env::var("ARCANA_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
        deck: std::env::var("ARCANA_DECK").ok(),
        config: None,
        seed: std::env::var("ARCANA_SEED")
            .ok()
            .and_then(|value| value.parse().ok()),
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--addr" => {
                if let Some(value) = iter.next() {
                    options.addr = value;
                }
            }
            "--deck" => options.deck = iter.next(),
            "--config" => options.config = iter.next().map(PathBuf::from),
            "--seed" => options.seed = iter.next().and_then(|value| value.parse().ok()),
            _ => {}
        }
    }
    options
}

struct AppState {
    session: DeckSession,
    viewport: FanViewport,
    started: Instant,
}

impl AppState {
    fn new(config: DrawConfig, options: &Options) -> Self {
        let rng = match options.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        };
        let viewport = FanViewport::new(VIEWPORT_WIDTH, &config);
        let session = DeckSession::new(config, rng);
        let mut source = open_source(options.deck.as_deref());
        let mut state = Self {
            session,
            viewport,
            started: Instant::now(),
        };
        if state.session.load(source.as_mut()).is_ok() {
            let now = state.now_ms();
            if let Err(err) = state.session.start_draw(now) {
                log::error!("initial draw failed: {err}");
            }
        }
        state
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    outcome: Option<SelectOutcome>,
    now_ms: u64,
    state: UiState,
    events: Vec<Event>,
    visuals: Vec<VisualCommand>,
}

#[derive(Serialize)]
struct UiState {
    load: &'static str,
    load_error: Option<String>,
    deck_size: usize,
    session: Option<u64>,
    selected_count: usize,
    max_selection: usize,
    slot_padding_top_px: Option<f64>,
    spread: Vec<UiSpreadCard>,
    slots: Vec<UiSlot>,
    in_flight: Vec<UiFlight>,
}

#[derive(Serialize)]
struct UiSpreadCard {
    card_id: u32,
    arc_index: usize,
    selected: bool,
    transform: SpreadTransform,
}

#[derive(Serialize)]
struct UiSlot {
    index: usize,
    label: String,
    phase: SlotPhase,
    raise: f64,
    card: Option<Card>,
    opacity: f64,
    face_up: bool,
}

#[derive(Serialize)]
struct UiFlight {
    card_id: u32,
    slot: usize,
    placement: Placement,
}

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    target: Option<String>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    match (request.method(), url.as_str()) {
        (&Method::Get, "/api/deck") => {
            let body = serde_json::to_vec(&tarot_deck())?;
            respond_body(request, body)?;
        }
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            let now = guard.now_ms();
            guard.session.tick(now);
            let response = build_response(&mut guard, now, Ok(None));
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let action: ActionRequest = serde_json::from_str(&body)?;
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            let now = guard.now_ms();
            guard.session.tick(now);
            let result = apply_action(&mut guard, action, now);
            let response = build_response(&mut guard, now, result);
            respond_json(request, response)?;
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn respond_body(
    request: tiny_http::Request,
    body: Vec<u8>,
) -> Result<(), Box<dyn std::error::Error>> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "bad header")?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(&response)?;
    respond_body(request, body)
}

fn apply_action(
    state: &mut AppState,
    req: ActionRequest,
    now: u64,
) -> Result<Option<SelectOutcome>, String> {
    match req.action.as_str() {
        "draw" => state
            .session
            .start_draw(now)
            .map(|_| None)
            .map_err(|err| err.to_string()),
        "click_card" => {
            let card_id = parse_target::<u32>(req.target)?;
            state
                .session
                .click_card(card_id, now, &state.viewport)
                .map(Some)
                .map_err(|err| err.to_string())
        }
        "click_slot" => {
            let index = parse_target::<usize>(req.target)?;
            if state.session.click_slot(index) {
                Ok(None)
            } else {
                Err("slot has no revealed card".to_string())
            }
        }
        _ => Err("unknown action".to_string()),
    }
}

fn parse_target<T: std::str::FromStr>(target: Option<String>) -> Result<T, String> {
    target
        .as_deref()
        .ok_or_else(|| "missing target".to_string())?
        .parse::<T>()
        .map_err(|_| "invalid target".to_string())
}

fn build_response(
    state: &mut AppState,
    now: u64,
    result: Result<Option<SelectOutcome>, String>,
) -> ApiResponse {
    let (outcome, error) = match result {
        Ok(outcome) => (outcome, None),
        Err(err) => (None, Some(err)),
    };
    ApiResponse {
        ok: error.is_none(),
        error,
        outcome,
        now_ms: now,
        state: snapshot_state(&state.session, now),
        events: state.session.drain_events(),
        visuals: state.session.drain_visuals(),
    }
}

fn snapshot_state(session: &DeckSession, now: u64) -> UiState {
    let (load, load_error) = match session.load_state() {
        LoadState::Idle => ("idle", None),
        LoadState::Loading => ("loading", None),
        LoadState::Ready(_) => ("ready", None),
        LoadState::Failed(reason) => ("failed", Some(reason.clone())),
    };
    let deck_size = session.deck().map(|deck| deck.len()).unwrap_or(0);
    let Some(selection) = session.selection() else {
        return UiState {
            load,
            load_error,
            deck_size,
            session: None,
            selected_count: 0,
            max_selection: session.config().max_selection,
            slot_padding_top_px: None,
            spread: Vec::new(),
            slots: Vec::new(),
            in_flight: Vec::new(),
        };
    };
    let sequencer = session.sequencer();
    let spread = selection
        .spread()
        .iter()
        .map(|item| UiSpreadCard {
            card_id: item.card.id,
            arc_index: item.arc_index,
            selected: item.is_selected(),
            transform: SpreadTransform::for_card(item, session.config()),
        })
        .collect();
    let slots = selection
        .slots()
        .slots()
        .iter()
        .map(|slot| {
            let seated = sequencer.seated(slot.index);
            UiSlot {
                index: slot.index,
                label: slot.label(),
                phase: slot.phase,
                raise: slot.raise,
                card: seated.and(slot.occupant.clone()),
                opacity: seated.map(|visual| visual.opacity_at(now)).unwrap_or(0.0),
                face_up: seated.map(|visual| visual.face_up).unwrap_or(false),
            }
        })
        .collect();
    let in_flight = sequencer
        .in_flight()
        .map(|visual| UiFlight {
            card_id: visual.card_id,
            slot: visual.slot,
            placement: visual.placement_at(now),
        })
        .collect();
    UiState {
        load,
        load_error,
        deck_size,
        session: session.current_session(),
        selected_count: selection.selected_count(),
        max_selection: selection.max_selection(),
        slot_padding_top_px: selection.slots().padding_hint(session.config()),
        spread,
        slots,
        in_flight,
    }
}
