mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub deck: Option<String>,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let mut app = App::bootstrap(&options)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut deck = std::env::var("ARCANA_DECK").ok();
    let mut seed = std::env::var("ARCANA_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok());
    let mut config = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--deck" | "-d" => {
                if let Some(value) = args.get(idx + 1) {
                    deck = Some(value.clone());
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--config" | "-c" => {
                if let Some(value) = args.get(idx + 1) {
                    config = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    LaunchOptions { deck, config, seed }
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // one poll per frame; animation steps fire on the frame boundary
    let frame_rate = Duration::from_millis(16);
    while !app.should_quit {
        app.on_tick();
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(frame_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "arcana-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deck_seed_and_config() {
        let args: Vec<String> = ["--deck", "decks/mini.json", "--seed", "9", "-c", "draw.json"]
            .iter()
            .map(|value| value.to_string())
            .collect();
        let options = parse_options(&args);
        assert_eq!(options.deck.as_deref(), Some("decks/mini.json"));
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.config, Some(PathBuf::from("draw.json")));
    }

    #[test]
    fn ignores_dangling_flags() {
        let args = vec!["--seed".to_string()];
        let options = parse_options(&args);
        assert_eq!(options.config, None);
    }
}
