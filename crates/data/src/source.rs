use crate::load::{load_deck_file, parse_deck};
use crate::tarot::tarot_cards;
use arcana_core::{Card, DeckSource, SourceError};
use reqwest::blocking::Client;
use std::path::PathBuf;

/// The built-in tarot deck.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarotDeckSource;

impl DeckSource for TarotDeckSource {
    fn fetch(&mut self) -> Result<Vec<Card>, SourceError> {
        Ok(tarot_cards())
    }

    fn describe(&self) -> String {
        "built-in tarot deck".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FileDeckSource {
    path: PathBuf,
}

impl FileDeckSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeckSource for FileDeckSource {
    fn fetch(&mut self) -> Result<Vec<Card>, SourceError> {
        load_deck_file(&self.path).map_err(|err| SourceError::Malformed(format!("{err:#}")))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads the deck from a `GET` endpoint. Any non-2xx answer is a failure.
#[derive(Debug, Clone)]
pub struct HttpDeckSource {
    url: String,
    client: Client,
}

impl HttpDeckSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

impl DeckSource for HttpDeckSource {
    fn fetch(&mut self) -> Result<Vec<Card>, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|err| SourceError::Unreachable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("deck endpoint {} answered {status}", self.url);
            return Err(SourceError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .map_err(|err| SourceError::Unreachable(err.to_string()))?;
        log::debug!("deck endpoint returned {} bytes", body.len());
        parse_deck(&body).map_err(|err| SourceError::Malformed(format!("{err:#}")))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Picks a source from a command-line value: `tarot` (or nothing) for the
/// built-in deck, an `http(s)://` URL, or a file path.
pub fn open_source(spec: Option<&str>) -> Box<dyn DeckSource> {
    let source: Box<dyn DeckSource> = match spec.map(str::trim) {
        None | Some("") | Some("tarot") => Box::new(TarotDeckSource),
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            Box::new(HttpDeckSource::new(url))
        }
        Some(path) => Box::new(FileDeckSource::new(path)),
    };
    log::debug!("deck source: {}", source.describe());
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_source_picks_by_prefix() {
        assert_eq!(open_source(None).describe(), "built-in tarot deck");
        assert_eq!(open_source(Some("tarot")).describe(), "built-in tarot deck");
        assert_eq!(
            open_source(Some("http://127.0.0.1:5000/api/deck")).describe(),
            "http://127.0.0.1:5000/api/deck"
        );
        assert_eq!(open_source(Some("decks/mini.json")).describe(), "decks/mini.json");
    }

    #[test]
    fn missing_file_is_malformed_not_a_panic() {
        let mut source = FileDeckSource::new("/nonexistent/arcana/deck.json");
        assert!(matches!(source.fetch(), Err(SourceError::Malformed(_))));
    }

    #[test]
    fn tarot_source_yields_78_cards() {
        let cards = TarotDeckSource.fetch().expect("fetch");
        assert_eq!(cards.len(), 78);
        assert_eq!(cards[0], Card::new(0, "愚者"));
    }
}
