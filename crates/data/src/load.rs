use crate::schema::{Card, DrawConfig};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn load_draw_config(path: &Path) -> anyhow::Result<DrawConfig> {
    let config: DrawConfig = load_json(path)?;
    if config.max_selection == 0 {
        bail!("{}: max_selection must be at least 1", path.display());
    }
    Ok(config)
}

/// Reads a JSON array of `{id, name}` records. Only the shape is checked.
pub fn load_deck_file(path: &Path) -> anyhow::Result<Vec<Card>> {
    load_json(path)
}

pub fn parse_deck(body: &str) -> anyhow::Result<Vec<Card>> {
    serde_json::from_str(body).context("parse deck payload")
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "arcana_data_{tag}_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn parses_deck_with_extra_fields() {
        let cards = parse_deck(r#"[{"id":3,"name":"皇后","en":"The Empress","type":"major"}]"#)
            .expect("parse");
        assert_eq!(cards, vec![Card::new(3, "皇后")]);
    }

    #[test]
    fn rejects_records_missing_a_name() {
        assert!(parse_deck(r#"[{"id":1}]"#).is_err());
    }

    #[test]
    fn loads_partial_config_file() {
        let file = unique_temp_file("config");
        std::fs::write(&file, r#"{"max_selection": 3, "arc_width_deg": 120}"#).expect("write");
        let config = load_draw_config(&file).expect("load");
        assert_eq!(config.max_selection, 3);
        assert_eq!(config.arc_width_deg, 120.0);
        assert_eq!(config.travel_ms, 1200);
        let _ = std::fs::remove_file(file);
    }

    #[test]
    fn zero_capacity_config_is_rejected() {
        let file = unique_temp_file("zero");
        std::fs::write(&file, r#"{"max_selection": 0}"#).expect("write");
        let err = load_draw_config(&file).expect_err("zero slots");
        assert!(err.to_string().contains("max_selection"));
        let _ = std::fs::remove_file(file);
    }

    #[test]
    fn deck_file_errors_name_the_path() {
        let file = unique_temp_file("missing");
        let err = load_deck_file(&file).expect_err("missing");
        assert!(format!("{err:#}").contains("read"));
    }
}
