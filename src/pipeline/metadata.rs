//! Header and clock metadata extraction.
//!
//! Metadata is extracted opportunistically and independently of move validity:
//! a game whose moves cannot be recovered still reports its players, and a
//! perfectly legal game without headers reports none. The extractor scans
//! `[Tag "Value"]` header fields and `{ [%clk H:MM:SS] }` clock annotations.

use crate::{GameMetadata, PlayerInfo};
use regex::Regex;

fn tag_value<'t>(text: &'t str, pattern: &Regex) -> Option<&'t str> {
    pattern.captures(text).map(|caps| caps.get(1).map_or("", |m| m.as_str()))
}

/// Placeholder names and ratings are treated as absent, not populated.
fn is_placeholder(value: &str) -> bool {
    value == "?" || value == "??"
}

/// Scan header tags. Returns a record only if at least one of white name,
/// black name, or event was present; player fields fall back to "White" and
/// "Black" when missing or placeholder-valued.
pub(crate) fn extract_metadata(text: &str) -> Option<GameMetadata> {
    if text.is_empty() {
        return None;
    }

    let event = tag_value(text, regex!(r#"(?i)\[Event\s+"([^"]+)"\]"#));
    let site = tag_value(text, regex!(r#"(?i)\[Site\s+"([^"]+)"\]"#));
    let date = tag_value(text, regex!(r#"(?i)\[Date\s+"([^"]+)"\]"#));
    let round = tag_value(text, regex!(r#"(?i)\[Round\s+"([^"]+)"\]"#));
    let white = tag_value(text, regex!(r#"(?i)\[White\s+"([^"]+)"\]"#));
    let black = tag_value(text, regex!(r#"(?i)\[Black\s+"([^"]+)"\]"#));
    let result = tag_value(text, regex!(r#"(?i)\[Result\s+"([^"]+)"\]"#));
    let white_elo = tag_value(text, regex!(r#"(?i)\[WhiteElo\s+"([^"]+)"\]"#));
    let black_elo = tag_value(text, regex!(r#"(?i)\[BlackElo\s+"([^"]+)"\]"#));
    let time_control = tag_value(text, regex!(r#"(?i)\[TimeControl\s+"([^"]+)"\]"#));

    if white.is_none() && black.is_none() && event.is_none() {
        return None;
    }

    let player = |name: Option<&str>, rating: Option<&str>, fallback: &str| PlayerInfo {
        name: name.filter(|v| !is_placeholder(v)).unwrap_or(fallback).to_string(),
        rating: rating.filter(|v| !is_placeholder(v)).map(str::to_string),
    };

    Some(GameMetadata {
        event: event.map(str::to_string),
        site: site.map(str::to_string),
        date: date.map(str::to_string),
        round: round.map(str::to_string),
        white: player(white, white_elo, "White"),
        black: player(black, black_elo, "Black"),
        result: result.map(str::to_string),
        time_control: time_control.map(str::to_string),
        clock_times: Vec::new(),
    })
}

/// Collect `{ [%clk H:MM:SS] }` annotations as total seconds per ply.
pub(crate) fn extract_clock_times(text: &str) -> Vec<u64> {
    regex!(r"\{\s*\[%clk\s+(\d+):(\d+):(\d+)\]\s*\}")
        .captures_iter(text)
        .filter_map(|caps| {
            let hours: u64 = caps[1].parse().ok()?;
            let minutes: u64 = caps[2].parse().ok()?;
            let seconds: u64 = caps[3].parse().ok()?;
            Some(hours * 3600 + minutes * 60 + seconds)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_header_fields() {
        let text = r#"[Event "World Championship"] [Site "London"] [Date "2018.11.09"]
            [Round "1"] [White "Carlsen, Magnus"] [Black "Caruana, Fabiano"]
            [WhiteElo "2882"] [BlackElo "2835"] [Result "1/2-1/2"] [TimeControl "90+30"]
            1. e4 e5"#;

        let meta = extract_metadata(text).unwrap();
        assert_eq!(meta.event.as_deref(), Some("World Championship"));
        assert_eq!(meta.white.name, "Carlsen, Magnus");
        assert_eq!(meta.white.rating.as_deref(), Some("2882"));
        assert_eq!(meta.black.name, "Caruana, Fabiano");
        assert_eq!(meta.round.as_deref(), Some("1"));
        assert_eq!(meta.time_control.as_deref(), Some("90+30"));
    }

    #[test]
    fn placeholder_players_fall_back_to_defaults() {
        let text = r#"[Event "Club Night"] [White "?"] [Black "??"] [WhiteElo "?"]"#;
        let meta = extract_metadata(text).unwrap();
        assert_eq!(meta.white.name, "White");
        assert_eq!(meta.black.name, "Black");
        assert!(meta.white.rating.is_none());
    }

    #[test]
    fn no_identifying_tags_means_no_metadata() {
        assert!(extract_metadata("1. e4 e5 2. Nf3").is_none());
        assert!(extract_metadata(r#"[Result "1-0"]"#).is_none());
        assert!(extract_metadata("").is_none());
    }

    #[test]
    fn clock_annotations_become_seconds() {
        let text = "1. e4 { [%clk 0:03:00] } e5 {[%clk 1:00:30]}";
        assert_eq!(extract_clock_times(text), vec![180, 3630]);
        assert!(extract_clock_times("1. e4 e5").is_empty());
    }
}
