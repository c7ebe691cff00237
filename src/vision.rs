//! Adapter for vision-model transcription payloads.
//!
//! Scoresheet photos go through an OCR/vision model that answers with a JSON
//! object (player names, ratings, a move-count estimate, and the transcribed
//! movetext), usually wrapped in markdown fences and prose. This module digs
//! the payload out of such a response and hands the movetext to the recovery
//! pipeline, with the structured fields merged into the result.

use crate::pipeline::normalize;
use crate::{GameMetadata, Options, PlayerInfo, RecoveryResult};
use serde::Deserialize;

/// The model's sentinel for an image with no readable notation.
const NO_NOTATION_FOUND: &str = "NO_NOTATION_FOUND";

/// The structured transcription a vision model returns for a scoresheet.
/// Every field is optional in practice; missing ones deserialize to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionExtraction {
    pub white_name: Option<String>,
    pub black_name: Option<String>,
    pub white_rating: Option<String>,
    pub black_rating: Option<String>,
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub round: Option<String>,
    /// Transcribed movetext, or the `NO_NOTATION_FOUND` sentinel.
    pub moves: Option<String>,
    /// The model's own count of full moves it believes it read. Advisory, an
    /// upper bound for trimming, never ground truth.
    pub total_moves: Option<usize>,
    /// The model's self-reported confidence ("high", "medium", "low").
    /// Carried through untouched.
    pub confidence: Option<String>,
}

impl VisionExtraction {
    /// Pull the extraction out of a raw model response. The JSON object may
    /// be fenced, prefixed with prose, or absent entirely; in the last case
    /// the whole response is treated as bare movetext.
    pub fn from_response(response: &str) -> VisionExtraction {
        let cleaned = normalize::clean_input(response);
        if let Some(found) = regex!(r"(?s)\{.*\}").find(&cleaned) {
            if let Ok(extraction) = serde_json::from_str::<VisionExtraction>(found.as_str()) {
                return extraction;
            }
        }
        VisionExtraction { moves: Some(cleaned), ..VisionExtraction::default() }
    }

    /// Metadata from the structured fields alone, or None when the model gave
    /// nothing beyond placeholder names.
    fn metadata(&self) -> Option<GameMetadata> {
        let white_name = self.white_name.clone().unwrap_or_else(|| "White".to_string());
        let black_name = self.black_name.clone().unwrap_or_else(|| "Black".to_string());
        let identified = white_name != "White"
            || black_name != "Black"
            || self.event.is_some()
            || self.white_rating.is_some()
            || self.black_rating.is_some();
        if !identified {
            return None;
        }
        Some(GameMetadata {
            white: PlayerInfo { name: white_name, rating: self.white_rating.clone() },
            black: PlayerInfo { name: black_name, rating: self.black_rating.clone() },
            event: self.event.clone(),
            site: self.site.clone(),
            date: self.date.clone(),
            round: self.round.clone(),
            ..GameMetadata::default()
        })
    }
}

/// Run recovery on an already-deserialized extraction.
pub fn recover_extraction(extraction: &VisionExtraction, options: &Options) -> RecoveryResult {
    let movetext = extraction.moves.as_deref().unwrap_or("").trim();
    if movetext == NO_NOTATION_FOUND || movetext.len() < 5 {
        return RecoveryResult::failure("No chess notation was found in the image.".to_string());
    }

    let mut options = options.clone();
    if options.expected_moves.is_none() {
        options.expected_moves = extraction.total_moves.filter(|&n| n > 0);
    }

    let mut result = crate::recover_with(movetext, &options);
    if result.metadata.is_none() {
        result.metadata = extraction.metadata();
    }
    result
}

/// Recover straight from a raw model response string.
pub fn recover_vision_response(response: &str, options: &Options) -> RecoveryResult {
    recover_extraction(&VisionExtraction::from_response(response), options)
}
