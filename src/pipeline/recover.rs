//! Pipeline driver.
//!
//! Ties the stages together: clean, normalize, pull metadata, strip
//! annotations, then run every segmentation strategy to completion and keep
//! the attempt that recovered the most moves. Ties go to the earlier
//! strategy, so the stricter reading of the input wins.

use crate::pipeline::{metadata, normalize, reconstruct, replay, segment};
use crate::oracle::RulesOracle;
use crate::{Options, RecoveryAttempt, RecoveryResult, Strategy};

pub(crate) fn run<O: RulesOracle>(raw: &str, options: &Options) -> RecoveryResult {
    let cleaned = normalize::clean_input(raw);
    if cleaned.is_empty() {
        return RecoveryResult::failure("No move text found in the input.".to_string());
    }

    // Metadata comes from the cleaned text: normalization rewrites colons
    // and hyphens, which would mangle clock annotations and tag values.
    let mut meta = metadata::extract_metadata(&cleaned);
    if let Some(meta) = meta.as_mut() {
        meta.clock_times = metadata::extract_clock_times(&cleaned);
    }

    let normalized = normalize::normalize(&cleaned);
    let stripped = segment::strip_annotations(&normalized);

    let debug = std::env::var_os("PGN_SALVAGE_DEBUG").is_some();
    let mut attempts: Vec<RecoveryAttempt> = Vec::with_capacity(3);

    attempts.push(replay::stripped_attempt::<O>(&stripped, options));

    let pairs = segment::numbered_pairs(&stripped);
    if !pairs.is_empty() {
        attempts.push(replay::replay_tokens::<O>(Strategy::NumberedPairs, &pairs, options));
    }

    let stream = segment::flat_stream(&stripped);
    if !stream.is_empty() {
        attempts.push(replay::replay_tokens::<O>(Strategy::FlatStream, &stream, options));
    }

    if debug {
        for attempt in &attempts {
            eprintln!(
                "[select] {}: {} plies, halted={}",
                attempt.strategy.name(),
                attempt.accepted.len(),
                attempt.halted_at.is_some()
            );
        }
    }

    // Strictly greater only; on equal counts the earlier strategy stands.
    let mut best: Option<RecoveryAttempt> = None;
    for attempt in attempts {
        let better = best.as_ref().is_none_or(|current| attempt.accepted.len() > current.accepted.len());
        if better {
            best = Some(attempt);
        }
    }
    let best = best.unwrap_or_else(|| unreachable!("stripped attempt always present"));

    reconstruct::assemble(best, options, meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ShakmatyOracle;

    fn recover(input: &str) -> RecoveryResult {
        run::<ShakmatyOracle>(input, &Options::default())
    }

    #[test]
    fn clean_game_passes_through() {
        let result = recover("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
        assert!(result.success);
        assert!(!result.is_partial);
        assert_eq!(result.moves_found, 3);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
    }

    #[test]
    fn empty_input_fails_fast() {
        let result = recover("   \n\t ");
        assert!(!result.success);
        assert_eq!(result.error.unwrap(), "No move text found in the input.");
    }

    #[test]
    fn castling_zeros_are_recovered() {
        let result = recover("1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6 4. 00");
        assert!(result.success);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6 4. O-O");
        assert_eq!(result.moves_found, 4);
    }

    #[test]
    fn malformed_token_is_repaired() {
        let result = recover("1. e4 e5 2. B6");
        assert!(result.success);
        assert_eq!(result.movetext, "1. e4 e5 2. Ba6");
        assert_eq!(result.moves_found, 2);
    }

    #[test]
    fn headers_feed_metadata_and_are_stripped() {
        let input = "[Event \"Club Championship\"]\n[White \"Smith, J.\"]\n[Black \"Doe, A.\"]\n\n1. d4 d5 1-0";
        let result = recover(input);
        assert!(result.success);
        assert_eq!(result.movetext, "1. d4 d5");
        let meta = result.metadata.unwrap();
        assert_eq!(meta.white.name, "Smith, J.");
        assert_eq!(meta.event.as_deref(), Some("Club Championship"));
    }

    #[test]
    fn clock_annotations_attach_to_metadata() {
        let input = "[White \"A\"]\n[Black \"B\"]\n1. e4 { [%clk 0:03:00] } e5 { [%clk 0:02:58] }";
        let result = recover(input);
        assert!(result.success);
        assert_eq!(result.movetext, "1. e4 e5");
        assert_eq!(result.metadata.unwrap().clock_times, vec![180, 178]);
    }

    #[test]
    fn unrecoverable_tail_yields_partial() {
        let options = Options { expected_moves: Some(5), ..Options::default() };
        let result = run::<ShakmatyOracle>("1. e4 e5 2. Nf3 Nc6 3. zzzz zzzz", &options);
        assert!(result.success);
        assert!(result.is_partial);
        assert_eq!(result.moves_found, 2);
        assert!(result.quality_warning.unwrap().contains("Only 2 of 5 moves"));
    }

    #[test]
    fn expected_count_trims_over_recovery() {
        let options = Options { expected_moves: Some(2), ..Options::default() };
        let result = run::<ShakmatyOracle>("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6", &options);
        assert_eq!(result.moves_found, 2);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3 Nc6");
    }

    #[test]
    fn garbage_only_input_fails_with_locator() {
        let result = recover("lorem ipsum dolor");
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Unable to parse move text."));
    }

    #[test]
    fn prose_wrapped_moves_survive_via_flat_stream() {
        let result = recover("The game opened e4 e5 and then Nf3 Nc6 before the scoresheet tore.");
        assert!(result.success);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3 Nc6");
    }
}
