//! Result assembly.
//!
//! The winning attempt's accepted moves are renumbered from 1 and formatted
//! as standard movetext. When the caller announced an expected move count the
//! sequence is trimmed to it (a longer recovery is over-read noise, not extra
//! signal) and a shortfall is surfaced as a quality warning.

use crate::{GameMetadata, Options, RecoveryAttempt, RecoveryResult};

/// `1. e4 e5 2. Nf3 ...`, renumbered from move one regardless of the numbers
/// seen in the input.
pub(crate) fn format_movetext(moves: &[String]) -> String {
    let mut out = String::new();
    for (index, san) in moves.iter().enumerate() {
        if index % 2 == 0 {
            if index > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{}.", index / 2 + 1));
        }
        out.push(' ');
        out.push_str(san);
    }
    out
}

pub(crate) fn assemble(
    best: RecoveryAttempt,
    options: &Options,
    metadata: Option<GameMetadata>,
) -> RecoveryResult {
    if best.accepted.is_empty() {
        let locator = best
            .halted_at
            .as_ref()
            .map(|halt| halt.to_string())
            .unwrap_or_else(|| "start".to_string());
        let mut result =
            RecoveryResult::failure(format!("Unable to parse move text. Problem detected near {locator}."));
        result.failed_at = best.halted_at;
        result.metadata = metadata;
        return result;
    }

    let mut pairs = best.accepted_pairs();
    let mut sans: Vec<String> = best.accepted.iter().map(|m| m.san.clone()).collect();
    let mut quality_warning = None;
    let mut is_partial = !best.consumed_all;

    if let Some(expected) = options.expected_moves {
        if pairs > expected {
            // More than announced: trust the announcement and drop the tail.
            sans.truncate(expected * 2);
            pairs = expected;
            is_partial = false;
        } else if pairs < expected {
            is_partial = true;
            quality_warning = Some(format!(
                "Only {pairs} of {expected} moves could be recovered. The rest of the notation \
                 may be illegible or inconsistent with the rules of chess."
            ));
        }
    }

    RecoveryResult {
        success: true,
        movetext: format_movetext(&sans),
        moves_found: pairs,
        is_partial,
        total_expected: options.expected_moves,
        quality_warning,
        metadata,
        failed_at: best.halted_at,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureLocator, MoveToken, Strategy, TokenSource};

    fn attempt(sans: &[&str], halted_at: Option<FailureLocator>) -> RecoveryAttempt {
        let consumed_all = halted_at.is_none() && !sans.is_empty();
        RecoveryAttempt {
            strategy: Strategy::StrippedDirect,
            accepted: sans
                .iter()
                .enumerate()
                .map(|(index, san)| MoveToken {
                    san: san.to_string(),
                    ply: index + 1,
                    source: TokenSource::Direct,
                })
                .collect(),
            halted_at,
            consumed_all,
        }
    }

    #[test]
    fn formats_and_renumbers() {
        let moves: Vec<String> = ["e4", "e5", "Nf3", "Nc6", "Bb5"].iter().map(|s| s.to_string()).collect();
        assert_eq!(format_movetext(&moves), "1. e4 e5 2. Nf3 Nc6 3. Bb5");
        assert_eq!(format_movetext(&[]), "");
    }

    #[test]
    fn full_recovery_is_not_partial() {
        let result = assemble(attempt(&["e4", "e5", "Nf3", "Nc6"], None), &Options::default(), None);
        assert!(result.success);
        assert!(!result.is_partial);
        assert_eq!(result.moves_found, 2);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3 Nc6");
        assert!(result.quality_warning.is_none());
    }

    #[test]
    fn over_recovery_is_trimmed_to_expected() {
        let options = Options { expected_moves: Some(2), ..Options::default() };
        let result = assemble(attempt(&["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"], None), &options, None);
        assert_eq!(result.moves_found, 2);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3 Nc6");
        assert!(!result.is_partial);
        assert!(result.quality_warning.is_none());
    }

    #[test]
    fn shortfall_sets_partial_and_warning() {
        let options = Options { expected_moves: Some(5), ..Options::default() };
        let halt = FailureLocator { token: "zzzz".to_string(), move_number: 3 };
        let result = assemble(attempt(&["e4", "e5", "Nf3", "Nc6"], Some(halt)), &options, None);
        assert!(result.success);
        assert!(result.is_partial);
        assert_eq!(result.moves_found, 2);
        assert_eq!(result.total_expected, Some(5));
        let warning = result.quality_warning.unwrap();
        assert!(warning.contains("Only 2 of 5 moves"));
        assert_eq!(result.failed_at.unwrap().token, "zzzz");
    }

    #[test]
    fn halt_without_expectation_is_partial_without_warning() {
        let halt = FailureLocator { token: "Qq9".to_string(), move_number: 2 };
        let result = assemble(attempt(&["e4", "e5"], Some(halt)), &Options::default(), None);
        assert!(result.success);
        assert!(result.is_partial);
        assert!(result.quality_warning.is_none());
    }

    #[test]
    fn empty_attempt_fails_with_locator() {
        let halt = FailureLocator { token: "???".to_string(), move_number: 1 };
        let result = assemble(attempt(&[], Some(halt)), &Options::default(), None);
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("`???` (move 1)"));

        let result = assemble(attempt(&[], None), &Options::default(), None);
        assert!(result.error.unwrap().contains("near start"));
    }

    #[test]
    fn odd_ply_counts_round_up() {
        let result = assemble(attempt(&["e4", "e5", "Nf3"], None), &Options::default(), None);
        assert_eq!(result.moves_found, 2);
        assert_eq!(result.movetext, "1. e4 e5 2. Nf3");
    }
}
