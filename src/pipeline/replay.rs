//! Candidate replay.
//!
//! A segmentation strategy produces ordered tokens; replay applies them to a
//! fresh oracle one by one. A token that the oracle rejects verbatim goes
//! through the correction cascade; if that also fails, the attempt halts and
//! keeps its accepted prefix. Accepted moves always carry the oracle's
//! canonical spelling, not the raw token.

use crate::oracle::RulesOracle;
use crate::pipeline::correct;
use crate::{FailureLocator, MoveToken, Options, RecoveryAttempt, SegmentToken, Strategy, TokenSource};

/// Feed the raw movetext straight to the oracle's bulk loader. Succeeds only
/// when every token parses strictly; a single bad token yields None and the
/// token-by-token path takes over.
pub(crate) fn direct_load<O: RulesOracle>(movetext: &str) -> Option<RecoveryAttempt> {
    let oracle = O::load_movetext(movetext).ok()?;
    let history = oracle.history();
    if history.is_empty() {
        return None;
    }
    let accepted = history
        .iter()
        .enumerate()
        .map(|(index, san)| MoveToken { san: san.clone(), ply: index + 1, source: TokenSource::Direct })
        .collect();
    Some(RecoveryAttempt {
        strategy: Strategy::StrippedDirect,
        accepted,
        halted_at: None,
        consumed_all: true,
    })
}

/// Replay segmented tokens against a fresh oracle, correcting rejects.
pub(crate) fn replay_tokens<O: RulesOracle>(
    strategy: Strategy,
    tokens: &[SegmentToken],
    options: &Options,
) -> RecoveryAttempt {
    let debug = std::env::var_os("PGN_SALVAGE_DEBUG").is_some();
    let mut oracle = O::start();
    let mut accepted: Vec<MoveToken> = Vec::with_capacity(tokens.len());
    let mut halted_at = None;

    for token in tokens {
        let source = if oracle.apply(&token.text).is_ok() {
            Some(TokenSource::Direct)
        } else {
            match correct::repair(&token.text, &oracle, options) {
                Some((corrected, source)) => {
                    // Guaranteed by the corrector, every returned move applies.
                    oracle
                        .apply(&corrected)
                        .unwrap_or_else(|_| unreachable!("corrector returned an illegal move"));
                    Some(source)
                }
                None => None,
            }
        };

        match source {
            Some(source) => {
                let san = oracle
                    .history()
                    .last()
                    .cloned()
                    .unwrap_or_else(|| unreachable!("applied move missing from history"));
                let accepted_move = MoveToken { san, ply: accepted.len() + 1, source };
                if debug {
                    eprintln!(
                        "[{}] ply {}: \"{}\" -> {} ({})",
                        strategy.name(),
                        accepted_move.ply,
                        token.text,
                        accepted_move.san,
                        source.label()
                    );
                }
                accepted.push(accepted_move);
            }
            None => {
                if debug {
                    eprintln!(
                        "[{}] halt at \"{}\" (move {})",
                        strategy.name(),
                        token.text,
                        token.move_number
                    );
                }
                halted_at = Some(FailureLocator { token: token.text.clone(), move_number: token.move_number });
                break;
            }
        }
    }

    let consumed_all = halted_at.is_none() && !accepted.is_empty();
    RecoveryAttempt { strategy, accepted, halted_at, consumed_all }
}

/// The stripped-direct strategy: bulk load first, and when that fails fall
/// back to whitespace tokens so that malformed tokens still reach the
/// corrector instead of sinking the whole attempt.
pub(crate) fn stripped_attempt<O: RulesOracle>(stripped: &str, options: &Options) -> RecoveryAttempt {
    if let Some(attempt) = direct_load::<O>(stripped) {
        return attempt;
    }
    let tokens = crate::pipeline::segment::whitespace_tokens(stripped);
    replay_tokens::<O>(Strategy::StrippedDirect, &tokens, options)
}
