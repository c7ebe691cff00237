//! OCR-error correction.
//!
//! Invoked only on oracle-rejected tokens. Four strategies run in a fixed
//! order, first success wins:
//!
//! ```text
//! rejected token ──▶ skeleton completion   (one missing component, unique)
//!                ──▶ fuzzy legal-move match (edit distance, no ties)
//!                ──▶ disambiguation insertion (files a..h, then ranks 1..8)
//!                ──▶ confusion substitutions  (table of single-char swaps)
//!                ──▶ None (unrecoverable; replay halts)
//! ```
//!
//! Every strategy validates against the live oracle's legal-move enumeration
//! or a disposable clone of its state; a returned string is guaranteed to
//! apply. Failure is an expected branch and is reported as `None`, never as
//! an error.

use crate::oracle::RulesOracle;
use crate::{Options, TokenSource};
use once_cell::sync::Lazy;
use regex::Regex;

bitflags::bitflags! {
    /// Correction strategies enabled for a run. All are on by default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CorrectionSet: u8 {
        const SKELETON = 1 << 0;
        const FUZZY = 1 << 1;
        const DISAMBIGUATION = 1 << 2;
        const SUBSTITUTION = 1 << 3;
    }
}

impl Default for CorrectionSet {
    fn default() -> Self {
        CorrectionSet::all()
    }
}

/// One entry of the confusion table: a pattern, its replacement, and whether
/// it applies to every occurrence or only the first.
#[derive(Debug, Clone)]
pub struct Substitution {
    pattern: Regex,
    replacement: String,
    all_occurrences: bool,
}

impl Substitution {
    pub fn new(pattern: &str, replacement: &str, all_occurrences: bool) -> Result<Self, regex::Error> {
        Ok(Substitution { pattern: Regex::new(pattern)?, replacement: replacement.to_string(), all_occurrences })
    }

    fn apply(&self, token: &str) -> String {
        if self.all_occurrences {
            self.pattern.replace_all(token, self.replacement.as_str()).into_owned()
        } else {
            self.pattern.replace(token, self.replacement.as_str()).into_owned()
        }
    }
}

/// The standard confusion table, as observed in handwritten-scoresheet
/// transcriptions: rank-by-one shifts, mirrored file letters (a↔g, b↔h, c↔e),
/// piece-move file confusions, and l↔1. The rank shifts are deliberately kept
/// asymmetric (`2→3` and `4→3` both appear); the table is data, not a model,
/// and callers may supply their own via [`Options`].
static STANDARD_SUBSTITUTIONS: Lazy<Vec<Substitution>> = Lazy::new(|| {
    let entries: &[(&str, &str, bool)] = &[
        // Rank confusions in square names, all occurrences.
        (r"([a-h])6", "${1}5", true),
        (r"([a-h])5", "${1}6", true),
        (r"([a-h])3", "${1}4", true),
        (r"([a-h])4", "${1}3", true),
        (r"([a-h])2", "${1}3", true),
        (r"([a-h])7", "${1}8", true),
        (r"([a-h])8", "${1}7", true),
        // File confusions after a piece letter, first occurrence.
        (r"Na(\d)", "Ng${1}", false),
        (r"Ng(\d)", "Na${1}", false),
        (r"Ba(\d)", "Bg${1}", false),
        (r"Bg(\d)", "Ba${1}", false),
        (r"Ra(\d)", "Rg${1}", false),
        (r"Rg(\d)", "Ra${1}", false),
        (r"Qa(\d)", "Qg${1}", false),
        (r"Qg(\d)", "Qa${1}", false),
        // Bare file confusions (pawn moves).
        (r"a([1-8])", "g${1}", false),
        (r"g([1-8])", "a${1}", false),
        (r"b([1-8])", "h${1}", false),
        (r"h([1-8])", "b${1}", false),
        (r"c([1-8])", "e${1}", false),
        (r"e([1-8])", "c${1}", false),
        (r"d([1-8])", "a${1}", false),
        // Digit/letter confusion.
        (r"l", "1", false),
        (r"1", "l", false),
    ];

    entries
        .iter()
        .map(|(pattern, replacement, all)| {
            Substitution::new(pattern, replacement, *all).expect("static substitution pattern")
        })
        .collect()
});

pub(crate) fn standard_substitutions() -> &'static [Substitution] {
    &STANDARD_SUBSTITUTIONS
}

/// Try to repair an oracle-rejected token. Returns the repaired move string
/// (guaranteed to apply to `oracle`) and the strategy that produced it.
pub(crate) fn repair<O: RulesOracle>(token: &str, oracle: &O, options: &Options) -> Option<(String, TokenSource)> {
    let enabled = options.corrections;
    let legal = oracle.legal_moves();
    let debug = std::env::var_os("PGN_SALVAGE_DEBUG").is_some();

    let found = if enabled.contains(CorrectionSet::SKELETON) {
        skeleton(token, &legal).map(|mv| (mv, TokenSource::SkeletonRepaired))
    } else {
        None
    };
    let found = found.or_else(|| {
        if enabled.contains(CorrectionSet::FUZZY) {
            fuzzy(token, &legal).map(|mv| (mv, TokenSource::FuzzyRepaired))
        } else {
            None
        }
    });
    let found = found.or_else(|| {
        if enabled.contains(CorrectionSet::DISAMBIGUATION) {
            disambiguate(token, &legal).map(|mv| (mv, TokenSource::Disambiguated))
        } else {
            None
        }
    });
    let found = found.or_else(|| {
        if enabled.contains(CorrectionSet::SUBSTITUTION) {
            substitute(token, oracle, options.substitution_table())
                .map(|mv| (mv, TokenSource::SubstitutionRepaired))
        } else {
            None
        }
    });

    if debug {
        match &found {
            Some((mv, source)) => eprintln!("[repair] token=\"{token}\" -> \"{mv}\" ({})", source.label()),
            None => eprintln!("[repair] token=\"{token}\" unrecoverable"),
        }
    }
    found
}

/// Capture, check, and mate symbols never disambiguate anything; comparisons
/// run on the bare move body.
fn strip_symbols(token: &str) -> String {
    regex!(r"[+#x]").replace_all(token, "").into_owned()
}

/// The single legal move whose stripped form is 3 characters and satisfies
/// `pred`, or None when zero or several qualify.
fn unique_candidate<F>(legal: &[String], pred: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let mut found: Option<&String> = None;
    for mv in legal {
        let clean = strip_symbols(mv);
        if clean.len() == 3 && pred(&clean) {
            if found.is_some() {
                return None;
            }
            found = Some(mv);
        }
    }
    found.cloned()
}

/// Skeleton completion: the token is structurally close to a move but misses
/// exactly one component (file, rank, or piece letter). Uniqueness over the
/// legal moves is required; an ambiguous skeleton is no correction at all.
fn skeleton(token: &str, legal: &[String]) -> Option<String> {
    let input = strip_symbols(token);

    // Missing file: `B6` -> `Bf6`.
    if regex!(r"^[RNBQK][1-8]$").is_match(&input) {
        let piece = &input[0..1];
        let rank = &input[1..2];
        return unique_candidate(legal, |mv| mv.starts_with(piece) && mv.ends_with(rank));
    }

    // Missing rank: `Bf` -> `Bf6`.
    if regex!(r"^[RNBQK][a-h]$").is_match(&input) {
        return unique_candidate(legal, |mv| mv.starts_with(&input));
    }

    // Missing piece letter: `f6` -> `Nf6`. Only reachable when the bare
    // square was not itself a legal pawn move (legal tokens never get here).
    if regex!(r"^[a-h][1-8]$").is_match(&input) {
        return unique_candidate(legal, |mv| {
            mv.ends_with(&input) && mv.starts_with(|c: char| "RNBQK".contains(c))
        });
    }

    None
}

/// Edit distance with unit-cost insertions, deletions, and substitutions.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Fuzzy legal-move matching. An exact match (symbols stripped, zeros read as
/// the castling letter) wins immediately; otherwise the minimum-distance
/// candidate wins only if it is within the length-dependent threshold and
/// strictly closer than every other candidate. Equidistant candidates reject
/// the match so that ambiguity falls through to disambiguation.
fn fuzzy(token: &str, legal: &[String]) -> Option<String> {
    let input = strip_symbols(token).replace('0', "O");
    let threshold = if input.chars().count() > 3 { 3 } else { 2 };

    let mut best: Option<&String> = None;
    let mut min_distance = usize::MAX;
    let mut tied = false;

    for mv in legal {
        let clean = strip_symbols(mv);
        if input == clean {
            return Some(mv.clone());
        }
        let distance = edit_distance(&input, &clean);
        if distance > threshold {
            continue;
        }
        if distance < min_distance {
            min_distance = distance;
            best = Some(mv);
            tied = false;
        } else if distance == min_distance {
            tied = true;
        }
    }

    if tied { None } else { best.cloned() }
}

/// Disambiguation completion: a piece move or piece capture that is ambiguous
/// as written gets each file letter, then each rank digit, inserted after the
/// piece letter. The first insertion that is exactly legal wins — the
/// tie-break is insertion order, not positional preference.
fn disambiguate(token: &str, legal: &[String]) -> Option<String> {
    let plain = regex!(r"^[RNBQK][a-h]?[1-8]$").is_match(token);
    let capture = regex!(r"^[RNBQK]x[a-h][1-8]$").is_match(token);
    if !plain && !capture {
        return None;
    }

    let piece = &token[0..1];
    let destination = &token[token.len() - 2..];
    let infix = if capture { "x" } else { "" };

    let is_legal = |candidate: &str| legal.iter().any(|mv| regex!(r"[+#]").replace_all(mv, "") == candidate);

    for file in 'a'..='h' {
        let candidate = format!("{piece}{file}{infix}{destination}");
        if is_legal(&candidate) {
            return Some(candidate);
        }
    }
    for rank in '1'..='8' {
        let candidate = format!("{piece}{rank}{infix}{destination}");
        if is_legal(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Confusion-table substitution: each entry is applied to the whole token and
/// the result validated on a disposable copy of the oracle state. First legal
/// result wins.
fn substitute<O: RulesOracle>(token: &str, oracle: &O, table: &[Substitution]) -> Option<String> {
    for substitution in table {
        let corrected = substitution.apply(token);
        if corrected == token {
            continue;
        }
        let mut probe = oracle.clone();
        if probe.apply(&corrected).is_ok() {
            return Some(corrected);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ShakmatyOracle;

    fn oracle_after(moves: &[&str]) -> ShakmatyOracle {
        let mut oracle = ShakmatyOracle::start();
        for mv in moves {
            oracle.apply(mv).unwrap();
        }
        oracle
    }

    #[test]
    fn skeleton_completes_missing_file() {
        // After 1. e4 e5 the only white bishop move ending on rank 6 is Ba6.
        let legal = oracle_after(&["e4", "e5"]).legal_moves();
        assert_eq!(skeleton("B6", &legal), Some("Ba6".to_string()));
    }

    #[test]
    fn skeleton_completes_missing_rank() {
        let legal = oracle_after(&["e4", "e5"]).legal_moves();
        assert_eq!(skeleton("Bc", &legal), Some("Bc4".to_string()));
    }

    #[test]
    fn skeleton_completes_missing_piece() {
        // From the start position only the knight reaches a3 with a 3-char move.
        let legal = ShakmatyOracle::start().legal_moves();
        assert_eq!(skeleton("a3", &legal), Some("Na3".to_string()));
    }

    #[test]
    fn skeleton_rejects_ambiguity() {
        // After 1. e4 e5 both Nf3 and Qf3 end on f3; "f3" is not unique.
        let legal = oracle_after(&["e4", "e5"]).legal_moves();
        assert_eq!(skeleton("f3", &legal), None);
    }

    #[test]
    fn fuzzy_accepts_exact_match_with_symbols() {
        let legal = ShakmatyOracle::start().legal_moves();
        assert_eq!(fuzzy("Nxf3", &legal), Some("Nf3".to_string()));
    }

    #[test]
    fn fuzzy_accepts_unique_minimum() {
        let legal = ShakmatyOracle::start().legal_moves();
        // Length > 3, threshold 3; Nf3 is the unique distance-1 candidate.
        assert_eq!(fuzzy("Nff3", &legal), Some("Nf3".to_string()));
    }

    #[test]
    fn fuzzy_rejects_ties() {
        // "d5" is equidistant from d3 and d4 at the start position.
        let legal = ShakmatyOracle::start().legal_moves();
        assert_eq!(fuzzy("d5", &legal), None);
    }

    #[test]
    fn fuzzy_rejects_beyond_threshold() {
        let legal = ShakmatyOracle::start().legal_moves();
        assert_eq!(fuzzy("zzzz", &legal), None);
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", "Nf3"), 3);
        assert_eq!(edit_distance("Nf3", "Nf3"), 0);
        assert_eq!(edit_distance("Nf3", "Nh3"), 1);
        assert_eq!(edit_distance("Rd1", "Rad1"), 1);
        assert_eq!(edit_distance("Qd5", "Bd4"), 2);
    }

    #[test]
    fn disambiguation_tries_files_in_order() {
        // Two rooks can reach d1; file insertions run a..h, so Rad1 wins.
        let oracle = ShakmatyOracle::from_board("6k1/8/8/8/8/8/8/R4RK1 w - - 0 1").unwrap();
        let legal = oracle.legal_moves();
        assert!(legal.iter().any(|m| m == "Rad1"));
        assert!(legal.iter().any(|m| m == "Rfd1"));
        assert_eq!(disambiguate("Rd1", &legal), Some("Rad1".to_string()));
    }

    #[test]
    fn disambiguation_ignores_other_shapes() {
        let legal = ShakmatyOracle::start().legal_moves();
        assert_eq!(disambiguate("e4", &legal), None);
        assert_eq!(disambiguate("O-O", &legal), None);
    }

    #[test]
    fn substitution_repairs_mirrored_file() {
        // Ng3 is illegal at the start; the Ng->Na entry yields the legal Na3.
        let oracle = ShakmatyOracle::start();
        assert_eq!(substitute("Ng3", &oracle, standard_substitutions()), Some("Na3".to_string()));
    }

    #[test]
    fn substitution_leaves_state_untouched() {
        let oracle = ShakmatyOracle::start();
        let before = oracle.legal_moves();
        let _ = substitute("Ng3", &oracle, standard_substitutions());
        assert_eq!(oracle.legal_moves(), before);
    }

    #[test]
    fn repair_order_prefers_skeleton_then_falls_through() {
        let options = Options::default();

        let oracle = oracle_after(&["e4", "e5"]);
        assert_eq!(repair("B6", &oracle, &options), Some(("Ba6".to_string(), TokenSource::SkeletonRepaired)));

        // Ng3: skeleton shape mismatch, fuzzy tie (Na3/Nh3), no legal
        // disambiguation, finally repaired by the confusion table.
        let oracle = ShakmatyOracle::start();
        assert_eq!(
            repair("Ng3", &oracle, &options),
            Some(("Na3".to_string(), TokenSource::SubstitutionRepaired))
        );
    }

    #[test]
    fn disabled_strategies_are_skipped() {
        let options = Options { corrections: CorrectionSet::empty(), ..Options::default() };
        let oracle = oracle_after(&["e4", "e5"]);
        assert_eq!(repair("B6", &oracle, &options), None);
    }
}
