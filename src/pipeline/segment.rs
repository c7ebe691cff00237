//! Move segmentation.
//!
//! The segmenter turns normalized text into candidate token streams for the
//! replayer. Three strategies are tried, highest priority first:
//!
//! 1. **Stripped-direct** (`strip_annotations` + oracle load, with a raw
//!    whitespace-token fallback handled in `replay.rs`). No shape filter, so
//!    malformed tokens still reach the correction engine.
//! 2. **Numbered pairs**: scan `<number>.` anchors, take up to two tokens per
//!    anchor, fill a sparse White/Black table indexed by the claimed move
//!    number.
//! 3. **Flat stream**: scan for anything matching the move grammar, ignoring
//!    numbering entirely, and pair consecutive matches.
//!
//! Which strategy wins is decided after replay by accepted-move count, not
//! here by raw token count.

use crate::SegmentToken;
use crate::pipeline::normalize;

/// Claimed move numbers above this are treated as transcription garbage.
const MAX_MOVE_NUMBER: usize = 512;

/// Remove header tags, brace and semicolon comments, nested parenthetical
/// variations (to a fixed point), and a trailing game-termination marker.
/// Output is whitespace-collapsed.
pub(crate) fn strip_annotations(text: &str) -> String {
    let mut s = regex!(r"\[[^\]]*\]").replace_all(text, " ").into_owned();
    s = regex!(r"\{[^}]*\}").replace_all(&s, " ").into_owned();
    s = regex!(r";[^\n]*").replace_all(&s, " ").into_owned();

    // Variations nest; strip innermost-first until nothing changes.
    loop {
        let next = regex!(r"\([^()]*\)").replace_all(&s, " ").into_owned();
        if next == s {
            break;
        }
        s = next;
    }

    let s = regex!(r"\s+").replace_all(&s, " ");
    let s = s.trim();

    // The generic hyphen strip turns `1-0` into `10`; drop the termination
    // marker in both spellings so it never reaches the replayer as a token.
    regex!(r"(?:^|\s)(?:1-0|0-1|1/2-1/2|1/21/2|10|01|\*)\s*$").replace(s, "").trim().to_string()
}

/// Syntactic move-shape filter: castling, or the piece/file/rank/capture/
/// promotion grammar with a mandatory destination square.
pub(crate) fn is_move_shaped(token: &str) -> bool {
    if token.len() < 2 {
        return false;
    }

    let cleaned = regex!(r"[+#?!]").replace_all(token, "");
    let normalized = normalize::normalize(cleaned.trim());

    if regex!(r"(?i)^(O-O-O|O-O)$").is_match(&normalized) {
        return true;
    }
    if !regex!(r"[a-h][1-8]").is_match(&normalized) {
        return false;
    }
    regex!(r"(?i)^[NBRQK]?[a-h]?[1-8]?x?[a-h][1-8](=[NBRQ])?$").is_match(&normalized)
}

/// Re-normalize an individual token (normalization is idempotent, so this is
/// safe on already-normalized text) and uppercase castling.
pub(crate) fn clean_token(token: &str) -> String {
    let normalized = normalize::normalize(token.trim());
    if regex!(r"(?i)^(O-O-O|O-O)$").is_match(&normalized) {
        return normalized.to_uppercase();
    }
    normalized
}

/// Numbered-pair extraction: a sparse White/Black table indexed by the claimed
/// move number, filled only with shape-passing tokens. A move entry without a
/// valid White token is dropped entirely.
pub(crate) fn numbered_pairs(text: &str) -> Vec<SegmentToken> {
    let anchors: Vec<_> = regex!(r"(\d+)\.").captures_iter(text).collect();
    let mut table: Vec<(Option<String>, Option<String>)> = Vec::new();

    for (idx, caps) in anchors.iter().enumerate() {
        let whole = caps.get(0).expect("group 0 always present");
        let Ok(number) = caps[1].parse::<usize>() else { continue };
        if number == 0 || number > MAX_MOVE_NUMBER {
            continue;
        }

        let segment_end =
            anchors.get(idx + 1).map_or(text.len(), |next| next.get(0).expect("group 0 always present").start());
        let segment = &text[whole.end()..segment_end];

        let mut tokens = segment.split_whitespace();
        let Some(white) = tokens.next() else { continue };
        if !is_move_shaped(white) {
            continue;
        }

        if table.len() < number {
            table.resize(number, (None, None));
        }
        let entry = &mut table[number - 1];
        entry.0 = Some(clean_token(white));
        if let Some(black) = tokens.next() {
            if is_move_shaped(black) {
                entry.1 = Some(clean_token(black));
            }
        }
    }

    let mut out = Vec::new();
    for (idx, (white, black)) in table.into_iter().enumerate() {
        if let Some(white) = white {
            out.push(SegmentToken { text: white, move_number: idx + 1 });
        }
        if let Some(black) = black {
            out.push(SegmentToken { text: black, move_number: idx + 1 });
        }
    }
    out
}

/// Flat single-move stream: every move-grammar match in order, numbers
/// ignored, consecutive matches paired as White/Black.
pub(crate) fn flat_stream(text: &str) -> Vec<SegmentToken> {
    let grammar = regex!(r"[NBRQK]?[a-h]?[1-8]?x?[a-h][1-8](?:=[NBRQ])?[+#]?|O-O-O|O-O");
    let matches: Vec<&str> = grammar.find_iter(text).map(|m| m.as_str()).collect();
    if matches.len() < 2 {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut move_number = 1;
    let mut idx = 0;
    while idx < matches.len() {
        let white = clean_token(matches[idx]);
        if is_move_shaped(&white) {
            out.push(SegmentToken { text: white, move_number });
            if let Some(black) = matches.get(idx + 1) {
                let black = clean_token(black);
                if is_move_shaped(&black) {
                    out.push(SegmentToken { text: black, move_number });
                }
            }
            move_number += 1;
        }
        idx += 2;
    }
    out
}

/// Raw whitespace tokenization for the stripped-direct replay fallback: move
/// numbers update the failure-locator label and are otherwise skipped; every
/// remaining token passes through unfiltered (the replayer and corrector
/// decide its fate).
pub(crate) fn whitespace_tokens(text: &str) -> Vec<SegmentToken> {
    let mut out = Vec::new();
    let mut current = 1usize;

    for raw in text.split_whitespace() {
        if let Some(caps) = regex!(r"^(\d+)\.$").captures(raw) {
            current = caps[1].parse().unwrap_or(current);
            continue;
        }
        let cleaned = regex!(r"\d+\.").replace_all(raw, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }
        out.push(SegmentToken { text: normalize::normalize(cleaned), move_number: current });
    }
    out
}
