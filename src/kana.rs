//! Kana script conversion and Hangul syllable arithmetic.
//!
//! Hiragana and katakana occupy parallel Unicode blocks at a fixed offset of
//! 0x60, so script conversion is per-character arithmetic with no context.
//! Precomposed Hangul syllables (U+AC00..=U+D7A3) decompose into an
//! (initial, medial, final) index triple; the transliterator and the
//! clarification pass both rewrite the final slot through these helpers.

/// First precomposed Hangul syllable (가).
pub const HANGUL_BASE: u32 = 0xAC00;
/// Last precomposed Hangul syllable (힣).
pub const HANGUL_LAST: u32 = 0xD7A3;

const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

/// Initial-consonant index of ㅇ, the null initial.
pub const INITIAL_IEUNG: u32 = 11;
/// Final-consonant index of ㄴ, the folded nasal marker.
pub const FINAL_NIEUN: u32 = 4;
/// Final-consonant index of ㅅ, the folded geminate marker.
pub const FINAL_SIOS: u32 = 19;

/// Shift hiragana (U+3040..=U+309F) into katakana. Other characters pass
/// through unchanged.
pub fn to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3040}'..='\u{309F}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Shift katakana (U+30A0..=U+30FA) into hiragana. The range deliberately
/// stops before the katakana punctuation (・ー) so the long-vowel mark
/// survives round trips.
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{30A0}'..='\u{30FA}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Whether `c` is a precomposed Hangul syllable.
pub fn is_hangul_syllable(c: char) -> bool {
    (HANGUL_BASE..=HANGUL_LAST).contains(&(c as u32))
}

/// Split a precomposed syllable into its (initial, medial, final) indices.
pub fn decompose(c: char) -> Option<(u32, u32, u32)> {
    if !is_hangul_syllable(c) {
        return None;
    }
    let index = c as u32 - HANGUL_BASE;
    let initial = index / (MEDIAL_COUNT * FINAL_COUNT);
    let medial = (index % (MEDIAL_COUNT * FINAL_COUNT)) / FINAL_COUNT;
    let fin = index % FINAL_COUNT;
    Some((initial, medial, fin))
}

/// Rebuild a precomposed syllable from its index triple.
pub fn recompose(initial: u32, medial: u32, fin: u32) -> char {
    let code = HANGUL_BASE + initial * MEDIAL_COUNT * FINAL_COUNT + medial * FINAL_COUNT + fin;
    // all index triples within range land inside the syllable block
    char::from_u32(code).unwrap_or('\u{FFFD}')
}

/// True when `c` is a Hangul syllable with an empty final-consonant slot,
/// i.e. a pure vowel-ending syllable.
pub fn is_hangul_without_final(c: char) -> bool {
    matches!(decompose(c), Some((_, _, 0)))
}

/// True when `cur` phonetically lengthens the vowel of `prev` instead of
/// starting a new syllable: both are precomposed syllables, `cur` has the
/// null initial ㅇ, and the medials either match or form one of the six
/// vowel-glide pairs (ㅗ→ㅜ, ㅑ→ㅏ, ㅕ→ㅓ, ㅛ→ㅗ, ㅛ→ㅜ, ㅠ→ㅜ).
pub fn is_long_vowel_continuation(prev: char, cur: char) -> bool {
    let (Some((_, prev_medial, _)), Some((cur_initial, cur_medial, _))) =
        (decompose(prev), decompose(cur))
    else {
        return false;
    };

    if cur_initial != INITIAL_IEUNG {
        return false;
    }

    let glide_pair = matches!(
        (prev_medial, cur_medial),
        (8, 13) | (6, 0) | (7, 4) | (12, 8) | (12, 13) | (17, 13)
    );

    prev_medial == cur_medial || glide_pair
}
