//! Kana-to-Hangul transliteration.
//!
//! Left-to-right scan over a kana string: digraphs win over single kana,
//! the long-vowel mark and detected vowel lengthening become either `-`
//! (hyphen style) or a repeated vowel syllable (merged style), and a final
//! pass folds the geminate (っ) and nasal (ん) markers into the preceding
//! syllable's final-consonant slot.

use crate::dict;
use crate::kana::{
    decompose, is_long_vowel_continuation, recompose, FINAL_NIEUN, FINAL_SIOS, INITIAL_IEUNG,
};

/// How a lengthened vowel is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum LongVowelStyle {
    /// Lengthening collapses to `-`.
    #[default]
    Hyphen,
    /// Lengthening keeps (or synthesizes) the vowel syllable.
    Merged,
}

const PURE_VOWELS: [char; 5] = ['아', '이', '우', '에', '오'];

/// Transliterate a kana string (hiragana, katakana or mixed) into Hangul
/// syllables. Unrecognized characters pass through unchanged.
pub fn kana_to_hangul(text: &str, style: LongVowelStyle) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        if i + 1 < chars.len() {
            let digraph: String = chars[i..i + 2].iter().collect();
            if let Some(value) = dict::digraph_syllable(&digraph) {
                out.extend(value.chars());
                i += 2;
                continue;
            }
        }

        let c = chars[i];
        let key = c.to_string();
        // ヴ lives in the digraph table but is a single kana
        if let Some(value) = dict::kana_syllable(&key).or_else(|| dict::digraph_syllable(&key)) {
            let syllable = value.chars().next().unwrap_or(c);
            let lengthening = PURE_VOWELS.contains(&syllable)
                && out
                    .last()
                    .is_some_and(|&prev| is_long_vowel_continuation(prev, syllable));
            if lengthening {
                match style {
                    LongVowelStyle::Hyphen => out.push('-'),
                    LongVowelStyle::Merged => out.push(syllable),
                }
            } else {
                out.extend(value.chars());
            }
        } else if c == 'ー' {
            match style {
                LongVowelStyle::Hyphen => out.push('-'),
                LongVowelStyle::Merged => match out.last().copied().and_then(decompose) {
                    Some((_, medial, _)) => out.push(recompose(INITIAL_IEUNG, medial, 0)),
                    None => out.push('-'),
                },
            }
        } else {
            out.push(c);
        }

        i += 1;
    }

    absorb_markers(out)
}

/// Fold geminate/nasal marker characters into the preceding syllable's
/// final-consonant slot. A marker with no preceding Hangul syllable renders
/// as a standalone jamo instead.
fn absorb_markers(chars: Vec<char>) -> String {
    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    for c in chars {
        let fin = match c {
            'っ' | 'ッ' => Some((FINAL_SIOS, 'ㅅ')),
            'ん' | 'ン' => Some((FINAL_NIEUN, 'ㄴ')),
            _ => None,
        };
        match fin {
            Some((fin, standalone)) => match out.last().copied().and_then(decompose) {
                Some((initial, medial, _)) => {
                    out.pop();
                    out.push(recompose(initial, medial, fin));
                }
                None => out.push(standalone),
            },
            None => out.push(c),
        }
    }
    out.into_iter().collect()
}

/// Rewrite hyphen-style output into merged style: each `-` after a Hangul
/// syllable becomes the null-initial syllable carrying the same vowel.
/// Glide-pair information is lost here, so prefer the stored merged form
/// when one exists.
pub fn hyphen_to_merged(text: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(text.chars().count());
    for c in text.chars() {
        if c == '-' {
            if let Some((_, medial, _)) = out.last().copied().and_then(decompose) {
                out.push(recompose(INITIAL_IEUNG, medial, 0));
                continue;
            }
        }
        out.push(c);
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{DIGRAPH_PAIRS, KANA_PAIRS};

    #[test]
    fn every_single_entry_matches_table() {
        for (kana, hangul) in KANA_PAIRS {
            assert_eq!(
                kana_to_hangul(kana, LongVowelStyle::Hyphen),
                *hangul,
                "entry {kana}"
            );
        }
    }

    #[test]
    fn every_digraph_entry_matches_table() {
        for (kana, hangul) in DIGRAPH_PAIRS {
            assert_eq!(
                kana_to_hangul(kana, LongVowelStyle::Hyphen),
                *hangul,
                "entry {kana}"
            );
        }
    }

    #[test]
    fn digraph_wins_over_single() {
        // きゃ must not decompose into 키 + 야
        assert_eq!(kana_to_hangul("きゃく", LongVowelStyle::Hyphen), "캬쿠");
    }

    #[test]
    fn geminate_absorbed() {
        let out = kana_to_hangul("がっこう", LongVowelStyle::Hyphen);
        assert_eq!(out, "갓코-");
        assert!(!out.contains('っ'));
    }

    #[test]
    fn geminate_merged_style() {
        assert_eq!(kana_to_hangul("がっこう", LongVowelStyle::Merged), "갓코우");
    }

    #[test]
    fn nasal_absorbed() {
        assert_eq!(kana_to_hangul("ほん", LongVowelStyle::Hyphen), "혼");
    }

    #[test]
    fn leading_marker_stays_standalone() {
        assert_eq!(kana_to_hangul("ん", LongVowelStyle::Hyphen), "ㄴ");
        assert_eq!(kana_to_hangul("っ", LongVowelStyle::Hyphen), "ㅅ");
    }

    #[test]
    fn long_vowel_mark() {
        assert_eq!(kana_to_hangul("コーヒー", LongVowelStyle::Hyphen), "코-히-");
        assert_eq!(kana_to_hangul("コーヒー", LongVowelStyle::Merged), "코오히이");
    }

    #[test]
    fn vowel_lengthening_collapses() {
        // とう: ㅗ followed by its glide vowel ㅜ
        assert_eq!(kana_to_hangul("とう", LongVowelStyle::Hyphen), "토-");
        assert_eq!(kana_to_hangul("とう", LongVowelStyle::Merged), "토우");
        // but a fresh vowel after a consonant syllable is kept
        assert_eq!(kana_to_hangul("かい", LongVowelStyle::Hyphen), "카이");
    }

    #[test]
    fn unknown_chars_pass_through() {
        assert_eq!(kana_to_hangul("猫だ", LongVowelStyle::Hyphen), "猫다");
    }

    #[test]
    fn hyphen_to_merged_repeats_vowel() {
        assert_eq!(hyphen_to_merged("코-히-"), "코오히이");
        assert_eq!(hyphen_to_merged("-a"), "-a");
    }
}
