//! Segment classification: one tokenizer segment in, one [`Unit`] out.
//!
//! The priority order mirrors how lyric text actually breaks down: custom
//! dictionary overrides first, then pure kana, punctuation, Latin
//! passthrough, under-featured segments, and finally the kanji/particle
//! path that needs the pronunciation lookup and the alternatives lattice.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::kana::to_hiragana;
use crate::models::{AltString, HangulPair, Unit};
use crate::tokenizer::{Segment, Tokenizer};
use crate::transliterate::{kana_to_hangul, LongVowelStyle};

pub(crate) const POS_PARTICLE: &str = "助詞";
pub(crate) const POS_AUXILIARY: &str = "助動詞";
pub(crate) const POS_SUFFIX: &str = "接尾辞";
pub(crate) const POS_PREFIX: &str = "接頭辞";
pub(crate) const POS_NUMERAL: &str = "数詞";
pub(crate) const POS_COUNTER_CAPABLE: &str = "助数詞可能";
pub(crate) const POS_BOUND: &str = "非自立";
pub(crate) const POS_BOUND_CAPABLE: &str = "非自立可能";
const POS_SUPPLEMENTARY_SYMBOL: &str = "補助記号";

lazy_static! {
    static ref ASCII_PRINTABLE_RE: Regex = Regex::new(r"^[\x20-\x7E]+$").unwrap();
    static ref KANA_RE: Regex = Regex::new(r"^[\x{3040}-\x{30FF}]+$").unwrap();
}

/// Entirely printable ASCII, the "leave it alone" class.
pub(crate) fn is_ascii_printable(text: &str) -> bool {
    ASCII_PRINTABLE_RE.is_match(text)
}

/// Entirely hiragana/katakana (the long-vowel mark included).
pub(crate) fn is_pure_kana(text: &str) -> bool {
    KANA_RE.is_match(text)
}

/// Both Hangul long-vowel styles for one katakana string.
fn hangul_pair(kana: &str) -> HangulPair {
    HangulPair::new(
        kana_to_hangul(kana, LongVowelStyle::Hyphen),
        kana_to_hangul(kana, LongVowelStyle::Merged),
    )
}

/// Tokenize one sentence and classify every segment.
pub fn sentence_to_units(
    tokenizer: &dyn Tokenizer,
    custom_dict: &HashMap<String, String>,
    sentence: &str,
) -> anyhow::Result<Vec<Unit>> {
    let segments = tokenizer.segment(sentence)?;
    Ok(segments
        .iter()
        .map(|s| classify_segment(s, custom_dict))
        .collect())
}

/// Decide a segment's category and build its unit.
pub fn classify_segment(segment: &Segment, custom_dict: &HashMap<String, String>) -> Unit {
    if !segment.known {
        // analyzer had no character class for this span
        return Unit::passthrough(
            &segment.surface,
            segment.pos1.clone(),
            segment.pos2.clone(),
            segment.pos3.clone(),
        );
    }

    if let Some(reading) = custom_dict.get(&segment.surface) {
        return Unit::new(
            &segment.surface,
            reading,
            reading,
            hangul_pair(reading),
            hangul_pair(reading),
            true,
            segment.pos1.clone(),
            segment.pos2.clone(),
            segment.pos3.clone(),
        );
    }

    if segment.feature_count > 0 && segment.pos1 != POS_PARTICLE && is_pure_kana(&segment.surface)
    {
        let kana = to_hiragana(&segment.surface);
        return Unit::new(
            &segment.surface,
            kana.clone(),
            kana,
            hangul_pair(&segment.surface),
            hangul_pair(&segment.surface),
            false,
            segment.pos1.clone(),
            segment.pos2.clone(),
            segment.pos3.clone(),
        );
    }

    if segment.pos1 == POS_SUPPLEMENTARY_SYMBOL {
        return punctuation_unit(segment);
    }

    if is_ascii_printable(&segment.surface) && segment.pos2 != POS_NUMERAL {
        return Unit::passthrough(
            &segment.surface,
            segment.pos1.clone(),
            segment.pos2.clone(),
            segment.pos3.clone(),
        );
    }

    if segment.feature_count <= 6 {
        // too few features to trust the reading, treat like punctuation
        return punctuation_unit(segment);
    }

    // kanji, mixed script, or a particle needing its pronunciation
    let pron = segment.pronunciation.clone();
    let reading = if segment.pos1 == POS_PARTICLE {
        segment.pronunciation.clone()
    } else {
        segment.reading.clone()
    };

    let mut unit = Unit::new(
        &segment.surface,
        to_hiragana(&pron),
        to_hiragana(&reading),
        hangul_pair(&pron),
        hangul_pair(&reading),
        !is_pure_kana(&segment.surface),
        segment.pos1.clone(),
        segment.pos2.clone(),
        segment.pos3.clone(),
    );
    fill_alternatives(&mut unit, segment, &pron, &reading);
    unit
}

/// Punctuation keeps its surface, renders no Hangul, and spaces like a
/// particle.
fn punctuation_unit(segment: &Segment) -> Unit {
    Unit::new(
        &segment.surface,
        &segment.surface,
        &segment.surface,
        HangulPair::default(),
        HangulPair::default(),
        false,
        POS_PARTICLE,
        segment.pos2.clone(),
        segment.pos3.clone(),
    )
}

/// Walk the segment's lattice adjacency view iteratively, collect every
/// sibling covering the same span, deduplicate by pronunciation, and expose
/// the survivors as selectable alternatives. The unit's own reading always
/// sits at id 1.
fn fill_alternatives(unit: &mut Unit, segment: &Segment, pron: &str, reading: &str) {
    if segment.nodes.is_empty() {
        return;
    }

    let mut stack: Vec<usize> = segment.roots.clone();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut collected: Vec<(String, String)> = vec![(pron.to_string(), reading.to_string())];

    while let Some(index) = stack.pop() {
        if !visited.insert(index) {
            continue;
        }
        let Some(node) = segment.nodes.get(index) else {
            continue;
        };
        if node.span_length == segment.span_length && !node.pronunciation.is_empty() {
            collected.push((node.pronunciation.clone(), node.reading.clone()));
        }
        stack.extend(node.next.iter().copied());
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut kana_pron = Vec::new();
    let mut hangul_pron = Vec::new();
    let mut kana_reading = Vec::new();
    let mut hangul_reading = Vec::new();
    let mut id: u16 = 1;
    for (p, r) in collected {
        if !seen.insert(p.clone()) {
            continue;
        }
        kana_pron.push(AltString::new(id, to_hiragana(&p), true));
        hangul_pron.push(AltString::new(
            id,
            kana_to_hangul(&p, LongVowelStyle::Hyphen),
            true,
        ));
        kana_reading.push(AltString::new(id, to_hiragana(&r), true));
        hangul_reading.push(AltString::new(
            id,
            kana_to_hangul(&r, LongVowelStyle::Hyphen),
            true,
        ));
        id += 1;
    }

    if kana_pron.is_empty() {
        return;
    }
    unit.alternatives.kana_pron = kana_pron;
    unit.alternatives.hangul_pron = hangul_pron;
    unit.alternatives.kana_reading = kana_reading;
    unit.alternatives.hangul_reading = hangul_reading;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::LatticeNode;

    fn seg(surface: &str, pron: &str, reading: &str, pos: [&str; 3]) -> Segment {
        Segment {
            surface: surface.to_string(),
            pronunciation: pron.to_string(),
            reading: reading.to_string(),
            pos1: pos[0].to_string(),
            pos2: pos[1].to_string(),
            pos3: pos[2].to_string(),
            feature_count: 9,
            span_length: surface.chars().count(),
            known: true,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    #[test]
    fn custom_dict_overrides_everything() {
        let dict = HashMap::from([("明日".to_string(), "アシタ".to_string())]);
        let unit = classify_segment(&seg("明日", "アス", "アス", ["名詞", "", ""]), &dict);
        assert_eq!(unit.kana_pron, "アシタ");
        assert_eq!(unit.hangul_pron.hyphen, "아시타");
        assert!(unit.is_foreign_or_kanji);
    }

    #[test]
    fn pure_kana_uses_surface() {
        let unit = classify_segment(
            &seg("ココロ", "ココロ", "ココロ", ["名詞", "普通名詞", ""]),
            &HashMap::new(),
        );
        assert_eq!(unit.kana_pron, "こころ");
        assert_eq!(unit.hangul_pron.hyphen, "코코로");
        assert!(!unit.is_foreign_or_kanji);
    }

    #[test]
    fn punctuation_spaces_like_particle() {
        let unit = classify_segment(
            &seg("、", "", "", ["補助記号", "読点", ""]),
            &HashMap::new(),
        );
        assert_eq!(unit.kana_pron, "、");
        assert_eq!(unit.hangul_pron.hyphen, "");
        assert_eq!(unit.pos1, POS_PARTICLE);
    }

    #[test]
    fn latin_passes_through() {
        let unit = classify_segment(
            &seg("Tokyo", "", "", ["名詞", "固有名詞", ""]),
            &HashMap::new(),
        );
        assert_eq!(unit.hangul_pron.hyphen, "Tokyo");
        assert!(!unit.is_foreign_or_kanji);
    }

    #[test]
    fn sparse_features_treated_as_punctuation() {
        let mut segment = seg("〆", "", "", ["名詞", "", ""]);
        segment.feature_count = 4;
        let unit = classify_segment(&segment, &HashMap::new());
        assert_eq!(unit.hangul_pron.hyphen, "");
        assert_eq!(unit.pos1, POS_PARTICLE);
    }

    #[test]
    fn kanji_derives_both_variants() {
        let unit = classify_segment(
            &seg("学校", "ガッコー", "ガッコウ", ["名詞", "普通名詞", "一般"]),
            &HashMap::new(),
        );
        assert_eq!(unit.kana_pron, "がっこー");
        assert_eq!(unit.kana_reading, "がっこう");
        assert_eq!(unit.hangul_pron.hyphen, "갓코-");
        assert_eq!(unit.hangul_reading.hyphen, "갓코-");
        assert_eq!(unit.hangul_reading.merged, "갓코우");
        assert!(unit.is_foreign_or_kanji);
    }

    #[test]
    fn particle_reads_from_pronunciation() {
        let unit = classify_segment(&seg("は", "ワ", "ハ", ["助詞", "係助詞", ""]), &HashMap::new());
        assert_eq!(unit.kana_pron, "わ");
        assert_eq!(unit.kana_reading, "わ");
        assert_eq!(unit.hangul_pron.hyphen, "와");
        assert!(!unit.is_foreign_or_kanji);
    }

    #[test]
    fn alternatives_collected_and_deduplicated() {
        let mut segment = seg("行った", "イッタ", "イッタ", ["動詞", "一般", ""]);
        segment.nodes = vec![
            LatticeNode {
                pronunciation: "オコナッタ".to_string(),
                reading: "オコナッタ".to_string(),
                span_length: 3,
                next: vec![1, 2],
            },
            LatticeNode {
                // same pronunciation again, must deduplicate
                pronunciation: "イッタ".to_string(),
                reading: "イッタ".to_string(),
                span_length: 3,
                next: vec![],
            },
            LatticeNode {
                // different span, must be ignored
                pronunciation: "ユ".to_string(),
                reading: "ユ".to_string(),
                span_length: 1,
                next: vec![0],
            },
        ];
        segment.roots = vec![0];
        let unit = classify_segment(&segment, &HashMap::new());
        let ids: Vec<u16> = unit.alternatives.kana_pron.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(unit.alternatives.kana_pron[0].text, "いった");
        assert_eq!(unit.alternatives.kana_pron[1].text, "おこなった");
        assert_eq!(unit.alternatives.hangul_pron[1].text, "오코낫타");
    }

    #[test]
    fn unknown_segment_passes_through() {
        let mut segment = seg("♪", "", "", ["", "", ""]);
        segment.known = false;
        let unit = classify_segment(&segment, &HashMap::new());
        assert_eq!(unit.hangul_pron.hyphen, "♪");
    }
}
