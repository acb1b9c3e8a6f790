//! The per-line conversion loop: script detection, sentence runs, the
//! classifier, and the variant resolver.
//!
//! A line classified as Chinese never converts; it attaches to the
//! preceding Japanese line as its paired translation instead. Within a
//! line, printable-ASCII runs skip tokenization entirely.

use lazy_static::lazy_static;
use regex::Regex;

use crate::classify::{is_ascii_printable, sentence_to_units};
use crate::models::{Line, Unit};
use crate::Converter;

lazy_static! {
    // anything that survived transliteration without becoming Hangul,
    // Latin, a digit or a space
    static ref UNRESOLVED_RE: Regex =
        Regex::new(r"[^a-zA-Z0-9\u{AC00}-\u{D7A3} ]").unwrap();
}

/// Whether a line reads as Chinese: at least two characters, no kana (the
/// long-vowel mark is exempt), at least one CJK ideograph, and the share of
/// ideographs plus Latin letters among classifiable characters reaching
/// `tolerance`.
pub fn is_chinese(line: &str, tolerance: f32) -> bool {
    if line.chars().count() < 2 {
        return false;
    }

    let mut cjk = 0u32;
    let mut latin = 0u32;
    let mut total = 0u32;
    for c in line.chars() {
        if c != 'ー' && matches!(c, '\u{3040}'..='\u{30FF}') {
            return false;
        }
        if ('\u{4E00}'..='\u{9FFF}').contains(&c) {
            cjk += 1;
            total += 1;
        } else if c.is_ascii_alphabetic() {
            latin += 1;
            total += 1;
        }
    }

    if cjk == 0 {
        return false;
    }
    (cjk + latin) as f32 / total as f32 >= tolerance
}

/// Split a line into maximal runs of printable ASCII and everything else,
/// preserving order. Each run converts independently.
fn split_script_runs(line: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut last_ascii: Option<bool> = None;
    for c in line.chars() {
        let ascii = matches!(c, '\x20'..='\x7E');
        match runs.last_mut() {
            Some(run) if last_ascii == Some(ascii) => run.push(c),
            _ => runs.push(c.to_string()),
        }
        last_ascii = Some(ascii);
    }
    runs
}

impl Converter {
    /// Convert lyric text into lines of classified units. Empty lines are
    /// dropped, Chinese lines become the preceding line's translation, and
    /// `auto_variant` substitutes variant kanji that defeated the analyzer.
    pub fn convert(
        &self,
        text: &str,
        auto_variant: bool,
        chinese_tolerance: f32,
    ) -> anyhow::Result<Vec<Line>> {
        let source_lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

        let mut lines: Vec<Line> = Vec::new();
        for (i, &raw) in source_lines.iter().enumerate() {
            if is_chinese(raw, chinese_tolerance) {
                continue;
            }

            // a pasted \0 truncates clipboard text downstream
            let mut source = raw.replace('\0', "");
            let mut units: Vec<Unit> = Vec::new();
            for sentence in split_script_runs(&source) {
                if is_ascii_printable(&sentence) {
                    units.push(Unit::passthrough(&sentence, "", "", ""));
                    continue;
                }

                let mut sentence_units =
                    sentence_to_units(self.tokenizer.as_ref(), &self.custom_dict, &sentence)?;
                if auto_variant {
                    sentence_units = self.resolve_variants(&sentence, sentence_units, &mut source)?;
                }
                units.extend(sentence_units);
            }

            let translation = source_lines
                .get(i + 1)
                .filter(|next| is_chinese(next, chinese_tolerance))
                .map(|next| next.to_string());

            lines.push(Line {
                source,
                translation,
                units,
                index: lines.len() as u16,
            });
        }

        Ok(lines)
    }

    /// Characters that survive into the Hangul output untransliterated are
    /// usually variant kanji the analyzer's dictionary does not know.
    /// Substitute them one at a time through the variant table, updating
    /// both the working sentence and the line's displayed source, and stop
    /// as soon as the output comes out clean. If it never does, the last
    /// attempt stands.
    fn resolve_variants(
        &self,
        sentence: &str,
        units: Vec<Unit>,
        line_source: &mut String,
    ) -> anyhow::Result<Vec<Unit>> {
        let offending: Vec<char> = UNRESOLVED_RE
            .find_iter(&merged_hangul(&units))
            .filter_map(|m| m.as_str().chars().next())
            .collect();
        if offending.is_empty() {
            return Ok(units);
        }

        let mut working = sentence.to_string();
        let mut units = units;
        for c in offending {
            let Some(replacement) = self.variants.variant(c) else {
                log::debug!("no variant mapping for {:?}", c);
                continue;
            };

            working = working.replace(c, &replacement.to_string());
            *line_source = line_source.replace(c, &replacement.to_string());

            units = sentence_to_units(self.tokenizer.as_ref(), &self.custom_dict, &working)?;
            if !UNRESOLVED_RE.is_match(&merged_hangul(&units)) {
                break;
            }
        }
        Ok(units)
    }
}

/// The sentence's whole Hangul rendering in merged long-vowel style, the
/// form the variant resolver inspects.
fn merged_hangul(units: &[Unit]) -> String {
    units
        .iter()
        .map(|u| u.hangul_pron.merged.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::dict::VariantTable;
    use crate::tokenizer::{Segment, Tokenizer};

    #[test]
    fn chinese_detection_matches_heuristic() {
        assert!(is_chinese("你好世界", 1.0));
        // kana anywhere disqualifies, regardless of tolerance
        assert!(!is_chinese("你好ですか", 0.0));
        // the long-vowel mark alone is not kana for this purpose
        assert!(!is_chinese("ー", 1.0));
        // too short
        assert!(!is_chinese("你", 1.0));
        // no ideographs at all
        assert!(!is_chinese("hello", 0.0));
        // mixed hanzi and Latin passes a loose tolerance
        assert!(is_chinese("你好hello", 1.0));
        // punctuation is unclassifiable, not counted against the ratio
        assert!(is_chinese("你好、世界", 1.0));
    }

    #[test]
    fn script_runs_split_on_ascii_boundaries() {
        assert_eq!(
            split_script_runs("abc猫です123"),
            vec!["abc", "猫です", "123"]
        );
        assert_eq!(split_script_runs("猫"), vec!["猫"]);
        assert!(split_script_runs("").is_empty());
    }

    struct MockTokenizer {
        sentences: HashMap<String, Vec<Segment>>,
    }

    impl Tokenizer for MockTokenizer {
        fn segment(&self, sentence: &str) -> anyhow::Result<Vec<Segment>> {
            self.sentences
                .get(sentence)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no segmentation for {:?}", sentence))
        }
    }

    fn seg(surface: &str, pron: &str, pos1: &str) -> Segment {
        Segment {
            surface: surface.to_string(),
            pronunciation: pron.to_string(),
            reading: pron.to_string(),
            pos1: pos1.to_string(),
            pos2: String::new(),
            pos3: String::new(),
            feature_count: 9,
            span_length: surface.chars().count(),
            known: true,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn converter(sentences: HashMap<String, Vec<Segment>>, variants: VariantTable) -> Converter {
        Converter {
            tokenizer: Box::new(MockTokenizer { sentences }),
            custom_dict: HashMap::new(),
            variants,
        }
    }

    #[test]
    fn converts_a_simple_sentence() {
        let sentences = HashMap::from([(
            "これは猫です".to_string(),
            vec![
                seg("これ", "コレ", "代名詞"),
                seg("は", "ワ", "助詞"),
                seg("猫", "ネコ", "名詞"),
                seg("です", "デス", "助動詞"),
            ],
        )]);
        let conv = converter(sentences, VariantTable::default());
        let lines = conv.convert("これは猫です", false, 1.0).unwrap();
        assert_eq!(lines.len(), 1);
        let hanguls: Vec<&str> = lines[0]
            .units
            .iter()
            .map(|u| u.hangul_pron.hyphen.as_str())
            .collect();
        assert_eq!(hanguls, vec!["코레", "와", "네코", "데스"]);
    }

    #[test]
    fn chinese_line_becomes_translation() {
        let sentences = HashMap::from([(
            "猫です".to_string(),
            vec![seg("猫", "ネコ", "名詞"), seg("です", "デス", "助動詞")],
        )]);
        let conv = converter(sentences, VariantTable::default());
        let lines = conv.convert("猫です\n是猫\n", false, 1.0).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].translation.as_deref(), Some("是猫"));
        assert_eq!(lines[0].index, 0);
    }

    #[test]
    fn empty_lines_and_nul_bytes_are_scrubbed() {
        let sentences = HashMap::from([(
            "猫です".to_string(),
            vec![seg("猫です", "ネコデス", "名詞")],
        )]);
        let conv = converter(sentences, VariantTable::default());
        let lines = conv.convert("\n猫\u{0}です\n\n", false, 1.0).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].source, "猫です");
    }

    #[test]
    fn ascii_run_skips_tokenization() {
        let sentences = HashMap::from([(
            "猫".to_string(),
            vec![seg("猫", "ネコ", "名詞")],
        )]);
        let conv = converter(sentences, VariantTable::default());
        let lines = conv.convert("Yeah! 猫", false, 1.0).unwrap();
        assert_eq!(lines[0].units.len(), 2);
        assert_eq!(lines[0].units[0].hangul_pron.hyphen, "Yeah! ");
        assert_eq!(lines[0].units[1].hangul_pron.hyphen, "네코");
    }

    #[test]
    fn variant_substitution_recovers_reading() {
        // the analyzer knows 恋 but not the variant form 戀
        let mut unknown = seg("戀", "", "");
        unknown.known = false;
        let sentences = HashMap::from([
            ("戀".to_string(), vec![unknown]),
            ("恋".to_string(), vec![seg("恋", "コイ", "名詞")]),
        ]);
        let variants = VariantTable::from_json(r#"{"戀": "恋"}"#).unwrap();
        let conv = converter(sentences, variants);

        let lines = conv.convert("戀", true, 1.0).unwrap();
        assert_eq!(lines[0].source, "恋");
        assert_eq!(lines[0].units[0].hangul_pron.hyphen, "코이");

        // without auto-variant the surface passes through untouched
        let lines = conv.convert("戀", false, 1.0).unwrap();
        assert_eq!(lines[0].source, "戀");
        assert_eq!(lines[0].units[0].hangul_pron.hyphen, "戀");
    }

    #[test]
    fn unmapped_variant_keeps_last_attempt() {
        let mut unknown = seg("﨑", "", "");
        unknown.known = false;
        let sentences = HashMap::from([("﨑".to_string(), vec![unknown])]);
        let conv = converter(sentences, VariantTable::from_json("{}").unwrap());
        let lines = conv.convert("﨑", true, 1.0).unwrap();
        assert_eq!(lines[0].units[0].hangul_pron.hyphen, "﨑");
    }

    #[test]
    fn end_to_end_rendered_line() {
        let sentences = HashMap::from([(
            "これは猫です".to_string(),
            vec![
                seg("これ", "コレ", "代名詞"),
                seg("は", "ワ", "助詞"),
                seg("猫", "ネコ", "名詞"),
                seg("です", "デス", "助動詞"),
            ],
        )]);
        let conv = converter(sentences, VariantTable::default());
        let lines = conv.convert("これは猫です", false, 1.0).unwrap();
        let text = crate::format::render(&lines, &crate::format::RenderOptions::default());
        assert_eq!(text, "코레와 네코데스");
        assert!(!text.contains('ㅅ') && !text.contains('ㄴ'));
    }

    #[test]
    fn conversion_is_deterministic() {
        let sentences = HashMap::from([(
            "猫です".to_string(),
            vec![seg("猫", "ネコ", "名詞"), seg("です", "デス", "助動詞")],
        )]);
        let conv = converter(sentences, VariantTable::default());
        let a = conv.convert("猫です", false, 1.0).unwrap();
        let b = conv.convert("猫です", false, 1.0).unwrap();
        assert_eq!(a, b);
    }
}
