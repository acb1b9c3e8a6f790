//! Output rendering: POS-aware word spacing, the final-consonant
//! clarification pass, and kanji reading annotation.
//!
//! Rendering always re-derives its text from the current unit state, so a
//! caller can flip selections or push user alternatives and render again.

use crate::classify::{
    POS_AUXILIARY, POS_BOUND, POS_BOUND_CAPABLE, POS_COUNTER_CAPABLE, POS_NUMERAL, POS_PARTICLE,
    POS_PREFIX, POS_SUFFIX,
};
use crate::kana::{
    decompose, is_hangul_syllable, recompose, FINAL_NIEUN, FINAL_SIOS, INITIAL_IEUNG,
};
use crate::models::{Line, Unit};
use crate::transliterate::{hyphen_to_merged, LongVowelStyle};

/// Which reading variant the rendered text uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ReadingKind {
    /// Phonetic pronunciation (発音), は read as わ.
    #[default]
    Pronunciation,
    /// Dictionary reading (読み).
    DictionaryReading,
}

/// Everything the output text depends on besides the lines themselves.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderOptions {
    /// Insert spaces between words, attaching particles and suffixes to the
    /// preceding word.
    pub word_spacing: bool,
    /// Blank line between source lines.
    pub blank_line_between: bool,
    /// Emit the source line.
    pub show_source: bool,
    /// Emit the kana line.
    pub show_kana: bool,
    /// Emit the Hangul line.
    pub show_hangul: bool,
    /// Emit the paired translation line when one exists.
    pub show_translation: bool,
    /// Annotate kanji in the source line with their kana reading.
    pub annotate_kanji: bool,
    /// Run the final-consonant clarification pass on the Hangul line.
    pub clarify_finals: bool,
    pub long_vowel_style: LongVowelStyle,
    pub reading: ReadingKind,
    pub left_bracket: String,
    pub right_bracket: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            word_spacing: true,
            blank_line_between: false,
            show_source: false,
            show_kana: false,
            show_hangul: true,
            show_translation: false,
            annotate_kanji: false,
            clarify_finals: false,
            long_vowel_style: LongVowelStyle::default(),
            reading: ReadingKind::default(),
            left_bracket: "（".to_string(),
            right_bracket: "）".to_string(),
        }
    }
}

/// Render converted lines into display text.
pub fn render(lines: &[Line], opts: &RenderOptions) -> String {
    let mut rendered: Vec<String> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if opts.show_source {
            if opts.annotate_kanji {
                rendered.push(annotate_readings(&line.source, &line.units, opts));
            } else {
                rendered.push(line.source.clone());
            }
        }
        if opts.show_kana {
            rendered.push(join_units(&line.units, opts.word_spacing, |u| {
                u.selected_kana(opts.reading).to_string()
            }));
        }
        if opts.show_hangul {
            let mut text = join_units(&line.units, opts.word_spacing, |u| hangul_text(u, opts));
            if opts.clarify_finals {
                text = clarify_finals(&text);
            }
            rendered.push(text);
        }
        if opts.show_translation {
            if let Some(translation) = &line.translation {
                if !translation.trim().is_empty() {
                    rendered.push(translation.clone());
                }
            }
        }
        if opts.blank_line_between && i + 1 < lines.len() {
            rendered.push(String::new());
        }
    }
    rendered.join("\n")
}

/// The Hangul display string of one unit under the requested long-vowel
/// style. Non-default selections only store hyphen-style text, so the
/// merged form is re-derived for them.
fn hangul_text(unit: &Unit, opts: &RenderOptions) -> String {
    match opts.long_vowel_style {
        LongVowelStyle::Hyphen => unit.selected_hangul(opts.reading).to_string(),
        LongVowelStyle::Merged => {
            if unit.is_default_selected() {
                let pair = match opts.reading {
                    ReadingKind::Pronunciation => &unit.hangul_pron,
                    ReadingKind::DictionaryReading => &unit.hangul_reading,
                };
                pair.merged.clone()
            } else {
                hyphen_to_merged(unit.selected_hangul(opts.reading))
            }
        }
    }
}

/// Join unit texts with the POS spacing rule: particles, auxiliaries,
/// suffixes and bound morphemes attach to the preceding word, a prefix
/// attaches to the following one, and numeral runs stay joined.
fn join_units<F: Fn(&Unit) -> String>(units: &[Unit], word_spacing: bool, text: F) -> String {
    if !word_spacing {
        return units.iter().map(text).collect();
    }

    let mut result = String::new();
    let mut prev: Option<&Unit> = None;
    for unit in units {
        let attached = match prev {
            None => true,
            Some(prev) => {
                unit.pos1 == POS_PARTICLE
                    || unit.pos1 == POS_AUXILIARY
                    || unit.pos1 == POS_SUFFIX
                    || unit.pos2 == POS_BOUND
                    || (prev.pos1 != POS_PARTICLE && unit.pos2 == POS_BOUND_CAPABLE)
                    || prev.pos1 == POS_PREFIX
                    || (prev.pos2 == POS_NUMERAL
                        && (unit.pos2 == POS_NUMERAL || unit.pos3 == POS_COUNTER_CAPABLE))
            }
        };
        if !attached {
            result.push(' ');
        }
        result.push_str(&text(unit));
        prev = Some(unit);
    }
    result.trim_start().to_string()
}

/// The clarification pass over an assembled Hangul line: fold standalone
/// marker jamo into the preceding syllable, then assimilate marker finals
/// by the following syllable's initial.
pub fn clarify_finals(text: &str) -> String {
    assimilate_finals(&fold_standalone_jamo(text))
}

/// A lone ㅅ or ㄴ (a marker that had nothing to attach to inside its own
/// unit) folds into the preceding syllable's final slot, reaching across a
/// single space. A preceding `-` becomes the null-initial syllable carrying
/// the vowel of the syllable before it.
fn fold_standalone_jamo(text: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(text.chars().count());
    for c in text.chars() {
        let fin = match c {
            'ㅅ' => FINAL_SIOS,
            'ㄴ' => FINAL_NIEUN,
            _ => {
                out.push(c);
                continue;
            }
        };

        if out.last() == Some(&' ') && out.len() > 1 {
            out.pop();
        }
        match out.last().copied() {
            Some('-') if out.len() > 1 => {
                let before = out[out.len() - 2];
                match decompose(before) {
                    Some((_, medial, _)) => {
                        out.pop();
                        out.push(recompose(INITIAL_IEUNG, medial, fin));
                    }
                    None => out.push(c),
                }
            }
            Some(prev) if is_hangul_syllable(prev) => {
                if let Some((initial, medial, _)) = decompose(prev) {
                    out.pop();
                    out.push(recompose(initial, medial, fin));
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out.into_iter().collect()
}

/// Rewrite marker finals by what follows. The nasal final assimilates to
/// ㅇ before velars, the null initial, a space, or the end of the line, and
/// to ㅁ before labials; the geminate final copies the following initial's
/// place of articulation.
fn assimilate_finals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        let Some((initial, medial, fin)) = decompose(c) else {
            out.push(c);
            continue;
        };
        if fin != FINAL_NIEUN && fin != FINAL_SIOS {
            out.push(c);
            continue;
        }

        let next = chars.get(i + 1).copied();
        let next_initial = next.and_then(decompose).map(|(ini, _, _)| ini);
        let new_fin = if fin == FINAL_NIEUN {
            match (next, next_initial) {
                (None, _) | (Some(' '), _) => 21,
                (_, Some(0 | 1 | 15 | 11)) => 21,
                (_, Some(6 | 7 | 8 | 17)) => 16,
                _ => FINAL_NIEUN,
            }
        } else {
            match next_initial {
                Some(0 | 1 | 15) => 1,
                Some(3 | 4 | 16) => 7,
                Some(7 | 8 | 17) => 17,
                Some(5) => 8,
                _ => FINAL_SIOS,
            }
        };
        out.push(recompose(initial, medial, new_fin));
    }
    out.into_iter().collect()
}

/// Insert the kana reading of every foreign/kanji unit after its surface in
/// the source line, scanning left to right and resuming after the previous
/// match so repeated surfaces annotate in order. A surface that cannot be
/// found is skipped.
fn annotate_readings(source: &str, units: &[Unit], opts: &RenderOptions) -> String {
    let mut text = source.to_string();
    let mut resume = 0usize;
    for unit in units.iter().filter(|u| u.is_foreign_or_kanji) {
        if unit.surface.is_empty() {
            continue;
        }
        match text[resume..].find(&unit.surface) {
            Some(rel) => {
                let at = resume + rel + unit.surface.len();
                let annotation = format!(
                    "{}{}{}",
                    opts.left_bracket,
                    unit.selected_kana(opts.reading),
                    opts.right_bracket
                );
                text.insert_str(at, &annotation);
                resume = at;
            }
            None => {
                log::debug!("annotation skipped: {:?} not found in line", unit.surface);
            }
        }
    }
    text
}
