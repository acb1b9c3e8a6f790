//! Conversion result data model and its JSON persistence round trip.
//!
//! A `Line` owns the ordered `Unit`s produced from one source line. Units
//! are plain mutable records; the caller edits `select_id` or pushes
//! user-entered alternatives and re-renders, there is no change
//! notification here.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::format::ReadingKind;

/// One selectable rendering inside an alternatives list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltString {
    pub id: u16,
    pub text: String,
    /// System-generated entry, as opposed to a user edit.
    pub system: bool,
}

impl AltString {
    pub fn new(id: u16, text: impl Into<String>, system: bool) -> Self {
        Self {
            id,
            text: text.into(),
            system,
        }
    }
}

/// The four alternatives lists, one per display string. Every list holds at
/// least the default entry at id 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternatives {
    pub kana_pron: Vec<AltString>,
    pub hangul_pron: Vec<AltString>,
    pub kana_reading: Vec<AltString>,
    pub hangul_reading: Vec<AltString>,
}

/// Hangul rendering in both long-vowel styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangulPair {
    pub hyphen: String,
    pub merged: String,
}

impl HangulPair {
    pub fn new(hyphen: impl Into<String>, merged: impl Into<String>) -> Self {
        Self {
            hyphen: hyphen.into(),
            merged: merged.into(),
        }
    }

    /// Same text in both styles, for passthrough units.
    pub fn plain(text: &str) -> Self {
        Self {
            hyphen: text.to_string(),
            merged: text.to_string(),
        }
    }
}

/// Which of the four display strings an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltSlot {
    KanaPron,
    HangulPron,
    KanaReading,
    HangulReading,
}

/// One classified tokenizer segment with all of its renderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub surface: String,
    /// Hiragana of the phonetic pronunciation.
    pub kana_pron: String,
    /// Hiragana of the dictionary reading.
    pub kana_reading: String,
    pub hangul_pron: HangulPair,
    pub hangul_reading: HangulPair,
    /// Not a pure-kana Japanese token; drives the reading-in-brackets mode.
    pub is_foreign_or_kanji: bool,
    pub pos1: String,
    pub pos2: String,
    pub pos3: String,
    pub alternatives: Alternatives,
    /// Shared selection across all four alternatives lists.
    pub select_id: u16,
}

impl Unit {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        surface: impl Into<String>,
        kana_pron: impl Into<String>,
        kana_reading: impl Into<String>,
        hangul_pron: HangulPair,
        hangul_reading: HangulPair,
        is_foreign_or_kanji: bool,
        pos1: impl Into<String>,
        pos2: impl Into<String>,
        pos3: impl Into<String>,
    ) -> Self {
        let kana_pron = kana_pron.into();
        let kana_reading = kana_reading.into();
        let alternatives = Alternatives {
            kana_pron: vec![AltString::new(1, kana_pron.clone(), true)],
            hangul_pron: vec![AltString::new(1, hangul_pron.hyphen.clone(), true)],
            kana_reading: vec![AltString::new(1, kana_reading.clone(), true)],
            hangul_reading: vec![AltString::new(1, hangul_reading.hyphen.clone(), true)],
        };
        Self {
            surface: surface.into(),
            kana_pron,
            kana_reading,
            hangul_pron,
            hangul_reading,
            is_foreign_or_kanji,
            pos1: pos1.into(),
            pos2: pos2.into(),
            pos3: pos3.into(),
            alternatives,
            select_id: 1,
        }
    }

    /// A unit that shows its surface unchanged in every field.
    pub fn passthrough(
        surface: &str,
        pos1: impl Into<String>,
        pos2: impl Into<String>,
        pos3: impl Into<String>,
    ) -> Self {
        Self::new(
            surface,
            surface,
            surface,
            HangulPair::plain(surface),
            HangulPair::plain(surface),
            false,
            pos1,
            pos2,
            pos3,
        )
    }

    fn pick(list: &[AltString], select_id: u16) -> &str {
        list.iter()
            .find(|a| a.id == select_id)
            .or_else(|| list.iter().find(|a| a.id == 1))
            .or_else(|| list.first())
            .map(|a| a.text.as_str())
            .unwrap_or("")
    }

    /// Currently selected kana display string.
    pub fn selected_kana(&self, kind: ReadingKind) -> &str {
        let list = match kind {
            ReadingKind::Pronunciation => &self.alternatives.kana_pron,
            ReadingKind::DictionaryReading => &self.alternatives.kana_reading,
        };
        Self::pick(list, self.select_id)
    }

    /// Currently selected Hangul display string, hyphen style.
    pub fn selected_hangul(&self, kind: ReadingKind) -> &str {
        let list = match kind {
            ReadingKind::Pronunciation => &self.alternatives.hangul_pron,
            ReadingKind::DictionaryReading => &self.alternatives.hangul_reading,
        };
        Self::pick(list, self.select_id)
    }

    /// Whether the default (id 1) alternative is the active one.
    pub fn is_default_selected(&self) -> bool {
        self.select_id == 1
    }

    pub fn set_select_id(&mut self, id: u16) {
        self.select_id = id;
    }

    /// Append a user-edited rendering to one alternatives list and return
    /// its id. Ids keep growing across the four lists so a shared
    /// `select_id` stays unambiguous.
    pub fn push_user_alternative(&mut self, slot: AltSlot, text: impl Into<String>) -> u16 {
        let next_id = [
            &self.alternatives.kana_pron,
            &self.alternatives.hangul_pron,
            &self.alternatives.kana_reading,
            &self.alternatives.hangul_reading,
        ]
        .iter()
        .flat_map(|l| l.iter())
        .map(|a| a.id)
        .max()
        .unwrap_or(0)
            + 1;
        let list = match slot {
            AltSlot::KanaPron => &mut self.alternatives.kana_pron,
            AltSlot::HangulPron => &mut self.alternatives.hangul_pron,
            AltSlot::KanaReading => &mut self.alternatives.kana_reading,
            AltSlot::HangulReading => &mut self.alternatives.hangul_reading,
        };
        list.push(AltString::new(next_id, text, false));
        next_id
    }
}

/// One converted source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Source text, possibly variant-substituted during conversion.
    pub source: String,
    /// The following input line when it classified as the paired
    /// translation.
    pub translation: Option<String>,
    pub units: Vec<Unit>,
    /// Stable ordering key.
    pub index: u16,
}

/// Serialize a conversion session for later reloading.
pub fn lines_to_json(lines: &[Line]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(lines).context("serialize converted lines")
}

/// Reload a persisted conversion session. A corrupt or foreign file is a
/// recoverable error.
pub fn lines_from_json(text: &str) -> anyhow::Result<Vec<Line>> {
    serde_json::from_str(text).context("not a valid converted-lyrics file")
}
