//! Japanese lyric transliteration into Hangul readings.
//!
//! The pipeline tokenizes each line with a pluggable morphological
//! analyzer, classifies every segment into a display unit carrying kana
//! and Hangul renderings plus selectable alternatives, and renders the
//! result with POS-aware spacing. Built for karaoke-style lyric sheets:
//! Chinese translation lines are detected and paired, variant kanji are
//! substituted automatically, and a whole session round-trips through
//! JSON.

use std::collections::HashMap;
use std::path::PathBuf;

pub mod classify;
pub mod convert;
pub mod dict;
pub mod format;
pub mod kana;
pub mod models;
pub mod tokenizer;
pub mod transliterate;

pub use convert::is_chinese;
pub use format::{render, ReadingKind, RenderOptions};
pub use models::{lines_from_json, lines_to_json, AltSlot, Line, Unit};
pub use tokenizer::{Segment, Tokenizer};
pub use transliterate::{kana_to_hangul, LongVowelStyle};

/// Builder for a [`Converter`]. With no paths set, the embedded default
/// custom dictionary and variant table are used (both can also be
/// overridden through the `KANA2HANGUL_DICT_PATH` directory).
#[derive(Debug, Default)]
pub struct ConverterConfig {
    pub custom_dict_path: Option<PathBuf>,
    pub variant_dict_path: Option<PathBuf>,
}

impl ConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_dict(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_dict_path = Some(path.into());
        self
    }

    pub fn with_variant_dict(mut self, path: impl Into<PathBuf>) -> Self {
        self.variant_dict_path = Some(path.into());
        self
    }

    pub fn build(&self, tokenizer: Box<dyn Tokenizer>) -> anyhow::Result<Converter> {
        let custom_dict = dict::load_custom_dict(self.custom_dict_path.as_deref())?;
        let variants = dict::VariantTable::load(self.variant_dict_path.as_deref())?;
        log::info!(
            "converter ready: {} custom readings, {} variant mappings",
            custom_dict.len(),
            variants.len()
        );
        Ok(Converter {
            tokenizer,
            custom_dict,
            variants,
        })
    }
}

/// The conversion engine. Read-only after construction, so it can be
/// shared across threads.
pub struct Converter {
    pub(crate) tokenizer: Box<dyn Tokenizer>,
    pub(crate) custom_dict: HashMap<String, String>,
    pub(crate) variants: dict::VariantTable,
}
