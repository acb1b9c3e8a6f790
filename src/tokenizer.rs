//! The morphological tokenizer capability.
//!
//! The converter never parses Japanese itself; it consumes segments from
//! any analyzer that can fill in [`Segment`]. A `vibrato`-backed
//! implementation is available behind the `enable_vibrato` feature; tests
//! use an in-crate mock.

/// One competing node in the tokenizer's lattice, exposed as a plain
/// adjacency view so the classifier can walk alternatives without knowing
/// the analyzer's graph representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatticeNode {
    /// Katakana pronunciation of this candidate.
    pub pronunciation: String,
    /// Katakana dictionary reading of this candidate.
    pub reading: String,
    /// Characters of input this candidate covers.
    pub span_length: usize,
    /// Indices of adjacent nodes within the owning segment's node list.
    pub next: Vec<usize>,
}

/// One tokenizer segment with the morphological features the classifier
/// consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub surface: String,
    /// Katakana pronunciation (発音).
    pub pronunciation: String,
    /// Katakana dictionary reading (読み).
    pub reading: String,
    pub pos1: String,
    pub pos2: String,
    pub pos3: String,
    /// Number of morphological feature fields the analyzer produced.
    pub feature_count: usize,
    /// Characters of input this segment covers.
    pub span_length: usize,
    /// False when the analyzer could not assign a character class.
    pub known: bool,
    /// Competing lattice nodes overlapping this segment, if the backend
    /// exposes them. May be empty.
    pub nodes: Vec<LatticeNode>,
    /// Entry points into `nodes` for the alternatives traversal.
    pub roots: Vec<usize>,
}

/// Black-box segmentation capability: any morphological analyzer with a
/// Japanese dictionary can sit behind this.
pub trait Tokenizer: Send + Sync {
    fn segment(&self, sentence: &str) -> anyhow::Result<Vec<Segment>>;
}

/// Split a feature CSV on commas that sit outside double quotes. Feature
/// strings can carry quoted fields like `a,b,"d,e",f`.
pub fn split_feature_csv(text: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    for c in text.chars() {
        if c == ',' && !in_quotes {
            fields.push(std::mem::take(&mut field));
        } else if c == '"' {
            field.push(c);
            in_quotes = !in_quotes;
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}

#[cfg(feature = "enable_vibrato")]
pub use vibrato_backend::VibratoTokenizer;

#[cfg(feature = "enable_vibrato")]
mod vibrato_backend {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use super::{split_feature_csv, Segment, Tokenizer};
    use crate::kana::to_katakana;

    /// `vibrato` with an IPADIC-layout system dictionary
    /// (pos1..pos4, conjugation, base form, reading, pronunciation).
    /// A fresh worker per call keeps the backend `Sync`.
    pub struct VibratoTokenizer {
        tokenizer: vibrato::Tokenizer,
    }

    impl VibratoTokenizer {
        /// Load the system dictionary. Failure here is fatal for the
        /// caller: conversion cannot run without the analyzer.
        pub fn from_dict_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
            let path = path.as_ref();
            let file = File::open(path)
                .map_err(|e| anyhow::anyhow!("open system dictionary {}: {}", path.display(), e))?;
            let dict = vibrato::Dictionary::read(BufReader::new(file))
                .map_err(|e| anyhow::anyhow!("load system dictionary {}: {}", path.display(), e))?;
            log::info!("loaded vibrato dictionary from {}", path.display());
            Ok(Self {
                tokenizer: vibrato::Tokenizer::new(dict),
            })
        }

        fn field(features: &[String], index: usize) -> Option<&str> {
            features
                .get(index)
                .map(String::as_str)
                .filter(|v| !v.is_empty() && *v != "*")
        }
    }

    impl Tokenizer for VibratoTokenizer {
        fn segment(&self, sentence: &str) -> anyhow::Result<Vec<Segment>> {
            let mut worker = self.tokenizer.new_worker();
            worker.reset_sentence(sentence);
            worker.tokenize();

            let mut segments = Vec::with_capacity(worker.num_tokens());
            for token in worker.token_iter() {
                let features = split_feature_csv(token.feature());
                let surface = token.surface().to_string();
                let fallback = to_katakana(&surface);
                let reading = Self::field(&features, 7).unwrap_or(&fallback).to_string();
                let pronunciation = Self::field(&features, 8).unwrap_or(&reading).to_string();
                segments.push(Segment {
                    pronunciation,
                    reading,
                    pos1: Self::field(&features, 0).unwrap_or("").to_string(),
                    pos2: Self::field(&features, 1).unwrap_or("").to_string(),
                    pos3: Self::field(&features, 2).unwrap_or("").to_string(),
                    feature_count: features.len(),
                    span_length: token.range_char().len(),
                    known: true,
                    nodes: Vec::new(),
                    roots: Vec::new(),
                    surface,
                });
            }
            Ok(segments)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_split_plain() {
        assert_eq!(
            split_feature_csv("名詞,固有名詞,一般"),
            vec!["名詞", "固有名詞", "一般"]
        );
    }

    #[test]
    fn feature_split_quoted_comma() {
        let fields = split_feature_csv("a,b,\"d,e\",f");
        assert_eq!(fields, vec!["a", "b", "\"d,e\"", "f"]);
    }

    #[test]
    fn feature_split_empty_fields() {
        assert_eq!(split_feature_csv("a,,c"), vec!["a", "", "c"]);
    }
}
