//! Static kana→Hangul tables and the two external dictionaries.
//!
//! The syllable tables are fixed data: every entry is a literal Hangul
//! rendering, not something derived at runtime. The custom dictionary
//! (surface → katakana reading) and the variant table (ambiguous char →
//! orthographic alternate) ship with embedded defaults and can be overridden
//! by dropping `customize_dict.txt` / `variant_dict.json` into the directory
//! named by `KANA2HANGUL_DICT_PATH`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;

static DEFAULT_CUSTOM_DICT: &str = include_str!("../resource/customize_dict.txt");
static DEFAULT_VARIANT_DICT: &str = include_str!("../resource/variant_dict.json");

/// Single-kana syllables, voiced/semi-voiced rows and small kana included.
/// Hiragana first, then the katakana mirror, then the small forms.
pub(crate) static KANA_PAIRS: &[(&str, &str)] = &[
    // hiragana
    ("あ", "아"), ("い", "이"), ("う", "우"), ("え", "에"), ("お", "오"),
    ("か", "카"), ("き", "키"), ("く", "쿠"), ("け", "케"), ("こ", "코"),
    ("さ", "사"), ("し", "시"), ("す", "스"), ("せ", "세"), ("そ", "소"),
    ("た", "타"), ("ち", "치"), ("つ", "츠"), ("て", "테"), ("と", "토"),
    ("な", "나"), ("に", "니"), ("ぬ", "누"), ("ね", "네"), ("の", "노"),
    ("は", "하"), ("ひ", "히"), ("ふ", "후"), ("へ", "헤"), ("ほ", "호"),
    ("ま", "마"), ("み", "미"), ("む", "무"), ("め", "메"), ("も", "모"),
    ("や", "야"), ("ゆ", "유"), ("よ", "요"),
    ("ら", "라"), ("り", "리"), ("る", "루"), ("れ", "레"), ("ろ", "로"),
    ("わ", "와"), ("を", "오"),
    ("が", "가"), ("ぎ", "기"), ("ぐ", "구"), ("げ", "게"), ("ご", "고"),
    ("ざ", "자"), ("じ", "지"), ("ず", "즈"), ("ぜ", "제"), ("ぞ", "조"),
    ("だ", "다"), ("ぢ", "지"), ("づ", "즈"), ("で", "데"), ("ど", "도"),
    ("ば", "바"), ("び", "비"), ("ぶ", "부"), ("べ", "베"), ("ぼ", "보"),
    ("ぱ", "파"), ("ぴ", "피"), ("ぷ", "푸"), ("ぺ", "페"), ("ぽ", "포"),
    // katakana
    ("ア", "아"), ("イ", "이"), ("ウ", "우"), ("エ", "에"), ("オ", "오"),
    ("カ", "카"), ("キ", "키"), ("ク", "쿠"), ("ケ", "케"), ("コ", "코"),
    ("サ", "사"), ("シ", "시"), ("ス", "스"), ("セ", "세"), ("ソ", "소"),
    ("タ", "타"), ("チ", "치"), ("ツ", "츠"), ("テ", "테"), ("ト", "토"),
    ("ナ", "나"), ("ニ", "니"), ("ヌ", "누"), ("ネ", "네"), ("ノ", "노"),
    ("ハ", "하"), ("ヒ", "히"), ("フ", "후"), ("ヘ", "헤"), ("ホ", "호"),
    ("マ", "마"), ("ミ", "미"), ("ム", "무"), ("メ", "메"), ("モ", "모"),
    ("ヤ", "야"), ("ユ", "유"), ("ヨ", "요"),
    ("ラ", "라"), ("リ", "리"), ("ル", "루"), ("レ", "레"), ("ロ", "로"),
    ("ワ", "와"), ("ヲ", "오"),
    ("ガ", "가"), ("ギ", "기"), ("グ", "구"), ("ゲ", "게"), ("ゴ", "고"),
    ("ザ", "자"), ("ジ", "지"), ("ズ", "즈"), ("ゼ", "제"), ("ゾ", "조"),
    ("ダ", "다"), ("ヂ", "지"), ("ヅ", "즈"), ("デ", "데"), ("ド", "도"),
    ("バ", "바"), ("ビ", "비"), ("ブ", "부"), ("ベ", "베"), ("ボ", "보"),
    ("パ", "파"), ("ピ", "피"), ("プ", "푸"), ("ペ", "페"), ("ポ", "포"),
    // small kana
    ("ぁ", "아"), ("ぃ", "이"), ("ぅ", "우"), ("ぇ", "에"), ("ぉ", "오"),
    ("ゃ", "야"), ("ゅ", "유"), ("ょ", "요"), ("ゎ", "와"),
    ("ァ", "아"), ("ィ", "이"), ("ゥ", "우"), ("ェ", "에"), ("ォ", "오"),
    ("ャ", "야"), ("ュ", "유"), ("ョ", "요"), ("ヮ", "와"),
];

/// Two-kana digraphs: yōon rows plus the loanword combinations. These must
/// win over single-kana lookups, so the transliterator tries them first.
pub(crate) static DIGRAPH_PAIRS: &[(&str, &str)] = &[
    // hiragana yōon
    ("きゃ", "캬"), ("きゅ", "큐"), ("きょ", "쿄"),
    ("しゃ", "샤"), ("しゅ", "슈"), ("しょ", "쇼"),
    ("ちゃ", "챠"), ("ちゅ", "츄"), ("ちょ", "쵸"),
    ("にゃ", "냐"), ("にゅ", "뉴"), ("にょ", "뇨"),
    ("ひゃ", "햐"), ("ひゅ", "휴"), ("ひょ", "효"),
    ("みゃ", "먀"), ("みゅ", "뮤"), ("みょ", "묘"),
    ("りゃ", "랴"), ("りゅ", "류"), ("りょ", "료"),
    ("ぎゃ", "갸"), ("ぎゅ", "규"), ("ぎょ", "교"),
    ("じゃ", "자"), ("じゅ", "주"), ("じょ", "조"),
    ("ぢゃ", "자"), ("ぢゅ", "주"), ("ぢょ", "조"),
    ("びゃ", "뱌"), ("びゅ", "뷰"), ("びょ", "뵤"),
    ("ぴゃ", "퍄"), ("ぴゅ", "퓨"), ("ぴょ", "표"),
    // katakana yōon
    ("キャ", "캬"), ("キュ", "큐"), ("キョ", "쿄"),
    ("シャ", "샤"), ("シュ", "슈"), ("ショ", "쇼"),
    ("チャ", "챠"), ("チュ", "츄"), ("チョ", "쵸"),
    ("ニャ", "냐"), ("ニュ", "뉴"), ("ニョ", "뇨"),
    ("ヒャ", "햐"), ("ヒュ", "휴"), ("ヒョ", "효"),
    ("ミャ", "먀"), ("ミュ", "뮤"), ("ミョ", "묘"),
    ("リャ", "랴"), ("リュ", "류"), ("リョ", "료"),
    ("ギャ", "갸"), ("ギュ", "규"), ("ギョ", "교"),
    ("ジャ", "자"), ("ジュ", "주"), ("ジョ", "조"),
    ("ヂャ", "자"), ("ヂュ", "주"), ("ヂョ", "조"),
    ("ビャ", "뱌"), ("ビュ", "뷰"), ("ビョ", "뵤"),
    ("ピャ", "퍄"), ("ピュ", "퓨"), ("ピョ", "표"),
    // loanword digraphs
    ("イェ", "예"),
    ("ウィ", "위"), ("ウェ", "웨"), ("ウォ", "워"),
    ("ヴァ", "바"), ("ヴィ", "비"), ("ヴ", "부"), ("ヴェ", "베"), ("ヴォ", "보"),
    ("ヴュ", "뷰"),
    ("クァ", "콰"), ("クィ", "퀴"), ("クェ", "퀘"), ("クォ", "쿼"),
    ("グァ", "과"),
    ("シェ", "셰"),
    ("ジェ", "제"),
    ("チェ", "체"),
    ("ツァ", "차"), ("ツィ", "치"), ("ツェ", "체"), ("ツォ", "초"),
    ("ティ", "티"), ("トゥ", "투"),
    ("テュ", "튜"),
    ("ディ", "디"), ("ドゥ", "두"),
    ("デュ", "듀"),
    ("ファ", "파"), ("フィ", "피"), ("フェ", "페"), ("フォ", "포"),
    ("フュ", "퓨"),
];

lazy_static! {
    static ref KANA_DICT: HashMap<&'static str, &'static str> =
        KANA_PAIRS.iter().copied().collect();
    static ref DIGRAPH_DICT: HashMap<&'static str, &'static str> =
        DIGRAPH_PAIRS.iter().copied().collect();
}

/// Hangul syllable for one kana, if the table knows it.
pub fn kana_syllable(kana: &str) -> Option<&'static str> {
    KANA_DICT.get(kana).copied()
}

/// Hangul syllable for a two-kana digraph.
pub fn digraph_syllable(kana: &str) -> Option<&'static str> {
    DIGRAPH_DICT.get(kana).copied()
}

fn override_path(file: &str) -> Option<PathBuf> {
    let dir = std::env::var("KANA2HANGUL_DICT_PATH").unwrap_or(".".to_string());
    let path = PathBuf::from(dir.as_str()).join(file);
    path.is_file().then_some(path)
}

/// Parse the line-oriented custom dictionary: `surface SPACE reading` per
/// line. Malformed and duplicate lines are skipped silently.
pub fn parse_custom_dict(text: &str) -> HashMap<String, String> {
    let mut dict = HashMap::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split(' ');
        let (Some(surface), Some(reading)) = (parts.next(), parts.next()) else {
            continue;
        };
        if surface.is_empty() || reading.is_empty() {
            continue;
        }
        if dict.contains_key(surface) {
            log::debug!("skip duplicate custom dict entry: {}", surface);
            continue;
        }
        dict.insert(surface.to_string(), reading.to_string());
    }
    dict
}

/// Load the custom dictionary: explicit path > `KANA2HANGUL_DICT_PATH`
/// override > embedded default.
pub fn load_custom_dict(path: Option<&Path>) -> anyhow::Result<HashMap<String, String>> {
    let text = match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("read custom dict {}: {}", p.display(), e))?,
        None => match override_path("customize_dict.txt") {
            Some(p) => std::fs::read_to_string(&p)
                .map_err(|e| anyhow::anyhow!("read custom dict {}: {}", p.display(), e))?,
            None => DEFAULT_CUSTOM_DICT.to_string(),
        },
    };
    Ok(parse_custom_dict(&text))
}

/// Orthographic alternates for characters the kana tables cannot resolve,
/// mostly kyūjitai / simplified forms appearing in mixed-script lyrics.
#[derive(Debug, Default)]
pub struct VariantTable {
    map: HashMap<char, char>,
}

impl VariantTable {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut map = HashMap::new();
        for (k, v) in raw {
            let (Some(from), Some(to)) = (k.chars().next(), v.chars().next()) else {
                continue;
            };
            if k.chars().count() != 1 || v.chars().count() != 1 {
                log::debug!("skip variant entry with non-single chars: {} -> {}", k, v);
                continue;
            }
            map.insert(from, to);
        }
        Ok(Self { map })
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let text = match path {
            Some(p) => std::fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("read variant dict {}: {}", p.display(), e))?,
            None => match override_path("variant_dict.json") {
                Some(p) => std::fs::read_to_string(&p)
                    .map_err(|e| anyhow::anyhow!("read variant dict {}: {}", p.display(), e))?,
                None => DEFAULT_VARIANT_DICT.to_string(),
            },
        };
        Self::from_json(&text)
    }

    /// The registered alternate for `c`, if any.
    pub fn variant(&self, c: char) -> Option<char> {
        self.map.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
