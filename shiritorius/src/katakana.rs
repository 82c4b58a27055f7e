//! 片仮名の文字集合と正規化
//!
//! 読みとして受け付ける片仮名の範囲、平仮名から片仮名への変換、
//! 利用者の入力から片仮名の断片を取り出す処理、および五十音の行（gyo）を提供します。

use std::fmt;
use std::str::FromStr;

use crate::errors::ShiritoriusError;

/// 読みに使用できる片仮名の先頭文字 (`ァ`)
const KATAKANA_FIRST: char = '\u{30A1}';

/// 読みに使用できる片仮名の末尾文字 (`ヺ`)
const KATAKANA_LAST: char = '\u{30FA}';

/// 長音符 (`ー`)
pub const PROLONGED_SOUND_MARK: char = '\u{30FC}';

const HIRAGANA_FIRST: char = '\u{3041}';
const HIRAGANA_LAST: char = '\u{3096}';

// Distance between a hiragana code point and its katakana counterpart.
const HIRAGANA_TO_KATAKANA_OFFSET: u32 = 0x60;

/// 文字が読みに使用できる片仮名（`ァ`〜`ヺ` と `ー`）かどうかを判定します。
#[inline(always)]
pub const fn is_katakana(c: char) -> bool {
    (KATAKANA_FIRST <= c && c <= KATAKANA_LAST) || c == PROLONGED_SOUND_MARK
}

/// 文字列が空でなく、すべて読みに使用できる片仮名で構成されているかを判定します。
///
/// # 例
///
/// ```
/// use shiritorius::katakana::is_katakana_only;
///
/// assert!(is_katakana_only("シリトリ"));
/// assert!(is_katakana_only("ラーメン"));
/// assert!(!is_katakana_only("しりとり"));
/// assert!(!is_katakana_only("ナカグロ・"));
/// assert!(!is_katakana_only(""));
/// ```
pub fn is_katakana_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_katakana)
}

/// 平仮名を対応する片仮名に変換します。平仮名以外の文字はそのまま残します。
///
/// ```
/// use shiritorius::katakana::hiragana_to_katakana;
///
/// assert_eq!(hiragana_to_katakana("ねこ、ネズミ"), "ネコ、ネズミ");
/// ```
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if (HIRAGANA_FIRST..=HIRAGANA_LAST).contains(&c) {
                char::from_u32(u32::from(c) + HIRAGANA_TO_KATAKANA_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// 文字列から連続する片仮名の断片を取り出します。
///
/// 片仮名以外の文字はすべて区切りとして扱われ、空の断片は生成されません。
///
/// ```
/// use shiritorius::katakana::extract_katakana;
///
/// assert_eq!(extract_katakana("ネ、ノ ハ"), vec!["ネ", "ノ", "ハ"]);
/// assert!(extract_katakana("abc").is_empty());
/// ```
pub fn extract_katakana(s: &str) -> Vec<String> {
    s.split(|c: char| !is_katakana(c))
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// 利用者の入力を検索条件の断片に正規化します。
///
/// 平仮名を片仮名に変換した後、片仮名の断片を取り出します。
pub fn normalize_fragments(s: &str) -> Vec<String> {
    extract_katakana(&hiragana_to_katakana(s))
}

/// 五十音の行
///
/// 読みの先頭文字を絞り込むための表示上の分類です。
/// すべての片仮名はちょうど一つの行に属します。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gyo {
    A,
    Ka,
    Sa,
    Ta,
    Na,
    Ha,
    Ma,
    Ya,
    Ra,
    /// ワ行に撥音、ヴ、拡張片仮名、長音符を加えたもの
    WaN,
}

impl Gyo {
    /// すべての行を五十音順に並べたもの
    pub const ALL: [Self; 10] = [
        Self::A,
        Self::Ka,
        Self::Sa,
        Self::Ta,
        Self::Na,
        Self::Ha,
        Self::Ma,
        Self::Ya,
        Self::Ra,
        Self::WaN,
    ];

    /// 行の見出し
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "ア",
            Self::Ka => "カ",
            Self::Sa => "サ",
            Self::Ta => "タ",
            Self::Na => "ナ",
            Self::Ha => "ハ",
            Self::Ma => "マ",
            Self::Ya => "ヤ",
            Self::Ra => "ラ",
            Self::WaN => "ワー",
        }
    }

    /// 行に属する片仮名
    pub const fn members(self) -> &'static str {
        match self {
            Self::A => "ァアィイゥウェエォオ",
            Self::Ka => "カガキギクグケゲコゴヵヶ",
            Self::Sa => "サザシジスズセゼソゾ",
            Self::Ta => "タダチヂッツヅテデトド",
            Self::Na => "ナニヌネノ",
            Self::Ha => "ハバパヒビピフブプヘベペホボポ",
            Self::Ma => "マミムメモ",
            Self::Ya => "ャヤュユョヨ",
            Self::Ra => "ラリルレロ",
            Self::WaN => "ヮワヰヱヲンヴヷヸヹヺー",
        }
    }

    /// 片仮名が属する行を返します。片仮名でない文字には `None` を返します。
    pub fn of(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|gyo| gyo.members().contains(c))
    }
}

impl FromStr for Gyo {
    type Err = ShiritoriusError;

    /// 行の見出し（`ナ`）、その行の平仮名（`な`）、またはローマ字（`na`）から行を得ます。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let romaji = match s.to_ascii_lowercase().as_str() {
            "a" => Some(Self::A),
            "ka" => Some(Self::Ka),
            "sa" => Some(Self::Sa),
            "ta" => Some(Self::Ta),
            "na" => Some(Self::Na),
            "ha" => Some(Self::Ha),
            "ma" => Some(Self::Ma),
            "ya" => Some(Self::Ya),
            "ra" => Some(Self::Ra),
            "wa" => Some(Self::WaN),
            _ => None,
        };
        let kana = hiragana_to_katakana(s);
        romaji
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|gyo| gyo.label() == kana || gyo.label().strip_suffix('ー') == Some(kana.as_str()))
            })
            .ok_or_else(|| ShiritoriusError::invalid_argument("gyo", format!("unknown row: `{s}`")))
    }
}

impl fmt::Display for Gyo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_katakana_range_bounds() {
        assert!(is_katakana('ァ'));
        assert!(is_katakana('ヺ'));
        assert!(is_katakana('ー'));
        assert!(!is_katakana('・'));
        assert!(!is_katakana('ヽ'));
        assert!(!is_katakana('ぁ'));
        assert!(!is_katakana('A'));
    }

    #[test]
    fn test_hiragana_to_katakana_edges() {
        assert_eq!(hiragana_to_katakana("ぁゖ"), "ァヶ");
        assert_eq!(hiragana_to_katakana("漢字abc"), "漢字abc");
    }

    #[test]
    fn test_normalize_fragments() {
        assert_eq!(normalize_fragments("ね, ねず|ミ"), vec!["ネ", "ネズ", "ミ"]);
        assert!(normalize_fragments("").is_empty());
    }

    #[test]
    fn test_every_katakana_belongs_to_exactly_one_gyo() {
        let all = (u32::from(KATAKANA_FIRST)..=u32::from(KATAKANA_LAST))
            .filter_map(char::from_u32)
            .chain([PROLONGED_SOUND_MARK]);
        for c in all {
            let owners = Gyo::ALL
                .iter()
                .filter(|gyo| gyo.members().contains(c))
                .count();
            assert_eq!(owners, 1, "{c} belongs to {owners} rows");
        }
        let total: usize = Gyo::ALL.iter().map(|gyo| gyo.members().chars().count()).sum();
        assert_eq!(total, 91);
    }

    #[test]
    fn test_gyo_of() {
        assert_eq!(Gyo::of('ガ'), Some(Gyo::Ka));
        assert_eq!(Gyo::of('ン'), Some(Gyo::WaN));
        assert_eq!(Gyo::of('ー'), Some(Gyo::WaN));
        assert_eq!(Gyo::of('あ'), None);
        assert_eq!(Gyo::WaN.to_string(), "ワー");
    }

    #[test]
    fn test_gyo_from_str() {
        assert_eq!("ナ".parse::<Gyo>().unwrap(), Gyo::Na);
        assert_eq!("な".parse::<Gyo>().unwrap(), Gyo::Na);
        assert_eq!("NA".parse::<Gyo>().unwrap(), Gyo::Na);
        assert_eq!("ワー".parse::<Gyo>().unwrap(), Gyo::WaN);
        assert_eq!("わ".parse::<Gyo>().unwrap(), Gyo::WaN);
        assert!("ネ".parse::<Gyo>().is_err());
    }
}
