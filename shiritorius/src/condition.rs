//! 検索条件と述語エンジン
//!
//! [`Conditions`] は一回の検索のために組み立てられる条件の集合です。
//! [`Filter`] は条件を一つの合否判定にまとめ、読みの列に適用します。
//!
//! - 種類の異なる条件はすべて満たす必要があります（論理積）。
//! - 同じ種類の断片のリストは、いずれか一つに一致すれば十分です（論理和）。
//! - 断片が空、または文字数が未設定・非正の場合、その条件は常に成立します。
//! - 品詞の集合が空の場合、品詞の条件はどの読みに対しても成立しません。
//!
//! 断片は常にリテラルの接頭辞・接尾辞・部分文字列として照合されます。
//! 括弧や縦棒などの文字が照合の意味を変えることはありません。

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ShiritoriusError;
use crate::index::PartOfSpeechSet;
use crate::word::Word;

/// 既定で選択される品詞
pub const DEFAULT_PART_OF_SPEECH: &str = "名詞";

/// しりとりで負けとなる末尾
pub const LOSING_ENDING: &str = "ン";

/// 文字数の比較方法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthComparator {
    /// 指定文字数以内 (`<=`)
    AtMost,
    /// 指定文字数ちょうど (`==`)
    #[default]
    Exactly,
    /// 指定文字数以上 (`>=`)
    AtLeast,
}

impl LengthComparator {
    /// 読みの文字数を目標の文字数と比較します。
    #[inline(always)]
    pub const fn compare(self, len: usize, target: usize) -> bool {
        match self {
            Self::AtMost => len <= target,
            Self::Exactly => len == target,
            Self::AtLeast => len >= target,
        }
    }

    /// 表示用のラベル
    pub const fn label(self) -> &'static str {
        match self {
            Self::AtMost => "文字以内",
            Self::Exactly => "文字",
            Self::AtLeast => "文字以上",
        }
    }
}

impl FromStr for LengthComparator {
    type Err = ShiritoriusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "at-most" | "文字以内" => Ok(Self::AtMost),
            "exactly" | "文字" => Ok(Self::Exactly),
            "at-least" | "文字以上" => Ok(Self::AtLeast),
            _ => Err(ShiritoriusError::invalid_argument(
                "length_comparator",
                format!("expected `at-most`, `exactly` or `at-least`, got `{s}`"),
            )),
        }
    }
}

impl fmt::Display for LengthComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 検索条件の集合
///
/// 検索のたびに新しく組み立てられ、読みそのものは所有しません。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conditions {
    /// いずれかの断片で始まる
    pub begin_with: Vec<String>,
    /// どの断片でも始まらない
    pub not_begin_with: Vec<String>,
    /// いずれかの断片で終わる
    pub end_with: Vec<String>,
    /// どの断片でも終わらない
    pub not_end_with: Vec<String>,
    /// いずれかの断片を含む
    pub include: Vec<String>,
    /// どの断片も含まない
    pub exclude: Vec<String>,
    /// 読みの文字数。未設定または1未満の場合は条件なし。
    pub length: Option<i64>,
    pub length_comparator: LengthComparator,
    /// いずれかの同音異義語がこの集合の品詞を持つ
    pub parts_of_speech: BTreeSet<String>,
}

impl Conditions {
    /// 何も絞り込まない条件を作成します。品詞はすべて選択されます。
    pub fn all(parts: &PartOfSpeechSet) -> Self {
        Self {
            parts_of_speech: parts.to_set(),
            ..Self::default()
        }
    }

    /// 画面を開いた直後の条件を作成します。
    ///
    /// 「ン」で終わる読みを除外し、品詞は「名詞」が存在すれば名詞のみ、
    /// 存在しなければすべてを選択します。
    pub fn initial(parts: &PartOfSpeechSet) -> Self {
        let parts_of_speech = if parts.contains(DEFAULT_PART_OF_SPEECH) {
            BTreeSet::from([DEFAULT_PART_OF_SPEECH.to_string()])
        } else {
            parts.to_set()
        };
        Self {
            not_end_with: vec![LOSING_ENDING.to_string()],
            parts_of_speech,
            ..Self::default()
        }
    }

    /// 品詞の選択を切り替えます。選択されていれば外し、されていなければ加えます。
    pub fn toggle_part_of_speech(&mut self, label: &str) {
        if !self.parts_of_speech.remove(label) {
            self.parts_of_speech.insert(label.to_string());
        }
    }

    /// 有効な文字数の条件を返します。
    pub fn effective_length(&self) -> Option<usize> {
        self.length
            .filter(|&n| n >= 1)
            .and_then(|n| usize::try_from(n).ok())
    }
}

impl fmt::Display for Conditions {
    /// 条件の要約を一行ずつ書き出します。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = [
            (&self.begin_with, "から始まる"),
            (&self.not_begin_with, "から始まらない"),
            (&self.end_with, "で終わる"),
            (&self.not_end_with, "で終わらない"),
            (&self.include, "を含む"),
            (&self.exclude, "を含まない"),
        ];
        for (fragments, suffix) in lines {
            if !fragments.is_empty() {
                writeln!(f, "{}{}", fragments.join("、"), suffix)?;
            }
        }
        if let Some(length) = self.effective_length() {
            writeln!(f, "{}{}の", length, self.length_comparator)?;
        }
        if self.parts_of_speech.is_empty() {
            write!(f, "品詞が選択されていません")
        } else {
            let parts: Vec<_> = self.parts_of_speech.iter().map(String::as_str).collect();
            write!(f, "{}", parts.join("、"))
        }
    }
}

/// 一種類の条件
#[derive(Debug, Clone, Copy)]
enum Predicate<'c> {
    PartsOfSpeech(&'c BTreeSet<String>),
    BeginWith(&'c [String]),
    NotBeginWith(&'c [String]),
    EndWith(&'c [String]),
    NotEndWith(&'c [String]),
    Include(&'c [String]),
    Exclude(&'c [String]),
    Length(usize, LengthComparator),
}

impl Predicate<'_> {
    #[inline]
    fn test(&self, word: &Word) -> bool {
        let reading = word.reading.as_str();
        match *self {
            Self::PartsOfSpeech(parts) => word.has_part_of_speech_in(|p| parts.contains(p)),
            Self::BeginWith(fragments) => fragments.iter().any(|f| reading.starts_with(f.as_str())),
            Self::NotBeginWith(fragments) => !fragments.iter().any(|f| reading.starts_with(f.as_str())),
            Self::EndWith(fragments) => fragments.iter().any(|f| reading.ends_with(f.as_str())),
            Self::NotEndWith(fragments) => !fragments.iter().any(|f| reading.ends_with(f.as_str())),
            Self::Include(fragments) => fragments.iter().any(|f| reading.contains(f.as_str())),
            Self::Exclude(fragments) => !fragments.iter().any(|f| reading.contains(f.as_str())),
            Self::Length(target, comparator) => comparator.compare(word.len(), target),
        }
    }
}

/// 条件の集合をまとめた合否判定
///
/// 条件を借用するだけで状態を持たないため、同じカタログに対して
/// 複数のフィルタを同時に評価しても安全です。
#[derive(Debug, Clone)]
pub struct Filter<'c> {
    predicates: Vec<Predicate<'c>>,
}

impl<'c> Filter<'c> {
    /// 条件の集合から判定を組み立てます。
    ///
    /// 常に成立する条件は省かれますが、品詞の条件は集合が空でも必ず含まれます。
    pub fn new(conditions: &'c Conditions) -> Self {
        let mut predicates = vec![Predicate::PartsOfSpeech(&conditions.parts_of_speech)];
        let fragment_predicates: [(&'c [String], fn(&'c [String]) -> Predicate<'c>); 6] = [
            (&conditions.begin_with, Predicate::BeginWith),
            (&conditions.not_begin_with, Predicate::NotBeginWith),
            (&conditions.end_with, Predicate::EndWith),
            (&conditions.not_end_with, Predicate::NotEndWith),
            (&conditions.include, Predicate::Include),
            (&conditions.exclude, Predicate::Exclude),
        ];
        for (fragments, predicate) in fragment_predicates {
            if !fragments.is_empty() {
                predicates.push(predicate(fragments));
            }
        }
        if let Some(length) = conditions.effective_length() {
            predicates.push(Predicate::Length(length, conditions.length_comparator));
        }
        Self { predicates }
    }

    /// 読みがすべての条件を満たすかを返します。
    #[inline]
    pub fn matches(&self, word: &Word) -> bool {
        self.predicates.iter().all(|p| p.test(word))
    }

    /// 条件を満たす読みを入力の順序のまま返します。
    pub fn apply<'a, I>(&self, words: I) -> Vec<&'a Word>
    where
        I: IntoIterator<Item = &'a Word>,
    {
        words.into_iter().filter(|w| self.matches(w)).collect()
    }
}

/// 読みの列から条件を満たすものを、入力の順序を保って選び出します。
///
/// ```
/// use std::collections::BTreeSet;
/// use shiritorius::condition::{filter, Conditions};
/// use shiritorius::word::{Homonym, Word};
///
/// let words: Vec<Word> = ["ネコ", "ネズミ", "イヌ"]
///     .iter()
///     .enumerate()
///     .map(|(i, r)| Word {
///         id: i as u64,
///         reading: r.to_string(),
///         homonyms: vec![Homonym {
///             id: i as u64,
///             surface_form: r.to_string(),
///             part_of_speech: "名詞".to_string(),
///         }],
///     })
///     .collect();
///
/// let conditions = Conditions {
///     begin_with: vec!["ネ".to_string()],
///     exclude: vec!["ズ".to_string()],
///     parts_of_speech: BTreeSet::from(["名詞".to_string()]),
///     ..Default::default()
/// };
/// let result: Vec<_> = filter(&words, &conditions)
///     .into_iter()
///     .map(|w| w.reading.as_str())
///     .collect();
/// assert_eq!(result, vec!["ネコ"]);
/// ```
pub fn filter<'a, I>(words: I, conditions: &Conditions) -> Vec<&'a Word>
where
    I: IntoIterator<Item = &'a Word>,
{
    Filter::new(conditions).apply(words)
}
