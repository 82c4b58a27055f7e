//! カタログから導出される索引
//!
//! このモジュールは、読みの先頭文字による索引 [`PrefixIndex`]、読みの文字数による索引
//! [`LengthIndex`]、および品詞ラベルの集合 [`PartOfSpeechSet`] を提供します。
//!
//! 索引は不変なカタログのスナップショットから構築される値であり、その場で更新されることはありません。
//! 各バケット内の順序は入力の順序と一致し、並べ替えは行いません。

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::katakana::Gyo;
use crate::word::Word;

/// 先頭文字から、その文字で始まる読みの列への写像
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex<'a> {
    buckets: HashMap<char, Vec<&'a Word>>,
}

impl<'a> PrefixIndex<'a> {
    /// 読みの列から索引を構築します。
    pub fn new<I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a Word>,
    {
        let mut buckets: HashMap<char, Vec<&'a Word>> = HashMap::new();
        let mut total = 0;
        for word in words {
            total += 1;
            // Catalogue readings are never empty.
            let Some(c) = word.leading_character() else {
                debug_assert!(false, "empty reading in catalogue: id {}", word.id);
                continue;
            };
            buckets.entry(c).or_default().push(word);
        }
        let index = Self { buckets };
        debug_assert_eq!(index.total(), total);
        index
    }

    /// 指定された文字で始まる読みを返します。
    pub fn get(&self, c: char) -> &[&'a Word] {
        self.buckets.get(&c).map(Vec::as_slice).unwrap_or_default()
    }

    /// 索引に存在する先頭文字を昇順に返します。
    pub fn keys(&self) -> Vec<char> {
        let mut keys: Vec<_> = self.buckets.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// 先頭文字の種類数
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// 索引が空の場合に真を返します。
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// すべてのバケットの大きさの合計
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// 読みの文字数から、その文字数の読みの列への写像
///
/// 文字数はバイト数ではなくコードポイント数で数えます。
#[derive(Debug, Clone, Default)]
pub struct LengthIndex<'a> {
    buckets: HashMap<usize, Vec<&'a Word>>,
}

impl<'a> LengthIndex<'a> {
    /// 読みの列から索引を構築します。
    pub fn new<I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a Word>,
    {
        let mut buckets: HashMap<usize, Vec<&'a Word>> = HashMap::new();
        let mut total = 0;
        for word in words {
            total += 1;
            buckets.entry(word.len()).or_default().push(word);
        }
        let index = Self { buckets };
        debug_assert_eq!(index.total(), total);
        index
    }

    /// 指定された文字数の読みを返します。
    pub fn get(&self, len: usize) -> &[&'a Word] {
        self.buckets.get(&len).map(Vec::as_slice).unwrap_or_default()
    }

    /// 索引に存在する文字数を昇順に返します。
    pub fn keys(&self) -> Vec<usize> {
        let mut keys: Vec<_> = self.buckets.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// 文字数の種類数
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// 索引が空の場合に真を返します。
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// すべてのバケットの大きさの合計
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// カタログに現れる品詞ラベルの集合
///
/// 選択肢の一覧を作るためのものであり、それ自体は絞り込みに使われません。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartOfSpeechSet {
    labels: BTreeSet<String>,
}

impl PartOfSpeechSet {
    /// 読みの列から品詞ラベルを集めます。
    pub fn new<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a Word>,
    {
        let labels = words
            .into_iter()
            .flat_map(|w| w.homonyms.iter())
            .map(|h| h.part_of_speech.clone())
            .collect();
        Self { labels }
    }

    /// ラベルが集合に含まれる場合に真を返します。
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// ラベルを昇順に返します。
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    /// ラベルの数
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// ラベルが一つもない場合に真を返します。
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// ラベルの集合を複製して返します。
    pub fn to_set(&self) -> BTreeSet<String> {
        self.labels.clone()
    }
}

/// 一つのカタログのスナップショットに対する索引一式
#[derive(Debug, Clone, Default)]
pub struct CatalogueIndex<'a> {
    prefix: PrefixIndex<'a>,
    length: LengthIndex<'a>,
    parts_of_speech: PartOfSpeechSet,
}

impl<'a> CatalogueIndex<'a> {
    /// 読みの列からすべての索引を構築します。
    pub fn new(words: &'a [Word]) -> Self {
        let index = Self {
            prefix: PrefixIndex::new(words),
            length: LengthIndex::new(words),
            parts_of_speech: PartOfSpeechSet::new(words),
        };
        debug_assert_eq!(index.prefix.total(), words.len());
        debug_assert_eq!(index.length.total(), words.len());
        index
    }

    /// 指定された文字で始まる読みを返します。
    pub fn by_leading_character(&self, c: char) -> &[&'a Word] {
        self.prefix.get(c)
    }

    /// 指定された文字数の読みを返します。
    pub fn by_length(&self, len: usize) -> &[&'a Word] {
        self.length.get(len)
    }

    /// カタログに現れるすべての品詞ラベルを返します。
    pub const fn all_parts_of_speech(&self) -> &PartOfSpeechSet {
        &self.parts_of_speech
    }

    /// 先頭文字の索引を返します。
    pub const fn prefix_index(&self) -> &PrefixIndex<'a> {
        &self.prefix
    }

    /// 文字数の索引を返します。
    pub const fn length_index(&self) -> &LengthIndex<'a> {
        &self.length
    }

    /// 行に属し、かつ索引に存在する先頭文字を行内の順序で返します。
    pub fn leading_characters_in(&self, gyo: Gyo) -> Vec<char> {
        gyo.members()
            .chars()
            .filter(|&c| !self.prefix.get(c).is_empty())
            .collect()
    }

    /// 指定された先頭文字のいずれかで始まる読みの文字数を、重複なく昇順に返します。
    pub fn lengths_for(&self, leading: &[char]) -> Vec<usize> {
        let lengths: BTreeSet<usize> = leading
            .iter()
            .flat_map(|&c| self.prefix.get(c))
            .map(|w| w.len())
            .collect();
        lengths.into_iter().collect()
    }

    /// 指定された先頭文字で始まり、指定された文字数を持つ読みを返します。
    ///
    /// 結果は先頭文字の指定順、各先頭文字の中ではカタログの順序に並びます。
    pub fn words_for(&self, leading: &[char], len: usize) -> Vec<&'a Word> {
        leading
            .iter()
            .flat_map(|&c| self.prefix.get(c))
            .filter(|w| w.len() == len)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Homonym;

    fn word(id: u64, reading: &str, parts: &[&str]) -> Word {
        Word {
            id,
            reading: reading.to_string(),
            homonyms: parts
                .iter()
                .enumerate()
                .map(|(i, p)| Homonym {
                    id: id * 10 + i as u64,
                    surface_form: reading.to_string(),
                    part_of_speech: p.to_string(),
                })
                .collect(),
        }
    }

    fn words() -> Vec<Word> {
        vec![
            word(0, "ネコ", &["名詞"]),
            word(1, "ネズミ", &["名詞"]),
            word(2, "イヌ", &["名詞", "動詞"]),
            word(3, "ノル", &["動詞"]),
            word(4, "ネル", &["動詞"]),
        ]
    }

    fn readings(words: &[&Word]) -> Vec<String> {
        words.iter().map(|w| w.reading.clone()).collect()
    }

    #[test]
    fn test_empty_input() {
        let index = CatalogueIndex::new(&[]);
        assert!(index.prefix_index().is_empty());
        assert!(index.length_index().is_empty());
        assert!(index.all_parts_of_speech().is_empty());
        assert!(index.by_leading_character('ネ').is_empty());
        assert!(index.by_length(2).is_empty());
    }

    #[test]
    fn test_buckets_preserve_input_order() {
        let words = words();
        let index = CatalogueIndex::new(&words);
        assert_eq!(readings(index.by_leading_character('ネ')), vec!["ネコ", "ネズミ", "ネル"]);
        assert_eq!(readings(index.by_length(2)), vec!["ネコ", "イヌ", "ノル", "ネル"]);
        assert_eq!(readings(index.by_length(3)), vec!["ネズミ"]);
    }

    #[test]
    fn test_bucket_sums_equal_input_length() {
        let words = words();
        let index = CatalogueIndex::new(&words);
        assert_eq!(index.prefix_index().total(), words.len());
        assert_eq!(index.length_index().total(), words.len());
        assert_eq!(index.prefix_index().keys(), vec!['イ', 'ネ', 'ノ']);
        assert_eq!(index.length_index().keys(), vec![2, 3]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let words = vec![word(0, "ラーメン", &["名詞"])];
        let index = LengthIndex::new(&words);
        assert_eq!(index.get(4).len(), 1);
        assert!(index.get(12).is_empty());
    }

    #[test]
    fn test_all_parts_of_speech() {
        let words = words();
        let index = CatalogueIndex::new(&words);
        let labels: Vec<_> = index.all_parts_of_speech().iter().collect();
        assert_eq!(labels, vec!["動詞", "名詞"]);
        assert!(index.all_parts_of_speech().contains("名詞"));
    }

    #[test]
    fn test_derivation_chain() {
        let words = words();
        let index = CatalogueIndex::new(&words);
        let leading = index.leading_characters_in(Gyo::Na);
        assert_eq!(leading, vec!['ネ', 'ノ']);
        assert_eq!(index.lengths_for(&leading), vec![2, 3]);
        assert_eq!(readings(&index.words_for(&leading, 2)), vec!["ネコ", "ネル", "ノル"]);
        assert!(index.leading_characters_in(Gyo::Ka).is_empty());
    }
}
