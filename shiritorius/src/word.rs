//! 読みと同音異義語のデータ型
//!
//! カタログの要素である [`Word`]（読み）と、それに属する [`Homonym`]（同音異義語）を定義します。
//! JSONのフィールド名は表示層との契約であり、キャメルケースで固定されています。

use serde::{Deserialize, Serialize};

/// 読みの識別子
pub type WordId = u64;

/// 同音異義語の識別子
pub type HomonymId = u64;

/// 片仮名の読みと、その読みを持つ同音異義語の列
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// 取り込み一回の中で割り当てられた識別子
    pub id: WordId,

    /// 片仮名のみで構成された読み
    pub reading: String,

    /// 発見順に並んだ同音異義語
    pub homonyms: Vec<Homonym>,
}

/// 表層形と品詞の組
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homonym {
    pub id: HomonymId,
    pub surface_form: String,
    pub part_of_speech: String,
}

impl Word {
    /// 読みの文字数（コードポイント数）を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.reading.chars().count()
    }

    /// 読みが空かどうかを返します。カタログ内の読みは常に空ではありません。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.reading.is_empty()
    }

    /// 読みの先頭文字を返します。
    #[inline(always)]
    pub fn leading_character(&self) -> Option<char> {
        self.reading.chars().next()
    }

    /// 同じ表層形と品詞の組を持つ同音異義語が既に存在するかを返します。
    pub fn has_homonym(&self, surface_form: &str, part_of_speech: &str) -> bool {
        self.homonyms
            .iter()
            .any(|h| h.surface_form == surface_form && h.part_of_speech == part_of_speech)
    }

    /// いずれかの同音異義語が指定された品詞集合に含まれるかを返します。
    pub fn has_part_of_speech_in<F>(&self, mut contains: F) -> bool
    where
        F: FnMut(&str) -> bool,
    {
        self.homonyms.iter().any(|h| contains(&h.part_of_speech))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neko() -> Word {
        Word {
            id: 0,
            reading: "ネコ".to_string(),
            homonyms: vec![Homonym {
                id: 0,
                surface_form: "猫".to_string(),
                part_of_speech: "名詞".to_string(),
            }],
        }
    }

    #[test]
    fn test_len_counts_code_points() {
        let word = neko();
        assert_eq!(word.len(), 2);
        assert_eq!(word.reading.len(), 6);
        assert_eq!(word.leading_character(), Some('ネ'));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&neko()).unwrap();
        assert_eq!(
            json,
            r#"{"id":0,"reading":"ネコ","homonyms":[{"id":0,"surfaceForm":"猫","partOfSpeech":"名詞"}]}"#
        );
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, neko());
    }

    #[test]
    fn test_has_homonym() {
        let word = neko();
        assert!(word.has_homonym("猫", "名詞"));
        assert!(!word.has_homonym("猫", "動詞"));
        assert!(!word.has_homonym("ねこ", "名詞"));
    }
}
