//! 識別子の割り当て
//!
//! 既定では取り込み一回の中で発見順に連番を振ります。
//! 複数回の取り込みをまたいで識別子を安定させたい場合は、
//! 内容のSHA-256から導出する方式を選択できます。

use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::errors::ShiritoriusError;
use crate::word::{HomonymId, WordId};

// Keeps derived ids within the integer range that JSON consumers represent exactly.
const CONTENT_HASH_MASK: u64 = (1 << 53) - 1;

// Separates hashed fields so that ("ab", "c") and ("a", "bc") differ.
const FIELD_SEPARATOR: u8 = 0x1f;

/// 識別子の割り当て方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdAssignment {
    /// 発見順の連番（0始まり、欠番なし）
    #[default]
    Sequential,
    /// 読み、または（読み、表層形、品詞）の組のハッシュから導出
    ContentHash,
}

impl FromStr for IdAssignment {
    type Err = ShiritoriusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "content-hash" => Ok(Self::ContentHash),
            _ => Err(ShiritoriusError::invalid_argument(
                "id_assignment",
                format!("expected `sequential` or `content-hash`, got `{s}`"),
            )),
        }
    }
}

/// 読みと同音異義語の識別子を払い出すアロケータ
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    assignment: IdAssignment,
    next_word_id: WordId,
    next_homonym_id: HomonymId,
}

impl IdAllocator {
    pub(crate) fn new(assignment: IdAssignment) -> Self {
        Self {
            assignment,
            next_word_id: 0,
            next_homonym_id: 0,
        }
    }

    /// 新しい読みの識別子を払い出します。
    pub(crate) fn word_id(&mut self, reading: &str) -> WordId {
        match self.assignment {
            IdAssignment::Sequential => {
                let id = self.next_word_id;
                self.next_word_id += 1;
                id
            }
            IdAssignment::ContentHash => content_hash(&[reading]),
        }
    }

    /// 新しい同音異義語の識別子を払い出します。
    pub(crate) fn homonym_id(
        &mut self,
        reading: &str,
        surface_form: &str,
        part_of_speech: &str,
    ) -> HomonymId {
        match self.assignment {
            IdAssignment::Sequential => {
                let id = self.next_homonym_id;
                self.next_homonym_id += 1;
                id
            }
            IdAssignment::ContentHash => content_hash(&[reading, surface_form, part_of_speech]),
        }
    }
}

fn content_hash(fields: &[&str]) -> u64 {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i != 0 {
            hasher.update([FIELD_SEPARATOR]);
        }
        hasher.update(field.as_bytes());
    }
    let digest = hasher.finalize();
    let mut head = [0; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) & CONTENT_HASH_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_counters_are_independent() {
        let mut ids = IdAllocator::new(IdAssignment::Sequential);
        assert_eq!(ids.word_id("ネコ"), 0);
        assert_eq!(ids.homonym_id("ネコ", "猫", "名詞"), 0);
        assert_eq!(ids.homonym_id("ネコ", "ねこ", "名詞"), 1);
        assert_eq!(ids.word_id("イヌ"), 1);
        assert_eq!(ids.homonym_id("イヌ", "犬", "名詞"), 2);
    }

    #[test]
    fn test_content_hash_is_stable_and_bounded() {
        let mut a = IdAllocator::new(IdAssignment::ContentHash);
        let mut b = IdAllocator::new(IdAssignment::ContentHash);
        b.word_id("イヌ");
        assert_eq!(a.word_id("ネコ"), b.word_id("ネコ"));
        assert_ne!(a.word_id("ネコ"), a.word_id("イヌ"));
        assert!(a.word_id("ネコ") <= CONTENT_HASH_MASK);
        assert_ne!(
            a.homonym_id("ネコ", "猫", "名詞"),
            a.homonym_id("ネコ", "猫名", "詞"),
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("sequential".parse::<IdAssignment>().unwrap(), IdAssignment::Sequential);
        assert_eq!("content-hash".parse::<IdAssignment>().unwrap(), IdAssignment::ContentHash);
        assert!("random".parse::<IdAssignment>().is_err());
    }
}
