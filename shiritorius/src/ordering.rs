//! 読みの全順序
//!
//! カタログの表示と検索結果の決定性のために、読みをUTF-16のコード単位で昇順に比較します。
//! ロケールに依存する照合は行いません。

use std::cmp::Ordering;

use crate::word::Word;

/// 二つの読みをUTF-16のコード単位列として比較します。
///
/// ```
/// use std::cmp::Ordering;
/// use shiritorius::ordering::compare_readings;
///
/// assert_eq!(compare_readings("イヌ", "ネコ"), Ordering::Less);
/// assert_eq!(compare_readings("ネコ", "ネ"), Ordering::Greater);
/// ```
#[inline]
pub fn compare_readings(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// 二つの読みを比較します。
#[inline]
pub fn compare_words(a: &Word, b: &Word) -> Ordering {
    compare_readings(&a.reading, &b.reading)
}

/// 読みの昇順に並べ替えます。
///
/// カタログ内の読みは一意なので、安定性は結果に影響しません。
pub fn sort_by_reading(words: &mut [Word]) {
    words.sort_unstable_by(compare_words);
}

/// 参照の列を読みの昇順に並べ替えます。
pub fn sort_refs_by_reading(words: &mut [&Word]) {
    words.sort_unstable_by(|a, b| compare_words(a, b));
}

/// 読みが昇順に並んでいるかを返します。
pub fn is_sorted_by_reading<'a, I>(words: I) -> bool
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut it = words.into_iter();
    let Some(mut prev) = it.next() else {
        return true;
    };
    for word in it {
        if compare_words(prev, word) == Ordering::Greater {
            return false;
        }
        prev = word;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(reading: &str) -> Word {
        Word {
            id: 0,
            reading: reading.to_string(),
            homonyms: vec![],
        }
    }

    #[test]
    fn test_prolonged_sound_mark_sorts_after_small_kana() {
        // U+30FC is greater than every letter in U+30A1..=U+30FA.
        assert_eq!(compare_readings("アー", "アヺ"), Ordering::Greater);
        assert_eq!(compare_readings("ァ", "ア"), Ordering::Less);
    }

    #[test]
    fn test_code_unit_order_differs_from_code_point_order() {
        // U+FF61 is one code unit, U+1F600 is a surrogate pair starting at 0xD83D.
        assert_eq!(compare_readings("\u{FF61}", "\u{1F600}"), Ordering::Greater);
        assert!("\u{FF61}" < "\u{1F600}");
    }

    #[test]
    fn test_sort_by_reading() {
        let mut words = vec![word("ネズミ"), word("イヌ"), word("ネコ"), word("アーチ")];
        sort_by_reading(&mut words);
        let readings: Vec<_> = words.iter().map(|w| w.reading.as_str()).collect();
        assert_eq!(readings, vec!["アーチ", "イヌ", "ネコ", "ネズミ"]);
        assert!(is_sorted_by_reading(&words));
    }

    #[test]
    fn test_is_sorted_by_reading() {
        assert!(is_sorted_by_reading(&[]));
        assert!(!is_sorted_by_reading(&[word("ネコ"), word("イヌ")]));
    }
}
