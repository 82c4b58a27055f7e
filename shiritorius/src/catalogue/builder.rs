//! カタログのビルダー
//!
//! デコード済みのレコードを一件ずつ受け取り、読みごとに重複を除いた [`Word`] の列を構築します。
//! 識別子の割り当てと重複除去は入力順に依存するため、レコードは入力の自然な順序で処理されます。

use hashbrown::HashMap;
#[cfg(debug_assertions)]
use hashbrown::HashSet;

use crate::catalogue::decoder::Record;
use crate::catalogue::ids::{IdAllocator, IdAssignment};
use crate::catalogue::{Catalogue, IngestStats};
use crate::katakana::is_katakana_only;
use crate::source::RecordLayout;
use crate::word::{Homonym, Word};
#[cfg(debug_assertions)]
use crate::word::{HomonymId, WordId};

/// レコード列から [`Catalogue`] を構築するビルダー
pub struct CatalogueBuilder {
    layout: RecordLayout,
    ids: IdAllocator,
    words: Vec<Word>,
    positions: HashMap<String, usize>,
    stats: IngestStats,
    #[cfg(debug_assertions)]
    seen_word_ids: HashSet<WordId>,
    #[cfg(debug_assertions)]
    seen_homonym_ids: HashSet<HomonymId>,
}

/// 一件のエントリを取り込んだ結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 新しい読みが作成された
    NewWord,
    /// 既存の読みに同音異義語が追加された
    NewHomonym,
    /// 同じ表層形と品詞の組が既に存在したため破棄された
    Duplicate,
    /// 読みが片仮名のみで構成されていないため除外された
    NonKatakana,
    /// 必要な列を持たないため除外された
    InvalidShape,
}

impl CatalogueBuilder {
    /// 新しいビルダーを作成します。
    pub fn new(layout: RecordLayout, assignment: IdAssignment) -> Self {
        Self {
            layout,
            ids: IdAllocator::new(assignment),
            words: vec![],
            positions: HashMap::new(),
            stats: IngestStats::default(),
            #[cfg(debug_assertions)]
            seen_word_ids: HashSet::new(),
            #[cfg(debug_assertions)]
            seen_homonym_ids: HashSet::new(),
        }
    }

    /// デコード済みのレコードを取り込みます。
    ///
    /// 必要な列が欠けているレコードは形状不正として数えられます。
    pub fn push_record(&mut self, record: &Record) -> Outcome {
        let (Some(reading), Some(surface_form), Some(part_of_speech)) = (
            record.field(self.layout.reading),
            record.field(self.layout.surface_form),
            record.field(self.layout.part_of_speech),
        ) else {
            self.stats.invalid_shape += 1;
            log::warn!("Rejected a record without the required fields: {record:?}");
            return Outcome::InvalidShape;
        };
        self.push_entry(reading, surface_form, part_of_speech)
    }

    /// 読み、表層形、品詞の組を取り込みます。
    pub fn push_entry(&mut self, reading: &str, surface_form: &str, part_of_speech: &str) -> Outcome {
        if !is_katakana_only(reading) {
            self.stats.rejected_non_katakana += 1;
            log::debug!("Rejected a reading containing non-katakana characters: {reading:?}");
            return Outcome::NonKatakana;
        }
        self.stats.accepted += 1;

        if let Some(&pos) = self.positions.get(reading) {
            if self.words[pos].has_homonym(surface_form, part_of_speech) {
                self.stats.duplicate_homonyms += 1;
                log::debug!("Discarded a duplicate homonym: {reading} {surface_form} {part_of_speech}");
                return Outcome::Duplicate;
            }
            let homonym = self.new_homonym(reading, surface_form, part_of_speech);
            self.words[pos].homonyms.push(homonym);
            return Outcome::NewHomonym;
        }

        let id = self.ids.word_id(reading);
        #[cfg(debug_assertions)]
        debug_assert!(self.seen_word_ids.insert(id), "word id collision: {id}");
        let homonym = self.new_homonym(reading, surface_form, part_of_speech);
        self.positions.insert(reading.to_string(), self.words.len());
        self.words.push(Word {
            id,
            reading: reading.to_string(),
            homonyms: vec![homonym],
        });
        Outcome::NewWord
    }

    fn new_homonym(&mut self, reading: &str, surface_form: &str, part_of_speech: &str) -> Homonym {
        let id = self.ids.homonym_id(reading, surface_form, part_of_speech);
        #[cfg(debug_assertions)]
        debug_assert!(self.seen_homonym_ids.insert(id), "homonym id collision: {id}");
        Homonym {
            id,
            surface_form: surface_form.to_string(),
            part_of_speech: part_of_speech.to_string(),
        }
    }

    /// 構築中の集計を返します。
    pub const fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// カタログを完成させます。読みは発見順に並びます。
    pub fn build(self) -> (Catalogue, IngestStats) {
        let mut stats = self.stats;
        stats.words = self.words.len();
        stats.homonyms = self.words.iter().map(|w| w.homonyms.len()).sum();
        log::info!(
            "Built a catalogue of {} words and {} homonyms",
            stats.words,
            stats.homonyms
        );
        (Catalogue::from_words_unchecked(self.words), stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> CatalogueBuilder {
        CatalogueBuilder::new(RecordLayout::MECAB, IdAssignment::Sequential)
    }

    #[test]
    fn test_duplicate_entry_yields_one_homonym() {
        let mut b = builder();
        assert_eq!(b.push_entry("ネコ", "猫", "名詞"), Outcome::NewWord);
        assert_eq!(b.push_entry("ネコ", "猫", "名詞"), Outcome::Duplicate);
        let (catalogue, stats) = b.build();
        assert_eq!(catalogue.len(), 1);
        let word = &catalogue.words()[0];
        assert_eq!(word.reading, "ネコ");
        assert_eq!(word.homonyms.len(), 1);
        assert_eq!(word.homonyms[0].surface_form, "猫");
        assert_eq!(word.homonyms[0].part_of_speech, "名詞");
        assert_eq!(stats.duplicate_homonyms, 1);
        assert_eq!(stats.accepted, 2);
    }

    #[test]
    fn test_homonyms_differ_by_surface_or_part_of_speech() {
        let mut b = builder();
        b.push_entry("カミ", "紙", "名詞");
        b.push_entry("カミ", "神", "名詞");
        b.push_entry("カミ", "紙", "接尾");
        b.push_entry("イヌ", "犬", "名詞");
        let (catalogue, stats) = b.build();
        let words = catalogue.words();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].id, 0);
        assert_eq!(words[1].id, 1);
        let ids: Vec<_> = words[0].homonyms.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(words[1].homonyms[0].id, 3);
        assert_eq!(stats.words, 2);
        assert_eq!(stats.homonyms, 4);
    }

    #[test]
    fn test_non_katakana_is_rejected() {
        let mut b = builder();
        assert_eq!(b.push_entry("ねこ", "猫", "名詞"), Outcome::NonKatakana);
        assert_eq!(b.push_entry("", "空", "名詞"), Outcome::NonKatakana);
        assert_eq!(b.push_entry("エー・ビー", "AB", "名詞"), Outcome::NonKatakana);
        assert_eq!(b.stats().rejected_non_katakana, 3);
        let (catalogue, _) = b.build();
        assert!(catalogue.is_empty());
    }

    #[test]
    fn test_push_record_uses_layout() {
        let mut fields = vec!["*".to_string(); 13];
        fields[0] = "猫".to_string();
        fields[4] = "名詞".to_string();
        fields[11] = "ネコ".to_string();
        let mut b = builder();
        assert_eq!(b.push_record(&Record::new(fields)), Outcome::NewWord);
        assert_eq!(
            b.push_record(&Record::new(vec!["猫".to_string()])),
            Outcome::InvalidShape
        );
        assert_eq!(b.stats().invalid_shape, 1);
        let (catalogue, _) = b.build();
        assert_eq!(catalogue.words()[0].homonyms[0].surface_form, "猫");
    }
}
