//! 読みのカタログ
//!
//! このモジュールは、取り込みパイプラインの成果物である [`Catalogue`] と、
//! その構築過程の集計 [`IngestStats`] を提供します。
//!
//! 取り込みは次の段階で構成されます。
//!
//! 1. [`RecordDecoder`] が旧来のエンコーディングのバイト列からレコードを逐次取り出す
//! 2. [`CatalogueBuilder`] が読みを検査し、重複を除いて [`Word`] を構築する
//! 3. 完成したカタログをJSONとして書き出す
//!
//! 壊れた行や片仮名以外の読みは数えられるだけで、取り込みを中断しません。

pub mod builder;
pub mod decoder;
pub mod ids;

use std::fmt;
use std::io::{Read, Write};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{Result, ShiritoriusError};
use crate::katakana::is_katakana_only;
use crate::ordering;
use crate::source::{RecordLayout, SourceMeta};
use crate::word::Word;

pub use builder::{CatalogueBuilder, Outcome};
pub use decoder::{DecodeStats, Record, RecordDecoder};
pub use ids::IdAssignment;

/// 取り込み一回で構築された読みの列
///
/// 構築後は読み取り専用です。JSONでは [`Word`] の配列として表現されます。
/// デシリアライズ時には [`Catalogue::validate`] と同じ検査が行われます。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Word>")]
pub struct Catalogue {
    words: Vec<Word>,
}

/// 取り込みの集計
///
/// 機能上の契約ではなく、運用者が取り込み結果を確認するための診断情報です。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// 列数の不一致などにより読み飛ばされた行
    pub skipped: usize,
    /// 形状が不正なレコード
    pub invalid_shape: usize,
    /// デコードに成功したレコード
    pub parsed: usize,
    /// 復号できないバイト列を含むレコード
    pub undecodable: usize,
    /// 読みに片仮名以外の文字を含むレコード
    pub rejected_non_katakana: usize,
    /// 読みの検査を通過したレコード
    pub accepted: usize,
    /// 既存の同音異義語と重複したレコード
    pub duplicate_homonyms: usize,
    /// カタログ内の読みの数
    pub words: usize,
    /// カタログ内の同音異義語の数
    pub homonyms: usize,
}

impl IngestStats {
    fn merge_decode(&mut self, decode: DecodeStats) {
        self.skipped += decode.skipped;
        self.invalid_shape += decode.invalid_shape;
        self.parsed += decode.parsed;
        self.undecodable += decode.undecodable;
    }
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of skipped records: {}", self.skipped)?;
        writeln!(f, "number of invalid type records: {}", self.invalid_shape)?;
        writeln!(f, "number of parsed records: {}", self.parsed)?;
        writeln!(f, "number of records with undecodable bytes: {}", self.undecodable)?;
        writeln!(
            f,
            "number of records with yomi including other than katakana: {}",
            self.rejected_non_katakana
        )?;
        writeln!(f, "number of accepted records: {}", self.accepted)?;
        writeln!(f, "number of duplicate homonyms: {}", self.duplicate_homonyms)?;
        writeln!(f, "number of yomi: {}", self.words)?;
        write!(f, "number of homonyms: {}", self.homonyms)
    }
}

impl Catalogue {
    /// 読みの列からカタログを作成します。
    ///
    /// # エラー
    ///
    /// 読みが片仮名のみで構成されていない場合、読みが重複している場合、
    /// または同じ読みの中に同じ表層形と品詞の組が複数ある場合にエラーを返します。
    pub fn new(words: Vec<Word>) -> Result<Self> {
        let catalogue = Self { words };
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub(crate) const fn from_words_unchecked(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// 検査済みのレコード列からカタログを構築します。
    ///
    /// # エラー
    ///
    /// レコード列が致命的なエラーを返した場合、その時点で構築を中断します。
    pub fn from_records<I>(
        records: I,
        layout: RecordLayout,
        assignment: IdAssignment,
    ) -> Result<(Self, IngestStats)>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut builder = CatalogueBuilder::new(layout, assignment);
        for record in records {
            builder.push_record(&record?);
        }
        Ok(builder.build())
    }

    /// 辞書のCSVファイルを読み込み、カタログを構築します。
    ///
    /// 入力は `meta` に指定されたエンコーディングで復号され、
    /// レコードは読み込まれた順にビルダーへ渡されます。
    ///
    /// # 例
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use shiritorius::catalogue::{Catalogue, IdAssignment};
    /// use shiritorius::source::NAIST_JDIC;
    ///
    /// let csv = "猫,1,1,1,名詞,一般,*,*,*,*,猫,ネコ,ネコ\n\
    ///            猫,1,1,1,名詞,一般,*,*,*,*,猫,ネコ,ネコ\n";
    /// let (bytes, _, _) = encoding_rs::EUC_JP.encode(csv);
    /// let (catalogue, stats) =
    ///     Catalogue::from_reader(&bytes[..], &NAIST_JDIC, IdAssignment::Sequential)?;
    ///
    /// assert_eq!(catalogue.len(), 1);
    /// assert_eq!(catalogue.words()[0].homonyms.len(), 1);
    /// assert_eq!(stats.duplicate_homonyms, 1);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// 入力の読み込みに失敗した場合、またはエンコーディングが解決できない場合にエラーを返します。
    pub fn from_reader<R>(
        rdr: R,
        meta: &SourceMeta,
        assignment: IdAssignment,
    ) -> Result<(Self, IngestStats)>
    where
        R: Read,
    {
        let encoding = meta.encoding()?;
        let mut decoder = RecordDecoder::new(rdr, encoding, meta.layout.required_fields());
        let (catalogue, mut stats) =
            Self::from_records(decoder.by_ref(), meta.layout, assignment)?;
        stats.merge_decode(decoder.stats());
        Ok((catalogue, stats))
    }

    /// JSONからカタログを読み込みます。
    ///
    /// # エラー
    ///
    /// JSONが不正な場合、または内容がカタログの不変条件を満たさない場合にエラーを返します。
    pub fn read_json<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let words: Vec<Word> = serde_json::from_reader(rdr)?;
        Self::new(words)
    }

    /// カタログをJSONとして書き出します。
    pub fn write_json<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        serde_json::to_writer(wtr, &self.words)?;
        Ok(())
    }

    /// 読みの列を返します。
    #[inline(always)]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// 読みの列を取り出します。
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    /// 読みのイテレータを返します。
    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    /// 読みの数を返します。
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// 読みが一つもない場合に真を返します。
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// すべての同音異義語の数を返します。
    pub fn homonym_count(&self) -> usize {
        self.words.iter().map(|w| w.homonyms.len()).sum()
    }

    /// 読みの昇順に並べ替えたカタログを返します。
    pub fn sorted(&self) -> Self {
        let mut words = self.words.clone();
        ordering::sort_by_reading(&mut words);
        Self { words }
    }

    /// カタログの不変条件を検査します。
    pub fn validate(&self) -> Result<()> {
        let mut readings = HashSet::with_capacity(self.words.len());
        for word in &self.words {
            if !is_katakana_only(&word.reading) {
                return Err(ShiritoriusError::invalid_format(
                    "catalogue",
                    format!("reading {:?} is not katakana-only", word.reading),
                ));
            }
            if !readings.insert(word.reading.as_str()) {
                return Err(ShiritoriusError::invalid_format(
                    "catalogue",
                    format!("reading {:?} appears more than once", word.reading),
                ));
            }
            let mut pairs = HashSet::with_capacity(word.homonyms.len());
            for h in &word.homonyms {
                if !pairs.insert((h.surface_form.as_str(), h.part_of_speech.as_str())) {
                    return Err(ShiritoriusError::invalid_format(
                        "catalogue",
                        format!(
                            "homonym ({}, {}) of {:?} appears more than once",
                            h.surface_form, h.part_of_speech, word.reading
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Word>> for Catalogue {
    type Error = ShiritoriusError;

    fn try_from(words: Vec<Word>) -> Result<Self> {
        Self::new(words)
    }
}

impl Serialize for Catalogue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.words.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

impl AsRef<[Word]> for Catalogue {
    fn as_ref(&self) -> &[Word] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Homonym;

    fn word(id: u64, reading: &str, homonyms: &[(&str, &str)]) -> Word {
        Word {
            id,
            reading: reading.to_string(),
            homonyms: homonyms
                .iter()
                .enumerate()
                .map(|(i, (s, p))| Homonym {
                    id: i as u64,
                    surface_form: s.to_string(),
                    part_of_speech: p.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_rejects_non_katakana() {
        assert!(Catalogue::new(vec![word(0, "ねこ", &[("猫", "名詞")])]).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_reading() {
        let words = vec![word(0, "ネコ", &[("猫", "名詞")]), word(1, "ネコ", &[("ねこ", "名詞")])];
        assert!(Catalogue::new(words).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_homonym() {
        let words = vec![word(0, "ネコ", &[("猫", "名詞"), ("猫", "名詞")])];
        assert!(Catalogue::new(words).is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let catalogue = Catalogue::new(vec![
            word(0, "ネコ", &[("猫", "名詞")]),
            word(1, "イヌ", &[("犬", "名詞")]),
        ])
        .unwrap();
        let mut buf = vec![];
        catalogue.write_json(&mut buf).unwrap();
        assert!(buf.starts_with(b"[{\"id\":0,\"reading\":\"\xe3\x83\x8d"));
        let back = Catalogue::read_json(&buf[..]).unwrap();
        assert_eq!(back, catalogue);
    }

    #[test]
    fn test_deserialize_validates() {
        let katakana = r#"[{"id":0,"reading":"ネコ","homonyms":[{"id":0,"surfaceForm":"猫","partOfSpeech":"名詞"}]}]"#;
        let catalogue: Catalogue = serde_json::from_str(katakana).unwrap();
        assert_eq!(catalogue.words()[0].reading, "ネコ");
        assert_eq!(serde_json::to_string(&catalogue).unwrap(), katakana);

        let hiragana = r#"[{"id":0,"reading":"ねこ","homonyms":[]}]"#;
        assert!(serde_json::from_str::<Catalogue>(hiragana).is_err());

        let duplicated = r#"[{"id":0,"reading":"ネコ","homonyms":[]},{"id":1,"reading":"ネコ","homonyms":[]}]"#;
        let err = serde_json::from_str::<Catalogue>(duplicated).unwrap_err();
        assert!(err.to_string().contains("appears more than once"));
    }

    #[test]
    fn test_sorted_by_reading() {
        let catalogue = Catalogue::new(vec![
            word(0, "ネコ", &[("猫", "名詞")]),
            word(1, "イヌ", &[("犬", "名詞")]),
            word(2, "ネズミ", &[("鼠", "名詞")]),
        ])
        .unwrap();
        let readings: Vec<_> = catalogue.sorted().iter().map(|w| w.reading.clone()).collect();
        assert_eq!(readings, vec!["イヌ", "ネコ", "ネズミ"]);
        assert_eq!(catalogue.words()[0].reading, "ネコ");
    }

    #[test]
    fn test_stats_display() {
        let stats = IngestStats {
            words: 3,
            ..Default::default()
        };
        assert!(stats.to_string().contains("number of yomi: 3"));
    }
}
