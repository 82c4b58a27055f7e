//! 取り込み元辞書の設定
//!
//! このモジュールは、取り込み元となる辞書アーカイブのメタデータと、
//! CSVレコード内の列位置を定義します。

use encoding_rs::Encoding;

use crate::errors::{Result, ShiritoriusError};

/// CSVレコード内で各項目が格納されている列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// 表層形の列
    pub surface_form: usize,
    /// 品詞の列
    pub part_of_speech: usize,
    /// 読みの列
    pub reading: usize,
}

impl RecordLayout {
    /// MeCab IPADIC系辞書の列配置
    pub const MECAB: Self = Self {
        surface_form: 0,
        part_of_speech: 4,
        reading: 11,
    };

    /// この配置のレコードが最低限持つべき列数を返します。
    pub fn required_fields(&self) -> usize {
        self.surface_form.max(self.part_of_speech).max(self.reading) + 1
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::MECAB
    }
}

/// 辞書アーカイブのメタデータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMeta {
    /// 辞書の名前。展開先ディレクトリ名と辞書の説明に使われます。
    pub name: &'static str,
    pub download_url: &'static str,
    /// アーカイブ内のCSVファイル名
    pub csv_file_name: &'static str,
    /// アーカイブ内のライセンスファイル名
    pub license_file_name: &'static str,
    /// CSVファイルの文字エンコーディング（WHATWGのラベル）
    pub encoding_label: &'static str,
    pub layout: RecordLayout,
    /// アーカイブのSHA-256。`None` の場合は検証しません。
    pub sha256_hash_archive: Option<&'static str>,
}

impl SourceMeta {
    /// CSVファイルの文字エンコーディングを解決します。
    ///
    /// # エラー
    ///
    /// ラベルが既知のエンコーディングを指していない場合にエラーを返します。
    pub fn encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding_label.as_bytes()).ok_or_else(|| {
            ShiritoriusError::invalid_argument(
                "encoding_label",
                format!("unknown encoding label: {}", self.encoding_label),
            )
        })
    }

    /// ダウンロードしたアーカイブのファイル名を返します。
    pub fn archive_file_name(&self) -> String {
        format!("{}.tar.gz", self.name)
    }
}

/// mecab-naist-jdic 0.6.3b (2011-10-13)
pub static NAIST_JDIC: SourceMeta = SourceMeta {
    name: "mecab-naist-jdic-0.6.3b-20111013",
    download_url: "https://jaist.dl.osdn.jp/naist-jdic/53500/mecab-naist-jdic-0.6.3b-20111013.tar.gz",
    csv_file_name: "naist-jdic.csv",
    license_file_name: "COPYING",
    encoding_label: "euc-jp",
    layout: RecordLayout::MECAB,
    sha256_hash_archive: None,
};
