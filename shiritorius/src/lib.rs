//! # Shiritorius
//!
//! Shiritoriusは、しりとりの語探しのための片仮名の読みのカタログと、その検索エンジンの実装です。
//!
//! ## 概要
//!
//! このライブラリは、MeCab形式の辞書CSVから片仮名の読みを取り出し、
//! 同じ読みを持つ語を同音異義語としてまとめたカタログを構築します。
//! 構築したカタログはJSONとして保存でき、先頭文字や文字数による索引と、
//! 接頭辞・接尾辞・部分文字列・文字数・品詞による絞り込みを提供します。
//!
//! ## 主な機能
//!
//! - **逐次的な取り込み**: EUC-JPなどの旧来のエンコーディングのCSVを一レコードずつ復号
//! - **重複除去**: 読みごとに表層形と品詞の組を一意に保つ
//! - **索引**: 先頭文字と文字数による索引、品詞ラベルの集合
//! - **述語エンジン**: 種類の異なる条件の論理積、同じ種類の断片の論理和
//! - **ダウンロード**: 辞書アーカイブの取得と展開（downloadフィーチャー有効時）
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use shiritorius::{Catalogue, CatalogueIndex, Conditions, IdAssignment, filter};
//! use shiritorius::source::NAIST_JDIC;
//!
//! let csv = "猫,1,1,1,名詞,一般,*,*,*,*,猫,ネコ,ネコ
//! 鼠,1,1,1,名詞,一般,*,*,*,*,鼠,ネズミ,ネズミ
//! 犬,1,1,1,名詞,一般,*,*,*,*,犬,イヌ,イヌ
//! 見る,1,1,1,動詞,自立,*,*,*,*,見る,ミル,ミル";
//! let (bytes, _, _) = encoding_rs::EUC_JP.encode(csv);
//!
//! let (catalogue, stats) =
//!     Catalogue::from_reader(&bytes[..], &NAIST_JDIC, IdAssignment::Sequential)?;
//! assert_eq!(stats.words, 4);
//!
//! let catalogue = catalogue.sorted();
//! let index = CatalogueIndex::new(catalogue.words());
//!
//! let mut conditions = Conditions::initial(index.all_parts_of_speech());
//! conditions.begin_with = vec!["ネ".to_string()];
//!
//! let result: Vec<_> = filter(&catalogue, &conditions)
//!     .into_iter()
//!     .map(|w| w.reading.as_str())
//!     .collect();
//! assert_eq!(result, vec!["ネコ", "ネズミ"]);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// 辞書アーカイブの展開
pub mod archive;

/// 読みのカタログと取り込みパイプライン
pub mod catalogue;

/// 検索条件と述語エンジン
pub mod condition;

/// エラー型の定義
pub mod errors;

/// カタログから導出される索引
pub mod index;

/// 片仮名の判定と正規化
pub mod katakana;

/// 読みの全順序
pub mod ordering;

/// 取り込み元辞書の設定
pub mod source;

/// 読みと同音異義語
pub mod word;

/// 辞書アーカイブのダウンロード
///
/// `download`フィーチャーが有効な場合のみ利用可能です。
#[cfg(feature = "download")]
#[cfg_attr(docsrs, doc(cfg(feature = "download")))]
pub mod fetch;

#[cfg(test)]
mod tests;

// Re-exports
pub use catalogue::{Catalogue, IdAssignment, IngestStats};
pub use condition::{Conditions, Filter, LengthComparator, filter};
pub use index::{CatalogueIndex, PartOfSpeechSet};
pub use word::{Homonym, Word};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
