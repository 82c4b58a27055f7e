//! エラー型の定義
//!
//! このモジュールは、Shiritoriusライブラリで使用されるすべてのエラー型を定義します。
//! 取り込み中に許容される不正レコード（壊れた行や片仮名以外の読み）はエラーではなく、
//! [`IngestStats`](crate::catalogue::IngestStats) で数え上げられます。

use std::error::Error;
use std::fmt;

/// Shiritorius専用のResult型
///
/// エラー型としてデフォルトで[`ShiritoriusError`]を使用します。
pub type Result<T, E = ShiritoriusError> = std::result::Result<T, E>;

/// Shiritoriusのエラー型
///
/// パイプラインを中断させる致命的なエラーのみを表現します。
#[derive(Debug, thiserror::Error)]
pub enum ShiritoriusError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 標準I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSONのシリアライズ・デシリアライズエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// アーカイブ内に目的のファイルが見つからない
    #[error("The file '{0}' was not found in the extracted archive.")]
    ExtractedFileNotFound(String),

    /// ダウンロードエラー
    ///
    /// `download`フィーチャーが有効な場合のみ利用可能です。
    #[cfg(feature = "download")]
    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl ShiritoriusError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
///
/// レコード単位の不正ではなく、デコーダ自体が続行できない構造的な破損を表します。
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// ダウンロード関連のエラー
///
/// `download`フィーチャーが有効な場合のみ利用可能です。
#[cfg(feature = "download")]
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// ネットワークリクエストの失敗
    #[error("Network request failed")]
    Request(#[from] reqwest::Error),

    /// I/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ダウンロードファイルのチェックサム不一致
    ///
    /// ダウンロードされたファイルが破損している可能性があります。
    #[error("Downloaded file checksum mismatch. It may be corrupted.")]
    HashMismatch,

    /// HTTPステータスエラー
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// パスの永続化エラー
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}
