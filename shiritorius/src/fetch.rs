//! 辞書アーカイブのダウンロード機能
//!
//! このモジュールは、取り込み元の辞書アーカイブをダウンロードして検証する機能を提供します。

#![cfg(feature = "download")]
use std::fs;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::errors::DownloadError;
use crate::source::SourceMeta;

/// ダウンロードの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// 新しくダウンロードされた
    Downloaded(PathBuf),
    /// 既に存在していたためダウンロードしなかった
    AlreadyExists(PathBuf),
}

impl Fetched {
    /// アーカイブのパスを返します。
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded(path) | Self::AlreadyExists(path) => path,
        }
    }
}

/// ダウンロード元のURLから、保存するアーカイブのファイル名を決めます。
///
/// URLのパスの最後の要素を使用します。`url` が `None` の場合、
/// またはURLからファイル名を得られない場合は `meta` の既定の名前を使用します。
///
/// ```
/// use shiritorius::fetch::archive_file_name;
/// use shiritorius::source::NAIST_JDIC;
///
/// assert_eq!(
///     archive_file_name(&NAIST_JDIC, Some("https://example.com/dic/ipadic.tar.gz?x=1")),
///     "ipadic.tar.gz",
/// );
/// assert_eq!(archive_file_name(&NAIST_JDIC, None), NAIST_JDIC.archive_file_name());
/// ```
pub fn archive_file_name(meta: &SourceMeta, url: Option<&str>) -> String {
    url.and_then(|url| reqwest::Url::parse(url).ok())
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| meta.archive_file_name())
}

/// アーカイブの内容が `meta` のSHA-256と一致するかを検証します。
///
/// `meta` にハッシュが設定されていない場合は何もしません。
///
/// # エラー
///
/// ハッシュが一致しない場合に [`DownloadError::HashMismatch`] を返します。
pub fn verify_archive<R>(meta: &SourceMeta, rdr: &mut R) -> Result<(), DownloadError>
where
    R: io::Read,
{
    let Some(expected) = meta.sha256_hash_archive else {
        return Ok(());
    };
    if !sha256_hex(rdr)?.eq_ignore_ascii_case(expected) {
        return Err(DownloadError::HashMismatch);
    }
    Ok(())
}

/// 辞書アーカイブをダウンロードして指定されたディレクトリに保存します。
///
/// 保存先のファイル名はURLから決まります（[`archive_file_name`]）。
/// アーカイブが既に存在し、`force` が偽の場合はダウンロードしません。
/// ダウンロードは一時ファイルを経由し、検証に成功した場合のみ保存先に移動されます。
///
/// # 引数
///
/// * `meta` - 辞書のメタデータ
/// * `url` - ダウンロード元のURL。`None` の場合は `meta` のURLを使用します。
/// * `dest_dir` - 保存先ディレクトリ
/// * `force` - 既存のアーカイブを無視して再ダウンロードするかどうか
///
/// # エラー
///
/// 通信に失敗した場合、HTTPステータスが成功でない場合、
/// またはアーカイブのSHA-256が一致しない場合にエラーを返します。
pub fn download_archive<P>(
    meta: &SourceMeta,
    url: Option<&str>,
    dest_dir: P,
    force: bool,
) -> Result<Fetched, DownloadError>
where
    P: AsRef<Path>,
{
    let dest_dir = dest_dir.as_ref();
    let archive_path = dest_dir.join(archive_file_name(meta, url));

    if archive_path.exists() && !force {
        return Ok(Fetched::AlreadyExists(archive_path));
    }

    fs::create_dir_all(dest_dir)?;

    let url = url.unwrap_or(meta.download_url);
    log::info!("Downloading {url}");
    let mut response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus(response.status()));
    }

    let mut temp_file = tempfile::NamedTempFile::new_in(dest_dir)?;
    response.copy_to(&mut temp_file)?;

    temp_file.seek(SeekFrom::Start(0))?;
    verify_archive(meta, &mut temp_file)?;

    temp_file.persist(&archive_path)?;
    Ok(Fetched::Downloaded(archive_path))
}

fn sha256_hex<R>(rdr: &mut R) -> io::Result<String>
where
    R: io::Read,
{
    let mut hasher = Sha256::new();
    io::copy(rdr, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
