//! 辞書アーカイブの展開
//!
//! gzip圧縮されたtarアーカイブを作業ディレクトリに展開し、
//! 展開されたツリーの中から目的のファイルを探し出す機能を提供します。

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use walkdir::WalkDir;

use crate::errors::{Result, ShiritoriusError};
use crate::source::SourceMeta;

/// `.tar.gz` アーカイブを指定されたディレクトリに展開します。
///
/// 展開先のディレクトリが存在しない場合は作成されます。
/// 既存のファイルは上書きされます。
///
/// # エラー
///
/// アーカイブが読み込めない場合、または展開に失敗した場合にエラーを返します。
pub fn extract_tar_gz<P, Q>(archive_path: P, dest_dir: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let archive_path = archive_path.as_ref();
    let dest_dir = dest_dir.as_ref();
    fs::create_dir_all(dest_dir)?;

    let reader = BufReader::new(File::open(archive_path)?);
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    archive.unpack(dest_dir)?;

    log::info!(
        "Extracted {} into {}",
        archive_path.display(),
        dest_dir.display()
    );
    Ok(())
}

/// アーカイブのファイル名から展開先ディレクトリの名前を返します。
///
/// `.tar.gz` または `.tgz` の拡張子を取り除いた名前です。
/// どちらの拡張子も持たない場合はファイル名をそのまま返します。
pub fn extraction_dir_name(archive_file_name: &str) -> &str {
    archive_file_name
        .strip_suffix(".tar.gz")
        .or_else(|| archive_file_name.strip_suffix(".tgz"))
        .filter(|name| !name.is_empty())
        .unwrap_or(archive_file_name)
}

/// ディレクトリ以下を再帰的に探索し、指定された名前のファイルを返します。
///
/// 同名のファイルが複数ある場合は、最初に見つかったものを返します。
///
/// # エラー
///
/// ファイルが見つからない場合に [`ShiritoriusError::ExtractedFileNotFound`] を返します。
pub fn find_file<P>(dir: P, file_name: &str) -> Result<PathBuf>
where
    P: AsRef<Path>,
{
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == file_name)
        .map(|e| e.into_path())
        .ok_or_else(|| ShiritoriusError::ExtractedFileNotFound(file_name.to_string()))
}

/// 展開済みの辞書から説明文を組み立てます。
///
/// 説明文は辞書の名前、空行、ライセンスファイルの本文の順に並びます。
///
/// # エラー
///
/// ライセンスファイルが見つからない場合、または読み込めない場合にエラーを返します。
pub fn about_dictionary<P>(meta: &SourceMeta, extracted_dir: P) -> Result<String>
where
    P: AsRef<Path>,
{
    let license_path = find_file(extracted_dir, meta.license_file_name)?;
    let mut license = vec![];
    File::open(&license_path)?.read_to_end(&mut license)?;
    // COPYING files of the supported dictionaries are ASCII.
    let license = String::from_utf8_lossy(&license);
    Ok(format!("{}\n\n{}", meta.name, license))
}
