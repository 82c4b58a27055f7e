//! 読みのカタログを構築するユーティリティ
//!
//! このバイナリは、MeCab形式の辞書アーカイブをダウンロードして展開し、
//! 辞書CSVから片仮名の読みのカタログを構築してJSONとして保存します。
//! あわせて、辞書の名前とライセンス文を記した説明ファイルを出力します。

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use shiritorius::archive::{about_dictionary, extract_tar_gz, extraction_dir_name, find_file};
use shiritorius::errors::{DownloadError, ShiritoriusError};
use shiritorius::fetch::{Fetched, archive_file_name, download_archive};
use shiritorius::source::NAIST_JDIC;
use shiritorius::{Catalogue, IdAssignment};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "preprocess",
    version,
    about = "Builds the katakana reading catalogue from the mecab-naist-jdic archive"
)]
struct Args {
    /// URL of the dictionary archive (tar.gz).
    ///
    /// Defaults to the mecab-naist-jdic-0.6.3b-20111013 archive. The archive is
    /// saved under the last path segment of the URL and must hold an EUC-JP
    /// naist-jdic.csv in the MeCab IPADIC layout.
    #[clap(short = 'u', long)]
    url: Option<String>,

    /// Directory in which the archive is downloaded and extracted.
    #[clap(short = 'w', long, default_value = ".")]
    work_dir: PathBuf,

    /// File to which the catalogue is output (in JSON).
    #[clap(short = 'o', long, default_value = "words.json")]
    output: PathBuf,

    /// File to which the dictionary name and its license are output.
    #[clap(short = 'a', long, default_value = "about-dictionary.txt")]
    about_output: PathBuf,

    /// Downloads the archive even if it already exists.
    #[clap(short = 'f', long)]
    force: bool,

    /// How ids are assigned. Choices are sequential and content-hash.
    #[clap(long, default_value = "sequential")]
    id_assignment: IdAssignment,
}

/// 前処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum PreprocessError {
    /// ダウンロードエラー
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    /// 展開、解析、保存のエラー
    #[error(transparent)]
    Shiritorius(#[from] ShiritoriusError),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}

/// ログの出力先を標準エラー出力に設定します。
///
/// 出力するレベルは環境変数 `RUST_LOG` で指定でき、既定では警告以上を出力します。
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// メイン関数
///
/// ダウンロード、展開、説明ファイルの作成、解析、保存の順に実行します。
/// いずれかの段階が失敗した場合は、その時点で処理を中断します。
fn main() -> Result<(), PreprocessError> {
    init_logging();
    let args = Args::parse();
    let meta = NAIST_JDIC;

    let url = args.url.as_deref().unwrap_or(meta.download_url);
    eprintln!("downloading: {url}");
    let fetched = download_archive(&meta, Some(url), &args.work_dir, args.force)?;
    match &fetched {
        Fetched::Downloaded(path) => eprintln!("downloaded: {}", path.display()),
        Fetched::AlreadyExists(path) => eprintln!("already exists: {}", path.display()),
    }

    let archive_path = fetched.path();
    let archive_name = archive_file_name(&meta, Some(url));
    let extracted_dir = args.work_dir.join(extraction_dir_name(&archive_name));
    eprintln!("decompressing: {}", archive_path.display());
    extract_tar_gz(archive_path, &extracted_dir)?;
    eprintln!("decompressed: {}", extracted_dir.display());

    eprintln!("creating file: {}", args.about_output.display());
    let about = about_dictionary(&meta, &extracted_dir)?;
    write_atomically(&args.about_output, |wtr| Ok(wtr.write_all(about.as_bytes())?))?;
    eprintln!("created file: {}", args.about_output.display());

    let csv_path = find_file(&extracted_dir, meta.csv_file_name)?;
    eprintln!("parsing: {}", csv_path.display());
    let rdr = BufReader::new(File::open(&csv_path)?);
    let (catalogue, stats) = Catalogue::from_reader(rdr, &meta, args.id_assignment)?;
    eprintln!("{stats}");

    eprintln!("saving: {}", args.output.display());
    write_atomically(&args.output, |wtr| catalogue.write_json(wtr))?;
    eprintln!("saved: {}", args.output.display());

    Ok(())
}

/// 出力先と同じディレクトリの一時ファイルに書き込み、成功した場合のみ出力先に移動します。
fn write_atomically<F>(path: &Path, write: F) -> Result<(), PreprocessError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), ShiritoriusError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    {
        let mut wtr = BufWriter::new(temp_file.as_file_mut());
        write(&mut wtr)?;
        wtr.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}
