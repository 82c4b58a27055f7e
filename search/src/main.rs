//! 読みのカタログを検索するユーティリティ
//!
//! このバイナリは、前処理で保存されたカタログを読み込み、コマンドライン引数で指定された
//! 条件を満たす読みを昇順に出力します。出力形式は reading、detail、json から選べます。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use shiritorius::condition::LOSING_ENDING;
use shiritorius::errors::ShiritoriusError;
use shiritorius::katakana::{Gyo, normalize_fragments};
use shiritorius::ordering::sort_by_reading;
use shiritorius::{Catalogue, CatalogueIndex, Conditions, LengthComparator, Word, filter};

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Reading,
    Detail,
    Json,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "reading" => Ok(Self::Reading),
            "detail" => Ok(Self::Detail),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
///
/// 断片を受け取る引数は繰り返し指定でき、一つの値に読点やカンマで区切った複数の断片を含められます。
/// 平仮名は片仮名として扱われます。
#[derive(Parser, Debug)]
#[clap(name = "search", version, about = "Searches katakana readings by conditions")]
struct Args {
    /// Catalogue file (in JSON) produced by preprocess.
    #[clap(short = 'i', long, default_value = "words.json")]
    catalogue: PathBuf,

    /// Readings beginning with any of the fragments.
    #[clap(short = 'b', long)]
    begin_with: Vec<String>,

    /// Readings not beginning with any of the fragments.
    #[clap(long)]
    not_begin_with: Vec<String>,

    /// Readings ending with any of the fragments.
    #[clap(short = 'e', long)]
    end_with: Vec<String>,

    /// Readings not ending with any of the fragments. "ン" is excluded unless
    /// `--allow-losing-ending` is given.
    #[clap(long)]
    not_end_with: Vec<String>,

    /// Readings containing any of the fragments.
    #[clap(short = 'c', long)]
    include: Vec<String>,

    /// Readings containing none of the fragments.
    #[clap(short = 'x', long)]
    exclude: Vec<String>,

    /// Readings beginning with a character of the row (e.g. ナ, な, na).
    #[clap(short = 'g', long)]
    gyo: Option<Gyo>,

    /// Number of characters of readings. Values less than 1 are ignored.
    #[clap(short = 'l', long, allow_negative_numbers = true)]
    length: Option<i64>,

    /// How the length is compared. Choices are at-most, exactly, and at-least.
    #[clap(long, default_value = "exactly")]
    comparator: LengthComparator,

    /// Parts of speech of which at least one homonym must have.
    ///
    /// Defaults to 名詞 if the catalogue has it, otherwise all parts of speech.
    #[clap(short = 'p', long)]
    part_of_speech: Vec<String>,

    /// Selects all parts of speech in the catalogue.
    #[clap(short = 'P', long, conflicts_with = "part_of_speech")]
    all_parts_of_speech: bool,

    /// Keeps readings ending with "ン".
    #[clap(long)]
    allow_losing_ending: bool,

    /// Output mode. Choices are reading, detail, and json.
    #[clap(short = 'O', long, default_value = "reading")]
    output_mode: OutputMode,

    /// Prints the summary of the conditions to stderr.
    #[clap(short = 'd', long)]
    describe: bool,

    /// Prints the parts of speech in the catalogue and exits.
    #[clap(long)]
    list_parts_of_speech: bool,
}

/// 検索中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum SearchError {
    /// カタログの読み込みエラー
    #[error(transparent)]
    Shiritorius(#[from] ShiritoriusError),

    /// JSONの書き出しエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn fragments(values: &[String]) -> Vec<String> {
    values.iter().flat_map(|v| normalize_fragments(v)).collect()
}

/// 引数とカタログの品詞から検索条件を組み立てる
fn build_conditions(args: &Args, index: &CatalogueIndex<'_>) -> Conditions {
    let parts = index.all_parts_of_speech();
    let mut conditions = if args.all_parts_of_speech {
        Conditions::all(parts)
    } else {
        Conditions::initial(parts)
    };
    if !args.part_of_speech.is_empty() {
        conditions.parts_of_speech = args.part_of_speech.iter().cloned().collect();
    }

    conditions.begin_with = fragments(&args.begin_with);
    if let Some(gyo) = args.gyo {
        conditions
            .begin_with
            .extend(index.leading_characters_in(gyo).into_iter().map(String::from));
    }
    conditions.not_begin_with = fragments(&args.not_begin_with);
    conditions.end_with = fragments(&args.end_with);
    conditions.not_end_with = fragments(&args.not_end_with);
    if !args.allow_losing_ending && !conditions.not_end_with.iter().any(|f| f == LOSING_ENDING) {
        conditions.not_end_with.push(LOSING_ENDING.to_string());
    }
    conditions.include = fragments(&args.include);
    conditions.exclude = fragments(&args.exclude);
    conditions.length = args.length;
    conditions.length_comparator = args.comparator;
    conditions
}

/// 読みと同音異義語を一行に書き出す
fn write_detail<W>(out: &mut W, word: &Word) -> io::Result<()>
where
    W: Write,
{
    write!(out, "{}\tid={}", word.reading, word.id)?;
    for h in &word.homonyms {
        write!(out, "\t{},{}", h.surface_form, h.part_of_speech)?;
    }
    out.write_all(b"\n")
}

/// メイン関数
///
/// カタログを読み込んで昇順に並べ、索引を構築した後、条件を満たす読みを標準出力に出力します。
fn main() -> Result<(), SearchError> {
    let args = Args::parse();

    eprintln!("Loading the catalogue...");
    let rdr = BufReader::new(File::open(&args.catalogue)?);
    let mut words = Catalogue::read_json(rdr)?.into_words();
    sort_by_reading(&mut words);
    let index = CatalogueIndex::new(&words);

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());

    if args.list_parts_of_speech {
        for label in index.all_parts_of_speech().iter() {
            writeln!(&mut out, "{label}")?;
        }
        out.flush()?;
        return Ok(());
    }

    let conditions = build_conditions(&args, &index);
    if args.describe {
        eprintln!("{conditions}");
    }

    let result = filter(&words, &conditions);
    eprintln!("{} of {} readings matched", result.len(), words.len());

    match args.output_mode {
        OutputMode::Reading => {
            for word in &result {
                writeln!(&mut out, "{}", word.reading)?;
            }
        }
        OutputMode::Detail => {
            for word in &result {
                write_detail(&mut out, word)?;
            }
        }
        OutputMode::Json => {
            serde_json::to_writer(&mut out, &result)?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;

    Ok(())
}
