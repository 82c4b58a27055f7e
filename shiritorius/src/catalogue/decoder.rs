//! レコードデコーダ
//!
//! 旧来のエンコーディングで書かれたCSVのバイト列をUTF-8に変換しながら、
//! カンマ区切りのレコードを逐次的に取り出します。引用符は解釈しません。
//!
//! 列数が先頭レコードと一致しない行は読み飛ばされ、必要な列を持たないレコードは
//! 形状不正として別に数えられます。復号できないバイト列はU+FFFDに置き換えられ、
//! そのレコードは数えられた上でそのまま出力されます。いずれも取り込みを中断しません。

use std::io::{self, Read};

use csv_core::ReadFieldResult;
use encoding_rs::{CoderResult, Decoder, Encoding};

use crate::errors::{Result, ShiritoriusError};

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// カンマで区切られたテキストのフィールド列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// フィールド列からレコードを作成します。
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// `i` 番目のフィールドを返します。
    #[inline(always)]
    pub fn field(&self, i: usize) -> Option<&str> {
        self.fields.get(i).map(String::as_str)
    }

    /// フィールドの数を返します。
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// フィールドが一つもない場合に真を返します。
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// デコード段階の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// 構文上の不正により読み飛ばされた行の数
    pub skipped: usize,
    /// 形状が不正なため除外されたレコードの数
    pub invalid_shape: usize,
    /// 有効なレコードとして出力された数
    pub parsed: usize,
    /// 出力されたレコードのうち、復号できないバイト列を含むものの数
    pub undecodable: usize,
}

/// バイトストリームからレコードを逐次生成するイテレータ
///
/// 入力は一度しか走査できず、巻き戻すことはできません。
pub struct RecordDecoder<R> {
    rdr: R,
    decoder: Decoder,
    csv: csv_core::Reader,
    chunk: Vec<u8>,
    text: String,
    pos: usize,
    eof: bool,
    finished: bool,
    output: [u8; 4096],
    field: Vec<u8>,
    fields: Vec<String>,
    expected_fields: Option<usize>,
    min_fields: usize,
    stats: DecodeStats,
}

impl<R> RecordDecoder<R>
where
    R: Read,
{
    /// 新しいデコーダを作成します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 入力のバイトストリーム
    /// * `encoding` - 入力の文字エンコーディング
    /// * `min_fields` - 有効なレコードが最低限持つべき列数
    pub fn new(rdr: R, encoding: &'static Encoding, min_fields: usize) -> Self {
        let csv = csv_core::ReaderBuilder::new()
            .delimiter(b',')
            .quoting(false)
            .build();
        Self {
            rdr,
            decoder: encoding.new_decoder_with_bom_removal(),
            csv,
            chunk: vec![0; READ_CHUNK_SIZE],
            text: String::new(),
            pos: 0,
            eof: false,
            finished: false,
            output: [0; 4096],
            field: vec![],
            fields: vec![],
            expected_fields: None,
            min_fields,
            stats: DecodeStats::default(),
        }
    }

    /// これまでの集計を返します。
    pub const fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// 入力を読み進め、復号したテキストを内部バッファに追加します。
    fn fill(&mut self) -> io::Result<()> {
        self.text.drain(..self.pos);
        self.pos = 0;

        let n = loop {
            match self.rdr.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        let last = n == 0;

        let mut consumed = 0;
        loop {
            let (result, read, _) =
                self.decoder
                    .decode_to_string(&self.chunk[consumed..n], &mut self.text, last);
            consumed += read;
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => {
                    let remaining = n - consumed;
                    let additional = self
                        .decoder
                        .max_utf8_buffer_length(remaining)
                        .unwrap_or(remaining * 3 + 16);
                    self.text.reserve(additional.max(16));
                }
            }
        }
        if last {
            self.eof = true;
        }
        Ok(())
    }

    /// 集めたフィールドを検査し、有効であればレコードとして返します。
    fn finish_record(&mut self) -> Option<Record> {
        let fields = std::mem::take(&mut self.fields);
        if fields.len() == 1 && fields[0].is_empty() {
            return None;
        }

        let line = self.csv.line();
        let expected = *self.expected_fields.get_or_insert(fields.len());
        if fields.len() != expected {
            self.stats.skipped += 1;
            log::warn!(
                "Skipped a line with {} fields (expected {}) near line {}: {:?}",
                fields.len(),
                expected,
                line,
                fields.join(","),
            );
            return None;
        }
        if fields.len() < self.min_fields {
            self.stats.invalid_shape += 1;
            log::warn!(
                "Rejected a record of invalid shape near line {}: {:?}",
                line,
                fields.join(","),
            );
            return None;
        }

        // A reading containing U+FFFD is rejected later by the katakana check.
        if fields.iter().any(|f| f.contains(char::REPLACEMENT_CHARACTER)) {
            self.stats.undecodable += 1;
            log::warn!(
                "Found undecodable bytes near line {}: {:?}",
                line,
                fields.join(","),
            );
        }

        self.stats.parsed += 1;
        Some(Record::new(fields))
    }
}

impl<R> Iterator for RecordDecoder<R>
where
    R: Read,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if self.pos == self.text.len() && !self.eof {
                if let Err(e) = self.fill() {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                if self.pos == self.text.len() && !self.eof {
                    // The chunk ended inside a multi-byte sequence.
                    continue;
                }
            }

            let input = &self.text.as_bytes()[self.pos..];
            let (result, nin, nout) = self.csv.read_field(input, &mut self.output);
            self.pos += nin;
            self.field.extend_from_slice(&self.output[..nout]);

            match result {
                ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => continue,
                ReadFieldResult::Field { record_end } => {
                    let bytes = std::mem::take(&mut self.field);
                    let field = match String::from_utf8(bytes) {
                        Ok(field) => field,
                        Err(e) => {
                            self.finished = true;
                            return Some(Err(ShiritoriusError::invalid_format(
                                "record",
                                format!("a field is not valid UTF-8 after decoding: {e}"),
                            )));
                        }
                    };
                    self.fields.push(field.trim().to_string());
                    if record_end {
                        if let Some(record) = self.finish_record() {
                            return Some(Ok(record));
                        }
                    }
                }
                ReadFieldResult::End => {
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}
