//! Shiritoriusのテストモジュール群
//!
//! 取り込みパイプライン全体と、索引・述語エンジンの組み合わせを検証するテストを含みます。
