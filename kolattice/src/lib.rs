//! # Kolattice
//!
//! Kolatticeは、ビタビアルゴリズムに基づく韓国語の形態素解析（トークン化）の実装です。
//!
//! ## 概要
//!
//! このライブラリは、mecab-ko-dic 形式の辞書を用いて韓国語テキストを形態素に分割します。
//! 入力を文字単位で逐次読み進めながらラティスを構築し、最良パスが以後の入力に
//! 依存しなくなった地点でトークンを確定して出力します。そのため、入力全体を
//! メモリに載せることなく、任意の長さのストリームを解析できます。
//!
//! ## 主な機能
//!
//! - **逐次解析**: ローリングバッファと循環ラティスによる定常メモリでのトークン化
//! - **空白の扱い**: 空白を単語の前置きとして扱い、付属語が空白の直後に来る解析にペナルティを課す
//! - **複合語の分解**: 複合名詞・活用形を構成形態素に分解（[`DecompoundMode`]）
//! - **ユーザー辞書**: システム辞書より優先される最長一致のユーザー辞書
//! - **未知語処理**: 文字体系・句読点・数字の境界で区切る未知語のグルーピング
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use kolattice::{DecompoundMode, SystemDictionaryBuilder, Tokenizer};
//!
//! let lexicon_csv = "도서관,0,0,1,NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*
//! 에,0,0,1,JKB,*,F,에,*,*,*,*
//! 갔다,0,0,1,VV+EP+EF,*,F,갔다,Inflect,VV,EF,가/VV/*+았/EP/*+다/EF/*";
//! let matrix_def = "1 1\n0 0 0";
//! let char_def = "DEFAULT 0 1 0";
//! let unk_def = "DEFAULT,0,0,100,SY";
//!
//! let dict = SystemDictionaryBuilder::from_readers(
//!     lexicon_csv.as_bytes(),
//!     matrix_def.as_bytes(),
//!     char_def.as_bytes(),
//!     unk_def.as_bytes(),
//! )?;
//!
//! let tokenizer = Tokenizer::new(dict).decompound_mode(DecompoundMode::Mixed);
//! let mut worker = tokenizer.new_worker();
//! worker.reset_sentence("도서관에 갔다");
//!
//! let tokens = worker.token_bufs()?;
//! let surfaces: Vec<_> = tokens.iter().map(|t| t.surface.as_str()).collect();
//! assert_eq!(surfaces, ["도서관", "도서", "관", "에", "갔다", "가", "았", "다"]);
//!
//! // The compound spans two positions, its first morpheme shares its position.
//! assert_eq!(tokens[0].position_length, 2);
//! assert_eq!(tokens[1].position_increment, 0);
//! assert_eq!(tokens[1].range_char, 0..2);
//! assert_eq!(tokens[2].range_char, 2..3);
//!
//! // Morphemes of an inflected form all cover the whole word.
//! assert_eq!(tokens[4].range_char, 5..7);
//! assert_eq!(tokens[6].range_char, 5..7);
//! assert_eq!(tokens[6].range_byte, 13..19);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 共通の定数
pub mod common;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// トークン型の定義
pub mod token;

/// トークナイザーの実装
pub mod tokenizer;

/// 内部ユーティリティ関数
pub mod utils;


// Re-exports
pub use dictionary::{Dictionary, SystemDictionaryBuilder};
pub use token::{Token, TokenBuf};
pub use tokenizer::worker::{Worker, WorkerState};
pub use tokenizer::{DecompoundMode, Tokenizer};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
