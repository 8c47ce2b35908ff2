//! Viterbiアルゴリズムに基づくトークナイザー。
//!
//! このモジュールは、韓国語形態素解析のためのメイントークナイザーを提供します。
//! 入力を逐次読み進めながらラティスを構築し、曖昧さのない地点まで来るたびに
//! 最良パスを確定してトークンを出力します。
//!
//! # 主要な構造体
//!
//! - [`Tokenizer`]: 辞書と解析オプションを保持するトークナイザー
//! - [`Worker`]: 実際の解析処理を行うワーカー
//!
//! # 例
//!
//! ```no_run
//! use std::fs::File;
//! use kolattice::{DecompoundMode, SystemDictionaryBuilder, Tokenizer};
//!
//! let dict = SystemDictionaryBuilder::from_readers(
//!     File::open("mecab-ko-dic/lex.csv")?,
//!     File::open("mecab-ko-dic/matrix.def")?,
//!     File::open("mecab-ko-dic/char.def")?,
//!     File::open("mecab-ko-dic/unk.def")?,
//! )?;
//! let tokenizer = Tokenizer::new(dict).decompound_mode(DecompoundMode::Mixed);
//! let mut worker = tokenizer.new_worker();
//!
//! worker.reset_sentence("한국어 형태소 분석");
//! while let Some(token) = worker.next_token()? {
//!     println!("{}\t{}", token.surface(), token.feature());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub(crate) mod lattice;
pub(crate) mod rolling_buffer;
pub(crate) mod unicode;
pub mod worker;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Dictionary;
use crate::errors::{KolatticeError, Result};
use crate::tokenizer::worker::Worker;

/// 複合語と活用形の分解方法。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum DecompoundMode {
    /// 分解せず、辞書の単語をそのまま出力します。
    None,
    /// 構成形態素だけを出力し、元の単語は出力しません。
    #[default]
    Discard,
    /// 元の単語と構成形態素の両方を出力します。
    ///
    /// 元の単語の位置長は構成形態素の数になり、先頭の形態素は元の単語と同じ位置に置かれます。
    Mixed,
}

impl DecompoundMode {
    /// モード名。
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Discard => "discard",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for DecompoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecompoundMode {
    type Err = KolatticeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "discard" => Ok(Self::Discard),
            "mixed" => Ok(Self::Mixed),
            _ => Err(KolatticeError::invalid_argument(
                "mode",
                format!("unknown decompound mode: {s}, expected none, discard or mixed"),
            )),
        }
    }
}

/// 形態素解析を行うトークナイザー。
///
/// 辞書と解析オプションを保持します。辞書は [`Arc`] で共有されるため、
/// `Tokenizer` の複製や [`Worker`] の生成は辞書をコピーしません。
///
/// # 例
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use kolattice::{DecompoundMode, SystemDictionaryBuilder, Tokenizer};
///
/// let dict = SystemDictionaryBuilder::from_readers(
///     "한국,0,0,10,NNP".as_bytes(),
///     "1 1\n0 0 0".as_bytes(),
///     "DEFAULT 0 1 0".as_bytes(),
///     "DEFAULT,0,0,100,SY".as_bytes(),
/// )?;
/// let tokenizer = Tokenizer::new(dict)
///     .decompound_mode(DecompoundMode::None)
///     .discard_punctuation(false);
/// assert_eq!(tokenizer.mode(), DecompoundMode::None);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Tokenizer {
    dict: Arc<Dictionary>,
    mode: DecompoundMode,
    discard_punctuation: bool,
    output_unknown_unigrams: bool,
}

impl Tokenizer {
    /// 新しいトークナイザーを作成します。
    ///
    /// 辞書はトークナイザーに所有権が移動します。複数のトークナイザー間で辞書を共有する
    /// 必要がある場合は、[`Tokenizer::from_shared_dictionary`]を使用してください。
    ///
    /// 既定の設定は、分解モード [`DecompoundMode::Discard`]、句読点の破棄あり、
    /// 未知語のユニグラム出力なしです。
    pub fn new(dict: Dictionary) -> Self {
        Self::from_shared_dictionary(Arc::new(dict))
    }

    /// 共有された辞書から新しいトークナイザーを作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - 共有される辞書への`Arc`参照
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            mode: DecompoundMode::default(),
            discard_punctuation: true,
            output_unknown_unigrams: false,
        }
    }

    /// 複合語と活用形の分解方法を設定します。
    pub const fn decompound_mode(mut self, mode: DecompoundMode) -> Self {
        self.mode = mode;
        self
    }

    /// 句読点や記号で始まるトークンと空白トークンを破棄するかどうかを設定します。
    ///
    /// `false` の場合、単語の前の空白は独立したトークンとして出力されます。
    pub const fn discard_punctuation(mut self, yes: bool) -> Self {
        self.discard_punctuation = yes;
        self
    }

    /// 未知語を1文字ずつのトークンとして出力するかどうかを設定します。
    pub const fn output_unknown_unigrams(mut self, yes: bool) -> Self {
        self.output_unknown_unigrams = yes;
        self
    }

    /// 分解モード。
    #[inline(always)]
    pub const fn mode(&self) -> DecompoundMode {
        self.mode
    }

    /// 句読点を破棄するかどうか。
    #[inline(always)]
    pub const fn discards_punctuation(&self) -> bool {
        self.discard_punctuation
    }

    /// 未知語をユニグラムとして出力するかどうか。
    #[inline(always)]
    pub const fn outputs_unknown_unigrams(&self) -> bool {
        self.output_unknown_unigrams
    }

    /// 辞書への参照を取得します。
    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    pub(crate) fn shared_dictionary(&self) -> Arc<Dictionary> {
        Arc::clone(&self.dict)
    }

    /// 新しいワーカーを作成します。
    ///
    /// ワーカーは解析の作業領域を持ち、スレッドごとに1つずつ用意して使います。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompound_mode_from_str() {
        assert_eq!("none".parse::<DecompoundMode>().unwrap(), DecompoundMode::None);
        assert_eq!("Discard".parse::<DecompoundMode>().unwrap(), DecompoundMode::Discard);
        assert_eq!("MIXED".parse::<DecompoundMode>().unwrap(), DecompoundMode::Mixed);
        assert!("split".parse::<DecompoundMode>().is_err());
    }

    #[test]
    fn test_decompound_mode_display() {
        assert_eq!(DecompoundMode::default().to_string(), "discard");
        assert_eq!(DecompoundMode::Mixed.to_string(), "mixed");
    }
}
