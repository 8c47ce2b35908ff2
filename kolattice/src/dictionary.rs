//! トークン化のための辞書モジュール。
//!
//! このモジュールは、形態素解析に必要な辞書データの構築と参照を行います。
//! 辞書は次の要素から成ります:
//!
//! - システム辞書とユーザー辞書（[`Lexicon`]）
//! - 接続コスト行列（[`MatrixConnector`]）
//! - 文字カテゴリ（[`CharProperty`]）
//! - 未知語の候補（[`UnkHandler`]）
//!
//! # 辞書のビルド
//!
//! [`SystemDictionaryBuilder`]を使用して、mecab-ko-dic 形式のソースデータから辞書を構築できます。
pub mod builder;
pub mod character;
pub mod connector;
pub mod lexicon;
pub mod pos;
pub mod unknown;
pub mod word_idx;

use std::io::Read;

use crate::dictionary::character::CharProperty;
use crate::dictionary::connector::MatrixConnector;
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::pos::WordInfo;
use crate::dictionary::unknown::UnkHandler;
use crate::errors::{KolatticeError, Result};

pub use crate::dictionary::builder::SystemDictionaryBuilder;
pub use crate::dictionary::lexicon::WordParam;
pub use crate::dictionary::word_idx::WordIdx;

/// 単語が由来する辞書の種類。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum LexType {
    /// システム辞書。
    #[default]
    System,
    /// ユーザー辞書。
    ///
    /// 同じ位置でシステム辞書より優先して照合されます。
    User,
    /// 未知語。
    ///
    /// システム辞書にもユーザー辞書にも見つからない文字列から生成された単語です。
    Unknown,
}

/// トークン化のための読み取り専用辞書。
///
/// 構築後は不変で、[`Tokenizer`](crate::Tokenizer)を通じて複数のワーカーから共有されます。
pub struct Dictionary {
    system_lexicon: Lexicon,
    user_lexicon: Option<Lexicon>,
    connector: MatrixConnector,
    char_prop: CharProperty,
    unk_handler: UnkHandler,
}

impl Dictionary {
    /// システム辞書への参照を取得します。
    #[inline(always)]
    pub(crate) const fn system_lexicon(&self) -> &Lexicon {
        &self.system_lexicon
    }

    /// ユーザー辞書への参照を取得します。
    #[inline(always)]
    pub(crate) const fn user_lexicon(&self) -> Option<&Lexicon> {
        self.user_lexicon.as_ref()
    }

    /// 接続コスト行列への参照を取得します。
    #[inline(always)]
    pub(crate) const fn connector(&self) -> &MatrixConnector {
        &self.connector
    }

    /// 文字プロパティへの参照を取得します。
    #[inline(always)]
    pub(crate) const fn char_prop(&self) -> &CharProperty {
        &self.char_prop
    }

    /// 未知語ハンドラーへの参照を取得します。
    #[inline(always)]
    pub(crate) const fn unk_handler(&self) -> &UnkHandler {
        &self.unk_handler
    }

    /// 単語の接続IDとコストを取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語インデックス
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon.word_param(word_idx),
            LexType::User => self.user_lexicon_ref().word_param(word_idx),
            LexType::Unknown => self.unk_handler.word_param(word_idx),
        }
    }

    /// 単語の素性文字列を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語インデックス
    #[inline(always)]
    pub fn word_feature(&self, word_idx: WordIdx) -> &str {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon.word_feature(word_idx),
            LexType::User => self.user_lexicon_ref().word_feature(word_idx),
            LexType::Unknown => self.unk_handler.word_feature(word_idx),
        }
    }

    /// 単語の品詞情報を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語インデックス
    ///
    /// # 戻り値
    ///
    /// 品詞タイプ、左右の品詞、読み、構成形態素
    #[inline(always)]
    pub fn word_info(&self, word_idx: WordIdx) -> &WordInfo {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon.word_info(word_idx),
            LexType::User => self.user_lexicon_ref().word_info(word_idx),
            LexType::Unknown => self.unk_handler.word_info(word_idx),
        }
    }

    #[inline(always)]
    fn user_lexicon_ref(&self) -> &Lexicon {
        // A user word index is only produced by matching the user lexicon.
        self.user_lexicon
            .as_ref()
            .unwrap_or(&self.system_lexicon)
    }

    /// リーダーからユーザー辞書をリセットします。
    ///
    /// ユーザー辞書はシステム辞書と同じCSV形式です。
    ///
    /// # 引数
    ///
    /// * `user_lexicon_rdr` - ユーザー辞書データを含むリーダー。`None`の場合、ユーザー辞書が削除されます。
    ///
    /// # 戻り値
    ///
    /// 更新された`Dictionary`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - ユーザー辞書の読み込みに失敗した場合。
    /// - ユーザー辞書に無効な接続IDが含まれている場合。
    pub fn reset_user_lexicon_from_reader<R>(mut self, user_lexicon_rdr: Option<R>) -> Result<Self>
    where
        R: Read,
    {
        if let Some(user_lexicon_rdr) = user_lexicon_rdr {
            let user_lexicon = Lexicon::from_reader(user_lexicon_rdr, LexType::User)?;
            if !user_lexicon.verify(&self.connector) {
                return Err(KolatticeError::invalid_argument(
                    "user_lexicon_rdr",
                    "includes invalid connection ids.",
                ));
            }
            self.user_lexicon = Some(user_lexicon);
        } else {
            self.user_lexicon = None;
        }
        Ok(self)
    }
}
