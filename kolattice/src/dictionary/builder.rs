//! 辞書構築のためのビルダー
//!
//! mecab-ko-dic 形式の辞書ファイルから [`Dictionary`] を構築します。

use std::io::Read;

use crate::dictionary::connector::MatrixConnector;
use crate::dictionary::lexicon::RawWordEntry;
use crate::dictionary::{CharProperty, Dictionary, LexType, Lexicon, UnkHandler};
use crate::errors::{KolatticeError, Result};

/// システム辞書エントリから [`Dictionary`] を構築するビルダー
pub struct SystemDictionaryBuilder {}

impl SystemDictionaryBuilder {
    /// パースされたコンポーネントから `Dictionary` を構築します。
    ///
    /// # エラー
    ///
    /// 接続IDが接続行列の範囲外の場合にエラーを返します。
    pub(crate) fn build(
        system_word_entries: &[RawWordEntry],
        connector: MatrixConnector,
        char_prop: CharProperty,
        unk_handler: UnkHandler,
    ) -> Result<Dictionary> {
        let system_lexicon = Lexicon::from_entries(system_word_entries, LexType::System)?;

        if !system_lexicon.verify(&connector) {
            return Err(KolatticeError::invalid_argument(
                "system_lexicon_rdr",
                "system_lexicon_rdr includes invalid connection ids.",
            ));
        }
        if !unk_handler.verify(&connector) {
            return Err(KolatticeError::invalid_argument(
                "unk_handler_rdr",
                "unk_handler_rdr includes invalid connection ids.",
            ));
        }

        Ok(Dictionary {
            system_lexicon,
            user_lexicon: None,
            connector,
            char_prop,
            unk_handler,
        })
    }

    /// mecab-ko-dic 形式のソースから新しい [`Dictionary`] を作成します。
    ///
    /// # 引数
    ///
    ///  - `system_lexicon_rdr`: 辞書ファイル `*.csv` のリーダー
    ///  - `connector_rdr`: 接続行列ファイル `matrix.def` のリーダー
    ///  - `char_prop_rdr`: 文字定義ファイル `char.def` のリーダー
    ///  - `unk_handler_rdr`: 未知語定義ファイル `unk.def` のリーダー
    ///
    /// # エラー
    ///
    /// 入力フォーマットが不正な場合に [`KolatticeError`] を返します。
    pub fn from_readers<S, C, P, U>(
        mut system_lexicon_rdr: S,
        connector_rdr: C,
        char_prop_rdr: P,
        unk_handler_rdr: U,
    ) -> Result<Dictionary>
    where
        S: Read,
        C: Read,
        P: Read,
        U: Read,
    {
        let mut system_lexicon_buf = String::new();
        system_lexicon_rdr.read_to_string(&mut system_lexicon_buf)?;
        let system_word_entries = Lexicon::parse_csv(&system_lexicon_buf, "lex.csv")?;
        let connector = MatrixConnector::from_reader(connector_rdr)?;
        let char_prop = CharProperty::from_reader(char_prop_rdr)?;
        let unk_handler = UnkHandler::from_reader(unk_handler_rdr, &char_prop)?;

        Self::build(&system_word_entries, connector, char_prop, unk_handler)
    }
}
