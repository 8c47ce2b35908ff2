//! トークンの結果コンテナ
//!
//! このモジュールは、形態素解析の結果として得られるトークンを表現する型を提供します。
//! トークンは辞書内の単語への参照を保持し、表層形、品詞情報、位置情報などへの
//! アクセスを提供します。

use std::ops::Range;

use crate::dictionary::pos::{Morpheme, PosTag, PosType, WordInfo};
use crate::dictionary::{Dictionary, LexType, WordIdx};
use crate::tokenizer::worker::Worker;

/// 確定したトークンの位置と単語
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TokenData {
    pub word_idx: WordIdx,
    // Index into the word's morphemes for a decompounded token.
    pub morpheme: Option<usize>,
    pub start: usize,
    pub end: usize,
    pub byte_start: usize,
    pub byte_end: usize,
    pub position_increment: u32,
    pub position_length: u32,
}

/// 形態素解析の結果トークン
///
/// このトークンは[`Worker`]への軽量な参照であり、表層形などのデータは
/// Workerが保持しています。トークンは次に [`Worker::next_token`] を呼ぶまで有効です。
///
/// トークンは辞書の単語そのもの、または複合語・活用形を分解した形態素のいずれかです。
/// 分解された形態素の場合、品詞は形態素の品詞、表層形は形態素の表層形になり、
/// 素性や接続IDは元の単語のものを返します。
pub struct Token<'w> {
    worker: &'w Worker,
    data: TokenData,
}

impl<'w> Token<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, data: TokenData) -> Self {
        Self { worker, data }
    }

    #[inline(always)]
    fn dictionary(&self) -> &'w Dictionary {
        self.worker.tokenizer.dictionary()
    }

    #[inline(always)]
    fn info(&self) -> &'w WordInfo {
        self.dictionary().word_info(self.data.word_idx)
    }

    #[inline(always)]
    fn morpheme(&self) -> Option<&'w Morpheme> {
        self.data.morpheme.and_then(|i| self.info().morphemes.get(i))
    }

    /// トークンの表層形を取得します。
    ///
    /// 分解された形態素では辞書に記述された形態素の表層形を返します。
    /// 活用形の形態素では入力中の文字列と一致しないことがあります。
    #[inline(always)]
    pub fn surface(&self) -> &'w str {
        if let Some(morpheme) = self.morpheme() {
            return &morpheme.surface;
        }
        let w = self.worker;
        let offsets = &w.fragment_offsets;
        let start = offsets[self.data.start - w.fragment_start];
        let end = offsets[self.data.end - w.fragment_start];
        &w.fragment[start..end]
    }

    /// トークンの文字単位の位置範囲を取得します。
    ///
    /// 位置は入力全体の先頭からの文字（Unicodeスカラー値）単位のオフセットです。
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        self.data.start..self.data.end
    }

    /// トークンのバイト単位の位置範囲を取得します。
    ///
    /// 位置は入力全体の先頭からのUTF-8バイト単位のオフセットです。
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        self.data.byte_start..self.data.byte_end
    }

    /// 直前のトークンからの位置の増分。
    ///
    /// [`DecompoundMode::Mixed`](crate::DecompoundMode::Mixed) で分解された先頭の形態素は
    /// 元の単語と同じ位置に置かれるため `0` になります。それ以外は `1` です。
    #[inline(always)]
    pub fn position_increment(&self) -> u32 {
        self.data.position_increment
    }

    /// トークンが占める位置の数。
    ///
    /// 形態素と一緒に出力された元の単語では構成形態素の数になります。それ以外は `1` です。
    #[inline(always)]
    pub fn position_length(&self) -> u32 {
        self.data.position_length
    }

    /// トークンの単語インデックスを取得します。
    #[inline(always)]
    pub fn word_idx(&self) -> WordIdx {
        self.data.word_idx
    }

    /// トークンが由来する辞書のタイプを取得します。
    #[inline(always)]
    pub fn lex_type(&self) -> LexType {
        self.data.word_idx.lex_type
    }

    /// トークンの素性を取得します。
    ///
    /// 分解された形態素では元の単語の素性を返します。
    #[inline(always)]
    pub fn feature(&self) -> &'w str {
        self.dictionary().word_feature(self.data.word_idx)
    }

    /// 単語の左文脈ID。
    #[inline(always)]
    pub fn left_id(&self) -> u16 {
        self.dictionary().word_param(self.data.word_idx).left_id
    }

    /// 単語の右文脈ID。
    #[inline(always)]
    pub fn right_id(&self) -> u16 {
        self.dictionary().word_param(self.data.word_idx).right_id
    }

    /// 単語の生起コスト。
    #[inline(always)]
    pub fn word_cost(&self) -> i16 {
        self.dictionary().word_param(self.data.word_idx).word_cost
    }

    /// トークンの構成の種類。分解された形態素では [`PosType::Morpheme`] です。
    #[inline(always)]
    pub fn pos_type(&self) -> PosType {
        if self.morpheme().is_some() {
            PosType::Morpheme
        } else {
            self.info().pos_type
        }
    }

    /// 先頭の形態素の品詞。
    #[inline(always)]
    pub fn left_pos(&self) -> PosTag {
        self.morpheme()
            .map_or(self.info().left_pos, |morpheme| morpheme.pos_tag)
    }

    /// 末尾の形態素の品詞。
    #[inline(always)]
    pub fn right_pos(&self) -> PosTag {
        self.morpheme()
            .map_or(self.info().right_pos, |morpheme| morpheme.pos_tag)
    }

    /// 読み。辞書に記述がない場合と分解された形態素では `None` です。
    #[inline(always)]
    pub fn reading(&self) -> Option<&'w str> {
        if self.morpheme().is_some() {
            return None;
        }
        self.info().reading.as_deref()
    }

    /// 構成形態素。単一形態素と分解された形態素では空です。
    #[inline(always)]
    pub fn morphemes(&self) -> &'w [Morpheme] {
        if self.morpheme().is_some() {
            return &[];
        }
        &self.info().morphemes
    }

    /// このトークンビューを所有型の[`TokenBuf`]に変換します。
    ///
    /// スレッド間でトークン情報を送信したり、長期保存する際に有用です。
    pub fn to_buf(&self) -> TokenBuf {
        TokenBuf {
            surface: self.surface().to_string(),
            feature: self.feature().to_string(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
            position_increment: self.position_increment(),
            position_length: self.position_length(),
            word_idx: self.word_idx(),
            lex_type: self.lex_type(),
            left_id: self.left_id(),
            right_id: self.right_id(),
            word_cost: self.word_cost(),
            pos_type: self.pos_type(),
            left_pos: self.left_pos(),
            right_pos: self.right_pos(),
            reading: self.reading().map(str::to_string),
            morphemes: self.morphemes().to_vec(),
        }
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("surface", &self.surface())
            .field("range_char", &self.range_char())
            .field("range_byte", &self.range_byte())
            .field("position_increment", &self.position_increment())
            .field("position_length", &self.position_length())
            .field("pos_type", &self.pos_type())
            .field("left_pos", &self.left_pos())
            .field("right_pos", &self.right_pos())
            .field("feature", &self.feature())
            .field("lex_type", &self.lex_type())
            .field("word_idx", &self.word_idx())
            .finish()
    }
}

/// 所有型の自己完結したトークン
///
/// このトークンは[`Token`]の所有型版です。形態素解析の結果を長期保存したり、
/// スレッド間で送信する際に有用です。すべてのトークン情報を自身で保持するため、
/// [`Worker`]への参照が不要です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBuf {
    /// トークンの表層形
    pub surface: String,

    /// トークンの素性情報
    pub feature: String,

    /// トークンの文字単位の位置範囲
    pub range_char: Range<usize>,

    /// トークンのバイト単位の位置範囲
    pub range_byte: Range<usize>,

    /// 直前のトークンからの位置の増分
    pub position_increment: u32,

    /// トークンが占める位置の数
    pub position_length: u32,

    /// トークンの単語インデックス
    pub word_idx: WordIdx,

    /// トークンが由来する辞書のタイプ
    pub lex_type: LexType,

    /// 単語の左文脈ID
    pub left_id: u16,

    /// 単語の右文脈ID
    pub right_id: u16,

    /// 単語の生起コスト
    pub word_cost: i16,

    /// トークンの構成の種類
    pub pos_type: PosType,

    /// 先頭の形態素の品詞
    pub left_pos: PosTag,

    /// 末尾の形態素の品詞
    pub right_pos: PosTag,

    /// 読み
    pub reading: Option<String>,

    /// 構成形態素
    pub morphemes: Vec<Morpheme>,
}

impl<'w> From<Token<'w>> for TokenBuf {
    fn from(token: Token<'w>) -> Self {
        token.to_buf()
    }
}

#[cfg(test)]
mod tests {
    use crate::dictionary::*;
    use crate::tokenizer::*;

    #[test]
    fn test_token_views() {
        let lexicon_csv = "\
도서관,0,0,1,NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*
가,0,0,5,VV,*,F,가,*,*,*,*";
        let matrix_def = "1 1\n0 0 0";
        let char_def = "DEFAULT 0 1 0";
        let unk_def = "DEFAULT,0,0,100,SY";

        let dict = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            matrix_def.as_bytes(),
            char_def.as_bytes(),
            unk_def.as_bytes(),
        )
        .unwrap();

        let tokenizer = Tokenizer::new(dict).decompound_mode(DecompoundMode::None);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("도서관");

        let token = worker.next_token().unwrap().unwrap();
        assert_eq!(token.surface(), "도서관");
        assert_eq!(token.range_char(), 0..3);
        assert_eq!(token.range_byte(), 0..9);
        assert_eq!(token.pos_type(), pos::PosType::Compound);
        assert_eq!(token.left_pos(), pos::PosTag::NNG);
        assert_eq!(token.reading(), Some("도서관"));
        assert_eq!(token.morphemes().len(), 2);
        assert_eq!(token.word_cost(), 1);
        assert_eq!(token.lex_type(), LexType::System);

        let buf = token.to_buf();
        assert_eq!(buf.surface, "도서관");
        assert_eq!(buf.feature, "NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*");
        assert_eq!(buf.position_increment, 1);
        assert_eq!(buf.position_length, 1);
        assert!(worker.next_token().unwrap().is_none());
    }

    #[test]
    fn test_morpheme_token_views() {
        let lexicon_csv = "도서관,0,0,1,NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*";
        let dict = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            "1 1\n0 0 0".as_bytes(),
            "DEFAULT 0 1 0".as_bytes(),
            "DEFAULT,0,0,100,SY".as_bytes(),
        )
        .unwrap();

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("도서관");

        let token = worker.next_token().unwrap().unwrap();
        assert_eq!(token.surface(), "도서");
        assert_eq!(token.range_char(), 0..2);
        assert_eq!(token.range_byte(), 0..6);
        assert_eq!(token.pos_type(), pos::PosType::Morpheme);
        assert_eq!(token.reading(), None);
        assert!(token.morphemes().is_empty());
        assert_eq!(token.feature(), "NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*");

        let token = worker.next_token().unwrap().unwrap();
        assert_eq!(token.surface(), "관");
        assert_eq!(token.range_char(), 2..3);
        assert_eq!(token.range_byte(), 6..9);
    }
}
