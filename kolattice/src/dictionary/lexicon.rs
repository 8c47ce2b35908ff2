//! 辞書の語彙情報を管理するモジュール
//!
//! このモジュールは、単語の表層形、パラメータ、素性情報を管理する
//! 語彙データ構造を提供します。

mod feature;
mod map;
mod param;

use std::io::Read;

use csv_core::ReadFieldResult;

use crate::dictionary::LexType;
use crate::dictionary::connector::ConnectorView;
use crate::dictionary::lexicon::feature::WordFeatures;
use crate::dictionary::lexicon::map::WordMap;
use crate::dictionary::lexicon::param::WordParams;
use crate::dictionary::pos::WordInfo;
use crate::dictionary::word_idx::WordIdx;
use crate::errors::{KolatticeError, Result};
use crate::utils::FromU32;

pub use crate::dictionary::lexicon::param::WordParam;

/// 単語の語彙情報
pub struct Lexicon {
    map: WordMap,
    params: WordParams,
    features: WordFeatures,
    lex_type: LexType,
}

impl Lexicon {
    /// 入力の共通接頭辞に一致する単語を返すイテレータを取得します。
    ///
    /// # 引数
    ///
    /// * `input` - 検索位置から始まる文字の列。必要な分だけ読まれます。
    ///
    /// # 戻り値
    ///
    /// 一致する単語のイテレータ。短い一致から順に、同じ長さの一致は単語ID順に返されます。
    #[inline(always)]
    pub fn common_prefix_iterator<'a, I>(&'a self, input: I) -> impl Iterator<Item = LexMatch> + 'a
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'a,
    {
        self.map
            .common_prefix_iterator(input)
            .map(move |(word_id, end_char)| {
                LexMatch::new(
                    WordIdx::new(self.lex_type, word_id),
                    self.params.get(usize::from_u32(word_id)),
                    end_char,
                )
            })
    }

    /// 単語のパラメータを取得します。
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.params.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の素性文字列を取得します。
    #[inline(always)]
    pub fn word_feature(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.features.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の品詞情報を取得します。
    #[inline(always)]
    pub fn word_info(&self, word_idx: WordIdx) -> &WordInfo {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.features.info(usize::from_u32(word_idx.word_id))
    }

    /// 左右IDがコネクターで有効かどうかをチェックします。
    ///
    /// # 戻り値
    ///
    /// すべてのIDが有効な場合は `true`
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        if let Some(word_id) = self.params.find_out_of_range(conn) {
            log::error!(
                "{:?} lexicon: word {} has connection ids out of the matrix ({}x{})",
                self.lex_type,
                word_id,
                conn.num_right(),
                conn.num_left(),
            );
            return false;
        }
        true
    }

    /// エントリのリストから新しいインスタンスを構築します。
    ///
    /// # エラー
    ///
    /// 素性に未定義の品詞が含まれる場合や、トライの構築に失敗した場合にエラーを返します。
    pub fn from_entries(entries: &[RawWordEntry], lex_type: LexType) -> Result<Self> {
        let map = WordMap::new(entries.iter().map(|e| &e.surface))?;
        let params = WordParams::new(entries.iter().map(|e| e.param));
        let features = WordFeatures::new(entries.iter().map(|e| e.feature))?;
        log::debug!("built {:?} lexicon with {} words", lex_type, entries.len());
        Ok(Self {
            map,
            params,
            features,
            lex_type,
        })
    }

    /// CSV形式の辞書ファイルから新しいインスタンスを構築します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 辞書ファイルのリーダー
    /// * `lex_type` - 辞書の種類
    ///
    /// # エラー
    ///
    /// ファイルフォーマットが不正な場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R, lex_type: LexType) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = String::new();
        rdr.read_to_string(&mut buf)?;
        let entries = Self::parse_csv(&buf, "lex.csv")?;
        Self::from_entries(&entries, lex_type)
    }

    /// `表層形,左ID,右ID,コスト,素性...` の行を解析します。
    ///
    /// 空行は読み飛ばされます。素性は5列目以降をそのままの文字列で保持します。
    pub(crate) fn parse_csv<'a>(text: &'a str, name: &'static str) -> Result<Vec<RawWordEntry<'a>>> {
        let mut entries = vec![];
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(entry) = Self::parse_csv_line(line, name)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn parse_csv_line<'a>(line: &'a str, name: &'static str) -> Result<Option<RawWordEntry<'a>>> {
        let mut rdr = csv_core::Reader::new();
        let mut output = [0; 4096];
        let mut rest = line.as_bytes();
        let mut head: Vec<String> = Vec::with_capacity(4);
        while head.len() < 4 {
            let (result, nin, nout) = rdr.read_field(rest, &mut output);
            rest = &rest[nin..];
            match result {
                ReadFieldResult::Field { record_end: false } => {
                    head.push(std::str::from_utf8(&output[..nout])?.to_string());
                }
                ReadFieldResult::OutputFull => {
                    return Err(KolatticeError::invalid_format(name, "Field too large"));
                }
                _ => {
                    let msg = format!("A csv row of lexicon must have five items at least, {line:?}");
                    return Err(KolatticeError::invalid_format(name, msg));
                }
            }
        }
        // The remainder starts right after an ASCII comma, so it is a char boundary.
        let feature = &line[line.len() - rest.len()..];
        let mut head = head.into_iter();
        let surface = head.next().unwrap_or_default();
        let left_id = head.next().unwrap_or_default().trim().parse()?;
        let right_id = head.next().unwrap_or_default().trim().parse()?;
        let word_cost = head.next().unwrap_or_default().trim().parse()?;
        if surface.is_empty() {
            log::warn!("Skipped an empty surface, {line:?}");
            return Ok(None);
        }
        Ok(Some(RawWordEntry {
            surface,
            param: WordParam::new(left_id, right_id, word_cost),
            feature,
        }))
    }
}

/// 語彙マッチング結果
#[derive(Eq, PartialEq, Debug)]
pub struct LexMatch {
    pub word_idx: WordIdx,
    pub word_param: WordParam,
    pub end_char: usize,
}

impl LexMatch {
    #[inline(always)]
    pub const fn new(word_idx: WordIdx, word_param: WordParam, end_char: usize) -> Self {
        Self {
            word_idx,
            word_param,
            end_char,
        }
    }
}

/// 解析済みの辞書行
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawWordEntry<'a> {
    pub surface: String,
    pub param: WordParam,
    pub feature: &'a str,
}
