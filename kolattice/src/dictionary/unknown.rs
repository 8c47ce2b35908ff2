//! 未知語処理モジュール
//!
//! 辞書に登録されていない文字列に対して、文字カテゴリごとに `unk.def` で
//! 定義された候補を与えます。

use std::io::Read;
use std::ops::Range;

use crate::dictionary::LexType;
use crate::dictionary::character::CharProperty;
use crate::dictionary::connector::ConnectorView;
use crate::dictionary::lexicon::{Lexicon, WordParam};
use crate::dictionary::pos::WordInfo;
use crate::dictionary::word_idx::WordIdx;
use crate::errors::{KolatticeError, Result};
use crate::utils::FromU32;

/// 未知語エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnkEntry {
    /// カテゴリID
    pub cate_id: u32,
    /// 接続IDとコスト
    pub param: WordParam,
    /// 素性文字列
    pub feature: String,
    /// 素性から解析した品詞情報
    pub info: WordInfo,
}

/// 未知語ハンドラー
///
/// エントリはカテゴリID順に並べられ、`offsets[cate_id]..offsets[cate_id + 1]`
/// がそのカテゴリの候補になります。
pub struct UnkHandler {
    offsets: Vec<usize>,
    entries: Vec<UnkEntry>,
    default_cate_id: u32,
}

impl UnkHandler {
    /// カテゴリに対応する未知語の単語IDの範囲を返します。
    ///
    /// `unk.def` に候補がないカテゴリは `DEFAULT` の候補を使います。
    #[inline(always)]
    pub fn word_ids(&self, cate_id: u32) -> Range<u32> {
        let range = self.range(cate_id);
        let range = if range.is_empty() {
            self.range(self.default_cate_id)
        } else {
            range
        };
        // Entry counts are bounded by u32 when building.
        range.start as u32..range.end as u32
    }

    #[inline(always)]
    fn range(&self, cate_id: u32) -> Range<usize> {
        let cate_id = usize::from_u32(cate_id);
        self.offsets[cate_id]..self.offsets[cate_id + 1]
    }

    /// 未知語の単語パラメータを取得します。
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        self.entries[usize::from_u32(word_idx.word_id)].param
    }

    /// 未知語の素性文字列を取得します。
    #[inline(always)]
    pub fn word_feature(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        &self.entries[usize::from_u32(word_idx.word_id)].feature
    }

    /// 未知語の品詞情報を取得します。
    #[inline(always)]
    pub fn word_info(&self, word_idx: WordIdx) -> &WordInfo {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        &self.entries[usize::from_u32(word_idx.word_id)].info
    }

    /// 左右IDがコネクターで有効かどうかをチェックします。
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        self.entries.iter().all(|e| e.param.fits(conn))
    }

    /// `unk.def` から新しいインスタンスを作成します。
    ///
    /// 各行は `カテゴリ名,左ID,右ID,コスト,素性...` です。
    ///
    /// # 引数
    ///
    /// * `rdr` - `unk.def` のリーダー
    /// * `char_prop` - カテゴリ名の解決に使う文字プロパティ
    ///
    /// # エラー
    ///
    /// 未定義のカテゴリ名が含まれる場合や、`DEFAULT` の候補がない場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R, char_prop: &CharProperty) -> Result<Self>
    where
        R: Read,
    {
        let mut text = String::new();
        rdr.read_to_string(&mut text)?;

        let mut entries = vec![];
        for raw in Lexicon::parse_csv(&text, "unk.def")? {
            let cate_id = char_prop.cate_id(&raw.surface).ok_or_else(|| {
                KolatticeError::invalid_format(
                    "unk.def",
                    format!("undefined category: {}", raw.surface),
                )
            })?;
            entries.push(UnkEntry {
                cate_id,
                param: raw.param,
                feature: raw.feature.to_string(),
                info: WordInfo::parse(raw.feature)?,
            });
        }
        u32::try_from(entries.len())?;
        // Stable, so entries of a category keep their file order.
        entries.sort_by_key(|e| e.cate_id);

        let mut offsets = vec![0; char_prop.num_categories() + 1];
        for e in &entries {
            offsets[usize::from_u32(e.cate_id) + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        // CharProperty rejects a char.def without DEFAULT.
        let default_cate_id = char_prop.cate_id("DEFAULT").unwrap_or(0);
        let handler = Self {
            offsets,
            entries,
            default_cate_id,
        };
        if handler.range(default_cate_id).is_empty() {
            return Err(KolatticeError::invalid_format(
                "unk.def",
                "DEFAULT must have at least one entry",
            ));
        }
        Ok(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::pos::PosTag;

    const CHAR_DEF: &str = "DEFAULT 0 1 0\nSPACE 0 1 0\nHANGUL 0 1 2\n0x0020 SPACE\n";

    #[test]
    fn test_from_reader() {
        let prop = CharProperty::from_reader(CHAR_DEF.as_bytes()).unwrap();
        let unk_def = "\
HANGUL,3,3,500,UNKNOWN,*,*,*,*,*,*,*
DEFAULT,1,1,100,SY,*,*,*,*,*,*,*
HANGUL,4,4,600,NNG,*,*,*,*,*,*,*";
        let unk = UnkHandler::from_reader(unk_def.as_bytes(), &prop).unwrap();

        let hangul = prop.cate_id("HANGUL").unwrap();
        let ids: Vec<_> = unk.word_ids(hangul).collect();
        assert_eq!(ids.len(), 2);
        let first = WordIdx::new(LexType::Unknown, ids[0]);
        let second = WordIdx::new(LexType::Unknown, ids[1]);
        assert_eq!(unk.word_param(first), WordParam::new(3, 3, 500));
        assert_eq!(unk.word_param(second), WordParam::new(4, 4, 600));
        assert_eq!(unk.word_info(second).left_pos, PosTag::NNG);
    }

    #[test]
    fn test_fallback_to_default() {
        let prop = CharProperty::from_reader(CHAR_DEF.as_bytes()).unwrap();
        let unk = UnkHandler::from_reader("DEFAULT,1,1,100,SY".as_bytes(), &prop).unwrap();
        let space = prop.cate_id("SPACE").unwrap();
        let default = prop.cate_id("DEFAULT").unwrap();
        assert_eq!(unk.word_ids(space), unk.word_ids(default));
    }

    #[test]
    fn test_undefined_category() {
        let prop = CharProperty::from_reader(CHAR_DEF.as_bytes()).unwrap();
        let unk_def = "DEFAULT,1,1,100,SY\nALPHA,1,1,100,SL";
        assert!(UnkHandler::from_reader(unk_def.as_bytes(), &prop).is_err());
    }

    #[test]
    fn test_missing_default() {
        let prop = CharProperty::from_reader(CHAR_DEF.as_bytes()).unwrap();
        assert!(UnkHandler::from_reader("SPACE,1,1,100,SP".as_bytes(), &prop).is_err());
    }
}
