//! 文字プロパティ定義
//!
//! `char.def` で定義される文字カテゴリと、未知語処理の起動・グループ化の属性を管理します。

use std::fmt;
use std::io::Read;
use std::ops::RangeInclusive;

use hashbrown::HashMap;

use crate::errors::{KolatticeError, Result};
use crate::utils::FromU32;

const BASE_ID_BITS: usize = 8;
const BASE_ID_MASK: u32 = (1 << BASE_ID_BITS) - 1;
const INVOKE_BIT: u32 = 1 << BASE_ID_BITS;
const GROUP_BIT: u32 = 1 << (BASE_ID_BITS + 1);

// Code points below this bound are looked up directly in a table.
const TABLE_SIZE: usize = 0x10000;

/// `char.def` で定義される文字の情報
///
/// # メモリレイアウト
///
/// ```text
/// base_id = 8 ビット
///  invoke = 1 ビット
///   group = 1 ビット
/// ```
#[derive(Default, Clone, Copy, Eq, PartialEq)]
pub struct CharInfo(u32);

impl fmt::Debug for CharInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharInfo")
            .field("base_id", &self.base_id())
            .field("invoke", &self.invoke())
            .field("group", &self.group())
            .finish()
    }
}

impl CharInfo {
    fn new(base_id: u32, invoke: bool, group: bool) -> Self {
        let mut bits = base_id & BASE_ID_MASK;
        if invoke {
            bits |= INVOKE_BIT;
        }
        if group {
            bits |= GROUP_BIT;
        }
        Self(bits)
    }

    /// 文字の基本カテゴリID
    #[inline(always)]
    pub const fn base_id(&self) -> u32 {
        self.0 & BASE_ID_MASK
    }

    /// 辞書語が見つかっても未知語を生成するかどうか
    #[inline(always)]
    pub const fn invoke(&self) -> bool {
        self.0 & INVOKE_BIT != 0
    }

    /// 同じカテゴリの連続する文字を1つの未知語にまとめるかどうか
    #[inline(always)]
    pub const fn group(&self) -> bool {
        self.0 & GROUP_BIT != 0
    }
}

/// 文字から情報へのマッピング
pub struct CharProperty {
    chr2inf: Vec<CharInfo>,
    // Mappings beyond the BMP, later entries take precedence.
    astral: Vec<(RangeInclusive<u32>, CharInfo)>,
    default_info: CharInfo,
    categories: Vec<String>,
    cate2id: HashMap<String, u32>,
}

impl CharProperty {
    /// 文字の情報を取得します。
    ///
    /// `char.def` に記述のない文字は `DEFAULT` カテゴリになります。
    #[inline(always)]
    pub fn char_info(&self, c: char) -> CharInfo {
        let code = u32::from(c);
        if let Some(info) = self.chr2inf.get(usize::from_u32(code)) {
            return *info;
        }
        self.astral
            .iter()
            .rev()
            .find(|(range, _)| range.contains(&code))
            .map_or(self.default_info, |(_, info)| *info)
    }

    /// カテゴリ名からIDを取得します。
    pub fn cate_id(&self, category: &str) -> Option<u32> {
        self.cate2id.get(category).copied()
    }

    /// カテゴリIDから名前を取得します。
    pub fn cate_name(&self, cate_id: u32) -> Option<&str> {
        self.categories
            .get(usize::from_u32(cate_id))
            .map(String::as_str)
    }

    /// 定義されたカテゴリの数
    #[inline(always)]
    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// `char.def` から新しいインスタンスを作成します。
    ///
    /// カテゴリ定義行は `名前 INVOKE GROUP LENGTH`、
    /// 対応付け行は `0xXXXX[..0xYYYY] カテゴリ [カテゴリ...]` です。
    /// 対応付け行では最初のカテゴリが基本カテゴリになります。
    /// `#` 以降はコメントとして無視されます。
    ///
    /// # エラー
    ///
    /// `DEFAULT` カテゴリが定義されていない場合や、フォーマットが不正な場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut text = String::new();
        rdr.read_to_string(&mut text)?;

        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .collect();

        let mut categories = vec![];
        let mut cate2id = HashMap::new();
        let mut cate_infos = vec![];
        for line in lines.iter().filter(|l| !l.starts_with("0x")) {
            let (name, invoke, group) = Self::parse_category(line)?;
            let cate_id = u32::try_from(categories.len())?;
            if BASE_ID_MASK < cate_id {
                return Err(KolatticeError::invalid_format(
                    "char.def",
                    "too many categories",
                ));
            }
            if cate2id.insert(name.to_string(), cate_id).is_some() {
                return Err(KolatticeError::invalid_format(
                    "char.def",
                    format!("duplicate category: {name}"),
                ));
            }
            categories.push(name.to_string());
            cate_infos.push(CharInfo::new(cate_id, invoke, group));
        }

        let default_id = *cate2id.get("DEFAULT").ok_or_else(|| {
            KolatticeError::invalid_format("char.def", "DEFAULT must be defined")
        })?;
        let default_info = cate_infos[usize::from_u32(default_id)];
        let mut chr2inf = vec![default_info; TABLE_SIZE];
        let mut astral = vec![];

        for line in lines.iter().filter(|l| l.starts_with("0x")) {
            let (range, base) = Self::parse_mapping(line)?;
            let cate_id = *cate2id.get(base).ok_or_else(|| {
                KolatticeError::invalid_format(
                    "char.def",
                    format!("undefined category: {base}"),
                )
            })?;
            let info = cate_infos[usize::from_u32(cate_id)];
            let (start, end) = (*range.start(), *range.end());
            if end < TABLE_SIZE as u32 {
                for code in start..=end {
                    chr2inf[usize::from_u32(code)] = info;
                }
            } else {
                if start < TABLE_SIZE as u32 {
                    for code in start..TABLE_SIZE as u32 {
                        chr2inf[usize::from_u32(code)] = info;
                    }
                }
                astral.push((start.max(TABLE_SIZE as u32)..=end, info));
            }
        }

        log::debug!("loaded {} character categories", categories.len());

        Ok(Self {
            chr2inf,
            astral,
            default_info,
            categories,
            cate2id,
        })
    }

    fn parse_category(line: &str) -> Result<(&str, bool, bool)> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() != 4 {
            let msg = format!("A category line must have four columns, {line:?}");
            return Err(KolatticeError::invalid_format("char.def", msg));
        }
        let invoke = match cols[1] {
            "0" => false,
            "1" => true,
            _ => return Err(KolatticeError::invalid_format("char.def", "INVOKE must be 0 or 1")),
        };
        let group = match cols[2] {
            "0" => false,
            "1" => true,
            _ => return Err(KolatticeError::invalid_format("char.def", "GROUP must be 0 or 1")),
        };
        // LENGTH is accepted for compatibility, unknown words are grouped by script instead.
        let _length: u16 = cols[3].parse()?;
        Ok((cols[0], invoke, group))
    }

    fn parse_mapping(line: &str) -> Result<(RangeInclusive<u32>, &str)> {
        let mut cols = line.split_whitespace();
        let (Some(codes), Some(base)) = (cols.next(), cols.next()) else {
            let msg = format!("A mapping line must have a category, {line:?}");
            return Err(KolatticeError::invalid_format("char.def", msg));
        };
        let parse_code = |s: &str| -> Result<u32> {
            let hex = s.trim_start_matches("0x");
            let code = u32::from_str_radix(hex, 16)?;
            if char::from_u32(code).is_none() && !(0xD800..=0xDFFF).contains(&code) {
                let msg = format!("invalid code point: {s}");
                return Err(KolatticeError::invalid_format("char.def", msg));
            }
            Ok(code)
        };
        let range = match codes.split_once("..") {
            Some((start, end)) => parse_code(start)?..=parse_code(end)?,
            None => {
                let code = parse_code(codes)?;
                code..=code
            }
        };
        if range.is_empty() {
            let msg = format!("empty code range, {line:?}");
            return Err(KolatticeError::invalid_format("char.def", msg));
        }
        Ok((range, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAR_DEF: &str = "\
DEFAULT 0 1 0  # mandatory
SPACE 0 1 0
HANGUL 0 1 2
SYMBOL 1 1 0
NUMERIC 1 1 0

0x0020 SPACE  # reserved
0x0030..0x0039 NUMERIC
0xAC00..0xD7A3 HANGUL
0x3007 SYMBOL NUMERIC
0x1F600..0x1F64F SYMBOL
";

    #[test]
    fn test_from_reader() {
        let prop = CharProperty::from_reader(CHAR_DEF.as_bytes()).unwrap();
        assert_eq!(prop.num_categories(), 5);

        let hangul = prop.char_info('한');
        assert_eq!(prop.cate_name(hangul.base_id()), Some("HANGUL"));
        assert!(!hangul.invoke());
        assert!(hangul.group());

        let digit = prop.char_info('7');
        assert_eq!(digit.base_id(), prop.cate_id("NUMERIC").unwrap());
        assert!(digit.invoke());

        assert_eq!(prop.char_info(' ').base_id(), prop.cate_id("SPACE").unwrap());
        assert_eq!(prop.char_info('\u{3007}').base_id(), prop.cate_id("SYMBOL").unwrap());
    }

    #[test]
    fn test_default_and_astral() {
        let prop = CharProperty::from_reader(CHAR_DEF.as_bytes()).unwrap();
        let default_id = prop.cate_id("DEFAULT").unwrap();
        assert_eq!(prop.char_info('a').base_id(), default_id);
        assert_eq!(prop.char_info('\u{20000}').base_id(), default_id);
        assert_eq!(
            prop.char_info('\u{1F600}').base_id(),
            prop.cate_id("SYMBOL").unwrap()
        );
    }

    #[test]
    fn test_missing_default() {
        assert!(CharProperty::from_reader("SPACE 0 1 0".as_bytes()).is_err());
    }

    #[test]
    fn test_undefined_category() {
        let char_def = "DEFAULT 0 1 0\n0x0020 SPACE";
        assert!(CharProperty::from_reader(char_def.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_flag() {
        assert!(CharProperty::from_reader("DEFAULT 2 1 0".as_bytes()).is_err());
    }
}
