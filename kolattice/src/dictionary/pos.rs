//! 韓国語の品詞体系
//!
//! mecab-ko-dic の品詞タグと、単語の構成（単一形態素・複合語・活用形・既解析）を表す型、
//! および素性文字列からそれらを取り出すパーサーを提供します。

use std::fmt;
use std::str::FromStr;

use crate::errors::{KolatticeError, Result};
use crate::utils::parse_csv_row;

/// 単語の構成の種類
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum PosType {
    /// 単一の形態素
    #[default]
    Morpheme,
    /// 複合名詞。形態素の表層形を連結すると元の表層形になる。
    Compound,
    /// 活用形。形態素の表層形は元の表層形と一致しない。
    Inflect,
    /// 既解析の表現
    Preanalysis,
}

impl PosType {
    /// 素性の「タイプ」列から種類を解決します。
    ///
    /// `*` や空文字列は単一形態素として扱います。
    fn resolve(name: &str) -> Result<Self> {
        match name {
            "" | "*" => Ok(Self::Morpheme),
            "Compound" => Ok(Self::Compound),
            "Inflect" => Ok(Self::Inflect),
            "Preanalysis" => Ok(Self::Preanalysis),
            _ => Err(KolatticeError::invalid_format(
                "feature",
                format!("unknown word type: {name}"),
            )),
        }
    }
}

macro_rules! pos_tags {
    ( $( $(#[$attr:meta])* $tag:ident => $desc:literal, )* ) => {
        /// mecab-ko-dic の品詞タグ
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
        pub enum PosTag {
            $(
                #[doc = $desc]
                $(#[$attr])*
                $tag,
            )*
        }

        impl PosTag {
            /// すべての品詞タグ
            pub const ALL: &'static [PosTag] = &[ $( PosTag::$tag, )* ];

            /// タグ名を返します。
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$tag => stringify!($tag), )*
                }
            }

            /// タグの説明を返します。
            pub const fn description(&self) -> &'static str {
                match self {
                    $( Self::$tag => $desc, )*
                }
            }
        }

        impl FromStr for PosTag {
            type Err = KolatticeError;

            fn from_str(name: &str) -> Result<Self> {
                match name {
                    $( stringify!($tag) => Ok(Self::$tag), )*
                    _ => Err(KolatticeError::invalid_format(
                        "feature",
                        format!("unknown POS tag: {name}"),
                    )),
                }
            }
        }
    };
}

pos_tags! {
    E => "Verbal endings",
    IC => "Interjection",
    J => "Ending particle",
    MAG => "General adverb",
    MAJ => "Conjunctive adverb",
    MM => "Modifier",
    NA => "Unknown",
    NNB => "Dependent noun",
    NNBC => "Dependent noun (unit)",
    NNG => "General noun",
    NNP => "Proper noun",
    NP => "Pronoun",
    NR => "Numeral",
    SC => "Separator (· / :)",
    SE => "Ellipsis",
    SF => "Terminal punctuation",
    SH => "Chinese character",
    SL => "Foreign language",
    SN => "Number",
    SP => "Space",
    SSC => "Closing brackets",
    SSO => "Opening brackets",
    SY => "Other symbol",
    UNA => "Unknown",
    #[default]
    UNKNOWN => "Unknown",
    VA => "Adjective",
    VCN => "Negative designator",
    VCP => "Positive designator",
    VSV => "Unknown",
    VV => "Verb",
    VX => "Auxiliary verb or adjective",
    XPN => "Prefix",
    XR => "Root",
    XSA => "Adjective suffix",
    XSN => "Noun suffix",
    XSV => "Verb suffix",
}

impl PosTag {
    /// 素性中の品詞名からタグを解決します。
    ///
    /// `E` で始まる語尾（`EP`、`EF`、`EC` など）は [`PosTag::E`] に、
    /// `J` で始まる助詞（`JKS`、`JX` など）は [`PosTag::J`] にまとめられます。
    /// `*` は [`PosTag::UNKNOWN`] になります。
    ///
    /// # 引数
    ///
    /// * `name` - 品詞名
    ///
    /// # エラー
    ///
    /// 上記以外で未定義の品詞名が与えられた場合にエラーを返します。
    pub fn resolve(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() || name == "*" {
            return Ok(Self::UNKNOWN);
        }
        let upper = name.to_ascii_uppercase();
        if upper.starts_with('E') {
            Ok(Self::E)
        } else if upper.starts_with('J') {
            Ok(Self::J)
        } else {
            upper.parse()
        }
    }

    /// 空白の直後に現れた場合にペナルティを受けるタグかどうか。
    ///
    /// 語尾・助詞・肯定指定詞・接尾辞は、直前の語に付属するため空白を挟まないのが普通です。
    #[inline(always)]
    pub const fn is_space_penalized(&self) -> bool {
        matches!(
            self,
            Self::E | Self::J | Self::VCP | Self::XSA | Self::XSN | Self::XSV
        )
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 複合語や活用形を構成する形態素
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Morpheme {
    /// 品詞タグ
    pub pos_tag: PosTag,
    /// 表層形
    pub surface: String,
}

impl Morpheme {
    /// 表層形の文字数
    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.surface.chars().count()
    }
}

/// 素性文字列から取り出した単語の品詞情報
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WordInfo {
    /// 単語の構成の種類
    pub pos_type: PosType,
    /// 先頭の形態素の品詞
    pub left_pos: PosTag,
    /// 末尾の形態素の品詞
    pub right_pos: PosTag,
    /// 読み
    pub reading: Option<String>,
    /// 構成形態素。単一形態素の場合は空。
    pub morphemes: Vec<Morpheme>,
}

impl WordInfo {
    /// mecab-ko-dic 形式の素性文字列を解析します。
    ///
    /// 素性は `品詞,意味分類,終声有無,読み,タイプ,先頭品詞,末尾品詞,表現` の順に並びます。
    /// 後ろの列は省略でき、省略された列は `*` として扱われます。
    /// 単一形態素と複合語、および先頭品詞が `*` の単語では、先頭と末尾の品詞を1列目の品詞から取ります。
    ///
    /// # 引数
    ///
    /// * `feature` - CSVの5列目以降の素性文字列
    ///
    /// # エラー
    ///
    /// 未定義の品詞タグやタイプが含まれる場合にエラーを返します。
    pub fn parse(feature: &str) -> Result<Self> {
        let fields = parse_csv_row(feature);
        let field = |i: usize| fields.get(i).map_or("*", String::as_str);

        let pos_type = PosType::resolve(field(4))?;
        let (left_pos, right_pos) = if pos_type == PosType::Morpheme
            || pos_type == PosType::Compound
            || field(5) == "*"
        {
            // The leading tag may be a combined one such as VV+EP.
            let tag = field(0);
            let first = tag.split('+').next().unwrap_or(tag);
            let last = tag.rsplit('+').next().unwrap_or(tag);
            (PosTag::resolve(first)?, PosTag::resolve(last)?)
        } else {
            (PosTag::resolve(field(5))?, PosTag::resolve(field(6))?)
        };

        let reading = match field(3) {
            "" | "*" => None,
            r => Some(r.to_string()),
        };

        let morphemes = if pos_type == PosType::Morpheme {
            vec![]
        } else {
            Self::parse_expression(field(7))?
        };

        Ok(Self {
            pos_type,
            left_pos,
            right_pos,
            reading,
            morphemes,
        })
    }

    /// `도서/NNG/*+관/NNG/*` 形式の表現を形態素列に分解します。
    fn parse_expression(expr: &str) -> Result<Vec<Morpheme>> {
        if expr.is_empty() || expr == "*" {
            return Ok(vec![]);
        }
        let mut morphemes = vec![];
        for part in expr.split('+') {
            let mut spl = part.split('/');
            let (Some(surface), Some(tag)) = (spl.next(), spl.next()) else {
                return Err(KolatticeError::invalid_format(
                    "feature",
                    format!("malformed expression: {expr}"),
                ));
            };
            let surface = surface.trim();
            if surface.is_empty() {
                continue;
            }
            morphemes.push(Morpheme {
                pos_tag: PosTag::resolve(tag)?,
                surface: surface.to_string(),
            });
        }
        Ok(morphemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tag() {
        assert_eq!(PosTag::resolve("NNG").unwrap(), PosTag::NNG);
        assert_eq!(PosTag::resolve("EP").unwrap(), PosTag::E);
        assert_eq!(PosTag::resolve("JKS").unwrap(), PosTag::J);
        assert_eq!(PosTag::resolve("*").unwrap(), PosTag::UNKNOWN);
        assert_eq!(PosTag::resolve("xsn").unwrap(), PosTag::XSN);
        assert!(PosTag::resolve("NOPE").is_err());
    }

    #[test]
    fn test_tag_names_round_trip() {
        for tag in PosTag::ALL {
            assert_eq!(tag.as_str().parse::<PosTag>().unwrap(), *tag);
        }
        assert_eq!(PosTag::ALL.len(), 36);
    }

    #[test]
    fn test_parse_morpheme() {
        let info = WordInfo::parse("NNG,*,T,학교,*,*,*,*").unwrap();
        assert_eq!(info.pos_type, PosType::Morpheme);
        assert_eq!(info.left_pos, PosTag::NNG);
        assert_eq!(info.right_pos, PosTag::NNG);
        assert_eq!(info.reading.as_deref(), Some("학교"));
        assert!(info.morphemes.is_empty());
    }

    #[test]
    fn test_parse_compound() {
        let info =
            WordInfo::parse("NNG,*,T,도서관,Compound,*,*,도서/NNG/*+관/NNG/*").unwrap();
        assert_eq!(info.pos_type, PosType::Compound);
        assert_eq!(info.left_pos, PosTag::NNG);
        assert_eq!(info.right_pos, PosTag::NNG);
        assert_eq!(
            info.morphemes,
            vec![
                Morpheme {
                    pos_tag: PosTag::NNG,
                    surface: "도서".to_string()
                },
                Morpheme {
                    pos_tag: PosTag::NNG,
                    surface: "관".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_inflect() {
        let info = WordInfo::parse("VV+EP,*,T,했,Inflect,VV,EP,하/VV/*+았/EP/*").unwrap();
        assert_eq!(info.pos_type, PosType::Inflect);
        assert_eq!(info.left_pos, PosTag::VV);
        assert_eq!(info.right_pos, PosTag::E);
        assert_eq!(info.morphemes.len(), 2);
        assert_eq!(info.morphemes[1].pos_tag, PosTag::E);
    }

    #[test]
    fn test_parse_short_feature() {
        let info = WordInfo::parse("*").unwrap();
        assert_eq!(info, WordInfo::default());
    }

    #[test]
    fn test_parse_invalid_type() {
        assert!(WordInfo::parse("NNG,*,T,학교,Weird,*,*,*").is_err());
    }
}
