//! 単語識別子

use crate::dictionary::LexType;

/// 単語の識別子
///
/// 単語IDだけでは由来する辞書が区別できないため、辞書の種類と組にして保持します。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct WordIdx {
    /// この単語を含む辞書の種類
    pub lex_type: LexType,

    /// この単語のID
    pub word_id: u32,
}

impl Default for WordIdx {
    fn default() -> Self {
        Self::new(LexType::System, u32::MAX)
    }
}

impl WordIdx {
    /// 新しいインスタンスを作成します。
    #[inline(always)]
    pub const fn new(lex_type: LexType, word_id: u32) -> Self {
        Self { lex_type, word_id }
    }
}
