//! 文字の Unicode 属性に基づく判定

use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};
use unicode_script::{Script, UnicodeScript};

// HANGUL LETTER ARAEA, used as an interpunct.
const ARAEA: char = '\u{318D}';

/// 句読点・記号・区切り・制御文字かどうか。
pub(crate) fn is_punctuation(c: char) -> bool {
    if c == ARAEA {
        return true;
    }
    use GeneralCategory::*;
    matches!(
        c.general_category(),
        SpaceSeparator
            | LineSeparator
            | ParagraphSeparator
            | Control
            | Format
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | ConnectorPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
            | InitialPunctuation
            | FinalPunctuation
    )
}

/// 空白区切り文字（Zs）かどうか。
#[inline(always)]
pub(crate) fn is_space_separator(c: char) -> bool {
    c.general_category() == GeneralCategory::SpaceSeparator
}

/// 10進数字（Nd）かどうか。
#[inline(always)]
pub(crate) fn is_digit(c: char) -> bool {
    c.general_category() == GeneralCategory::DecimalNumber
}

/// 非スペーシングマーク（Mn）かどうか。
#[inline(always)]
pub(crate) fn is_nonspacing_mark(c: char) -> bool {
    c.general_category() == GeneralCategory::NonspacingMark
}

#[inline(always)]
pub(crate) fn script_of(c: char) -> Script {
    c.script()
}

/// 特定の文字体系に属さない文字体系かどうか。
#[inline(always)]
pub(crate) fn is_common_or_inherited(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited)
}

/// 2つの文字体系が同じ未知語に含まれうるかどうか。
#[inline(always)]
pub(crate) fn is_same_script(a: Script, b: Script) -> bool {
    a == b || is_common_or_inherited(a) || is_common_or_inherited(b)
}
