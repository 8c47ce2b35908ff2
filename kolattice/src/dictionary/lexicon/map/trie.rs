//! ダブル配列トライによる共通接頭辞検索

use crate::errors::{KolatticeError, Result};

/// ダブル配列トライ
pub struct Trie {
    da: crawdad::Trie,
}

impl Trie {
    /// レコードからトライを構築します。
    pub fn from_records<K>(records: &[(K, u32)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        Ok(Self {
            da: crawdad::Trie::from_records(records.iter().map(|(k, v)| (k, *v)))
                .map_err(|e| KolatticeError::invalid_argument("records", e.to_string()))?,
        })
    }

    /// 文字列の接頭辞に一致するレコードを、短いものから順に返します。
    ///
    /// 入力は必要な分だけ先頭から読まれ、遷移が存在しなくなった時点で探索を終えます。
    /// このため、入力に終端まで読み切れないストリームを渡すことができます。
    ///
    /// # 引数
    ///
    /// * `input` - 検索位置から始まる文字の列
    #[inline(always)]
    pub fn common_prefix_iterator<'a, I>(&'a self, input: I) -> impl Iterator<Item = TrieMatch> + 'a
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'a,
    {
        self.da
            .common_prefix_search(input.into_iter())
            .map(move |(value, end_char)| TrieMatch::new(value, end_char))
    }
}

/// トライマッチング結果
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieMatch {
    pub value: u32,
    pub end_char: usize,
}

impl TrieMatch {
    #[inline(always)]
    pub const fn new(value: u32, end_char: usize) -> Self {
        Self { value, end_char }
    }
}
