//! 単語の素性情報
//!
//! 素性文字列そのものと、そこから解析した品詞情報を単語IDごとに保持します。

use crate::dictionary::pos::WordInfo;
use crate::errors::Result;

/// 単語の素性情報を管理する構造体
#[derive(Default)]
pub struct WordFeatures {
    features: Vec<String>,
    infos: Vec<WordInfo>,
}

impl WordFeatures {
    /// 素性文字列のイテレータから新しいインスタンスを作成します。
    ///
    /// 各素性は [`WordInfo::parse`] で解析されます。
    ///
    /// # エラー
    ///
    /// 素性に未定義の品詞タグが含まれる場合にエラーを返します。
    pub fn new<I, S>(features: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut this = Self::default();
        for feature in features {
            let feature = feature.as_ref();
            this.infos.push(WordInfo::parse(feature)?);
            this.features.push(feature.to_string());
        }
        Ok(this)
    }

    #[inline(always)]
    pub fn get(&self, word_id: usize) -> &str {
        &self.features[word_id]
    }

    #[inline(always)]
    pub fn info(&self, word_id: usize) -> &WordInfo {
        &self.infos[word_id]
    }
}
