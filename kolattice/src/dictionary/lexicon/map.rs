//! 表層形から単語IDへのマップ

pub mod posting;
pub mod trie;

use std::collections::BTreeMap;

use crate::dictionary::lexicon::map::posting::{Postings, PostingsBuilder};
use crate::dictionary::lexicon::map::trie::Trie;
use crate::errors::Result;
use crate::utils::FromU32;

/// 表層形をトライで、同形異義語をポスティングリストで管理するマップ
pub struct WordMap {
    // None for an empty lexicon, which the double-array cannot represent.
    trie: Option<Trie>,
    postings: Postings,
}

impl WordMap {
    /// 単語の表層形のイテレータから新しいインスタンスを作成します。
    ///
    /// 単語IDはイテレータ内の順序になります。
    pub fn new<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut b = WordMapBuilder::new();
        for (i, w) in words.into_iter().enumerate() {
            b.add_record(w.as_ref().to_string(), u32::try_from(i)?);
        }
        b.build()
    }

    /// 入力の接頭辞に一致する `(単語ID, 一致した文字数)` を返します。
    ///
    /// 同じ表層形の単語はすべて列挙されます。
    #[inline(always)]
    pub fn common_prefix_iterator<'a, I>(
        &'a self,
        input: I,
    ) -> impl Iterator<Item = (u32, usize)> + 'a
    where
        I: IntoIterator<Item = char>,
        I::IntoIter: 'a,
    {
        self.trie
            .as_ref()
            .map(|trie| trie.common_prefix_iterator(input))
            .into_iter()
            .flatten()
            .flat_map(move |e| {
                self.postings
                    .ids(usize::from_u32(e.value))
                    .map(move |word_id| (word_id, e.end_char))
            })
    }
}

#[derive(Default)]
pub struct WordMapBuilder {
    map: BTreeMap<String, Vec<u32>>,
}

impl WordMapBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn add_record(&mut self, word: String, id: u32) {
        self.map.entry(word).or_default().push(id);
    }

    pub fn build(self) -> Result<WordMap> {
        let mut entries = vec![];
        let mut builder = PostingsBuilder::new();
        for (word, ids) in self.map {
            let offset = builder.push(&ids)?;
            entries.push((word, u32::try_from(offset)?));
        }
        let trie = if entries.is_empty() {
            None
        } else {
            Some(Trie::from_records(&entries)?)
        };
        Ok(WordMap {
            trie,
            postings: builder.build(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homographs() {
        let map = WordMap::new(["가", "가다", "가"]).unwrap();
        let matches: Vec<_> = map.common_prefix_iterator("가다가".chars()).collect();
        assert_eq!(matches, vec![(0, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_empty() {
        let map = WordMap::new(Vec::<String>::new()).unwrap();
        assert_eq!(map.common_prefix_iterator("가".chars()).count(), 0);
    }
}
