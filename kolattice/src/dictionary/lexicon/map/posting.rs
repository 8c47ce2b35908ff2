//! ポスティングリスト
//!
//! 同じ表層形を持つ単語（同形異義語）のIDの集合を管理します。

use crate::errors::Result;
use crate::utils::FromU32;

/// ポスティングリスト
pub struct Postings {
    // Each set is stored as its length followed by its ids.
    data: Vec<u32>,
}

impl Postings {
    /// 指定されたオフセットに格納されたIDを返します。
    #[inline(always)]
    pub fn ids(&'_ self, offset: usize) -> impl Iterator<Item = u32> + '_ {
        let len = usize::from_u32(self.data[offset]);
        self.data[offset + 1..offset + 1 + len].iter().cloned()
    }
}

/// ポスティングリストを構築するビルダー
#[derive(Default)]
pub struct PostingsBuilder {
    data: Vec<u32>,
}

impl PostingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// IDの集合を追加し、そのオフセットを返します。
    #[inline(always)]
    pub fn push(&mut self, ids: &[u32]) -> Result<usize> {
        let offset = self.data.len();
        self.data.push(ids.len().try_into()?);
        self.data.extend_from_slice(ids);
        Ok(offset)
    }

    pub fn build(self) -> Postings {
        Postings { data: self.data }
    }
}
