//! 単語のパラメータ情報
//!
//! このモジュールは、単語の接続IDとコストを管理します。

use crate::dictionary::connector::ConnectorView;

/// 単語のパラメータ（接続IDとコスト）
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct WordParam {
    pub left_id: u16,
    pub right_id: u16,
    pub word_cost: i16,
}

impl WordParam {
    /// 新しい単語パラメータを作成します。
    #[inline(always)]
    pub const fn new(left_id: u16, right_id: u16, word_cost: i16) -> Self {
        Self {
            left_id,
            right_id,
            word_cost,
        }
    }

    /// 左右IDがコネクターの範囲内にあるかどうか。
    #[inline(always)]
    pub fn fits<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        usize::from(self.left_id) < conn.num_left() && usize::from(self.right_id) < conn.num_right()
    }
}

/// 単語IDでインデックス化された単語パラメータ
pub struct WordParams {
    params: Vec<WordParam>,
}

impl WordParams {
    /// パラメータのイテレータから新しいインスタンスを作成します。
    pub fn new<I>(params: I) -> Self
    where
        I: IntoIterator<Item = WordParam>,
    {
        Self {
            params: params.into_iter().collect(),
        }
    }

    #[inline(always)]
    pub fn get(&self, word_id: usize) -> WordParam {
        self.params[word_id]
    }

    /// 範囲外の接続IDを持つ最初の単語IDを返します。
    pub fn find_out_of_range<C>(&self, conn: &C) -> Option<usize>
    where
        C: ConnectorView,
    {
        self.params.iter().position(|p| !p.fits(conn))
    }
}
