//! 接続コスト計算のためのコネクター
//!
//! 連接する2語の右IDと左IDから接続コストを引くためのトレイトと、
//! `matrix.def` に基づく行列実装を提供します。

mod matrix_connector;

pub use crate::dictionary::connector::matrix_connector::MatrixConnector;

/// コネクターのビュー機能を提供するトレイト
pub trait ConnectorView {
    /// 左接続IDの最大数を返します。
    fn num_left(&self) -> usize;

    /// 右接続IDの最大数を返します。
    fn num_right(&self) -> usize;
}

/// 接続コスト計算機能を提供するトレイト
pub trait ConnectorCost: ConnectorView {
    /// 接続行列の値を取得します。
    ///
    /// # 引数
    ///
    /// * `right_id` - 前の語の右接続ID
    /// * `left_id` - 後ろの語の左接続ID
    ///
    /// # 戻り値
    ///
    /// 接続コスト
    fn cost(&self, right_id: u16, left_id: u16) -> i32;
}
