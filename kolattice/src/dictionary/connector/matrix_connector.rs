//! 行列ベースのコネクター実装

use std::io::{BufRead, BufReader, Read};

use crate::dictionary::connector::{ConnectorCost, ConnectorView};
use crate::errors::{KolatticeError, Result};

/// 接続コストの行列
///
/// `matrix.def` の内容を平坦化して保持します。
/// 要素は `left_id * num_right + right_id` の位置に格納されます。
pub struct MatrixConnector {
    data: Vec<i16>,
    num_right: usize,
    num_left: usize,
}

impl MatrixConnector {
    /// `matrix.def` から新しいインスタンスを作成します。
    ///
    /// 1行目は `右IDの数 左IDの数`、以降の行は `右ID 左ID コスト` です。
    /// 記述されなかった組のコストは0になります。
    ///
    /// # 引数
    ///
    /// * `rdr` - `matrix.def` のリーダー
    ///
    /// # エラー
    ///
    /// フォーマットが不正な場合や、IDがヘッダの範囲外の場合にエラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut lines = BufReader::new(rdr).lines();
        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => {
                    return Err(KolatticeError::invalid_format(
                        "matrix.def",
                        "the header line is missing",
                    ));
                }
            }
        };
        let (num_right, num_left) = Self::parse_header(&header)?;
        let mut data = vec![0; num_right * num_left];
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (right_id, left_id, cost) = Self::parse_body(&line)?;
            if num_right <= right_id || num_left <= left_id {
                return Err(KolatticeError::invalid_format(
                    "matrix.def",
                    format!("connection ids are out of range: {line:?}"),
                ));
            }
            data[left_id * num_right + right_id] = cost;
        }
        Ok(Self {
            data,
            num_right,
            num_left,
        })
    }

    fn parse_header(line: &str) -> Result<(usize, usize)> {
        let mut spl = line.split_whitespace();
        let num_right = spl.next();
        let num_left = spl.next();
        let rest = spl.next();
        if let (Some(num_right), Some(num_left), None) = (num_right, num_left, rest) {
            let num_right: u16 = num_right.parse()?;
            let num_left: u16 = num_left.parse()?;
            return Ok((usize::from(num_right), usize::from(num_left)));
        }
        Err(KolatticeError::invalid_format(
            "matrix.def",
            "The header must be two integers separated by white spaces",
        ))
    }

    fn parse_body(line: &str) -> Result<(usize, usize, i16)> {
        let mut spl = line.split_whitespace();
        let right_id = spl.next();
        let left_id = spl.next();
        let cost = spl.next();
        let rest = spl.next();
        if let (Some(right_id), Some(left_id), Some(cost), None) = (right_id, left_id, cost, rest)
        {
            let right_id: u16 = right_id.parse()?;
            let left_id: u16 = left_id.parse()?;
            let cost: i16 = cost.parse()?;
            return Ok((usize::from(right_id), usize::from(left_id), cost));
        }
        Err(KolatticeError::invalid_format(
            "matrix.def",
            "A body line must be three integers separated by white spaces",
        ))
    }
}

impl ConnectorView for MatrixConnector {
    #[inline(always)]
    fn num_left(&self) -> usize {
        self.num_left
    }

    #[inline(always)]
    fn num_right(&self) -> usize {
        self.num_right
    }
}

impl ConnectorCost for MatrixConnector {
    #[inline(always)]
    fn cost(&self, right_id: u16, left_id: u16) -> i32 {
        let index = usize::from(left_id) * self.num_right + usize::from(right_id);
        i32::from(self.data[index])
    }
}
