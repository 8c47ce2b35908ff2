//! ラティス（格子）構造の実装モジュール。
//!
//! 入力を逐次読み進めながらViterbi探索を行うため、ラティスは文字位置ごとの
//! [`Position`] を循環配列 [`WrappedPositionArray`] に保持します。
//! 確定済みの位置は解放され、その領域は後続の位置に再利用されます。
use crate::dictionary::word_idx::WordIdx;

const INITIAL_ARCS: usize = 8;
const INITIAL_POSITIONS: usize = 8;

/// ある文字位置で終わる到着アークの集合。
///
/// 各アークは「BOSからこの位置までの最小コスト」と、その最小コストを与える
/// 直前の位置とアークへのバックポインタを持ちます。
/// アークは並列配列に格納され、容量が足りなくなると倍に拡張されます。
pub(crate) struct Position {
    /// この位置の絶対文字オフセット。
    pub pos: usize,
    /// 有効なアークの数。
    pub count: usize,
    /// BOSからこのアークまでの累積コスト。
    pub costs: Vec<i32>,
    /// アークの単語の右文脈ID。
    pub last_right_id: Vec<u16>,
    /// アークの出発位置（先行する空白を含む）。
    pub back_pos: Vec<usize>,
    /// アークの単語の開始位置（先行する空白を除く）。
    pub back_word_pos: Vec<usize>,
    /// 出発位置における最良アークのインデックス。
    pub back_index: Vec<usize>,
    /// アークの単語。
    pub back_word: Vec<WordIdx>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            pos: 0,
            count: 0,
            costs: vec![0; INITIAL_ARCS],
            last_right_id: vec![0; INITIAL_ARCS],
            back_pos: vec![0; INITIAL_ARCS],
            back_word_pos: vec![0; INITIAL_ARCS],
            back_index: vec![0; INITIAL_ARCS],
            back_word: vec![WordIdx::default(); INITIAL_ARCS],
        }
    }
}

impl Position {
    fn grow(&mut self) {
        let capacity = self.costs.len() * 2;
        self.costs.resize(capacity, 0);
        self.last_right_id.resize(capacity, 0);
        self.back_pos.resize(capacity, 0);
        self.back_word_pos.resize(capacity, 0);
        self.back_index.resize(capacity, 0);
        self.back_word.resize(capacity, WordIdx::default());
    }

    /// アークを追加します。
    ///
    /// # 引数
    ///
    ///  - `cost`: BOSからこのアークまでの累積コスト
    ///  - `last_right_id`: 単語の右文脈ID
    ///  - `back_pos`: 出発位置
    ///  - `back_word_pos`: 単語の開始位置
    ///  - `back_index`: 出発位置における最良アークのインデックス
    ///  - `back_word`: 単語
    pub fn add(
        &mut self,
        cost: i32,
        last_right_id: u16,
        back_pos: usize,
        back_word_pos: usize,
        back_index: usize,
        back_word: WordIdx,
    ) {
        if self.count == self.costs.len() {
            self.grow();
        }
        let i = self.count;
        self.costs[i] = cost;
        self.last_right_id[i] = last_right_id;
        self.back_pos[i] = back_pos;
        self.back_word_pos[i] = back_word_pos;
        self.back_index[i] = back_index;
        self.back_word[i] = back_word;
        self.count += 1;
    }

    /// `idx` 番目のアークだけを先頭に残します。
    pub fn keep_only(&mut self, idx: usize) {
        debug_assert!(idx < self.count);
        self.costs[0] = self.costs[idx];
        self.last_right_id[0] = self.last_right_id[idx];
        self.back_pos[0] = self.back_pos[idx];
        self.back_word_pos[0] = self.back_word_pos[idx];
        self.back_index[0] = self.back_index[idx];
        self.back_word[0] = self.back_word[idx];
        self.count = 1;
    }

    #[inline(always)]
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// 絶対位置でアクセスできる [`Position`] の循環配列。
///
/// [`get`](Self::get) で未到達の位置を要求すると、その位置までを初期化して確保します。
/// 保持している位置が容量を超えると倍に拡張されます。
pub(crate) struct WrappedPositionArray {
    positions: Vec<Position>,
    // Physical index where the next position is placed.
    next_write: usize,
    // Absolute position of the next position to be materialized.
    next_pos: usize,
    // Number of live positions.
    count: usize,
}

impl Default for WrappedPositionArray {
    fn default() -> Self {
        Self {
            positions: (0..INITIAL_POSITIONS).map(|_| Position::default()).collect(),
            next_write: 0,
            next_pos: 0,
            count: 0,
        }
    }
}

impl WrappedPositionArray {
    /// すべての位置を解放します。確保済みのアーク領域は再利用されます。
    pub fn reset(&mut self) {
        self.next_write = 0;
        self.next_pos = 0;
        self.count = 0;
        for p in &mut self.positions {
            p.reset();
        }
    }

    /// 絶対位置 `pos` の [`Position`] を返します。必要なら新しい位置を確保します。
    ///
    /// `pos` は解放済みであってはなりません。
    pub fn get(&mut self, pos: usize) -> &mut Position {
        while pos >= self.next_pos {
            if self.count == self.positions.len() {
                self.grow();
            }
            if self.next_write == self.positions.len() {
                self.next_write = 0;
            }
            let position = &mut self.positions[self.next_write];
            debug_assert_eq!(position.count, 0);
            position.pos = self.next_pos;
            self.next_write += 1;
            self.next_pos += 1;
            self.count += 1;
        }
        debug_assert!(self.in_bounds(pos), "position {pos} was already freed");
        let index = self.index(pos);
        debug_assert_eq!(self.positions[index].pos, pos);
        &mut self.positions[index]
    }

    /// 確保済みの位置 `pos` を参照します。
    pub fn at(&self, pos: usize) -> &Position {
        debug_assert!(self.in_bounds(pos), "position {pos} is not live");
        &self.positions[self.index(pos)]
    }

    /// 次に確保される位置。
    #[inline(always)]
    pub const fn next_pos(&self) -> usize {
        self.next_pos
    }

    /// `pos` より前の位置を解放します。
    pub fn free_before(&mut self, pos: usize) {
        debug_assert!(pos <= self.next_pos);
        let to_free = self.count - (self.next_pos - pos);
        debug_assert!(to_free <= self.count);
        let mut index = self.index_back(self.count);
        for _ in 0..to_free {
            if index == self.positions.len() {
                index = 0;
            }
            self.positions[index].reset();
            index += 1;
        }
        self.count -= to_free;
    }

    #[inline(always)]
    fn in_bounds(&self, pos: usize) -> bool {
        pos < self.next_pos && pos >= self.next_pos - self.count
    }

    #[inline(always)]
    fn index(&self, pos: usize) -> usize {
        self.index_back(self.next_pos - pos)
    }

    #[inline(always)]
    fn index_back(&self, back: usize) -> usize {
        if back <= self.next_write {
            self.next_write - back
        } else {
            self.next_write + self.positions.len() - back
        }
    }

    fn grow(&mut self) {
        // Full, so the oldest position sits at next_write.
        let capacity = self.positions.len();
        self.positions.rotate_left(self.next_write % capacity);
        self.positions
            .extend((0..capacity).map(|_| Position::default()));
        self.next_write = capacity;
    }
}
