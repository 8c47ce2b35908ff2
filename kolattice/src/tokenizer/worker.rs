//! トークン化処理のためのルーチンを提供するモジュール。
//!
//! このモジュールは、形態素解析のための主要なワーカー構造体を提供します。
//! ワーカーは内部データ構造を保持し、再利用することで不要なメモリアロケーションを避けます。
//!
//! # 解析の流れ
//!
//! ワーカーは入力を1文字ずつ読み進め、各位置で辞書語と未知語のアークをラティスに追加します。
//! 未確定の位置に到着アークが1本しかなく、それより先に到達した位置もない場合、
//! その位置までの最良パスは以後の入力に依存しないため、その場で確定してトークンを出力します。
//! 確定された位置より前の入力とラティスは解放されるので、長い入力でもメモリ使用量は
//! 未確定区間の長さだけに比例します。
use std::io::Read;

use crate::common::{
    BOS_EOS_CONNECTION_ID, MAX_BACKTRACE_GAP, MAX_UNKNOWN_WORD_LENGTH, SPACE_PENALTY,
};
use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::lexicon::WordParam;
use crate::dictionary::pos::{PosTag, PosType};
use crate::dictionary::{Dictionary, LexType, WordIdx};
use crate::errors::Result;
use crate::token::{Token, TokenBuf, TokenData};
use crate::tokenizer::lattice::WrappedPositionArray;
use crate::tokenizer::rolling_buffer::{CharSource, RollingCharBuffer, Utf8Chars};
use crate::tokenizer::unicode;
use crate::tokenizer::{DecompoundMode, Tokenizer};

/// ワーカーの状態。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WorkerState {
    /// 入力が設定されていないか、設定された直後でまだ読み始めていない状態。
    #[default]
    Idle,
    /// 次の呼び出しで入力を読み進める状態。
    Parsing,
    /// 確定済みで未出力のトークンが残っている状態。
    Yielding,
    /// 入力をすべて処理し、すべてのトークンを出力した状態。
    Exhausted,
}

/// トークン化処理のためのルーチンを提供する構造体。
///
/// トークン化に使用される内部データ構造を保持し、それらを再利用することで
/// 不要なメモリ再割り当てを回避します。
///
/// # 例
///
/// ```ignore
/// let mut worker = tokenizer.new_worker();
/// worker.reset_sentence("한국어 문장");
/// while let Some(token) = worker.next_token()? {
///     println!("{}", token.surface());
/// }
/// ```
pub struct Worker {
    pub(crate) tokenizer: Tokenizer,
    buffer: RollingCharBuffer,
    positions: WrappedPositionArray,
    // Next position to extend from.
    pos: usize,
    // Everything before this position is committed.
    last_backtrace_pos: usize,
    end: bool,
    state: WorkerState,
    // Committed tokens, emitted from the back.
    pending: Vec<TokenData>,
    // Text of the last committed span and its per-char byte offsets.
    pub(crate) fragment: String,
    pub(crate) fragment_offsets: Vec<usize>,
    pub(crate) fragment_start: usize,
    fragment_byte_start: usize,
    matches: Vec<(WordIdx, WordParam, usize)>,
}

impl Worker {
    /// 新しいインスタンスを作成します。
    ///
    /// # 引数
    ///
    /// * `tokenizer` - 使用するトークナイザー
    pub(crate) fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            buffer: RollingCharBuffer::default(),
            positions: WrappedPositionArray::default(),
            pos: 0,
            last_backtrace_pos: 0,
            end: true,
            state: WorkerState::Idle,
            pending: vec![],
            fragment: String::new(),
            fragment_offsets: vec![0],
            fragment_start: 0,
            fragment_byte_start: 0,
            matches: vec![],
        }
    }

    /// トークン化する入力文をリセットします。
    ///
    /// 以前の入力の未出力のトークンは破棄されます。
    ///
    /// # 引数
    ///
    /// * `input` - トークン化する入力文字列
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        let chars: Vec<char> = input.as_ref().chars().collect();
        self.reset_source(Box::new(chars.into_iter().map(Ok)));
    }

    /// トークン化する入力をリーダーに設定します。
    ///
    /// 入力はUTF-8として必要な分だけ逐次読み込まれます。読み込みや復号に失敗した場合、
    /// それまでの入力を解析し終えた後に [`next_token`](Self::next_token) がエラーを返します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 入力のリーダー
    pub fn reset_reader<R>(&mut self, rdr: R)
    where
        R: Read + 'static,
    {
        self.reset_source(Box::new(Utf8Chars::new(rdr)));
    }

    fn reset_source(&mut self, source: CharSource) {
        self.buffer.reset(source);
        self.positions.reset();
        self.pos = 0;
        self.last_backtrace_pos = 0;
        self.end = false;
        self.state = WorkerState::Idle;
        self.pending.clear();
        self.fragment.clear();
        self.fragment_offsets.clear();
        self.fragment_offsets.push(0);
        self.fragment_start = 0;
        self.fragment_byte_start = 0;
        // BOS
        self.positions
            .get(0)
            .add(0, BOS_EOS_CONNECTION_ID, 0, 0, 0, WordIdx::default());
    }

    /// ワーカーの状態を返します。
    #[inline(always)]
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// 次のトークンを返します。
    ///
    /// トークンは入力の先頭から順に返されます。分解された形態素は元の単語の直後に続きます。
    /// すべてのトークンを返し終えると `None` を返します。
    ///
    /// # エラー
    ///
    /// [`reset_reader`](Self::reset_reader) で設定した入力の読み込みや復号に失敗していた場合、
    /// 失敗した位置までのトークンを返し終えた後にエラーを一度だけ返します。
    pub fn next_token(&mut self) -> Result<Option<Token<'_>>> {
        while self.pending.is_empty() {
            if self.end {
                self.state = WorkerState::Exhausted;
                if let Some(e) = self.buffer.take_error() {
                    return Err(e.into());
                }
                return Ok(None);
            }
            self.state = WorkerState::Parsing;
            self.parse();
        }
        let data = self.pending.pop();
        self.state = if !self.pending.is_empty() {
            WorkerState::Yielding
        } else if self.end {
            WorkerState::Exhausted
        } else {
            WorkerState::Parsing
        };
        Ok(data.map(|data| Token::new(self, data)))
    }

    /// 残りのトークンをすべて取り出します。
    ///
    /// # エラー
    ///
    /// [`next_token`](Self::next_token) と同じ条件でエラーを返します。
    pub fn token_bufs(&mut self) -> Result<Vec<TokenBuf>> {
        let mut tokens = vec![];
        while let Some(token) = self.next_token()? {
            tokens.push(token.to_buf());
        }
        Ok(tokens)
    }

    /// 確定済みのトークンが得られるか入力が尽きるまでラティスを拡張します。
    fn parse(&mut self) {
        let dict = self.tokenizer.shared_dictionary();
        let dict = dict.as_ref();

        loop {
            if self.buffer.get(self.pos).is_none() {
                break;
            }

            let count = self.positions.get(self.pos).count;
            if count == 0 {
                // No arc reaches here.
                self.pos += 1;
                continue;
            }

            if self.pos > self.last_backtrace_pos
                && count == 1
                && self.positions.next_pos() == self.pos + 1
            {
                // Frontier: every surviving path goes through the only arc here.
                log::trace!("commit at frontier {}", self.pos);
                self.backtrace(dict, self.pos, 0);
                self.positions.get(self.pos).costs[0] = 0;
                if !self.pending.is_empty() {
                    return;
                }
            }

            if self.pos - self.last_backtrace_pos >= MAX_BACKTRACE_GAP {
                self.force_commit(dict);
                if !self.pending.is_empty() {
                    return;
                }
                continue;
            }

            self.extend(dict);
            self.pos += 1;
        }

        self.end = true;
        if self.pos > 0 {
            let conn = dict.connector();
            let end = self.positions.get(self.pos);
            let count = end.count;
            let mut least_idx = 0;
            let mut least_cost = i32::MAX;
            for idx in 0..count {
                let cost = end.costs[idx].saturating_add(
                    conn.cost(end.last_right_id[idx], BOS_EOS_CONNECTION_ID),
                );
                if idx == 0 || cost < least_cost {
                    least_cost = cost;
                    least_idx = idx;
                }
            }
            if count > 0 {
                self.backtrace(dict, self.pos, least_idx);
            }
        }
    }

    /// 未確定区間が長くなりすぎた場合に、その時点で最小コストのアークで確定します。
    fn force_commit(&mut self, dict: &Dictionary) {
        let mut least_pos = self.pos;
        let mut least_idx = 0;
        let mut least_cost = i32::MAX;
        for pos in self.pos..self.positions.next_pos() {
            let position = self.positions.at(pos);
            for idx in 0..position.count {
                if position.costs[idx] < least_cost {
                    least_cost = position.costs[idx];
                    least_pos = pos;
                    least_idx = idx;
                }
            }
        }
        log::warn!(
            "no unambiguous boundary within {MAX_BACKTRACE_GAP} chars, forcing commit at {least_pos}"
        );

        for pos in self.pos..self.positions.next_pos() {
            if pos != least_pos {
                self.positions.get(pos).reset();
            }
        }
        self.positions.get(least_pos).keep_only(least_idx);
        self.backtrace(dict, least_pos, 0);
        self.positions.get(least_pos).costs[0] = 0;
        if least_pos != self.pos {
            debug_assert!(self.pos < least_pos);
            self.pos = least_pos;
        }
    }

    /// 現在位置から始まる単語のアークを追加します。
    ///
    /// 現在位置の後に続く空白は次の単語の前置きとして扱い、空白の次の文字から単語を探します。
    /// 現在位置は単語の開始位置まで進みます。
    fn extend(&mut self, dict: &Dictionary) {
        let from_pos = self.pos;

        let mut word_pos = from_pos;
        while self.buffer.get(word_pos).is_some_and(unicode::is_space_separator) {
            word_pos += 1;
        }
        if self.buffer.get(word_pos).is_none() {
            // Only spaces remain.
            word_pos = from_pos;
        }
        let Some(first) = self.buffer.get(word_pos) else {
            return;
        };
        self.pos = word_pos;

        let mut matches = std::mem::take(&mut self.matches);
        let mut any_matches = false;

        if let Some(user) = dict.user_lexicon() {
            matches.clear();
            let buffer = &mut self.buffer;
            let input = (word_pos..).map_while(|p| buffer.get(p));
            matches.extend(
                user.common_prefix_iterator(input)
                    .map(|m| (m.word_idx, m.word_param, m.end_char)),
            );
            // Only the longest user words are used.
            if let Some(longest) = matches.iter().map(|m| m.2).max() {
                any_matches = true;
                for &(word_idx, param, len) in matches.iter().filter(|m| m.2 == longest) {
                    self.add(dict, from_pos, word_pos, word_pos + len, word_idx, param);
                }
            }
        }

        if !any_matches {
            matches.clear();
            let buffer = &mut self.buffer;
            let input = (word_pos..).map_while(|p| buffer.get(p));
            matches.extend(
                dict.system_lexicon()
                    .common_prefix_iterator(input)
                    .map(|m| (m.word_idx, m.word_param, m.end_char)),
            );
            any_matches = !matches.is_empty();
            for &(word_idx, param, len) in &matches {
                self.add(dict, from_pos, word_pos, word_pos + len, word_idx, param);
            }
        }
        self.matches = matches;

        if !any_matches || dict.char_prop().char_info(first).invoke() {
            self.extend_unknown(dict, from_pos, word_pos);
        }
    }

    /// `word_pos` から始まる未知語のアークを追加します。
    ///
    /// 文字体系、句読点かどうか、数字かどうかが変わる位置で未知語を区切ります。
    fn extend_unknown(&mut self, dict: &Dictionary, from_pos: usize, word_pos: usize) {
        let char_prop = dict.char_prop();
        let Some(first) = self.buffer.get(word_pos) else {
            return;
        };
        let first_info = char_prop.char_info(first);
        let mut cate_id = first_info.base_id();
        let mut length = 1;

        if first_info.group() {
            let mut script = unicode::script_of(first);
            let is_punct = unicode::is_punctuation(first);
            let is_digit = unicode::is_digit(first);
            while length < MAX_UNKNOWN_WORD_LENGTH {
                let Some(next) = self.buffer.get(word_pos + length) else {
                    break;
                };
                let next_script = unicode::script_of(next);
                let same_script = unicode::is_same_script(script, next_script)
                    || unicode::is_nonspacing_mark(next);
                let next_info = char_prop.char_info(next);
                if !(same_script
                    && unicode::is_punctuation(next) == is_punct
                    && unicode::is_digit(next) == is_digit
                    && next_info.group())
                {
                    break;
                }
                length += 1;
                // A run of common chars takes on the first concrete script it meets.
                if unicode::is_common_or_inherited(script)
                    && !unicode::is_common_or_inherited(next_script)
                {
                    script = next_script;
                    cate_id = next_info.base_id();
                }
            }
        }

        let unk_handler = dict.unk_handler();
        for word_id in unk_handler.word_ids(cate_id) {
            let word_idx = WordIdx::new(LexType::Unknown, word_id);
            let param = unk_handler.word_param(word_idx);
            self.add(dict, from_pos, word_pos, word_pos + length, word_idx, param);
        }
    }

    /// `from_pos` の到着アークから単語を接続し、`end_pos` にアークを追加します。
    ///
    /// 到着アークのうち、累積コストと接続コスト（と空白ペナルティ）の和が最小のものを選びます。
    /// 同点の場合は先に追加されたアークが選ばれます。
    fn add(
        &mut self,
        dict: &Dictionary,
        from_pos: usize,
        word_pos: usize,
        end_pos: usize,
        word_idx: WordIdx,
        param: WordParam,
    ) {
        let penalty = if word_pos > from_pos && left_pos(dict, word_idx).is_space_penalized() {
            SPACE_PENALTY
        } else {
            0
        };
        let conn = dict.connector();
        let from = self.positions.at(from_pos);
        debug_assert!(from.count > 0);

        let mut least_idx = 0;
        let mut least_cost = i32::MAX;
        for idx in 0..from.count {
            let cost = from.costs[idx]
                .saturating_add(conn.cost(from.last_right_id[idx], param.left_id))
                .saturating_add(penalty);
            if idx == 0 || cost < least_cost {
                least_cost = cost;
                least_idx = idx;
            }
        }
        let cost = least_cost.saturating_add(i32::from(param.word_cost));
        self.positions.get(end_pos).add(
            cost,
            param.right_id,
            from_pos,
            word_pos,
            least_idx,
            word_idx,
        );
    }

    /// `end_pos` の `best_idx` 番目のアークから最後に確定した位置までの最良パスをたどり、
    /// トークンを出力待ちに積みます。
    ///
    /// トークンは右から左へ積まれるため、末尾から取り出すと入力順になります。
    fn backtrace(&mut self, dict: &Dictionary, end_pos: usize, best_idx: usize) {
        let last = self.last_backtrace_pos;
        if end_pos <= last {
            return;
        }
        debug_assert!(self.pending.is_empty());

        self.fragment.clear();
        self.fragment_offsets.clear();
        for c in self.buffer.get_range(last, end_pos - last) {
            self.fragment_offsets.push(self.fragment.len());
            self.fragment.push(c);
        }
        self.fragment_offsets.push(self.fragment.len());
        self.fragment_start = last;
        self.fragment_byte_start = self.buffer.byte_offset(last);

        let mode = self.tokenizer.mode();
        let discard_punctuation = self.tokenizer.discards_punctuation();
        let unigrams = self.tokenizer.outputs_unknown_unigrams();

        let mut pos = end_pos;
        let mut best_idx = best_idx;
        while pos > last {
            let position = self.positions.at(pos);
            debug_assert!(best_idx < position.count);
            let back_pos = position.back_pos[best_idx];
            let back_word_pos = position.back_word_pos[best_idx];
            let back_word = position.back_word[best_idx];
            let next_best_idx = position.back_index[best_idx];
            debug_assert!(back_pos >= last, "back_pos={back_pos} last={last}");

            if unigrams && back_word.lex_type == LexType::Unknown {
                for i in (back_word_pos..pos).rev() {
                    let c = self.fragment_char(i);
                    if discard_punctuation && c.is_some_and(unicode::is_punctuation) {
                        continue;
                    }
                    self.push_token(back_word, None, i, i + 1, 1, 1);
                }
            } else {
                let info = dict.word_info(back_word);
                if info.pos_type == PosType::Morpheme || mode == DecompoundMode::None {
                    let first = self.fragment_char(back_word_pos);
                    if !(discard_punctuation && first.is_some_and(unicode::is_punctuation)) {
                        self.push_token(back_word, None, back_word_pos, pos, 1, 1);
                    }
                } else if info.morphemes.is_empty() {
                    self.push_token(back_word, None, back_word_pos, pos, 1, 1);
                } else {
                    let mut end_offset = pos;
                    for (i, morpheme) in info.morphemes.iter().enumerate().rev() {
                        let (start, end) = if info.pos_type == PosType::Compound {
                            let start = end_offset
                                .saturating_sub(morpheme.len_char())
                                .max(back_word_pos);
                            (start, end_offset)
                        } else {
                            (back_word_pos, pos)
                        };
                        let increment = u32::from(!(i == 0 && mode == DecompoundMode::Mixed));
                        self.push_token(back_word, Some(i), start, end, increment, 1);
                        end_offset = end_offset
                            .saturating_sub(morpheme.len_char())
                            .max(back_word_pos);
                    }
                    if mode == DecompoundMode::Mixed {
                        let length = u32::try_from(info.morphemes.len()).unwrap_or(u32::MAX);
                        self.push_token(back_word, None, back_word_pos, pos, 1, length.max(1));
                    }
                }
            }

            if !discard_punctuation && back_word_pos != back_pos {
                let space = space_word(dict);
                self.push_token(space, None, back_pos, back_word_pos, 1, 1);
            }

            pos = back_pos;
            best_idx = next_best_idx;
        }

        log::trace!(
            "committed {}..{end_pos} with {} tokens",
            last,
            self.pending.len()
        );
        self.last_backtrace_pos = end_pos;
        self.buffer.free_before(end_pos);
        self.positions.free_before(end_pos);
    }

    fn push_token(
        &mut self,
        word_idx: WordIdx,
        morpheme: Option<usize>,
        start: usize,
        end: usize,
        position_increment: u32,
        position_length: u32,
    ) {
        let byte_start = self.fragment_byte_start + self.fragment_offsets[start - self.fragment_start];
        let byte_end = self.fragment_byte_start + self.fragment_offsets[end - self.fragment_start];
        self.pending.push(TokenData {
            word_idx,
            morpheme,
            start,
            end,
            byte_start,
            byte_end,
            position_increment,
            position_length,
        });
    }

    fn fragment_char(&self, pos: usize) -> Option<char> {
        let offset = self.fragment_offsets[pos - self.fragment_start];
        self.fragment[offset..].chars().next()
    }
}

#[inline(always)]
fn left_pos(dict: &Dictionary, word_idx: WordIdx) -> PosTag {
    dict.word_info(word_idx).left_pos
}

/// 空白トークンに割り当てる単語。空白文字のカテゴリの最初の未知語です。
fn space_word(dict: &Dictionary) -> WordIdx {
    let cate_id = dict.char_prop().char_info(' ').base_id();
    WordIdx::new(LexType::Unknown, dict.unk_handler().word_ids(cate_id).start)
}
