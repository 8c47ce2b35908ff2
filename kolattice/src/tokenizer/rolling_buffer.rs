//! 入力文字列のローリングバッファ
//!
//! 入力を文字単位で必要な分だけ読み込み、確定済みの範囲を解放しながら保持します。
//! 位置はすべて入力先頭からの絶対文字オフセットで指定します。

use std::io::{self, BufRead, BufReader, Read};

use encoding_rs::{Decoder, DecoderResult, UTF_8};

/// 文字の供給元
pub(crate) type CharSource = Box<dyn Iterator<Item = io::Result<char>>>;

const INITIAL_CAPACITY: usize = 512;

/// 絶対位置でアクセスできる循環バッファ
///
/// `free_before` で解放されていない範囲の文字と、その文字の入力中のバイト位置を保持します。
/// 容量が足りなくなると倍に拡張されます。
pub(crate) struct RollingCharBuffer {
    source: Option<CharSource>,
    chars: Vec<char>,
    byte_offsets: Vec<usize>,
    // Physical index where the next char is written.
    next_write: usize,
    // Absolute position of the next char to be read from the source.
    next_pos: usize,
    // Number of valid chars held.
    count: usize,
    // Absolute byte offset right after the last char read.
    next_byte: usize,
    end: bool,
    error: Option<io::Error>,
}

impl Default for RollingCharBuffer {
    fn default() -> Self {
        Self {
            source: None,
            chars: vec!['\0'; INITIAL_CAPACITY],
            byte_offsets: vec![0; INITIAL_CAPACITY],
            next_write: 0,
            next_pos: 0,
            count: 0,
            next_byte: 0,
            end: true,
            error: None,
        }
    }
}

impl RollingCharBuffer {
    /// 新しい供給元で状態を初期化します。確保済みの領域は再利用されます。
    pub fn reset(&mut self, source: CharSource) {
        self.source = Some(source);
        self.next_write = 0;
        self.next_pos = 0;
        self.count = 0;
        self.next_byte = 0;
        self.end = false;
        self.error = None;
    }

    /// 絶対位置 `pos` の文字を返します。
    ///
    /// まだ読み込まれていなければ供給元から読み進めます。
    /// 入力の終端以降、または読み込みに失敗した以降の位置では `None` を返します。
    pub fn get(&mut self, pos: usize) -> Option<char> {
        while self.next_pos <= pos {
            if !self.fill_one() {
                return None;
            }
        }
        debug_assert!(
            self.next_pos - pos <= self.count,
            "position {pos} was already freed (next_pos={}, count={})",
            self.next_pos,
            self.count
        );
        Some(self.chars[self.index(pos)])
    }

    /// `start` から `len` 文字を返します。範囲は読み込み済みでなければなりません。
    pub fn get_range(&self, start: usize, len: usize) -> impl Iterator<Item = char> + '_ {
        debug_assert!(start + len <= self.next_pos);
        debug_assert!(self.next_pos - start <= self.count);
        (start..start + len).map(move |pos| self.chars[self.index(pos)])
    }

    /// 絶対位置 `pos` の文字の入力中のバイト位置を返します。
    ///
    /// `pos` には最後に読み込んだ文字の次の位置も指定できます。
    pub fn byte_offset(&self, pos: usize) -> usize {
        if pos == self.next_pos {
            return self.next_byte;
        }
        debug_assert!(pos < self.next_pos && self.next_pos - pos <= self.count);
        self.byte_offsets[self.index(pos)]
    }

    /// `pos` より前の文字を解放します。
    pub fn free_before(&mut self, pos: usize) {
        debug_assert!(pos <= self.next_pos);
        let keep = self.next_pos - pos;
        debug_assert!(keep <= self.count, "position {pos} was already freed");
        self.count = keep;
    }

    /// 記録された読み込みエラーを取り出します。
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    #[inline(always)]
    fn index(&self, pos: usize) -> usize {
        let back = self.next_pos - pos;
        if back <= self.next_write {
            self.next_write - back
        } else {
            self.next_write + self.chars.len() - back
        }
    }

    fn fill_one(&mut self) -> bool {
        if self.end {
            return false;
        }
        let Some(source) = self.source.as_mut() else {
            self.end = true;
            return false;
        };
        let c = match source.next() {
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                log::warn!("input stream failed at char {}: {e}", self.next_pos);
                self.error = Some(e);
                self.end = true;
                return false;
            }
            None => {
                self.end = true;
                return false;
            }
        };
        if self.count == self.chars.len() {
            self.grow();
        }
        if self.next_write == self.chars.len() {
            self.next_write = 0;
        }
        self.chars[self.next_write] = c;
        self.byte_offsets[self.next_write] = self.next_byte;
        self.next_write += 1;
        self.next_pos += 1;
        self.count += 1;
        self.next_byte += c.len_utf8();
        true
    }

    fn grow(&mut self) {
        // Full, so the oldest char sits at next_write. Unroll it to the front.
        let capacity = self.chars.len();
        self.chars.rotate_left(self.next_write % capacity);
        self.byte_offsets.rotate_left(self.next_write % capacity);
        self.chars.resize(capacity * 2, '\0');
        self.byte_offsets.resize(capacity * 2, 0);
        self.next_write = capacity;
    }
}

/// [`Read`] から UTF-8 を逐次復号して文字を返すイテレータ
///
/// 読み込んだチャンクを [`encoding_rs`] のデコーダーに渡すため、チャンクの境界で分割された
/// 文字も正しく復号されます。不正なバイト列は置換せず、それまでの文字を返した後に
/// [`io::ErrorKind::InvalidData`] のエラーを返します。BOM は取り除きません。
pub(crate) struct Utf8Chars<R> {
    rdr: BufReader<R>,
    decoder: Decoder,
    decoded: String,
    // Byte index of the next char to yield from `decoded`.
    cursor: usize,
    error: Option<io::Error>,
    done: bool,
}

impl<R> Utf8Chars<R>
where
    R: Read,
{
    pub fn new(rdr: R) -> Self {
        Self {
            rdr: BufReader::new(rdr),
            decoder: UTF_8.new_decoder_without_bom_handling(),
            decoded: String::new(),
            cursor: 0,
            error: None,
            done: false,
        }
    }

    /// 次のチャンクを読み込んで `decoded` に復号します。
    fn fill(&mut self) {
        self.decoded.clear();
        self.cursor = 0;

        let chunk = match self.rdr.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return,
            Err(e) => {
                self.error = Some(e);
                return;
            }
        };
        let last = chunk.is_empty();
        let needed = self
            .decoder
            .max_utf8_buffer_length_without_replacement(chunk.len())
            .unwrap_or(chunk.len() * 3 + 4);
        self.decoded.reserve(needed);

        let (result, read) =
            self.decoder
                .decode_to_string_without_replacement(chunk, &mut self.decoded, last);
        self.rdr.consume(read);
        match result {
            DecoderResult::InputEmpty => self.done = last,
            DecoderResult::OutputFull => {}
            DecoderResult::Malformed(len, _) => {
                self.error = Some(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("malformed UTF-8 sequence of {len} bytes"),
                ));
            }
        }
    }
}

impl<R> Iterator for Utf8Chars<R>
where
    R: Read,
{
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.decoded[self.cursor..].chars().next() {
                self.cursor += c.len_utf8();
                return Some(Ok(c));
            }
            if let Some(e) = self.error.take() {
                self.done = true;
                return Some(Err(e));
            }
            if self.done {
                return None;
            }
            self.fill();
        }
    }
}
