//! 解析全体で共有される定数

/// BOS/EOSの接続ID
///
/// 文頭のアークの右IDと、文末での接続コスト計算の左IDに使われます。
pub const BOS_EOS_CONNECTION_ID: u16 = 0;

/// 最後に確定した位置から保持できるラティスの最大幅（文字数）
///
/// 未確定の区間がこの幅に達すると、その時点で最小コストのアークを強制的に確定します。
/// この確定は大域的な最適解を保証しない近似です。
pub const MAX_BACKTRACE_GAP: usize = 1024;

/// 1つの未知語としてまとめる最大文字数
pub const MAX_UNKNOWN_WORD_LENGTH: usize = 1024;

/// 空白の直後に付属語が現れた場合に加算されるペナルティ
pub const SPACE_PENALTY: i32 = 3000;
