//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to process exit codes.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ローカル実行環境向けのエラー分類を定義します。
/// ネットワーク層を持たないため、各バリアントは sysexits(3) 互換の
/// 終了コードにマッピングされます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::PermissionDenied;
/// assert_eq!(kind.exit_code(), 77);
/// assert_eq!(kind.as_str(), "Permission Denied");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 1 - Rejected: 入力は正しいが判定が否定的
    Rejected,
    /// 65 - Invalid Input: 入力データが不正
    InvalidInput,
    /// 66 - Not Found: 入力ファイルやリソースが見つからない
    NotFound,
    /// 69 - Unavailable: 必要なデバイスや機能が存在しない
    Unavailable,
    /// 70 - Internal: 内部エラー
    Internal,
    /// 74 - I/O: 入出力エラー
    Io,
    /// 75 - Temporary Failure: 一時的な失敗（再試行で回復しうる）
    TemporaryFailure,
    /// 77 - Permission Denied: 権限が拒否された
    PermissionDenied,
    /// 78 - Config: 設定エラー
    Config,
}

impl ErrorKind {
    /// プロセス終了コードを取得
    ///
    /// ## Returns
    /// sysexits(3) に準拠した終了コード（`Rejected` のみ汎用の 1）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::InvalidInput.exit_code(), 65);
    /// assert_eq!(ErrorKind::Config.exit_code(), 78);
    /// ```
    #[inline]
    pub const fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Rejected => 1,
            ErrorKind::InvalidInput => 65,
            ErrorKind::NotFound => 66,
            ErrorKind::Unavailable => 69,
            ErrorKind::Internal => 70,
            ErrorKind::Io => 74,
            ErrorKind::TemporaryFailure => 75,
            ErrorKind::PermissionDenied => 77,
            ErrorKind::Config => 78,
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Rejected => "Rejected",
            ErrorKind::InvalidInput => "Invalid Input",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Unavailable => "Unavailable",
            ErrorKind::Internal => "Internal Error",
            ErrorKind::Io => "I/O Error",
            ErrorKind::TemporaryFailure => "Temporary Failure",
            ErrorKind::PermissionDenied => "Permission Denied",
            ErrorKind::Config => "Configuration Error",
        }
    }

    /// システム側のエラーかどうかを判定
    ///
    /// 内部エラー・入出力エラー・設定エラーは `true` を返します。
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_system_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::Internal | ErrorKind::Io | ErrorKind::Config
        )
    }

    /// 利用者が対処できるエラーかどうかを判定
    #[inline]
    pub const fn is_operator_error(&self) -> bool {
        !self.is_system_error()
    }

    /// 再試行で回復しうるかどうか
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::TemporaryFailure)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
