//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! メニューの自由記述テキストに起因する異常（空セル、解析不能な日付、
//! 未知のアレルゲン語など）はエラーにせず、空文字列・空集合として吸収する。
//! 呼び出し元に返すのは、週グリッドの構造そのものが規約に合わない場合と、
//! 要求された日が存在しない場合、そしてコンテナ読み込みの失敗のみ。

use thiserror::Error;

/// menugridクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `StructuralParse`: 週グリッドが行・列の規約を満たさない（再試行不可）
/// - `DayNotFound`: 要求された日付・インデックスに対応する日がない（再試行不可）
/// - `Io` / `Parse` / `Zip` / `Xml` / `Utf8`: 入力コンテナの読み込み失敗
/// - `Config`: ビルダー設定の検証に失敗
/// - `SecurityViolation`: ZIPエントリのパスやサイズが制限を超えた
///
/// # 使用例
///
/// ```rust,no_run
/// use menugrid::{MenuGeneratorBuilder, MenuGridError};
/// use std::fs::File;
///
/// fn run(path: &str) -> Result<(), MenuGridError> {
///     let generator = MenuGeneratorBuilder::new().build()?;
///     let week = generator.parse_week(File::open(path)?)?;
///     println!("{} days", week.days.len());
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum MenuGridError {
    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// calamineがXLSXブックの解析に失敗した
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    ///
    /// DOCX / XLSX はどちらもZIPコンテナなので、開けない場合はここに集約される。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// WordprocessingML の解析エラー
    #[error("XML parse error: {0}")]
    Xml(String),

    /// JSON出力時のシリアライズエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `MenuGeneratorBuilder::build()`時に検出されます。
    ///
    /// ```rust,no_run
    /// use menugrid::{MenuGeneratorBuilder, MenuGridError};
    ///
    /// let result = MenuGeneratorBuilder::new()
    ///     .with_allergen_columns(vec![])
    ///     .build();
    ///
    /// if let Err(MenuGridError::Config(msg)) = result {
    ///     println!("設定エラー: {}", msg);
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 週グリッドが想定する構造を持たない
    ///
    /// 曜日列が7列に満たない、見出し行が存在しない、文書に表がない、など。
    /// 利用者には元文書の確認を促す必要があるため、メッセージに案内文を含める。
    #[error(
        "Weekly grid does not match the expected layout: {message} \
         (check that the weekly document follows the grid convention)"
    )]
    StructuralParse {
        /// 何が欠けていたか
        message: String,
    },

    /// 要求された日が週の中に存在しない
    #[error("Day {requested} not found in weekly grid")]
    DayNotFound {
        /// 要求された日付・曜日・インデックスの表示文字列
        requested: String,
    },

    /// セキュリティ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl MenuGridError {
    /// 構造エラーを生成するヘルパー
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        MenuGridError::StructuralParse {
            message: message.into(),
        }
    }

    /// 同じ入力で再試行すれば成功し得るかどうか
    ///
    /// 入力文書の内容に起因するエラーはすべて`false`。
    /// 一時的なI/O障害のみ再試行の余地がある。
    pub fn is_retryable(&self) -> bool {
        matches!(self, MenuGridError::Io(_))
    }
}
