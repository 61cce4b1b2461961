//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use std::io::Write;

use crate::allergen::AllergenCategory;
use crate::builder::DayMenus;
use crate::error::MenuGridError;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（Markdown, JSON, CSV）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Markdown,
    Json,
    Csv,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: crate::api::OutputFormat) -> Self {
        match format {
            crate::api::OutputFormat::Markdown => OutputFormatter::Markdown,
            crate::api::OutputFormat::Json => OutputFormatter::Json,
            crate::api::OutputFormat::Csv => OutputFormatter::Csv,
        }
    }

    /// 1日分のメニューを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `menus` - 出力する1日分のメニュー
    /// * `columns` - アレルゲン表の列順
    /// * `writer` - 出力先のライター
    pub fn render<W: Write>(
        &self,
        menus: &DayMenus,
        columns: &[AllergenCategory],
        writer: &mut W,
    ) -> Result<(), MenuGridError> {
        match self {
            OutputFormatter::Markdown => MarkdownFormatter.render(menus, columns, writer),
            OutputFormatter::Json => JsonFormatter.render(menus, writer),
            OutputFormatter::Csv => CsvFormatter.render(&menus.allergens, columns, writer),
        }
    }
}
