//! Public API Types
//!
//! 公開APIで使用する列挙型と設定値を定義するモジュール。

use chrono::NaiveDate;
use serde::Serialize;

/// 入力コンテナの種類
///
/// 週メニュー表はWord文書の表として配布されるのが基本だが、
/// 同じ行・列の規約に従ったExcelシートも受け付ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum InputFormat {
    /// ZIPの中身から判別する（デフォルト）
    ///
    /// `word/document.xml` があればDOCX、`xl/workbook.xml` があればXLSX。
    #[default]
    Auto,

    /// Word文書（最初の表を読む）
    Docx,

    /// Excelブック（最初のシートを読む）
    Xlsx,
}

/// 出力フォーマット
///
/// 1日分のメニュー（Standard / Vegan / Allergens）を書き出す形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Markdown形式（デフォルト）
    ///
    /// 3つのビューを見出しで区切って出力します。アレルゲン表はMarkdownテーブル。
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// # Thursday – 18/09/2025
    ///
    /// ## Standard menu
    /// ...
    /// ## Allergens — 18 September 2025
    ///
    /// | Dish     | Celery | ... |
    /// |----------|--------|-----|
    /// | Fish pie |        | ... |
    /// ```
    #[default]
    Markdown,

    /// JSON形式
    ///
    /// ヘッダー・2つのビュー・アレルゲン表をまとめた1つのオブジェクト。
    Json,

    /// CSV形式
    ///
    /// アレルゲン表のみ。1列目が料理名、2列目が見出しフラグ、以降が分類ごとの0/1。
    Csv,
}

impl OutputFormat {
    /// 出力ファイルの拡張子
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// 生成対象の日の選択方式
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DaySelector {
    /// 7日すべて（デフォルト）
    #[default]
    All,

    /// インデックス指定（0始まり、曜日列の順）
    Index(usize),

    /// 日付指定
    Date(NaiveDate),

    /// 曜日名指定（大文字小文字は無視）
    Weekday(String),
}

/// ビューの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    Standard,
    Vegan,
}

/// 週グリッドの行・列の規約（0始まり）
///
/// デフォルト値が配布されている週メニュー表のレイアウト。
/// 行11は昼食と夕食の区切りで、どの枠にも使わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// 曜日名の行
    pub weekday_row: usize,
    /// 日付の行
    pub date_row: usize,
    /// テーマの行
    pub theme_row: usize,

    /// 昼食の前菜2品
    pub lunch_starters: [usize; 2],
    /// 昼食ヴィーガンメイン
    pub vegan_main: usize,
    /// 昼食ベジタリアンメイン
    pub veg_main: usize,
    /// 昼食肉メイン
    pub meat_main: usize,
    /// 付け合わせ
    pub optional_sides: usize,
    /// 昼食デザート2品
    pub lunch_desserts: [usize; 2],

    /// 夕食スープ
    pub supper_starter: usize,
    /// 夕食ヴィーガンスペシャル
    pub vegan_special: usize,
    /// サンドイッチ盛り合わせ
    pub selection: usize,
    /// 夕食スペシャル
    pub supper_special: usize,
    /// 夕食デザート2品
    pub supper_desserts: [usize; 2],

    /// 最初の曜日列（この列から7列を読む）
    pub first_day_col: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            weekday_row: 0,
            date_row: 1,
            theme_row: 2,
            lunch_starters: [3, 4],
            vegan_main: 5,
            veg_main: 6,
            meat_main: 7,
            optional_sides: 8,
            lunch_desserts: [9, 10],
            supper_starter: 12,
            vegan_special: 13,
            selection: 14,
            supper_special: 15,
            supper_desserts: [16, 17],
            first_day_col: 1,
        }
    }
}

impl GridLayout {
    /// 規約で使うすべての行インデックス
    pub fn rows(&self) -> Vec<usize> {
        let mut rows = vec![self.weekday_row, self.date_row, self.theme_row];
        rows.extend(self.lunch_starters);
        rows.extend([
            self.vegan_main,
            self.veg_main,
            self.meat_main,
            self.optional_sides,
        ]);
        rows.extend(self.lunch_desserts);
        rows.extend([
            self.supper_starter,
            self.vegan_special,
            self.selection,
            self.supper_special,
        ]);
        rows.extend(self.supper_desserts);
        rows
    }

    /// 見出し（曜日・日付・テーマ）を読むのに必要な最小行数
    pub fn min_rows(&self) -> usize {
        self.weekday_row.max(self.date_row).max(self.theme_row) + 1
    }

    /// 7日分を読むのに必要な最小列数
    pub fn min_cols(&self) -> usize {
        self.first_day_col + crate::parser::week::DAYS_PER_WEEK
    }
}
