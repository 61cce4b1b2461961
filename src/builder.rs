//! Builder Module
//!
//! Fluent Builder APIを提供し、`MenuGenerator`インスタンスを段階的に構築する。
//!
//! `MenuGenerator`は1日分の処理（ビュー2つとアレルゲン表の生成）を束ねる
//! オーケストレーターで、週の各日を並列に処理する。

use std::collections::HashSet;
use std::io::{BufWriter, Read, Seek, Write};

use rayon::prelude::*;
use serde::Serialize;

use crate::allergen::AllergenCategory;
use crate::api::{DaySelector, GridLayout, InputFormat, OutputFormat, ViewKind};
use crate::assembler::assemble_allergen_rows;
use crate::error::MenuGridError;
use crate::grid::GridSource;
use crate::output::OutputFormatter;
use crate::types::{AllergenTableRow, DayHeader, DayRecord, DisplayContext, Week};
use crate::views::build_view;

/// 生成処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct GenerationConfig {
    /// 入力コンテナの種類
    pub input_format: InputFormat,

    /// 生成対象の日
    pub day_selector: DaySelector,

    /// 出力フォーマット
    pub output_format: OutputFormat,

    /// 週グリッドの行・列の規約
    pub layout: GridLayout,

    /// アレルゲン表の列順
    pub allergen_columns: Vec<AllergenCategory>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            input_format: InputFormat::Auto,
            day_selector: DaySelector::All,
            output_format: OutputFormat::Markdown,
            layout: GridLayout::default(),
            allergen_columns: AllergenCategory::ALL.to_vec(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use menugrid::{DaySelector, MenuGeneratorBuilder, OutputFormat};
///
/// # fn main() -> Result<(), menugrid::MenuGridError> {
/// let generator = MenuGeneratorBuilder::new()
///     .with_day_selector(DaySelector::Weekday("Thursday".to_string()))
///     .with_output_format(OutputFormat::Json)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MenuGeneratorBuilder {
    /// 内部設定（構築中）
    config: GenerationConfig,
}

impl Default for MenuGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuGeneratorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 入力形式: 自動判別
    /// - 対象日: 7日すべて
    /// - 出力フォーマット: Markdown
    /// - グリッド規約: [`GridLayout::default`]
    /// - アレルゲン列: 正規の16分類
    pub fn new() -> Self {
        Self {
            config: GenerationConfig::default(),
        }
    }

    /// 入力コンテナの種類を指定する
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.config.input_format = format;
        self
    }

    /// 生成対象の日を選択する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use menugrid::{DaySelector, MenuGeneratorBuilder};
    ///
    /// // 曜日列のインデックスで指定
    /// let builder = MenuGeneratorBuilder::new().with_day_selector(DaySelector::Index(3));
    ///
    /// // 日付で指定
    /// let date = NaiveDate::from_ymd_opt(2025, 9, 18).unwrap();
    /// let builder = MenuGeneratorBuilder::new().with_day_selector(DaySelector::Date(date));
    /// ```
    pub fn with_day_selector(mut self, selector: DaySelector) -> Self {
        self.config.day_selector = selector;
        self
    }

    /// 出力フォーマットを指定する
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 週グリッドの行・列の規約を指定する
    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// アレルゲン表の列順を指定する
    ///
    /// テンプレートの見出しから得た列順
    /// （[`AllergenHeaderLayout::categories`](crate::allergen::AllergenHeaderLayout::categories)）
    /// をそのまま渡せる。
    pub fn with_allergen_columns(mut self, columns: Vec<AllergenCategory>) -> Self {
        self.config.allergen_columns = columns;
        self
    }

    /// 設定を検証し、`MenuGenerator`インスタンスを生成する
    ///
    /// # エラー
    ///
    /// * `MenuGridError::Config` - 以下の場合
    ///   * グリッド規約の行が重複している
    ///   * アレルゲン列が空、または重複している
    pub fn build(self) -> Result<MenuGenerator, MenuGridError> {
        // 1. グリッド規約の検証
        let rows = self.config.layout.rows();
        let mut seen = HashSet::new();
        if let Some(dup) = rows.iter().find(|r| !seen.insert(**r)) {
            return Err(MenuGridError::Config(format!(
                "Invalid layout: row {} is assigned to more than one slot",
                dup
            )));
        }

        // 2. アレルゲン列の検証
        if self.config.allergen_columns.is_empty() {
            return Err(MenuGridError::Config(
                "Allergen columns must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self
            .config
            .allergen_columns
            .iter()
            .find(|c| !seen.insert(**c))
        {
            return Err(MenuGridError::Config(format!(
                "Duplicate allergen column: {}",
                dup
            )));
        }

        // 3. MenuGeneratorインスタンス生成
        Ok(MenuGenerator::new(self.config))
    }
}

/// 1日分の生成結果
///
/// 標準・ヴィーガンの2つのビューと、アレルゲン表の行をまとめたもの。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayMenus {
    pub header: DayHeader,
    pub standard: DisplayContext,
    pub vegan: DisplayContext,
    pub allergens: Vec<AllergenTableRow>,
}

/// メニュー生成のファサード
///
/// # 使用例
///
/// ```rust,no_run
/// use menugrid::MenuGeneratorBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), menugrid::MenuGridError> {
/// let generator = MenuGeneratorBuilder::new().build()?;
/// let days = generator.generate(File::open("weekly.docx")?)?;
/// for day in &days {
///     generator.render(day, std::io::stdout())?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MenuGenerator {
    /// 生成設定
    config: GenerationConfig,
}

impl MenuGenerator {
    pub(crate) fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// 出力フォーマット
    pub fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// 週メニュー表を読み込み、7日分のレコードを返す
    ///
    /// # 引数
    ///
    /// * `input` - DOCX / XLSX ファイルのリーダー
    ///
    /// # 戻り値
    ///
    /// * `Ok(Week)` - 曜日列の順に並んだ7日分
    /// * `Err(MenuGridError)` - 読み込みに失敗した場合、またはグリッドが規約に合わない場合
    pub fn parse_week<R: Read + Seek>(&self, input: R) -> Result<Week, MenuGridError> {
        let grid = crate::parser::read_grid(input, self.config.input_format)?;
        self.parse_grid(&grid)
    }

    /// 読み込み済みのグリッドから7日分のレコードを組み立てる
    pub fn parse_grid(&self, grid: &dyn GridSource) -> Result<Week, MenuGridError> {
        crate::parser::parse_week(grid, &self.config.layout)
    }

    /// 設定された選択方式で対象日を選ぶ
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<&DayRecord>)` - 週の順に並んだ対象日
    /// * `Err(MenuGridError::DayNotFound)` - 指定された日が週の中にない場合
    pub fn select_days<'a>(&self, week: &'a Week) -> Result<Vec<&'a DayRecord>, MenuGridError> {
        let found = match &self.config.day_selector {
            DaySelector::All => return Ok(week.days.iter().collect()),
            DaySelector::Index(idx) => week.day(*idx).ok_or_else(|| idx.to_string()),
            DaySelector::Date(date) => week
                .day_by_date(*date)
                .ok_or_else(|| date.format("%Y-%m-%d").to_string()),
            DaySelector::Weekday(name) => week.day_by_weekday(name).ok_or_else(|| name.clone()),
        };

        found
            .map(|day| vec![day])
            .map_err(|requested| MenuGridError::DayNotFound { requested })
    }

    /// 1日分のビューとアレルゲン表を生成する
    pub fn generate_day(&self, day: &DayRecord) -> DayMenus {
        let standard = build_view(day, ViewKind::Standard);
        let vegan = build_view(day, ViewKind::Vegan);
        let allergens = assemble_allergen_rows(day, &standard, &vegan);

        tracing::info!(
            weekday = %day.header.weekday,
            date = %day.header.date_iso,
            allergen_rows = allergens.len(),
            "generated day menus"
        );

        DayMenus {
            header: day.header.clone(),
            standard,
            vegan,
            allergens,
        }
    }

    /// 週メニュー表を読み込み、対象日のメニューを生成する
    ///
    /// 各日の処理は独立しているため並列に実行し、結果は週の順に並べ直す。
    pub fn generate<R: Read + Seek>(&self, input: R) -> Result<Vec<DayMenus>, MenuGridError> {
        let week = self.parse_week(input)?;
        self.generate_week(&week)
    }

    /// 解析済みの週から対象日のメニューを生成する
    pub fn generate_week(&self, week: &Week) -> Result<Vec<DayMenus>, MenuGridError> {
        let days = self.select_days(week)?;

        let mut menus: Vec<(usize, DayMenus)> = days
            .par_iter()
            .enumerate()
            .map(|(idx, day)| (idx, self.generate_day(day)))
            .collect();

        // 結果をインデックス順にソート（並列処理の順序を保証）
        menus.sort_by_key(|(idx, _)| *idx);

        Ok(menus.into_iter().map(|(_, menus)| menus).collect())
    }

    /// 1日分のメニューを出力フォーマットで書き出す
    pub fn render<W: Write>(&self, menus: &DayMenus, output: W) -> Result<(), MenuGridError> {
        let mut writer = BufWriter::new(output);
        let formatter = OutputFormatter::from_format(self.config.output_format);
        formatter.render(menus, &self.config.allergen_columns, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// 1日分のメニューを文字列として書き出す
    pub fn render_to_string(&self, menus: &DayMenus) -> Result<String, MenuGridError> {
        let mut buffer = Vec::new();
        self.render(menus, &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            MenuGridError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }
}
