//! Week Parser
//!
//! 週グリッドの固定された行・列から7日分の [`DayRecord`] を組み立てる。
//! 日付の解釈に失敗してもエラーにはせず、元のテキストをそのまま通す。

use chrono::{Datelike, NaiveDate};

use crate::allergen::SELECTION_ALLERGENS;
use crate::api::GridLayout;
use crate::error::MenuGridError;
use crate::grid::GridSource;
use crate::parser::cell::parse_cell;
use crate::text::normalise_sides;
use crate::types::{DayHeader, DayRecord, LunchSource, MenuItem, SourceMenus, SupperSource, Week};

/// 1週間の日数（曜日列の数）
pub const DAYS_PER_WEEK: usize = 7;

/// 曜日行が空のときに使う曜日名
pub const DEFAULT_WEEKDAYS: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// 昼食デザート2品目の固定タイトル
pub const LUNCH_ICE_CREAM_TITLE: &str = "Ice creams / sorbet (V)";

/// 夕食デザート2品目の固定タイトル
pub const SUPPER_ICE_CREAM_TITLE: &str =
    "Selection of vegan ice creams or sorbet with seasonal fruits (Ve)";

/// 夕食スープの固定タイトル
pub const SUPPER_SOUP_TITLE: &str = "Chef's choice soup";

/// 週グリッドを解析する
///
/// # 引数
///
/// * `grid` - セル文字列のアクセサ
/// * `layout` - 行・列の規約
///
/// # 戻り値
///
/// * `Ok(Week)` - 常に7日分。曜日列の順に並ぶ（日付による並べ替えはしない）
/// * `Err(MenuGridError::StructuralParse)` - 曜日列が足りない、見出し行がない、
///   またはどのセルも読めない場合
pub fn parse_week(grid: &dyn GridSource, layout: &GridLayout) -> Result<Week, MenuGridError> {
    if grid.rows() < layout.min_rows() {
        return Err(MenuGridError::structural(format!(
            "found {} rows, need at least {} (weekday, date and theme rows)",
            grid.rows(),
            layout.min_rows()
        )));
    }
    if grid.cols() < layout.min_cols() {
        return Err(MenuGridError::structural(format!(
            "found {} columns, need at least {} (label column and 7 day columns)",
            grid.cols(),
            layout.min_cols()
        )));
    }

    let day_cols = layout.first_day_col..layout.min_cols();
    let has_content = layout
        .rows()
        .into_iter()
        .any(|row| day_cols.clone().any(|col| !grid.cell(row, col).trim().is_empty()));
    if !has_content {
        return Err(MenuGridError::structural(
            "no menu cells found in the day columns",
        ));
    }

    let days: Vec<DayRecord> = (0..DAYS_PER_WEEK)
        .map(|day_idx| parse_day(grid, layout, day_idx))
        .collect();

    tracing::debug!(
        days = days.len(),
        rows = grid.rows(),
        cols = grid.cols(),
        "parsed weekly grid"
    );

    Ok(Week { days })
}

/// 1日分（1列）を解析する（内部ヘルパー）
fn parse_day(grid: &dyn GridSource, layout: &GridLayout, day_idx: usize) -> DayRecord {
    let col = layout.first_day_col + day_idx;
    let item = |row: usize| parse_cell(&grid.cell(row, col));
    // タイトルとアレルゲンのみを残す枠
    let titled = |row: usize| {
        let parsed = item(row);
        MenuItem::titled(parsed.title, parsed.allergens)
    };

    let weekday = match grid.cell(layout.weekday_row, col).trim() {
        "" => DEFAULT_WEEKDAYS[day_idx].to_string(),
        name => name.to_string(),
    };

    let raw_date = grid.cell(layout.date_row, col).trim().to_string();
    let date_iso = to_iso(&raw_date);
    if !raw_date.is_empty() && parse_iso(&date_iso).is_none() {
        tracing::warn!(weekday = %weekday, date = %raw_date, "unparseable date, passing through verbatim");
    }

    let header = DayHeader {
        date_label: date_label(&date_iso, &weekday),
        theme: grid.cell(layout.theme_row, col).trim().to_string(),
        weekday,
        date_iso,
    };

    let sides = item(layout.optional_sides);
    let sides_text = format!("{} {}", sides.title, sides.description);

    let lunch = LunchSource {
        starters: [titled(layout.lunch_starters[0]), titled(layout.lunch_starters[1])],
        veg_main: item(layout.veg_main),
        meat_main: item(layout.meat_main),
        vegan_main: item(layout.vegan_main),
        optional_sides: MenuItem::titled(normalise_sides(sides_text.trim()), sides.allergens),
        desserts: [
            titled(layout.lunch_desserts[0]),
            MenuItem::titled(LUNCH_ICE_CREAM_TITLE, item(layout.lunch_desserts[1]).allergens),
        ],
    };

    let supper = SupperSource {
        starter: MenuItem::titled(SUPPER_SOUP_TITLE, item(layout.supper_starter).allergens),
        selection: MenuItem::titled("", SELECTION_ALLERGENS),
        specials: item(layout.supper_special),
        vegan_special: item(layout.vegan_special),
        desserts: [
            titled(layout.supper_desserts[0]),
            MenuItem::titled(SUPPER_ICE_CREAM_TITLE, item(layout.supper_desserts[1]).allergens),
        ],
    };

    DayRecord {
        header,
        source: SourceMenus { lunch, supper },
    }
}

/// セルの日付をISO形式に正規化する
///
/// `DD/MM/YYYY`、`DD/MM/YY`、`YYYY-MM-DD` の順に試し、最初に成功したものを使う。
/// どれにも当てはまらなければ入力（前後の空白を除く）をそのまま返す。
///
/// ```rust
/// use menugrid::parser::to_iso;
///
/// assert_eq!(to_iso("18/09/2025"), "2025-09-18");
/// assert_eq!(to_iso("18/09/25"), "2025-09-18");
/// assert_eq!(to_iso("Thursday 18th"), "Thursday 18th");
/// ```
pub fn to_iso(text: &str) -> String {
    let s = text.trim();
    match parse_source_date(s) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => s.to_string(),
    }
}

/// セルの日付を解釈する（内部ヘルパー）
///
/// スラッシュ区切りは年の桁数で4桁と2桁を区別する。
fn parse_source_date(s: &str) -> Option<NaiveDate> {
    if let Some((_, year)) = s.rsplit_once('/') {
        let format = match year.len() {
            4 => "%d/%m/%Y",
            2 => "%d/%m/%y",
            _ => return None,
        };
        return NaiveDate::parse_from_str(s, format).ok();
    }
    parse_iso(s)
}

/// ISO形式（`YYYY-MM-DD`）の日付を解釈する
pub fn parse_iso(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// 表示用の日付ラベル（`Weekday – DD/MM/YYYY`）
///
/// 日付が解釈できなければ `Weekday – {元のテキスト}`。
pub fn date_label(date_iso: &str, weekday: &str) -> String {
    match parse_iso(date_iso) {
        Some(date) => format!("{} – {}", weekday, date.format("%d/%m/%Y")),
        None => format!("{} – {}", weekday, date_iso),
    }
}

/// アレルゲン表の日付見出し（`18 September 2025`、序数なし）
///
/// 日付が解釈できなければ入力をそのまま返す。
pub fn date_banner(date_iso: &str) -> String {
    match parse_iso(date_iso) {
        Some(date) => format!("{} {}", date.day(), date.format("%B %Y")),
        None => date_iso.to_string(),
    }
}
