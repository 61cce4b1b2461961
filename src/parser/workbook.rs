//! Workbook Reader
//!
//! calamineを使用して、Excelブックの最初のシートを [`WeekGrid`] に変換する。
//! セル座標はシート上の位置（A1 = (0, 0)）をそのまま保つ。

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Days, NaiveDate};

use crate::error::MenuGridError;
use crate::grid::WeekGrid;

/// ブックを示すパート
pub(crate) const WORKBOOK_PART: &str = "xl/workbook.xml";

/// ブックの最初のシートを読み取る
///
/// # 引数
///
/// * `bytes` - XLSXファイルの内容（セキュリティ検査済み）
///
/// # 戻り値
///
/// * `Ok(WeekGrid)` - シートの使用範囲をA1起点に配置したグリッド
/// * `Err(MenuGridError::Parse)` - ブックとして読めない場合
/// * `Err(MenuGridError::StructuralParse)` - シートが1つもない場合
pub(crate) fn read_first_sheet(bytes: Vec<u8>) -> Result<WeekGrid, MenuGridError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(MenuGridError::Parse)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MenuGridError::structural("workbook contains no sheet"))?
        .map_err(MenuGridError::Parse)?;

    Ok(range_to_grid(&range))
}

/// ブックの全シートをシート順に読み取る
///
/// アレルゲン表テンプレートのように、目的の表がどのシートにあるか分からない場合に使う。
pub(crate) fn read_sheets(bytes: Vec<u8>) -> Result<Vec<WeekGrid>, MenuGridError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(MenuGridError::Parse)?;

    let grids: Vec<WeekGrid> = workbook
        .worksheets()
        .iter()
        .map(|(_, range)| range_to_grid(range))
        .collect();
    if grids.is_empty() {
        return Err(MenuGridError::structural("workbook contains no sheet"));
    }
    Ok(grids)
}

/// シートの使用範囲をA1起点のグリッドに配置する（内部ヘルパー）
fn range_to_grid(range: &Range<Data>) -> WeekGrid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }

    WeekGrid::from_rows(rows)
}

/// セルの値をテキストに変換する（内部ヘルパー）
///
/// 日付セルは週グリッドの慣習に合わせて `DD/MM/YYYY` で出力する。
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| format_float(dt.as_f64())),
        Data::DateTimeIso(s) => iso_datetime_text(s),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// 整数値の浮動小数点は小数点なしで出力する
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Excelのシリアル値（1900年エポック）を日付に変換する
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // 1900年のうるう年バグを吸収した起点
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

/// ISO 8601の日時文字列から日付部分を取り出して `DD/MM/YYYY` にする
fn iso_datetime_text(s: &str) -> String {
    let date_part = s.split('T').next().unwrap_or(s);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_to_date() {
        // 45918 = 2025-09-18
        assert_eq!(
            serial_to_date(45918.0),
            NaiveDate::from_ymd_opt(2025, 9, 18)
        );
        assert_eq!(
            serial_to_date(45918.75),
            NaiveDate::from_ymd_opt(2025, 9, 18)
        );
        assert_eq!(serial_to_date(0.5), None);
        assert_eq!(serial_to_date(f64::NAN), None);
    }

    #[test]
    fn test_cell_text_values() {
        assert_eq!(cell_text(&Data::String("Fish pie".to_string())), "Fish pie");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_iso_datetime_text() {
        assert_eq!(iso_datetime_text("2025-09-18T00:00:00"), "18/09/2025");
        assert_eq!(iso_datetime_text("2025-09-18"), "18/09/2025");
        assert_eq!(iso_datetime_text("PT1H"), "PT1H");
    }
}

// ブック全体の読み取りは統合テスト（tests/）で実装します。
// rust_xlsxwriterで生成したXLSXが必要なため、単体テストではなく統合テストとして実装します。
