//! Parser Module
//!
//! 週メニュー表の読み込みを担当するモジュール。
//!
//! 1. コンテナ（DOCX / XLSX）を開き、セキュリティ検査を行う
//! 2. 表を [`WeekGrid`](crate::grid::WeekGrid) に変換する
//! 3. 固定の行・列規約に従ってセルを分割し、7日分の `DayRecord` を組み立てる

pub(crate) mod cell;
mod document;
pub(crate) mod week;
mod workbook;

pub use cell::parse_cell;
pub use week::{date_banner, date_label, parse_iso, parse_week, to_iso, DAYS_PER_WEEK};

use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;

use crate::api::InputFormat;
use crate::error::MenuGridError;
use crate::grid::WeekGrid;
use crate::security::{open_archive, read_input, SecurityConfig};

/// コンテナを読み込み、表をグリッドとして取り出す
///
/// # 引数
///
/// * `input` - DOCX / XLSX ファイルのリーダー
/// * `format` - 入力形式（`Auto` の場合はZIPの中身から判別）
///
/// # 戻り値
///
/// * `Ok(WeekGrid)` - 表（DOCXは最初の表、XLSXは最初のシート）
/// * `Err(MenuGridError)` - 読み込み・検査・解析に失敗した場合
pub fn read_grid<R: Read + Seek>(input: R, format: InputFormat) -> Result<WeekGrid, MenuGridError> {
    let security_config = SecurityConfig::default();
    let bytes = read_input(input, &security_config)?;

    let mut archive = open_archive(Cursor::new(bytes.as_slice()), &security_config)?;
    match resolve_format(&archive, format)? {
        InputFormat::Docx => document::read_first_table(&mut archive, &security_config),
        _ => {
            drop(archive);
            workbook::read_first_sheet(bytes)
        }
    }
}

/// コンテナ内の表をすべて取り出す
///
/// アレルゲン表のテンプレートのように、見出し行を持つ表が
/// 先頭にあるとは限らない文書を読むために使う。
///
/// # 戻り値
///
/// * `Ok(Vec<WeekGrid>)` - DOCXはトップレベルの表、XLSXはシートを文書順に
/// * `Err(MenuGridError)` - 読み込み・検査・解析に失敗した場合
pub fn read_tables<R: Read + Seek>(
    input: R,
    format: InputFormat,
) -> Result<Vec<WeekGrid>, MenuGridError> {
    let security_config = SecurityConfig::default();
    let bytes = read_input(input, &security_config)?;

    let mut archive = open_archive(Cursor::new(bytes.as_slice()), &security_config)?;
    match resolve_format(&archive, format)? {
        InputFormat::Docx => document::read_tables(&mut archive, &security_config),
        _ => {
            drop(archive);
            workbook::read_sheets(bytes)
        }
    }
}

fn resolve_format<R: Read + Seek>(
    archive: &ZipArchive<R>,
    format: InputFormat,
) -> Result<InputFormat, MenuGridError> {
    match format {
        InputFormat::Auto => detect_format(archive),
        other => Ok(other),
    }
}

/// ZIPの中身から入力形式を判別する（内部ヘルパー）
fn detect_format<R: Read + Seek>(archive: &ZipArchive<R>) -> Result<InputFormat, MenuGridError> {
    let mut is_xlsx = false;
    for name in archive.file_names() {
        if name == document::DOCUMENT_PART {
            return Ok(InputFormat::Docx);
        }
        if name == workbook::WORKBOOK_PART {
            is_xlsx = true;
        }
    }
    if is_xlsx {
        return Ok(InputFormat::Xlsx);
    }
    Err(MenuGridError::structural(
        "input is neither a Word document nor an Excel workbook",
    ))
}
