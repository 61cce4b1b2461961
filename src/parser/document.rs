//! DOCX Table Reader
//!
//! Word文書（`word/document.xml`）のトップレベルの表を読み取り、
//! [`WeekGrid`] に変換する。
//!
//! - 段落は改行で連結する（`w:br` も改行、`w:tab` はタブ）
//! - 横結合（`w:gridSpan`）は結合数だけ同じテキストを複製する
//! - 縦結合の継続セル（`w:vMerge` の `continue`）は直上のセルのテキストを使う
//! - 入れ子の表のテキストはセルに含めない

use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::MenuGridError;
use crate::grid::WeekGrid;
use crate::security::{read_entry, SecurityConfig};

/// 本文パート
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";

/// アーカイブから最初の表を読み取る
///
/// # 戻り値
///
/// * `Ok(WeekGrid)` - 表の行 × 列のテキスト
/// * `Err(MenuGridError::StructuralParse)` - 文書に表が1つもない場合
/// * `Err(MenuGridError::Xml)` - XMLとして読めない場合
pub(crate) fn read_first_table<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    config: &SecurityConfig,
) -> Result<WeekGrid, MenuGridError> {
    let xml = read_document_part(archive, config)?;
    parse_first_table(&xml)
}

/// アーカイブからトップレベルの表をすべて文書順に読み取る
pub(crate) fn read_tables<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    config: &SecurityConfig,
) -> Result<Vec<WeekGrid>, MenuGridError> {
    let xml = read_document_part(archive, config)?;
    parse_tables(&xml)
}

fn read_document_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    config: &SecurityConfig,
) -> Result<Vec<u8>, MenuGridError> {
    let file = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| MenuGridError::Zip(format!("{}: {}", DOCUMENT_PART, e)))?;
    read_entry(file, DOCUMENT_PART, config)
}

/// `document.xml` の内容から最初の表を読み取る
pub(crate) fn parse_first_table(xml: &[u8]) -> Result<WeekGrid, MenuGridError> {
    let tables = parse_tables(xml)?;
    if tables.len() > 1 {
        tracing::warn!(
            extra_tables = tables.len() - 1,
            "document holds more than one table, using the first"
        );
    }
    tables
        .into_iter()
        .next()
        .ok_or_else(|| MenuGridError::structural("document contains no table"))
}

/// `document.xml` の内容からトップレベルの表をすべて読み取る
///
/// # 戻り値
///
/// * `Ok(Vec<WeekGrid>)` - 文書順の表（1つ以上）
/// * `Err(MenuGridError::StructuralParse)` - 文書に表が1つもない場合
/// * `Err(MenuGridError::Xml)` - XMLとして読めない場合
pub(crate) fn parse_tables(xml: &[u8]) -> Result<Vec<WeekGrid>, MenuGridError> {
    let mut reader = Reader::from_reader(xml);
    // セル内の空白は意味を持つので削らない
    reader.trim_text(false);

    let mut collector = TableCollector::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => collector.open(&e, false)?,
            Ok(Event::Empty(e)) => collector.open(&e, true)?,
            Ok(Event::Text(e)) => {
                if collector.accepts_text() {
                    let text = e
                        .unescape()
                        .map_err(|e| MenuGridError::Xml(format!("XML text error: {}", e)))?;
                    collector.push_text(&text);
                }
            }
            Ok(Event::End(e)) => collector.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(MenuGridError::Xml(format!("{}", e))),
            _ => {}
        }
        buf.clear();
    }

    collector.finish()
}

/// 表の読み取り状態
#[derive(Default)]
struct TableCollector {
    /// `w:tbl` の入れ子の深さ
    depth: usize,
    /// 読み終えたトップレベルの表
    tables: Vec<Vec<Vec<String>>>,

    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Option<CellState>,
    in_run: bool,
    in_text: bool,
}

/// 読み取り中のセル
#[derive(Default)]
struct CellState {
    text: String,
    span: usize,
    merged_continue: bool,
    paragraphs: usize,
}

impl TableCollector {
    /// トップレベルの表の直下（入れ子でない）にいるか
    fn at_top_level(&self) -> bool {
        self.depth == 1
    }

    fn accepts_text(&self) -> bool {
        self.at_top_level() && self.in_text && self.cell.is_some()
    }

    fn push_text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.text.push_str(text);
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, self_closing: bool) -> Result<(), MenuGridError> {
        let name = e.local_name();
        let name = name.as_ref();

        if name == b"tbl" {
            if self_closing {
                return Ok(());
            }
            self.depth += 1;
            if self.depth == 1 {
                self.rows = Vec::new();
            }
            return Ok(());
        }

        if !self.at_top_level() {
            return Ok(());
        }

        match name {
            b"tr" => {
                self.row = Vec::new();
                if self_closing {
                    self.close(b"tr");
                }
            }
            b"tc" => {
                self.cell = Some(CellState {
                    span: 1,
                    ..CellState::default()
                });
                if self_closing {
                    self.close(b"tc");
                }
            }
            b"p" => {
                if let Some(cell) = self.cell.as_mut() {
                    if cell.paragraphs > 0 {
                        cell.text.push('\n');
                    }
                    cell.paragraphs += 1;
                }
            }
            b"r" if !self_closing => self.in_run = true,
            b"t" if !self_closing => self.in_text = true,
            b"br" | b"cr" => self.push_text("\n"),
            // 段落プロパティ内のタブ位置定義（w:tabs/w:tab）は無視する
            b"tab" if self.in_run => self.push_text("\t"),
            b"gridSpan" => {
                let span = attr_val(e)?.and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);
                if let Some(cell) = self.cell.as_mut() {
                    cell.span = span.max(1);
                }
            }
            b"vMerge" => {
                // val省略時は継続セル
                let restart = attr_val(e)?.is_some_and(|v| v == "restart");
                if let Some(cell) = self.cell.as_mut() {
                    cell.merged_continue = !restart;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if name == b"tbl" {
            if self.depth == 1 {
                let rows = std::mem::take(&mut self.rows);
                self.tables.push(rows);
            }
            self.depth = self.depth.saturating_sub(1);
            return;
        }

        if !self.at_top_level() {
            return;
        }

        match name {
            b"r" => self.in_run = false,
            b"t" => self.in_text = false,
            b"tc" => {
                if let Some(cell) = self.cell.take() {
                    let col = self.row.len();
                    let text = if cell.merged_continue {
                        self.rows
                            .last()
                            .and_then(|above| above.get(col))
                            .cloned()
                            .unwrap_or_default()
                    } else {
                        cell.text
                    };
                    for _ in 0..cell.span {
                        self.row.push(text.clone());
                    }
                }
            }
            b"tr" => {
                let row = std::mem::take(&mut self.row);
                self.rows.push(row);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Result<Vec<WeekGrid>, MenuGridError> {
        // 閉じられずに終わった表も読み取った分は使う
        if self.depth > 0 {
            let rows = std::mem::take(&mut self.rows);
            self.tables.push(rows);
        }
        if self.tables.is_empty() {
            return Err(MenuGridError::structural("document contains no table"));
        }
        Ok(self.tables.into_iter().map(WeekGrid::from_rows).collect())
    }
}

/// `w:val` 属性を取り出す
///
/// 読み取る値（結合数と `restart`）はASCIIのみなので、実体参照は展開しない。
fn attr_val(e: &BytesStart<'_>) -> Result<Option<String>, MenuGridError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MenuGridError::Xml(format!("XML attribute error: {}", e)))?;
        if attr.key.local_name().as_ref() == b"val" {
            let value = std::str::from_utf8(&attr.value)?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}
