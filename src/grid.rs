//! Grid Module
//!
//! 週メニュー表を「行 × 列のセル文字列」として扱うための抽象を提供するモジュール。
//! DOCX / XLSX の読み込み結果はどちらも [`WeekGrid`] に揃えられ、
//! 週パーサーは [`GridSource`] だけを通してセルにアクセスする。

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::error::MenuGridError;

/// 2次元のセル文字列アクセサ
///
/// 範囲外の座標は空文字列を返さなければならない。
pub trait GridSource {
    /// セルのテキスト（0始まり）
    fn cell(&self, row: usize, col: usize) -> String;

    /// 行数
    fn rows(&self) -> usize;

    /// 列数（最も長い行に合わせる）
    fn cols(&self) -> usize;
}

/// メモリ上の稠密なグリッド
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekGrid {
    /// グリッドデータ（行 × 列）
    cells: Vec<Vec<String>>,

    /// 列数
    cols: usize,
}

impl WeekGrid {
    /// 行のリストからグリッドを構築する
    ///
    /// 行ごとの長さが揃っていなくてもよい。短い行は空文字列で埋める。
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, String::new());
                row
            })
            .collect();
        Self { cells, cols }
    }

    /// 指定座標にテキストを書き込む（必要に応じてグリッドを拡張）
    pub fn set(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if row >= self.cells.len() {
            self.cells.resize_with(row + 1, || vec![String::new(); self.cols]);
        }
        if col >= self.cols {
            self.cols = col + 1;
            for r in &mut self.cells {
                r.resize(self.cols, String::new());
            }
        }
        self.cells[row][col] = text.into();
    }

    /// 行を参照する
    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    /// Markdownテーブルとして出力
    ///
    /// 先頭行を見出しとして扱い、その直後に区切り行を挿入する。
    /// 列幅は表示幅（全角は2）で揃える。セル内の改行は空白に置き換える。
    pub fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<(), MenuGridError> {
        if self.cells.is_empty() || self.cols == 0 {
            return Ok(());
        }

        // 1. 列幅の計算
        let col_widths = self.calculate_column_widths();

        // 2. ヘッダー区切り行
        let separator = Self::generate_separator(&col_widths);

        // 3. 各行の出力
        for (row_idx, row) in self.cells.iter().enumerate() {
            write!(writer, "|")?;

            for (col_idx, cell) in row.iter().enumerate() {
                let content = Self::single_line(cell);
                let width = content.width();

                write!(writer, " {}", content)?;
                for _ in width..col_widths[col_idx] {
                    write!(writer, " ")?;
                }
                write!(writer, " |")?;
            }

            writeln!(writer)?;

            if row_idx == 0 {
                writeln!(writer, "{}", separator)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// 列幅を計算（内部ヘルパー）
    ///
    /// 最小幅は3文字（区切り行の最小幅）。
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths = vec![3; self.cols];

        for row in &self.cells {
            for (col_idx, cell) in row.iter().enumerate() {
                widths[col_idx] = widths[col_idx].max(Self::single_line(cell).width());
            }
        }

        widths
    }

    /// ヘッダー区切り行を生成（内部ヘルパー）
    fn generate_separator(col_widths: &[usize]) -> String {
        let mut out = String::from("|");
        for &width in col_widths {
            out.push_str(&"-".repeat(width + 2));
            out.push('|');
        }
        out
    }

    fn single_line(cell: &str) -> String {
        cell.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl GridSource for WeekGrid {
    fn cell(&self, row: usize, col: usize) -> String {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or_default()
    }

    fn rows(&self) -> usize {
        self.cells.len()
    }

    fn cols(&self) -> usize {
        self.cols
    }
}
