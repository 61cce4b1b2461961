//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use std::io::Write;

use crate::allergen::AllergenCategory;
use crate::builder::DayMenus;
use crate::error::MenuGridError;
use crate::grid::WeekGrid;
use crate::types::{AllergenTableRow, DisplayContext, DisplayItem, DisplayText};

/// アレルゲン表のチェック印
const TICK: &str = "✔";

/// Markdown形式のフォーマッター
///
/// 標準メニュー、ヴィーガンメニュー、アレルゲン表の順に出力する。
/// 強調付きのテキストは `**` で囲む。
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(
        &self,
        menus: &DayMenus,
        columns: &[AllergenCategory],
        writer: &mut W,
    ) -> Result<(), MenuGridError> {
        let header = &menus.header;
        let title = if header.date_label.trim().is_empty() {
            header.weekday.as_str()
        } else {
            header.date_label.as_str()
        };
        writeln!(writer, "# {}", title)?;
        if !header.theme.trim().is_empty() {
            writeln!(writer, "\n_{}_", header.theme.trim())?;
        }

        writeln!(writer, "\n## Standard menu\n")?;
        Self::render_view(&menus.standard, writer)?;

        writeln!(writer, "\n## Vegan menu\n")?;
        Self::render_view(&menus.vegan, writer)?;

        writeln!(writer, "\n## Allergens — {}\n", header.banner())?;
        allergen_grid(&menus.allergens, columns).render_markdown(writer)?;

        writer.flush()?;
        Ok(())
    }

    /// 1つのビューを昼食・夕食の箇条書きで出力（内部ヘルパー）
    fn render_view<W: Write>(view: &DisplayContext, writer: &mut W) -> Result<(), MenuGridError> {
        let lunch = &view.lunch;
        let supper = &view.supper;

        writeln!(writer, "### Lunch\n")?;
        let lunch_items = lunch
            .starters
            .iter()
            .chain(&lunch.mains)
            .chain(std::iter::once(&lunch.optional_sides))
            .chain(&lunch.desserts);
        for item in lunch_items {
            Self::render_item(item, writer)?;
        }

        writeln!(writer, "\n### Supper\n")?;
        let supper_items = [&supper.starter, &supper.selection, &supper.specials]
            .into_iter()
            .chain(&supper.desserts);
        for item in supper_items {
            Self::render_item(item, writer)?;
        }

        Ok(())
    }

    /// 1品を1行で出力（タイトルも説明もない品目は出力しない）
    fn render_item<W: Write>(item: &DisplayItem, writer: &mut W) -> Result<(), MenuGridError> {
        if item.title.is_empty() && item.description.is_empty() {
            return Ok(());
        }

        write!(writer, "- {}", emphasis(&item.title))?;
        if !item.description.is_empty() {
            write!(writer, ": {}", emphasis(&item.description))?;
        }
        if !item.allergens.trim().is_empty() {
            write!(writer, " _({})_", item.allergens.trim())?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

/// 強調付きテキストを `**` で囲む
fn emphasis(text: &DisplayText) -> String {
    let trimmed = text.text.trim();
    if text.highlighted && !trimmed.is_empty() {
        format!("**{}**", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// アレルゲン表をグリッドに展開する
///
/// 先頭行が見出し（`Dish` と分類名）、以降が1行ずつの料理。
/// 見出し行のラベルは太字にしてチェック欄を空ける。
fn allergen_grid(rows: &[AllergenTableRow], columns: &[AllergenCategory]) -> WeekGrid {
    let mut cells = Vec::with_capacity(rows.len() + 1);

    let mut header = vec!["Dish".to_string()];
    header.extend(columns.iter().map(|c| c.label().to_string()));
    cells.push(header);

    for row in rows {
        let mut line = Vec::with_capacity(columns.len() + 1);
        if row.is_heading {
            line.push(format!("**{}**", row.label));
            line.extend(columns.iter().map(|_| String::new()));
        } else {
            line.push(row.label.clone());
            line.extend(columns.iter().map(|c| {
                if row.categories.contains(c) {
                    TICK.to_string()
                } else {
                    String::new()
                }
            }));
        }
        cells.push(line);
    }

    WeekGrid::from_rows(cells)
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, menus: &DayMenus, writer: &mut W) -> Result<(), MenuGridError> {
        serde_json::to_writer_pretty(&mut *writer, menus)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// CSV形式のフォーマッター
///
/// アレルゲン表のみを出力する。
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        rows: &[AllergenTableRow],
        columns: &[AllergenCategory],
        writer: &mut W,
    ) -> Result<(), MenuGridError> {
        // ヘッダー行
        write!(writer, "Dish,Heading")?;
        for category in columns {
            write!(writer, ",{}", escape_csv(category.label()))?;
        }
        writeln!(writer)?;

        for row in rows {
            write!(
                writer,
                "{},{}",
                escape_csv(&row.label),
                u8::from(row.is_heading)
            )?;
            for category in columns {
                write!(writer, ",{}", u8::from(row.categories.contains(category)))?;
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// カンマ、ダブルクォート、改行を含む場合はダブルクォートで囲む
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allergen::AllergenSet;
    use crate::api::ViewKind;
    use crate::assembler::assemble_allergen_rows;
    use crate::views::build_view;
    use crate::views::fixtures::sample_day;

    fn sample_menus() -> DayMenus {
        let day = sample_day();
        let standard = build_view(&day, ViewKind::Standard);
        let vegan = build_view(&day, ViewKind::Vegan);
        let allergens = assemble_allergen_rows(&day, &standard, &vegan);
        DayMenus {
            header: day.header.clone(),
            standard,
            vegan,
            allergens,
        }
    }

    fn render_markdown(menus: &DayMenus, columns: &[AllergenCategory]) -> String {
        let mut buf = Vec::new();
        MarkdownFormatter.render(menus, columns, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_markdown_sections() {
        let out = render_markdown(&sample_menus(), &AllergenCategory::ALL);

        assert!(out.starts_with("# Monday – 15/09/2025\n\n_Harvest_\n"));
        assert!(out.contains("\n## Standard menu\n"));
        assert!(out.contains("\n## Vegan menu\n"));
        assert!(out.contains("\n## Allergens — 15 September 2025\n"));
    }

    #[test]
    fn test_markdown_items_and_highlight() {
        let out = render_markdown(&sample_menus(), &AllergenCategory::ALL);

        assert!(out.contains("- **Chef's choice soup** _(Celery, Milk)_\n"));
        assert!(out.contains("- Mushroom risotto (V): With parmesan crisp _(Milk, Sulphites)_\n"));
        // 借用した説明文は強調される
        assert!(out.contains("- Chickpea tagine (Ve): **With parmesan crisp** _(Celery)_\n"));
    }

    #[test]
    fn test_markdown_allergen_table() {
        let menus = sample_menus();
        let columns = [AllergenCategory::Celery, AllergenCategory::Milk];
        let out = render_markdown(&menus, &columns);

        let table: Vec<&str> = out
            .lines()
            .skip_while(|l| !l.starts_with("| Dish"))
            .collect();
        assert!(table[0].contains("| Celery | Milk |"));
        assert!(table[1].starts_with("|---"));
        assert!(table[2].starts_with("| **— Standard —**"));
        assert!(table[3].starts_with("| Chef's choice soup "));
        assert!(table[3].ends_with("| ✔      | ✔    |"));
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        JsonFormatter.render(&sample_menus(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["header"]["weekday"], "Monday");
        assert_eq!(value["standard"]["kind"], "Standard");
        assert_eq!(value["vegan"]["lunch"]["mains"][0]["title"]["text"], "Jacket potato and toppings (Ve)");
        assert_eq!(value["allergens"][0]["is_heading"], true);
        assert_eq!(value["allergens"][1]["categories"][0], "Celery");
    }

    #[test]
    fn test_csv_output() {
        let mut categories = AllergenSet::new();
        categories.insert(AllergenCategory::Milk);
        let rows = vec![
            AllergenTableRow::heading("— Standard —"),
            AllergenTableRow::item("Peas, Carrots", categories),
        ];
        let columns = [AllergenCategory::Celery, AllergenCategory::Milk];

        let mut buf = Vec::new();
        CsvFormatter.render(&rows, &columns, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        assert_eq!(
            csv,
            "Dish,Heading,Celery,Milk\n— Standard —,1,0,0\n\"Peas, Carrots\",0,0,1\n"
        );
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }
}
