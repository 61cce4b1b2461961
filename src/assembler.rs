//! Allergen Table Assembler
//!
//! 標準・ヴィーガンの両ビューとソースデータから、アレルゲン表の行を組み立てる。
//!
//! 行の並びは固定:
//!
//! 1. `— Standard —` 見出し
//! 2. 昼食の前菜2品、ベジタリアン・肉料理のメイン、付け合わせ、デザート1品目
//! 3. 夕食のスープ `(V)`、スペシャル、デザート1品目
//! 4. `— Vegan —` 見出し
//! 5. 昼食の前菜、メイン2品、付け合わせ、デザート1品目
//! 6. 夕食のスープ `(Ve)`（1行のみ）、スペシャル、デザート1品目
//!
//! ヴィーガン側のチェック欄は正規化してから乳・卵を除いた集合（[`parse_scrubbed`]）を使う。
//! メニュー表示用の文字列スクラブより厳密な版。
//! タイトルが空のデータ行は出力しない（見出し行は常に出力する）。

use crate::allergen::{
    parse_allergen_list, parse_scrubbed, AllergenSet, JACKET_POTATO_ALLERGENS,
    VEGAN_DESSERT_ALLERGENS,
};
use crate::parser::week::SUPPER_SOUP_TITLE;
use crate::text::{add_suffix, is_chefs_choice_soup, strip_suffixes, TAG_VEGAN, TAG_VEGETARIAN};
use crate::types::{AllergenTableRow, DayRecord, DisplayContext};
use crate::views::{recover_title_from_allergens, ViewPolicy};

/// 標準セクションの見出し
pub const STANDARD_HEADING: &str = "— Standard —";

/// ヴィーガンセクションの見出し
pub const VEGAN_HEADING: &str = "— Vegan —";

/// 行の追加時に空タイトルを落とすための収集器
#[derive(Default)]
struct RowCollector {
    rows: Vec<AllergenTableRow>,
}

impl RowCollector {
    fn heading(&mut self, label: &str) {
        self.rows.push(AllergenTableRow::heading(label));
    }

    fn item(&mut self, label: &str, categories: AllergenSet) {
        // タグだけの行（例: 空のデザートに付いた `(V)`）も空として扱う
        if strip_suffixes(label).trim().is_empty() {
            return;
        }
        self.rows.push(AllergenTableRow::item(label.trim(), categories));
    }
}

/// 1日分のアレルゲン表の行を組み立てる
///
/// # 引数
///
/// * `day` - ソースデータ
/// * `standard` - 標準メニューのビュー
/// * `vegan` - ヴィーガンメニューのビュー
///
/// # 戻り値
///
/// 表の上から順に並んだ行
pub fn assemble_allergen_rows(
    day: &DayRecord,
    standard: &DisplayContext,
    vegan: &DisplayContext,
) -> Vec<AllergenTableRow> {
    let lunch = &day.source.lunch;
    let supper = &day.source.supper;
    let mut rows = RowCollector::default();

    rows.heading(STANDARD_HEADING);
    for starter in &lunch.starters {
        rows.item(&starter.title, starter.resolved_allergens());
    }
    rows.item(&lunch.veg_main.title, lunch.veg_main.resolved_allergens());
    rows.item(&lunch.meat_main.title, lunch.meat_main.resolved_allergens());
    rows.item(&lunch.optional_sides.title, lunch.optional_sides.resolved_allergens());

    let dessert = &standard.lunch.desserts[0];
    rows.item(&dessert.title.text, parse_allergen_list(&dessert.allergens));
    rows.item(
        &add_suffix(SUPPER_SOUP_TITLE, TAG_VEGETARIAN),
        supper.starter.resolved_allergens(),
    );
    let special = &standard.supper.specials;
    rows.item(&special.title.text, parse_allergen_list(&special.allergens));
    let dessert = &standard.supper.desserts[0];
    rows.item(&dessert.title.text, parse_allergen_list(&dessert.allergens));

    rows.heading(VEGAN_HEADING);

    // 昼食の前菜がChef's choice soupなら、夕食のスープ行にまとめる
    let lunch_soup = &lunch.starters[0];
    let merge_soup = is_chefs_choice_soup(&lunch_soup.title);
    if !merge_soup {
        rows.item(
            &add_suffix(&lunch_soup.title, TAG_VEGAN),
            parse_scrubbed(&lunch_soup.allergens),
        );
    }

    for main in &vegan.lunch.mains {
        let categories = if main.title.text.to_lowercase().contains("jacket") {
            JACKET_POTATO_ALLERGENS.into_iter().collect()
        } else {
            parse_scrubbed(&main.allergens)
        };
        rows.item(&main.title.text, categories);
    }

    rows.item(
        &lunch.optional_sides.title,
        parse_scrubbed(&lunch.optional_sides.allergens),
    );

    let policy = ViewPolicy::for_kind(vegan.kind);
    rows.item(
        &policy.dessert_title(&lunch.desserts[0].title),
        parse_allergen_list(VEGAN_DESSERT_ALLERGENS),
    );

    let mut soup = parse_scrubbed(&supper.starter.allergens);
    if merge_soup {
        soup.extend(parse_scrubbed(&lunch_soup.allergens));
    }
    rows.item(&add_suffix(SUPPER_SOUP_TITLE, TAG_VEGAN), soup);

    let (title, allergens) =
        recover_title_from_allergens(&supper.vegan_special.title, &supper.vegan_special.allergens);
    rows.item(&add_suffix(&title, TAG_VEGAN), parse_scrubbed(&allergens));

    rows.item(
        &policy.dessert_title(&supper.desserts[0].title),
        parse_allergen_list(VEGAN_DESSERT_ALLERGENS),
    );

    rows.rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allergen::AllergenCategory::{self, *};
    use crate::api::ViewKind;
    use crate::types::MenuItem;
    use crate::views::build_view;
    use crate::views::fixtures::sample_day;

    fn assemble(day: &DayRecord) -> Vec<AllergenTableRow> {
        let standard = build_view(day, ViewKind::Standard);
        let vegan = build_view(day, ViewKind::Vegan);
        assemble_allergen_rows(day, &standard, &vegan)
    }

    fn set(categories: &[AllergenCategory]) -> AllergenSet {
        categories.iter().copied().collect()
    }

    fn labels(rows: &[AllergenTableRow]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_row_order() {
        let rows = assemble(&sample_day());

        assert_eq!(
            labels(&rows),
            vec![
                "— Standard —",
                "Chef's choice soup",
                "Prawn cocktail",
                "Mushroom risotto",
                "Roast chicken (V)",
                "Peas, Carrots",
                "Apple crumble (V)",
                "Chef's choice soup (V)",
                "Beef stew / Vegetable stew",
                "Sticky toffee pudding (V)",
                "— Vegan —",
                "Jacket potato and toppings (Ve)",
                "Chickpea tagine (Ve)",
                "Peas, Carrots",
                "Apple crumble (Ve)",
                "Chef's choice soup (Ve)",
                "Sticky toffee pudding (Ve)",
            ]
        );
        assert!(rows[0].is_heading);
        assert!(rows[10].is_heading);
        assert!(rows.iter().filter(|r| r.is_heading).all(|r| r.categories.is_empty()));
    }

    #[test]
    fn test_standard_rows_categories() {
        let rows = assemble(&sample_day());

        assert_eq!(rows[1].categories, set(&[Celery, Milk]));
        assert_eq!(rows[2].categories, set(&[Crustaceans, Eggs]));
        assert_eq!(rows[7].categories, set(&[Celery, Milk]));
        // 標準のデザートはソースのアレルゲンをそのまま使う
        assert_eq!(rows[9].categories, set(&[Milk, Fish]));
    }

    #[test]
    fn test_single_vegan_soup_line() {
        let rows = assemble(&sample_day());
        let soups = rows
            .iter()
            .filter(|r| r.label == "Chef's choice soup (Ve)")
            .count();
        assert_eq!(soups, 1);
    }

    #[test]
    fn test_merged_soup_line_unions_allergens() {
        let mut day = sample_day();
        day.source.lunch.starters[0] = MenuItem::titled("Chef’s Choice Soup", "Celery, Mustard, Milk");
        day.source.supper.starter.allergens = "Celery, Soya".to_string();

        let rows = assemble(&day);
        let soups: Vec<_> = rows
            .iter()
            .filter(|r| r.label.starts_with("Chef") && r.label.ends_with("(Ve)"))
            .collect();
        assert_eq!(soups.len(), 1);
        assert_eq!(soups[0].categories, set(&[Celery, Mustards, Soybeans]));
    }

    #[test]
    fn test_lunch_starter_row_when_not_soup() {
        let mut day = sample_day();
        day.source.lunch.starters[0] = MenuItem::titled("Tomato bruschetta (V)", "Gluten, Milk");

        let rows = assemble(&day);
        let vegan_start = rows.iter().position(|r| r.label == VEGAN_HEADING).unwrap();
        assert_eq!(rows[vegan_start + 1].label, "Tomato bruschetta (Ve)");
        assert_eq!(rows[vegan_start + 1].categories, set(&[CerealsWithGluten]));
        assert_eq!(
            rows.iter().filter(|r| r.label == "Chef's choice soup (Ve)").count(),
            1
        );
    }

    #[test]
    fn test_vegan_desserts_fixed_categories() {
        let mut day = sample_day();
        day.source.lunch.desserts[0].allergens = "Milk, Fish".to_string();

        let rows = assemble(&day);
        let fixed = set(&[CerealsWithGluten, NutsFromTrees, Soybeans, Sulphur]);
        for label in ["Apple crumble (Ve)", "Sticky toffee pudding (Ve)"] {
            let row = rows.iter().find(|r| r.label == label).unwrap();
            assert_eq!(row.categories, fixed);
        }
    }

    #[test]
    fn test_jacket_potato_fixed_categories() {
        let rows = assemble(&sample_day());
        let jacket = rows
            .iter()
            .find(|r| r.label == "Jacket potato and toppings (Ve)")
            .unwrap();
        assert_eq!(
            jacket.categories,
            set(&[Celery, Sulphur, CerealsWithGluten, Mustards])
        );
    }

    #[test]
    fn test_vegan_rows_scrubbed() {
        let rows = assemble(&sample_day());
        let vegan_start = rows.iter().position(|r| r.label == VEGAN_HEADING).unwrap();

        for row in &rows[vegan_start..] {
            assert!(!row.categories.contains(&Milk), "{}", row.label);
            assert!(!row.categories.contains(&Eggs), "{}", row.label);
        }
    }

    #[test]
    fn test_vegan_special_recovered_title() {
        let mut day = sample_day();
        day.source.supper.vegan_special = MenuItem::titled("", "Curry (Ve), Mustard");

        let rows = assemble(&day);
        let row = rows.iter().find(|r| r.label == "Curry (Ve)").unwrap();
        assert_eq!(row.categories, set(&[Mustards]));
    }

    #[test]
    fn test_empty_titles_dropped() {
        let rows = assemble(&DayRecord::default());
        assert_eq!(
            labels(&rows),
            vec![
                STANDARD_HEADING,
                "Chef's choice soup (V)",
                VEGAN_HEADING,
                "Jacket potato and toppings (Ve)",
                "Chef's choice soup (Ve)",
            ]
        );
    }
}
