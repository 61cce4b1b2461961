//! Allergen Vocabulary Module
//!
//! 16種類の正規アレルゲン分類と、自由記述からの正規化規則を提供するモジュール。
//!
//! 正規化の入口は2つある。
//!
//! - トークンベース: カンマ・スラッシュ区切りの文字列を分割し、同義語表で引く。
//!   未知の語は黙って捨てる。
//! - 見出しベース: アレルゲン表テンプレートの見出しセルを部分一致で分類する。
//!
//! 同義語表はプロセス起動後に一度だけ構築され、以後変更されない。

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::grid::GridSource;

/// 正規アレルゲン分類
///
/// 宣言順がアレルゲン表の標準の列順になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AllergenCategory {
    #[serde(rename = "Celery")]
    Celery,
    #[serde(rename = "Cereals with Gluten")]
    CerealsWithGluten,
    #[serde(rename = "Crustaceans")]
    Crustaceans,
    #[serde(rename = "Eggs")]
    Eggs,
    #[serde(rename = "Fish")]
    Fish,
    #[serde(rename = "Lupin")]
    Lupin,
    #[serde(rename = "Milk")]
    Milk,
    #[serde(rename = "Molluscs")]
    Molluscs,
    #[serde(rename = "Mustards")]
    Mustards,
    #[serde(rename = "Peanuts")]
    Peanuts,
    #[serde(rename = "Nuts from Trees")]
    NutsFromTrees,
    #[serde(rename = "Sesame")]
    Sesame,
    #[serde(rename = "Soybeans")]
    Soybeans,
    #[serde(rename = "Sulphur")]
    Sulphur,
    #[serde(rename = "Alcohol")]
    Alcohol,
    #[serde(rename = "Pork")]
    Pork,
}

/// 正規分類の集合（列順でソートされる）
pub type AllergenSet = BTreeSet<AllergenCategory>;

impl AllergenCategory {
    /// 全分類（標準の列順）
    pub const ALL: [AllergenCategory; 16] = [
        AllergenCategory::Celery,
        AllergenCategory::CerealsWithGluten,
        AllergenCategory::Crustaceans,
        AllergenCategory::Eggs,
        AllergenCategory::Fish,
        AllergenCategory::Lupin,
        AllergenCategory::Milk,
        AllergenCategory::Molluscs,
        AllergenCategory::Mustards,
        AllergenCategory::Peanuts,
        AllergenCategory::NutsFromTrees,
        AllergenCategory::Sesame,
        AllergenCategory::Soybeans,
        AllergenCategory::Sulphur,
        AllergenCategory::Alcohol,
        AllergenCategory::Pork,
    ];

    /// アレルゲン表の列見出しとして使う正規ラベル
    pub fn label(self) -> &'static str {
        match self {
            AllergenCategory::Celery => "Celery",
            AllergenCategory::CerealsWithGluten => "Cereals with Gluten",
            AllergenCategory::Crustaceans => "Crustaceans",
            AllergenCategory::Eggs => "Eggs",
            AllergenCategory::Fish => "Fish",
            AllergenCategory::Lupin => "Lupin",
            AllergenCategory::Milk => "Milk",
            AllergenCategory::Molluscs => "Molluscs",
            AllergenCategory::Mustards => "Mustards",
            AllergenCategory::Peanuts => "Peanuts",
            AllergenCategory::NutsFromTrees => "Nuts from Trees",
            AllergenCategory::Sesame => "Sesame",
            AllergenCategory::Soybeans => "Soybeans",
            AllergenCategory::Sulphur => "Sulphur",
            AllergenCategory::Alcohol => "Alcohol",
            AllergenCategory::Pork => "Pork",
        }
    }

    /// 1トークンを同義語表で引く（大文字小文字・前後の空白は無視）
    pub fn from_token(token: &str) -> Option<Self> {
        SYNONYMS.get(token.trim().to_lowercase().as_str()).copied()
    }

    /// ヴィーガン代替で取り除く分類（乳・卵）
    pub fn is_non_vegan(self) -> bool {
        matches!(self, AllergenCategory::Milk | AllergenCategory::Eggs)
    }
}

impl fmt::Display for AllergenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ヴィーガンデザートに常に表示するアレルゲン文字列
pub const VEGAN_DESSERT_ALLERGENS: &str = "Gluten, Nuts, Soya, Sulphites";

/// 夕食のサンドイッチ盛り合わせに常に表示するアレルゲン文字列
pub const SELECTION_ALLERGENS: &str = "Sulphites, Gluten, Mustard, Soya";

/// ジャケットポテトのアレルゲン表上の固定チェック
pub const JACKET_POTATO_ALLERGENS: [AllergenCategory; 4] = [
    AllergenCategory::Celery,
    AllergenCategory::Sulphur,
    AllergenCategory::CerealsWithGluten,
    AllergenCategory::Mustards,
];

/// 同義語表（単数形・複数形・別綴りを正規分類に寄せる）
static SYNONYMS: Lazy<HashMap<&'static str, AllergenCategory>> = Lazy::new(|| {
    use AllergenCategory::*;
    HashMap::from([
        ("celery", Celery),
        ("gluten", CerealsWithGluten),
        ("cereals with gluten", CerealsWithGluten),
        ("crustaceans", Crustaceans),
        ("egg", Eggs),
        ("eggs", Eggs),
        ("fish", Fish),
        ("lupin", Lupin),
        ("milk", Milk),
        ("mollusc", Molluscs),
        ("molluscs", Molluscs),
        ("mustard", Mustards),
        ("mustards", Mustards),
        ("peanut", Peanuts),
        ("peanuts", Peanuts),
        ("tree nuts", NutsFromTrees),
        ("nuts", NutsFromTrees),
        ("sesame", Sesame),
        ("soya", Soybeans),
        ("soy", Soybeans),
        ("soybeans", Soybeans),
        ("sulphite", Sulphur),
        ("sulphites", Sulphur),
        ("sulfur dioxide", Sulphur),
        ("sulphur dioxide", Sulphur),
        ("sulphur", Sulphur),
        ("alcohol", Alcohol),
        ("pork", Pork),
    ])
});

/// 区切り文字列をトークンに分割する（`/` は `,` と同じ扱い）
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split([',', '/']).map(str::trim).filter(|t| !t.is_empty())
}

/// カンマ・スラッシュ区切りのアレルゲン文字列を正規分類の集合に変換する
///
/// 未知のトークンは捨てる。
///
/// ```rust
/// use menugrid::allergen::{parse_allergen_list, AllergenCategory};
///
/// let set = parse_allergen_list("Fish, Milk / gluten, parsley");
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&AllergenCategory::CerealsWithGluten));
/// ```
pub fn parse_allergen_list(text: &str) -> AllergenSet {
    tokens(text).filter_map(AllergenCategory::from_token).collect()
}

/// 集合から乳・卵を取り除く（分類レベルのスクラブ）
pub fn scrub_vegan(set: &AllergenSet) -> AllergenSet {
    set.iter().copied().filter(|c| !c.is_non_vegan()).collect()
}

/// 正規化してから乳・卵を取り除く
///
/// アレルゲン表のチェック欄に使う厳密な版。
pub fn parse_scrubbed(text: &str) -> AllergenSet {
    scrub_vegan(&parse_allergen_list(text))
}

/// 表示用文字列から乳・卵のトークンだけを取り除く（文字列レベルのスクラブ）
///
/// 正規化は行わないため、未知の語や綴りはそのまま残る。
/// ヴィーガンメニュー表示用の軽量な版。
pub fn remove_non_vegan_tokens(text: &str) -> String {
    tokens(text)
        .filter(|t| !matches!(t.to_lowercase().as_str(), "milk" | "egg" | "eggs"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// アレルゲン表テンプレートの見出しセルを分類する
///
/// 部分一致の判定を上から順に試し、最初に成立したものを返す。
/// `"cereal"`+`"gluten"` のように複合条件は単純な条件より先に置く。
/// OCR由来の `doi` / `d02` は `dio` に読み替える。
///
/// ```rust
/// use menugrid::allergen::{classify_header_text, AllergenCategory};
///
/// assert_eq!(classify_header_text("Sulphur Dioxide"), Some(AllergenCategory::Sulphur));
/// assert_eq!(classify_header_text("Dish"), None);
/// ```
pub fn classify_header_text(text: &str) -> Option<AllergenCategory> {
    use AllergenCategory::*;

    let t = text.to_lowercase().replace("doi", "dio").replace("d02", "dio");
    let has = |needle: &str| t.contains(needle);

    let checks: [(bool, AllergenCategory); 16] = [
        (has("cereal") && has("gluten"), CerealsWithGluten),
        (has("celery"), Celery),
        (has("crustace"), Crustaceans),
        (has("egg"), Eggs),
        (has("fish"), Fish),
        (has("lupin"), Lupin),
        (has("milk"), Milk),
        (has("mollusc"), Molluscs),
        (has("mustard"), Mustards),
        (has("peanut"), Peanuts),
        ((has("nut") && has("tree")) || has("nuts from trees"), NutsFromTrees),
        (has("sesame"), Sesame),
        (has("soya") || has("soy"), Soybeans),
        (has("sulph") || has("sulfur"), Sulphur),
        (has("alcohol"), Alcohol),
        (has("pork"), Pork),
    ];

    checks
        .into_iter()
        .find_map(|(hit, category)| hit.then_some(category))
}

/// 見出し行と判定するのに必要な分類済みセルの最小数
const MIN_HEADER_MATCHES: usize = 6;

/// 見出し行を探す範囲（先頭からの行数）
const HEADER_SCAN_ROWS: usize = 12;

/// アレルゲン表テンプレートの見出しレイアウト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenHeaderLayout {
    /// 見出し行を含む表のインデックス（文書順、0始まり）
    table: usize,
    /// 見出し行のインデックス（0始まり）
    header_row: usize,
    /// 列インデックスと分類の対応（列順）
    columns: Vec<(usize, AllergenCategory)>,
}

impl AllergenHeaderLayout {
    /// グリッドからアレルゲン表の見出し行を探す
    ///
    /// 先頭12行のうち、6セル以上を分類できた最初の行を見出しとみなす。
    /// 見つからなければ`None`。
    pub fn locate(grid: &dyn GridSource) -> Option<Self> {
        let rows = grid.rows().min(HEADER_SCAN_ROWS);

        (0..rows).find_map(|row| {
            let columns: Vec<(usize, AllergenCategory)> = (0..grid.cols())
                .filter_map(|col| classify_header_text(grid.cell(row, col).trim()).map(|c| (col, c)))
                .collect();
            if columns.len() < MIN_HEADER_MATCHES {
                return None;
            }
            Some(Self {
                table: 0,
                header_row: row,
                columns,
            })
        })
    }

    /// 複数の表から見出し行を持つ最初の表を探す
    ///
    /// # 引数
    ///
    /// * `tables` - 文書順の表（DOCXのトップレベルの表、XLSXのシート）
    ///
    /// # 戻り値
    ///
    /// 最初に見出し行が見つかった表のレイアウト。どの表にもなければ`None`
    pub fn locate_in_tables<G: GridSource>(tables: &[G]) -> Option<Self> {
        tables.iter().enumerate().find_map(|(index, grid)| {
            Self::locate(grid).map(|layout| Self {
                table: index,
                ..layout
            })
        })
    }

    /// 見出し行を含む表のインデックス
    pub fn table(&self) -> usize {
        self.table
    }

    /// 見出し行のインデックス
    pub fn header_row(&self) -> usize {
        self.header_row
    }

    /// 見出しの列順に並べた分類（重複は最初の列のみ）
    pub fn categories(&self) -> Vec<AllergenCategory> {
        let mut out = Vec::with_capacity(self.columns.len());
        for (_, category) in &self.columns {
            if !out.contains(category) {
                out.push(*category);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WeekGrid;

    #[test]
    fn test_from_token_variants() {
        assert_eq!(AllergenCategory::from_token("Eggs"), Some(AllergenCategory::Eggs));
        assert_eq!(AllergenCategory::from_token(" egg "), Some(AllergenCategory::Eggs));
        assert_eq!(
            AllergenCategory::from_token("SULFUR DIOXIDE"),
            Some(AllergenCategory::Sulphur)
        );
        assert_eq!(AllergenCategory::from_token("parsley"), None);
    }

    #[test]
    fn test_parse_allergen_list_drops_unknown() {
        let set = parse_allergen_list("Fish, Milk, Gluten, Love");
        let expected: AllergenSet = [
            AllergenCategory::Fish,
            AllergenCategory::Milk,
            AllergenCategory::CerealsWithGluten,
        ]
        .into_iter()
        .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_parse_allergen_list_empty() {
        assert!(parse_allergen_list("").is_empty());
        assert!(parse_allergen_list(" , / ").is_empty());
    }

    #[test]
    fn test_vegan_dessert_string_resolves_to_fixed_set() {
        let set = parse_allergen_list(VEGAN_DESSERT_ALLERGENS);
        let expected: AllergenSet = [
            AllergenCategory::CerealsWithGluten,
            AllergenCategory::NutsFromTrees,
            AllergenCategory::Soybeans,
            AllergenCategory::Sulphur,
        ]
        .into_iter()
        .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_scrub_vegan() {
        let set = parse_scrubbed("Milk, Eggs, Celery / egg");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![AllergenCategory::Celery]);
    }

    #[test]
    fn test_remove_non_vegan_tokens_keeps_unknown_words() {
        assert_eq!(
            remove_non_vegan_tokens("Milk, Celery / Eggs, Sulphites, Gluten-ish"),
            "Celery, Sulphites, Gluten-ish"
        );
        assert_eq!(remove_non_vegan_tokens(""), "");
    }

    #[test]
    fn test_classify_header_text() {
        assert_eq!(
            classify_header_text("Sulphur Dioxide"),
            Some(AllergenCategory::Sulphur)
        );
        assert_eq!(
            classify_header_text("Sulphur D02 (>10mg/kg)"),
            Some(AllergenCategory::Sulphur)
        );
        assert_eq!(
            classify_header_text("Cereals containing Gluten"),
            Some(AllergenCategory::CerealsWithGluten)
        );
        assert_eq!(
            classify_header_text("Nuts (from trees)"),
            Some(AllergenCategory::NutsFromTrees)
        );
        assert_eq!(classify_header_text("Peanuts"), Some(AllergenCategory::Peanuts));
        assert_eq!(classify_header_text("Soya"), Some(AllergenCategory::Soybeans));
        assert_eq!(classify_header_text("Menu item"), None);
    }

    #[test]
    fn test_labels_are_unique_and_ordered() {
        let labels: Vec<&str> = AllergenCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[0], "Celery");
        assert_eq!(labels[15], "Pork");
        let mut sorted = AllergenCategory::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, AllergenCategory::ALL.to_vec());
    }

    #[test]
    fn test_serialize_uses_label() {
        let json = serde_json::to_string(&AllergenCategory::NutsFromTrees).unwrap();
        assert_eq!(json, "\"Nuts from Trees\"");
    }

    #[test]
    fn test_locate_header_layout() {
        let grid = WeekGrid::from_rows(vec![
            vec!["Allergens – September 2025".to_string()],
            vec![
                "Dish".to_string(),
                "Celery".to_string(),
                "Cereals containing gluten".to_string(),
                "Crustaceans".to_string(),
                "Eggs".to_string(),
                "Fish".to_string(),
                "Milk".to_string(),
                "Sulphur Dioxide".to_string(),
            ],
            vec!["".to_string(); 8],
        ]);

        let layout = AllergenHeaderLayout::locate(&grid).expect("header row");
        assert_eq!(layout.table(), 0);
        assert_eq!(layout.header_row(), 1);
        assert_eq!(layout.columns.len(), 7);
        assert_eq!(layout.columns[0], (1, AllergenCategory::Celery));
        assert_eq!(
            layout.categories().last().copied(),
            Some(AllergenCategory::Sulphur)
        );
    }

    #[test]
    fn test_locate_header_layout_not_found() {
        let grid = WeekGrid::from_rows(vec![vec!["Celery".to_string(), "Milk".to_string()]]);
        assert!(AllergenHeaderLayout::locate(&grid).is_none());
    }

    #[test]
    fn test_locate_header_layout_in_second_table() {
        let key = WeekGrid::from_rows(vec![
            vec!["Allergen key".to_string()],
            vec!["Celery, Milk".to_string()],
        ]);
        let header: Vec<String> = [
            "", "Milk", "Eggs", "Fish", "Peanuts", "Soya", "Celery", "Mustard",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let table = WeekGrid::from_rows(vec![header, vec![String::new(); 8]]);

        let layout = AllergenHeaderLayout::locate_in_tables(&[key, table]).expect("header row");
        assert_eq!(layout.table(), 1);
        assert_eq!(layout.header_row(), 0);
        assert_eq!(
            layout.categories(),
            vec![
                AllergenCategory::Milk,
                AllergenCategory::Eggs,
                AllergenCategory::Fish,
                AllergenCategory::Peanuts,
                AllergenCategory::Soybeans,
                AllergenCategory::Celery,
                AllergenCategory::Mustards,
            ]
        );
    }

    #[test]
    fn test_locate_in_tables_none() {
        let tables = vec![
            WeekGrid::from_rows(vec![vec!["Notes".to_string()]]),
            WeekGrid::from_rows(vec![vec!["Celery".to_string(), "Milk".to_string()]]),
        ];
        assert!(AllergenHeaderLayout::locate_in_tables(&tables).is_none());
    }
}
