//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//!
//! - ソース形式: 週グリッドから読み取ったままの [`MenuItem`] / [`DayRecord`]
//! - 表示形式: ビュー生成後の [`DisplayContext`] / [`AllergenTableRow`]
//!
//! どの型も構築後に変更されない前提で扱う。

use chrono::NaiveDate;
use serde::Serialize;

use crate::allergen::{parse_allergen_list, AllergenSet};
use crate::api::ViewKind;
use crate::parser::week::{date_banner, parse_iso};

/// 1品のソース形式
///
/// `allergens` はセルに書かれたままのカンマ・スラッシュ区切り文字列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// 料理名
    pub title: String,

    /// 説明文（複数行は空白1つで連結済み）
    pub description: String,

    /// アレルゲン文字列
    pub allergens: String,
}

impl MenuItem {
    /// 新しい品目を生成
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        allergens: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            allergens: allergens.into(),
        }
    }

    /// タイトルとアレルゲンのみの品目を生成
    pub fn titled(title: impl Into<String>, allergens: impl Into<String>) -> Self {
        Self::new(title, "", allergens)
    }

    /// すべての欄が空かどうか
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.description.trim().is_empty()
            && self.allergens.trim().is_empty()
    }

    /// アレルゲン文字列を正規分類の集合に解決する
    pub fn resolved_allergens(&self) -> AllergenSet {
        parse_allergen_list(&self.allergens)
    }
}

/// 1日分の見出し情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayHeader {
    /// 曜日名（グリッドが空なら Monday〜Sunday の既定値）
    pub weekday: String,

    /// ISO形式の日付。解析できなかった場合は元のテキスト
    pub date_iso: String,

    /// 表示用ラベル（例: `Thursday – 18/09/2025`）
    pub date_label: String,

    /// その日のテーマ
    pub theme: String,
}

impl DayHeader {
    /// 日付が解析できていれば`NaiveDate`を返す
    pub fn date(&self) -> Option<NaiveDate> {
        parse_iso(&self.date_iso)
    }

    /// アレルゲン表の見出しに使う日付（例: `18 September 2025`）
    ///
    /// 日付が解析できない場合は`date_iso`をそのまま返す。
    pub fn banner(&self) -> String {
        date_banner(&self.date_iso)
    }

    /// ファイル名用の日付部分（`DD-MM-YYYY`）
    ///
    /// 日付が解析できない場合は、パス区切りと空白を`-`に置き換えた元テキスト。
    pub fn file_slug(&self) -> String {
        match self.date() {
            Some(d) => d.format("%d-%m-%Y").to_string(),
            None => self
                .date_iso
                .chars()
                .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '-' } else { c })
                .collect(),
        }
    }
}

/// 昼食のソース
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LunchSource {
    /// 前菜（常に2品）
    pub starters: [MenuItem; 2],

    /// ベジタリアンのメイン
    pub veg_main: MenuItem,

    /// 肉料理のメイン
    pub meat_main: MenuItem,

    /// ヴィーガンのメイン
    pub vegan_main: MenuItem,

    /// 付け合わせ（タイトルは整形済みのリスト）
    pub optional_sides: MenuItem,

    /// デザート（常に2品）
    pub desserts: [MenuItem; 2],
}

/// 夕食のソース
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupperSource {
    /// スープ（タイトルは固定）
    pub starter: MenuItem,

    /// サンドイッチ盛り合わせ（アレルゲンは固定）
    pub selection: MenuItem,

    /// 本日のスペシャル
    pub specials: MenuItem,

    /// ヴィーガンのスペシャル
    pub vegan_special: MenuItem,

    /// デザート（常に2品）
    pub desserts: [MenuItem; 2],
}

/// 1日分のソースメニュー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMenus {
    pub lunch: LunchSource,
    pub supper: SupperSource,
}

/// 1日分の解析結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub header: DayHeader,
    pub source: SourceMenus,
}

/// 解析済みの1週間
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Week {
    /// 曜日列の順に並んだ7日分
    pub days: Vec<DayRecord>,
}

impl Week {
    /// インデックス（0始まり）で日を引く
    pub fn day(&self, index: usize) -> Option<&DayRecord> {
        self.days.get(index)
    }

    /// 日付で日を引く
    pub fn day_by_date(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.iter().find(|d| d.header.date() == Some(date))
    }

    /// 曜日名で日を引く（大文字小文字は無視）
    pub fn day_by_weekday(&self, weekday: &str) -> Option<&DayRecord> {
        let wanted = weekday.trim();
        self.days
            .iter()
            .find(|d| d.header.weekday.trim().eq_ignore_ascii_case(wanted))
    }
}

/// 表示用テキスト
///
/// `highlighted`はテンプレート側で強調表示（黄色マーカー等）するための印。
/// 書式そのものは持たない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayText {
    pub text: String,
    pub highlighted: bool,
}

impl DisplayText {
    /// 強調なしのテキスト
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }

    /// 強調付きのテキスト
    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// 1品の表示形式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub title: DisplayText,
    pub description: DisplayText,

    /// 表示用アレルゲン文字列
    pub allergens: String,
}

impl DisplayItem {
    /// タイトルとアレルゲンのみの表示品目
    pub fn new(title: DisplayText, allergens: impl Into<String>) -> Self {
        Self {
            title,
            description: DisplayText::default(),
            allergens: allergens.into(),
        }
    }

    /// 説明文を付ける
    pub fn with_description(mut self, description: DisplayText) -> Self {
        self.description = description;
        self
    }
}

/// 昼食の表示形式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayLunch {
    pub starters: [DisplayItem; 2],
    pub mains: [DisplayItem; 2],
    pub optional_sides: DisplayItem,
    pub desserts: [DisplayItem; 2],
}

/// 夕食の表示形式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplaySupper {
    pub starter: DisplayItem,
    pub selection: DisplayItem,
    pub specials: DisplayItem,
    pub desserts: [DisplayItem; 2],
}

/// テンプレートにそのまま渡せる1日分のビュー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayContext {
    pub kind: ViewKind,
    pub header: DayHeader,
    pub lunch: DisplayLunch,
    pub supper: DisplaySupper,
}

/// アレルゲン表の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllergenTableRow {
    /// 料理名、または見出し文字列
    pub label: String,

    /// チェックを付ける分類（見出し行では常に空）
    pub categories: AllergenSet,

    /// 見出し行かどうか
    pub is_heading: bool,
}

impl AllergenTableRow {
    /// 見出し行を生成
    pub fn heading(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            categories: AllergenSet::new(),
            is_heading: true,
        }
    }

    /// データ行を生成
    pub fn item(label: impl Into<String>, categories: AllergenSet) -> Self {
        Self {
            label: label.into(),
            categories,
            is_heading: false,
        }
    }
}
