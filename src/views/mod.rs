//! Views Module
//!
//! 1日分の [`DayRecord`] から、テンプレートに渡す [`DisplayContext`] を生成する。
//!
//! 標準メニューとヴィーガンメニューは同じ形をしているため、差分を
//! [`ViewPolicy`] という小さな値オブジェクトにまとめ、共通部分（デザート、付け合わせ、
//! 夕食のスープ、サンドイッチ）は1つの実装で扱う。料理名の決め方が大きく異なる
//! 前菜・主菜・夕食スペシャルだけを [`standard`] / [`vegan`] に分けている。
//!
//! どの関数も純粋関数で、入力を変更しない。

mod heuristics;
pub mod standard;
pub mod vegan;

pub use heuristics::{pick_vegan_variant, recover_title_from_allergens};

use crate::allergen::{remove_non_vegan_tokens, VEGAN_DESSERT_ALLERGENS};
use crate::api::ViewKind;
use crate::parser::week::{SUPPER_ICE_CREAM_TITLE, SUPPER_SOUP_TITLE};
use crate::text::{
    add_suffix, is_chefs_choice_soup, sentence_case, strip_suffixes, TAG_VEGAN, TAG_VEGETARIAN,
};
use crate::types::{
    DayRecord, DisplayContext, DisplayItem, DisplayLunch, DisplaySupper, DisplayText, MenuItem,
};

/// 表示用アレルゲン文字列の加工方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergenScrub {
    /// ソースの文字列をそのまま使う
    Keep,
    /// 乳・卵のトークンだけを取り除く（文字列レベル）
    NonVeganTokens,
}

/// ビューごとの差分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPolicy {
    pub kind: ViewKind,

    /// 料理名に付けるタグ（`(V)` / `(Ve)`）
    pub tag: &'static str,

    /// 前菜のうち「Chef's choice soup」を強調するか
    pub highlight_soup_starters: bool,

    /// 表示用アレルゲンの加工方法
    pub scrub: AllergenScrub,

    /// デザート欄の固定アレルゲン（`None` ならソースの値）
    pub dessert_allergens: Option<&'static str>,

    /// 2品目のデザートの固定タイトル（`None` ならソースの値）
    pub dessert_placeholder: Option<&'static str>,

    /// 1品目のデザートを強調するか
    pub highlight_desserts: bool,

    /// 夕食のサンドイッチ欄のタイトル
    pub selection_title: &'static str,
}

/// ヴィーガンメニューのサンドイッチ欄
pub const VEGAN_SELECTION_TITLE: &str = "Assorted sandwiches (Ve)";

impl ViewPolicy {
    pub const STANDARD: ViewPolicy = ViewPolicy {
        kind: ViewKind::Standard,
        tag: TAG_VEGETARIAN,
        highlight_soup_starters: true,
        scrub: AllergenScrub::Keep,
        dessert_allergens: None,
        dessert_placeholder: None,
        highlight_desserts: false,
        selection_title: "",
    };

    pub const VEGAN: ViewPolicy = ViewPolicy {
        kind: ViewKind::Vegan,
        tag: TAG_VEGAN,
        highlight_soup_starters: false,
        scrub: AllergenScrub::NonVeganTokens,
        dessert_allergens: Some(VEGAN_DESSERT_ALLERGENS),
        dessert_placeholder: Some(SUPPER_ICE_CREAM_TITLE),
        highlight_desserts: true,
        selection_title: VEGAN_SELECTION_TITLE,
    };

    /// ビューの種類に対応するポリシー
    pub fn for_kind(kind: ViewKind) -> &'static ViewPolicy {
        match kind {
            ViewKind::Standard => &Self::STANDARD,
            ViewKind::Vegan => &Self::VEGAN,
        }
    }

    /// 表示用アレルゲン文字列
    pub fn allergens(&self, raw: &str) -> String {
        match self.scrub {
            AllergenScrub::Keep => raw.to_string(),
            AllergenScrub::NonVeganTokens => remove_non_vegan_tokens(raw),
        }
    }

    /// 前菜のタイトル（スープの強調規則を適用）
    pub fn starter_title(&self, title: impl Into<String>) -> DisplayText {
        let title = title.into();
        let highlighted = self.highlight_soup_starters && is_chefs_choice_soup(&title);
        DisplayText {
            text: title,
            highlighted,
        }
    }

    /// デザートのタイトル（`Apple crumble (V)` の形）
    pub fn dessert_title(&self, title: &str) -> String {
        add_suffix(&sentence_case(&strip_suffixes(title)), self.tag)
    }

    /// デザート2品
    ///
    /// 1品目はタイトルを整えてタグを付ける。2品目は固定タイトルがあればそれを使い、
    /// 強調しない。
    pub fn desserts(&self, source: &[MenuItem; 2]) -> [DisplayItem; 2] {
        let allergens = |item: &MenuItem| {
            self.dessert_allergens
                .map(str::to_string)
                .unwrap_or_else(|| item.allergens.clone())
        };

        let first = DisplayText {
            text: self.dessert_title(&source[0].title),
            highlighted: self.highlight_desserts,
        };
        let second = DisplayText::plain(
            self.dessert_placeholder
                .map(str::to_string)
                .unwrap_or_else(|| source[1].title.clone()),
        );

        [
            DisplayItem::new(first, allergens(&source[0])),
            DisplayItem::new(second, allergens(&source[1])),
        ]
    }

    /// 付け合わせ（タイトルはソースのまま）
    pub fn optional_sides(&self, source: &MenuItem) -> DisplayItem {
        DisplayItem::new(
            DisplayText::plain(source.title.clone()),
            self.allergens(&source.allergens),
        )
    }

    /// 夕食のスープ
    ///
    /// アレルゲンは昼食の1品目の前菜から毎回計算し直す。
    pub fn supper_starter(&self, day: &DayRecord) -> DisplayItem {
        let title = add_suffix(SUPPER_SOUP_TITLE, self.tag);
        let highlighted = is_chefs_choice_soup(&title);
        DisplayItem::new(
            DisplayText { text: title, highlighted },
            self.allergens(&day.source.lunch.starters[0].allergens),
        )
    }

    /// 夕食のサンドイッチ欄（アレルゲンは固定値）
    pub fn selection(&self, day: &DayRecord) -> DisplayItem {
        DisplayItem::new(
            DisplayText::plain(self.selection_title),
            day.source.supper.selection.allergens.clone(),
        )
    }
}

/// 1日分のビューを生成する
///
/// # 引数
///
/// * `day` - 週パーサーが生成した1日分のレコード
/// * `kind` - 生成するビュー
///
/// # 使用例
///
/// ```rust
/// use menugrid::views::build_view;
/// use menugrid::{DayRecord, ViewKind};
///
/// let day = DayRecord::default();
/// let vegan = build_view(&day, ViewKind::Vegan);
/// assert_eq!(vegan.lunch.mains[0].title.text, "Jacket potato and toppings (Ve)");
/// ```
pub fn build_view(day: &DayRecord, kind: ViewKind) -> DisplayContext {
    let policy = ViewPolicy::for_kind(kind);
    let lunch = &day.source.lunch;
    let supper = &day.source.supper;

    let (starters, mains, specials) = match kind {
        ViewKind::Standard => (
            standard::starters(day, policy),
            standard::mains(day, policy),
            standard::specials(day, policy),
        ),
        ViewKind::Vegan => (
            vegan::starters(day, policy),
            vegan::mains(day, policy),
            vegan::specials(day, policy),
        ),
    };

    DisplayContext {
        kind,
        header: day.header.clone(),
        lunch: DisplayLunch {
            starters,
            mains,
            optional_sides: policy.optional_sides(&lunch.optional_sides),
            desserts: policy.desserts(&lunch.desserts),
        },
        supper: DisplaySupper {
            starter: policy.supper_starter(day),
            selection: policy.selection(day),
            specials,
            desserts: policy.desserts(&supper.desserts),
        },
    }
}
