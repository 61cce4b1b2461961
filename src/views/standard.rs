//! Standard View
//!
//! 標準メニュー固有の規則。
//!
//! - ベジタリアンのメインに `(V)` を付け、肉料理はタグを外すだけ
//! - 前菜はソースのまま（Chef's choice soupのみ強調）
//! - 夕食スペシャルはタグを外すだけ

use super::ViewPolicy;
use crate::text::{add_suffix, strip_suffixes};
use crate::types::{DayRecord, DisplayItem, DisplayText};

/// 昼食の前菜2品
pub fn starters(day: &DayRecord, policy: &ViewPolicy) -> [DisplayItem; 2] {
    day.source.lunch.starters.clone().map(|item| {
        DisplayItem::new(policy.starter_title(item.title), item.allergens)
    })
}

/// 昼食のメイン2品（ベジタリアン、肉料理の順）
pub fn mains(day: &DayRecord, policy: &ViewPolicy) -> [DisplayItem; 2] {
    let lunch = &day.source.lunch;
    let veg = &lunch.veg_main;
    let meat = &lunch.meat_main;

    [
        DisplayItem::new(
            DisplayText::plain(add_suffix(&veg.title, policy.tag)),
            veg.allergens.clone(),
        )
        .with_description(DisplayText::plain(veg.description.clone())),
        DisplayItem::new(
            DisplayText::plain(strip_suffixes(&meat.title)),
            meat.allergens.clone(),
        )
        .with_description(DisplayText::plain(meat.description.clone())),
    ]
}

/// 夕食のスペシャル
pub fn specials(day: &DayRecord, _policy: &ViewPolicy) -> DisplayItem {
    let special = &day.source.supper.specials;
    DisplayItem::new(
        DisplayText::plain(strip_suffixes(&special.title)),
        special.allergens.clone(),
    )
    .with_description(DisplayText::plain(special.description.clone()))
}
