//! Vegan View
//!
//! ヴィーガンメニュー固有の規則。
//!
//! ソースの入力揺れを吸収するため、料理名の回復ヒューリスティック
//! （[`recover_title_from_allergens`]、[`pick_vegan_variant`]）と、
//! 標準メニューからの説明文の借用（強調して借用元がわかるようにする）を行う。

use super::{pick_vegan_variant, recover_title_from_allergens, ViewPolicy};
use crate::text::add_suffix;
use crate::types::{DayRecord, DisplayItem, DisplayText};

/// 昼食メインの固定1品目
pub const JACKET_POTATO_TITLE: &str = "Jacket potato and toppings (Ve)";

/// 昼食の前菜（1品目はスープ、2品目は意図的に空）
pub fn starters(day: &DayRecord, policy: &ViewPolicy) -> [DisplayItem; 2] {
    let soup = &day.source.lunch.starters[0];
    [
        DisplayItem::new(
            DisplayText::plain(add_suffix(&soup.title, policy.tag)),
            policy.allergens(&soup.allergens),
        ),
        DisplayItem::default(),
    ]
}

/// 昼食のメイン2品（ジャケットポテト、ヴィーガンメインの順）
pub fn mains(day: &DayRecord, policy: &ViewPolicy) -> [DisplayItem; 2] {
    let lunch = &day.source.lunch;
    let vegan = &lunch.vegan_main;

    let (title, allergens) = recover_title_from_allergens(&vegan.title, &vegan.allergens);

    [
        DisplayItem::new(DisplayText::plain(JACKET_POTATO_TITLE), ""),
        DisplayItem::new(
            DisplayText::plain(add_suffix(&title, policy.tag)),
            policy.allergens(&allergens),
        )
        .with_description(borrowed_description(
            &vegan.description,
            &lunch.veg_main.description,
        )),
    ]
}

/// 夕食のスペシャル
///
/// 回復ヒューリスティックの後もタイトルが空なら、標準のスペシャルから
/// ヴィーガン版を探す。
pub fn specials(day: &DayRecord, policy: &ViewPolicy) -> DisplayItem {
    let supper = &day.source.supper;
    let vegan = &supper.vegan_special;
    let standard = &supper.specials;

    let (mut title, allergens) = recover_title_from_allergens(&vegan.title, &vegan.allergens);
    if title.trim().is_empty() {
        title = pick_vegan_variant(&standard.title, &standard.description);
    }

    DisplayItem::new(
        DisplayText::plain(add_suffix(&title, policy.tag)),
        policy.allergens(&allergens),
    )
    .with_description(borrowed_description(
        &vegan.description,
        &standard.description,
    ))
}

/// 自前の説明文がなければ、借用元の説明文を強調付きで使う
fn borrowed_description(own: &str, fallback: &str) -> DisplayText {
    let own = own.trim();
    if !own.is_empty() {
        return DisplayText::plain(own);
    }
    let fallback = fallback.trim();
    if fallback.is_empty() {
        DisplayText::default()
    } else {
        DisplayText::highlighted(fallback)
    }
}
