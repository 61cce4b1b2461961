//! Vegan Heuristics
//!
//! 作成者の入力揺れを吸収するための文字列ヒューリスティック。
//! どちらも最初に一致したものを採用する（first-match-wins）。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{add_suffix, strip_suffixes, TAG_VEGAN};

/// 英字で始まり `(ve)` で終わる語句がアレルゲン欄にあるか
static VE_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[A-Za-z].+\(ve\)").unwrap());

/// 料理名として取り出す語句（最短一致）
static VE_PHRASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([A-Za-z].*?\(ve\))").unwrap());

/// アレルゲン欄から料理名を取り除く（後続の空白ごと）
static VE_PHRASE_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Za-z].*?\(ve\)\s*").unwrap());

/// 料理名の候補の区切り: `/`、改行、`;`、`|`、単語の `or`
static VARIANT_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:/|\n|;|\||\bor\b)\s*").unwrap());

/// アレルゲン欄に入力されてしまった料理名を取り戻す
///
/// アレルゲン欄に `(ve)` 印の付いた語句がある場合:
///
/// 1. タイトルが実質空（タグ除去後2文字未満）なら、最初の語句をタイトルにする
/// 2. タイトルの有無に関係なく、その語句をアレルゲン欄から取り除く
///
/// 印がなければ入力をそのまま返す。
///
/// # 戻り値
///
/// `(タイトル, アレルゲン)` の組
///
/// # 使用例
///
/// ```rust
/// use menugrid::views::recover_title_from_allergens;
///
/// let (title, allergens) = recover_title_from_allergens("", "Curry (Ve), Mustard");
/// assert_eq!(title, "Curry (Ve)");
/// assert_eq!(allergens, "Mustard");
/// ```
pub fn recover_title_from_allergens(title: &str, allergens: &str) -> (String, String) {
    let has_marker = allergens.to_lowercase().contains("(ve") || VE_MARKER_RE.is_match(allergens);
    if !has_marker {
        return (title.to_string(), allergens.to_string());
    }

    let mut recovered = title.to_string();
    if let Some(m) = VE_PHRASE_RE.captures(allergens).and_then(|c| c.get(1)) {
        if strip_suffixes(title).chars().count() < 2 {
            recovered = m.as_str().trim().to_string();
            tracing::debug!(title = %recovered, "recovered vegan title from allergens field");
        }
    }

    let remaining = VE_PHRASE_STRIP_RE.replace_all(allergens, "");
    let remaining = remaining
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string();

    (recovered, remaining)
}

/// 標準メニューの料理名・説明からヴィーガン版の料理名を選ぶ
///
/// タイトルと説明を連結して候補に分割し、`(ve)` または `vegan` を含む最初の候補に
/// `(Ve)` タグを付けて返す。候補がなければタイトルに `(Ve)` を付ける。
///
/// ```rust
/// use menugrid::views::pick_vegan_variant;
///
/// assert_eq!(
///     pick_vegan_variant("Beef stew / Vegetable stew (Ve)", ""),
///     "Vegetable stew (Ve)"
/// );
/// ```
pub fn pick_vegan_variant(title: &str, description: &str) -> String {
    let combined = format!("{} {}", title, description);
    let combined = combined.trim();
    if combined.is_empty() {
        return add_suffix(title, TAG_VEGAN);
    }

    let variant = VARIANT_SPLIT_RE.split(combined).find(|part| {
        let lower = part.to_lowercase();
        lower.contains("(ve)") || lower.contains("vegan")
    });

    match variant {
        Some(part) => add_suffix(&strip_suffixes(part.trim()), TAG_VEGAN),
        None => {
            tracing::debug!(title = %title, "no vegan variant found, tagging standard title");
            add_suffix(&strip_suffixes(title), TAG_VEGAN)
        }
    }
}
