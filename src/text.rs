//! Text Normalizer Module
//!
//! メニュー表の自由記述テキストを整形する純粋関数群。
//! どの関数も失敗せず、不正な入力に対しては空文字列または入力そのものを返す。

use once_cell::sync::Lazy;
use regex::Regex;

/// 標準メニュー（ベジタリアン）を示すタグ
pub const TAG_VEGETARIAN: &str = "(V)";

/// ヴィーガンメニューを示すタグ
pub const TAG_VEGAN: &str = "(Ve)";

/// 末尾の `(V)` / `(Ve)` タグ（大文字小文字を区別する）
static SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\((?:Ve|V)\)\s*$").unwrap());

/// 付け合わせリストの区切り: カンマ、スラッシュ、タブ、2個以上の空白、改行
static SIDES_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",|/|\t+|\s{2,}|\n+").unwrap());

/// 最初の英字を大文字に、それ以降をすべて小文字にする
///
/// 先頭の英字以外の文字（数字や記号）はそのまま残す。
/// 空白のみの入力はそのまま返す。
///
/// # 使用例
///
/// ```rust
/// use menugrid::text::sentence_case;
///
/// assert_eq!(sentence_case("BAKED apple crumble"), "Baked apple crumble");
/// assert_eq!(sentence_case("  3 bean CHILLI"), "3 Bean chilli");
/// ```
pub fn sentence_case(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return s.to_string();
    }

    match trimmed.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((idx, first)) => {
            let rest = &trimmed[idx + first.len_utf8()..];
            let mut out = String::with_capacity(trimmed.len());
            out.push_str(&trimmed[..idx]);
            out.extend(first.to_uppercase());
            out.push_str(&rest.to_lowercase());
            out
        }
        None => trimmed.to_string(),
    }
}

/// 末尾の `(V)` / `(Ve)` タグを1つ取り除き、前後の空白を削る
pub fn strip_suffixes(s: &str) -> String {
    SUFFIX_RE.replace(s, "").trim().to_string()
}

/// 既存のタグを取り除いてから、空白1つを挟んで `tag` を付ける
///
/// 本体が空の場合はタグのみを返す。
pub fn add_suffix(s: &str, tag: &str) -> String {
    format!("{} {}", strip_suffixes(s), tag).trim().to_string()
}

/// 週グリッドの「Optional Sides」欄を `A, B, C` 形式に整える
///
/// カンマ、スラッシュ、タブ、2個以上の空白、改行を区切りとして扱う。各項目から先頭・末尾の
/// 箇条書き記号やダッシュ、末尾のピリオドを取り除き、大文字小文字を
/// 無視して重複を除く（最初に現れた表記と順序を保持）。
///
/// ```rust
/// use menugrid::text::normalise_sides;
///
/// assert_eq!(normalise_sides("Peas, Carrots, peas, Beans"), "Peas, Carrots, Beans");
/// ```
pub fn normalise_sides(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let raw = text.replace('\r', "\n");
    let mut seen = Vec::<String>::new();
    let mut items = Vec::<String>::new();

    for part in SIDES_SEPARATOR_RE.split(&raw) {
        let item = part
            .trim_matches(|c: char| c == ' ' || c == '-' || c == '–' || c == '•')
            .trim_end_matches('.')
            .trim();
        if item.is_empty() {
            continue;
        }
        let key = item.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            items.push(item.to_string());
        }
    }

    items.join(", ")
}

/// タイトルが「Chef's choice soup」系かどうか
///
/// 大文字小文字を無視し、`chef` `choice` `soup` の3語をすべて含むかで判定する。
/// 所有格のアポストロフィ（`'` / `’`）の違いは無視する。
pub fn is_chefs_choice_soup(title: &str) -> bool {
    let s = title.to_lowercase().replace('’', "'");
    s.contains("chef") && s.contains("choice") && s.contains("soup")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("BAKED apple crumble"), "Baked apple crumble");
        assert_eq!(sentence_case("sticky TOFFEE pudding"), "Sticky toffee pudding");
        assert_eq!(sentence_case("'eton' MESS"), "'Eton' mess");
    }

    #[test]
    fn test_sentence_case_degenerate_input() {
        assert_eq!(sentence_case(""), "");
        assert_eq!(sentence_case("   "), "   ");
        assert_eq!(sentence_case("123 - !"), "123 - !");
    }

    #[test]
    fn test_strip_suffixes() {
        assert_eq!(strip_suffixes("Vegetable lasagne (V)"), "Vegetable lasagne");
        assert_eq!(strip_suffixes("Lentil curry (Ve)  "), "Lentil curry");
        assert_eq!(strip_suffixes("Lentil curry"), "Lentil curry");
        // 末尾以外のタグは残す
        assert_eq!(strip_suffixes("Pie (V) with mash"), "Pie (V) with mash");
        // 大文字小文字は区別する
        assert_eq!(strip_suffixes("Stew (ve)"), "Stew (ve)");
    }

    #[test]
    fn test_add_suffix_replaces_existing_tag() {
        assert_eq!(add_suffix("Lentil curry (V)", TAG_VEGAN), "Lentil curry (Ve)");
        assert_eq!(add_suffix("Lentil curry", TAG_VEGETARIAN), "Lentil curry (V)");
        assert_eq!(add_suffix("", TAG_VEGAN), "(Ve)");
    }

    #[test]
    fn test_normalise_sides_dedup_keeps_first_casing() {
        assert_eq!(
            normalise_sides("Peas, Carrots, peas, Beans"),
            "Peas, Carrots, Beans"
        );
    }

    #[test]
    fn test_normalise_sides_mixed_separators() {
        let raw = "• Chips.\n- New potatoes / Garden peas\tColeslaw   Side salad";
        assert_eq!(
            normalise_sides(raw),
            "Chips, New potatoes, Garden peas, Coleslaw, Side salad"
        );
    }

    #[test]
    fn test_normalise_sides_empty() {
        assert_eq!(normalise_sides(""), "");
        assert_eq!(normalise_sides(" , / -- "), "");
    }

    #[test]
    fn test_is_chefs_choice_soup() {
        assert!(is_chefs_choice_soup("Chef's choice soup"));
        assert!(is_chefs_choice_soup("CHEF’S CHOICE SOUP (V)"));
        assert!(!is_chefs_choice_soup("Tomato soup"));
        assert!(!is_chefs_choice_soup("Chef's choice"));
    }

    #[allow(unused_doc_comments)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// タグの付与と除去は本体のみを残す
            #[test]
            fn test_suffix_round_trip(s in "[A-Za-z][A-Za-z ()]{0,30}") {
                let tagged = add_suffix(&s, TAG_VEGAN);
                prop_assert_eq!(strip_suffixes(&tagged), strip_suffixes(&s).trim().to_string());
            }

            /// 整形結果に大文字小文字違いの重複が残らない
            #[test]
            fn test_normalise_sides_has_no_case_duplicates(
                items in proptest::collection::vec("[A-Za-z]{1,8}", 0..10)
            ) {
                let joined = items.join(", ");
                let out = normalise_sides(&joined);
                let parts: Vec<String> = if out.is_empty() {
                    Vec::new()
                } else {
                    out.split(", ").map(|p| p.to_lowercase()).collect()
                };
                let mut dedup = parts.clone();
                dedup.sort();
                dedup.dedup();
                prop_assert_eq!(parts.len(), dedup.len());
            }
        }
    }
}
