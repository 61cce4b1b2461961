//! Cell Parser
//!
//! 週グリッドの1セルを「タイトル / 説明 / アレルゲン」に分割する。
//!
//! 作成者は1つのセルに料理名・説明・アレルゲンを改行まちまちで詰め込むため、
//! 既知のアレルゲン語が現れる位置を境界として扱う。境界は
//! 「アレルゲン語から文字列末尾まで改行を含まない最初の位置」、
//! つまり最終行に現れる最初のアレルゲン語になる。
//!
//! タイトル自体にアレルゲン語を含む料理（`Milk pudding` など）が
//! 1行だけで書かれている場合、セル全体がアレルゲンとして扱われる。
//! この挙動は既存データとの互換のため維持している。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MenuItem;

/// アレルゲン末尾の検出
///
/// `.` は改行にマッチせず `$` は入力末尾のみにマッチするので、
/// 最終行にあるアレルゲン語から末尾までが取り出される。
static ALLERGEN_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:Milk|Egg|Soya|Gluten|Nuts|Peanuts|Sesame|Mustard|Celery|Sulphites|Fish|Crustaceans|Molluscs)\b.*$",
    )
    .unwrap()
});

/// 本文中の2個以上の空白・タブ（改行とみなす）
static WIDE_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// カンマ前後の空白
static COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());

/// セル文字列を品目に分割する
///
/// # 引数
///
/// * `raw` - セルのテキスト（改行は `\n` / `\r\n` / `\r` のいずれでもよい）
///
/// # 戻り値
///
/// タイトル・説明・アレルゲンに分割した品目。空セルは空の品目になる。
///
/// # 使用例
///
/// ```rust
/// use menugrid::parser::parse_cell;
///
/// let item = parse_cell("Fish pie\nWith parsley sauce\nFish, Milk, Gluten");
/// assert_eq!(item.title, "Fish pie");
/// assert_eq!(item.description, "With parsley sauce");
/// assert_eq!(item.allergens, "Fish, Milk, Gluten");
/// ```
pub fn parse_cell(raw: &str) -> MenuItem {
    let raw = raw.replace('\r', "\n");
    let raw = raw.trim();

    let (body, allergens) = match ALLERGEN_TAIL_RE.find(raw) {
        Some(m) => (raw[..m.start()].trim(), normalise_allergens(&raw[m.start()..])),
        None => (raw, String::new()),
    };

    let body = WIDE_GAP_RE.replace_all(body, "\n");
    let mut lines = body.split('\n').map(str::trim).filter(|l| !l.is_empty());

    let title = lines.next().unwrap_or_default().to_string();
    let description = lines.collect::<Vec<_>>().join(" ");

    MenuItem {
        title,
        description,
        allergens,
    }
}

/// アレルゲン文字列のカンマ区切りを `", "` に揃え、両端の余分なカンマを落とす
fn normalise_allergens(tail: &str) -> String {
    let tail = tail.trim();
    if tail.is_empty() {
        return String::new();
    }
    COMMA_RE
        .replace_all(tail, ", ")
        .trim_matches(|c| c == ' ' || c == ',')
        .to_string()
}
