//! Locale-aware name ordering.
//!
//! Three levels, compared in order: base letters (case and accents folded),
//! accents (unaccented first), case (lowercase first). A final byte
//! comparison keeps the order total.

use core::cmp::Ordering;

/// Compares two product names the way a browser's `localeCompare` would for
/// Latin-script catalogs.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = keys(a).map(|k| k.base).cmp(keys(b).map(|k| k.base));
    primary
        .then_with(|| keys(a).map(|k| k.accented).cmp(keys(b).map(|k| k.accented)))
        .then_with(|| keys(a).map(|k| k.upper).cmp(keys(b).map(|k| k.upper)))
        .then_with(|| a.cmp(b))
}

#[derive(Clone, Copy)]
struct Key {
    base: char,
    accented: bool,
    upper: bool,
}

fn keys(s: &str) -> impl Iterator<Item = Key> + '_ {
    s.chars().flat_map(|c| {
        let upper = c.is_uppercase();
        c.to_lowercase().map(move |lower| {
            let (base, accented) = fold_accent(lower);
            Key {
                base,
                accented,
                upper,
            }
        })
    })
}

fn fold_accent(c: char) -> (char, bool) {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return (c, false),
    };
    (base, true)
}
