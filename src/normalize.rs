//! Filename normalization: Cyrillic transliteration and character sanitizing.
//!
//! Names produced here contain only ASCII letters, ASCII digits and `_`,
//! which keeps them portable across filesystems and shells.
//!
//! # Examples
//!
//! ```
//! use sortfolder::normalize::normalize;
//!
//! assert_eq!(normalize("Привіт світ"), "Privit_svit");
//! assert_eq!(normalize("report 2024"), "report_2024");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

/// Lowercase Cyrillic letters, index-aligned with [`LATIN`].
const CYRILLIC: [char; 37] = [
    'а', 'б', 'в', 'г', 'д', 'е', 'ё', 'ж', 'з', 'и', 'й', 'к', 'л', 'м', 'н', 'о', 'п', 'р', 'с',
    'т', 'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ', 'ы', 'ь', 'э', 'ю', 'я', 'є', 'і', 'ї', 'ґ',
];

const LATIN: [&str; 37] = [
    "a", "b", "v", "g", "d", "e", "e", "j", "z", "i", "j", "k", "l", "m", "n", "o", "p", "r", "s",
    "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "y", "", "e", "yu", "ya", "je", "i", "ji", "g",
];

/// Code point to replacement, for both letter cases. Built once, read-only afterwards.
static TRANSLATION: LazyLock<HashMap<char, String>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(CYRILLIC.len() * 2);
    for (cyr, lat) in CYRILLIC.iter().zip(LATIN) {
        table.insert(*cyr, lat.to_string());
        for upper in cyr.to_uppercase() {
            table.insert(upper, lat.to_uppercase());
        }
    }
    table
});

/// Transliterates Cyrillic letters and replaces every other non-word
/// character with `_`, one for one.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match TRANSLATION.get(&ch) {
            Some(latin) => out.push_str(latin),
            None if is_word_char(ch) => out.push(ch),
            None => out.push('_'),
        }
    }
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterates_lowercase() {
        assert_eq!(normalize("привет"), "privet");
        assert_eq!(normalize("щука"), "schuka");
        assert_eq!(normalize("їжак"), "jijak");
        assert_eq!(normalize("ґанок"), "ganok");
    }

    #[test]
    fn test_transliterates_uppercase_fully() {
        assert_eq!(normalize("Щ"), "SCH");
        assert_eq!(normalize("Юля"), "YUlya");
        assert_eq!(normalize("ЄВРО"), "JEVRO");
    }

    #[test]
    fn test_signs_become_empty() {
        assert_eq!(normalize("объём"), "obem");
        assert_eq!(normalize("ОБЪЁМ"), "OBEM");
        assert_eq!(normalize("сіль"), "sil");
    }

    #[test]
    fn test_table_maps_yo_to_e() {
        assert_eq!(normalize("report_отчёт"), "report_otchet");
    }

    #[test]
    fn test_non_word_characters_become_underscores() {
        assert_eq!(normalize("my file (1)"), "my_file__1_");
        assert_eq!(normalize("a.b-c"), "a_b_c");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_non_ascii_letters_outside_table_are_replaced() {
        // One underscore per char, not per byte
        assert_eq!(normalize("café"), "caf_");
        assert_eq!(normalize("日本"), "__");
    }

    #[test]
    fn test_latin_and_digits_pass_through() {
        assert_eq!(normalize("Holiday_2024"), "Holiday_2024");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Звіт за 2024 рік.final",
            "ЩАСТЯ і радість!",
            "plain_name",
            "пробел  двойной",
            "💾 backup",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_output_is_ascii_word_only() {
        let samples = ["Ёлка-2", "Ґудзик Ї", "tab\there", "ß∂ƒ", "ЪЬъь"];
        for sample in samples {
            let out = normalize(sample);
            assert!(
                out.chars().all(is_word_char),
                "{sample:?} normalized to {out:?}"
            );
        }
    }
}
