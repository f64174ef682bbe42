//! Entry ordering used when laying out a new archive
//!
//! Game tools expect entries in a locale-aware "natural" order: case and
//! accents are ignored, digit runs compare by value (`file2` before
//! `file10`) and punctuation sorts before digits, which sort before letters.
//! Underscores are folded to `@` first, which moves them from the front of
//! the punctuation group to the middle of it.

use std::cmp::Ordering;

/// Primary order of ASCII punctuation, lowest first
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Collation weight of one element of a name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Weight<'a> {
    Space,
    Punctuation(usize),
    /// Digit run with leading zeros stripped, compared by length then digits
    Number(usize, &'a str),
    /// Base letter plus a rank for distinct letters sorting right after it
    Letter(char, u8),
}

fn weights(name: &str) -> Vec<Weight<'_>> {
    let mut out = Vec::with_capacity(name.len());
    let mut chars = name.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() {
            let mut end = start + 1;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + 1;
                chars.next();
            }
            let digits = name[start..end].trim_start_matches('0');
            out.push(Weight::Number(digits.len(), digits));
            continue;
        }

        let c = if c == '_' { '@' } else { c };
        if c.is_whitespace() {
            out.push(Weight::Space);
        } else if c.is_control() {
            continue;
        } else if let Some(rank) = PUNCTUATION.find(c) {
            out.push(Weight::Punctuation(rank));
        } else {
            push_letter(&mut out, c);
        }
    }

    out
}

/// Push the weights of one letter, expanding ligatures to two letters
fn push_letter(out: &mut Vec<Weight<'_>>, c: char) {
    match fold_letter(c) {
        'ß' => out.extend([Weight::Letter('s', 0), Weight::Letter('s', 0)]),
        'æ' => out.extend([Weight::Letter('a', 0), Weight::Letter('e', 0)]),
        'œ' => out.extend([Weight::Letter('o', 0), Weight::Letter('e', 0)]),
        // dotless i is its own letter between i and j
        'ı' => out.push(Weight::Letter('i', 1)),
        other => out.push(Weight::Letter(other, 0)),
    }
}

/// Case- and accent-folded form of a letter
fn fold_letter(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Compare two entry names in archive order
///
/// Names that differ only in case, accents or leading zeros compare equal,
/// so a stable sort keeps their input order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    weights(a).cmp(&weights(b))
}

/// Sort names in archive order, keeping equal names in input order
pub fn sort_names<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_names(name(a), name(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&'static str]) -> Vec<&'static str> {
        let mut names = names.to_vec();
        sort_names(&mut names, |n| *n);
        names
    }

    #[test]
    fn test_numeric_runs() {
        assert_eq!(
            sorted(&["file10.bin", "file2.bin", "file1.bin"]),
            vec!["file1.bin", "file2.bin", "file10.bin"]
        );
        assert_eq!(compare_names("a007", "a7"), Ordering::Equal);
        assert_eq!(
            compare_names("n99999999999999999999999", "n100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_case_and_accents_ignored() {
        assert_eq!(compare_names("Model.BIN", "model.bin"), Ordering::Equal);
        assert_eq!(compare_names("café", "CAFE"), Ordering::Equal);
        assert_eq!(compare_names("B", "a"), Ordering::Greater);
    }

    #[test]
    fn test_character_groups() {
        assert_eq!(compare_names(" x", "-x"), Ordering::Less);
        assert_eq!(compare_names("-x", "0x"), Ordering::Less);
        assert_eq!(compare_names("9", "a"), Ordering::Less);
        assert_eq!(compare_names("z", "ж"), Ordering::Less);
    }

    #[test]
    fn test_underscore_folds_to_at_sign() {
        // '@' ranks after '.' and '-', so "_x" follows both
        assert_eq!(
            sorted(&["_anim-ptrs.txt", "all-ptrs.txt", ".cfg", "-x"]),
            vec!["-x", ".cfg", "_anim-ptrs.txt", "all-ptrs.txt"]
        );
        assert_eq!(compare_names("a_b", "a@b"), Ordering::Equal);
        assert_eq!(compare_names("a_b", "a*b"), Ordering::Less);
        assert_eq!(compare_names("a_b", "a.b"), Ordering::Greater);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare_names("abc", "abcd"), Ordering::Less);
        assert_eq!(compare_names("", "a"), Ordering::Less);
    }

    #[test]
    fn test_stable_for_equal_names() {
        let mut items = vec![("A.bin", 1), ("a.bin", 2), ("0.bin", 3)];
        sort_names(&mut items, |item| item.0);
        assert_eq!(items, vec![("0.bin", 3), ("A.bin", 1), ("a.bin", 2)]);
    }

    #[test]
    fn test_control_characters_ignored() {
        assert_eq!(compare_names("a\u{1}b", "ab"), Ordering::Equal);
    }

    #[test]
    fn test_tab_is_whitespace() {
        assert_eq!(compare_names("a\tb", "a b"), Ordering::Equal);
        assert_eq!(compare_names("a\tb", "a-b"), Ordering::Less);
        assert_ne!(compare_names("a\tb", "ab"), Ordering::Equal);
    }

    #[test]
    fn test_ligatures_expand() {
        assert_eq!(compare_names("ß.bin", "ss.bin"), Ordering::Equal);
        assert_eq!(compare_names("Æ.bin", "ae.bin"), Ordering::Equal);
        assert_eq!(compare_names("œuvre", "oeuvre"), Ordering::Equal);
        assert_eq!(
            sorted(&["z.bin", "ß.bin", "æ.bin", "r.bin"]),
            vec!["æ.bin", "r.bin", "ß.bin", "z.bin"]
        );
    }

    #[test]
    fn test_dotless_i_follows_i() {
        assert_eq!(
            sorted(&["j.bin", "ı.bin", "i.bin", "iz.bin"]),
            vec!["i.bin", "iz.bin", "ı.bin", "j.bin"]
        );
    }
}
