use std::cmp::Ordering;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Text(String),
    // Digit run without leading zeros; compared by length first, then lexically.
    Number { len: usize, digits: String },
}

/// Splits a string into alternating text and number parts.
///
/// The key always starts and ends with a (possibly empty) text part, so two keys have the
/// same kind of part at every position and numbers are only ever compared with numbers.
fn natural_key(s: &str) -> Vec<KeyPart> {
    let mut key = Vec::new();
    let mut text = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            let mut run = String::from(c);
            while let Some(&next) = chars.peek() {
                if !next.is_ascii_digit() {
                    break;
                }
                run.push(next);
                chars.next();
            }
            key.push(KeyPart::Text(std::mem::take(&mut text)));
            let digits = run.trim_start_matches('0').to_string();
            key.push(KeyPart::Number {
                len: digits.len(),
                digits,
            });
        } else {
            text.push(c);
        }
    }
    key.push(KeyPart::Text(text));
    key
}

/// Compares two strings the way humans expect, with digit runs compared as integers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Sorts strings in natural order. Equal keys (e.g. `file01` and `file1`) keep their order.
pub fn sort_naturally<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by_cached_key(|item| natural_key(item.as_ref()));
}

/// Sorts paths in natural order of their full textual form.
pub fn sort_paths_naturally<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by_cached_key(|path| natural_key(&path.as_ref().to_string_lossy()));
}
