//! Page label counters.
//!
//! A [`PageLabel`] is the value printed on a page when numbering: either a
//! plain integer or a spreadsheet-style letter run. Advancing is explicit;
//! rendering one page never moves the counter on its own.

use std::fmt;

/// One page label value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLabel {
    /// Plain numeric label
    Numeric(i64),
    /// Letter label advanced like a base-26 odometer: `a`, `b`, .. `z`,
    /// `aa`, `ab`, ..
    Lettered(String),
}

impl PageLabel {
    /// The label that follows this one.
    pub fn next(&self) -> PageLabel {
        match self {
            PageLabel::Numeric(n) => PageLabel::Numeric(n + 1),
            PageLabel::Lettered(s) => PageLabel::Lettered(next_letters(s)),
        }
    }
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Numeric(n) => write!(f, "{}", n),
            PageLabel::Lettered(s) => f.write_str(s),
        }
    }
}

/// Increment the rightmost letter, carrying left; a full carry prepends a
/// fresh digit (`z` -> `aa`). Case is preserved per position.
fn next_letters(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            'z' => *c = 'a',
            'Z' => *c = 'A',
            'a'..='y' | 'A'..='Y' => {
                *c = (*c as u8 + 1) as char;
                return chars.into_iter().collect();
            },
            _ => return chars.into_iter().collect(),
        }
    }
    let first = if chars.first() == Some(&'A') { 'A' } else { 'a' };
    let mut out = String::with_capacity(chars.len() + 1);
    out.push(first);
    out.extend(chars);
    out
}
