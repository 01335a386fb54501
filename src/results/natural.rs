//! Natural ("digit aware") string ordering
//!
//! `"Part 2" < "Part 10"`: runs of ASCII digits compare by numeric value, all other
//! characters compare one by one.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two strings in natural order
///
/// Numerically equal digit runs with different zero padding (`"07"` vs `"7"`) only
/// decide the order when the rest of both strings is equal; the padded one sorts later.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    let mut padding = Ordering::Equal;

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return padding,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let (l_digits, l_zeros) = digit_run(&mut left);
                let (r_digits, r_zeros) = digit_run(&mut right);

                let ordering = l_digits
                    .len()
                    .cmp(&r_digits.len())
                    .then_with(|| l_digits.cmp(&r_digits));
                if ordering != Ordering::Equal {
                    return ordering;
                }
                if padding == Ordering::Equal {
                    padding = l_zeros.cmp(&r_zeros);
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Consume a digit run, returning its significant digits and the count of leading zeros
fn digit_run(chars: &mut Peekable<Chars<'_>>) -> (String, usize) {
    let mut zeros = 0;
    let mut digits = String::new();

    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        if c == '0' && digits.is_empty() {
            zeros += 1;
        } else {
            digits.push(c);
        }
        chars.next();
    }

    (digits, zeros)
}
