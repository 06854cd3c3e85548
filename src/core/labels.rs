//! Spreadsheet-style row labels and well label parsing.
//!
//! Rows use bijective base-26: `A`=1 .. `Z`=26, `AA`=27, and so on. There is
//! no digit for zero, so every positive integer has exactly one label.

const ALPHABET_LEN: usize = 26;

/// Label for the one-based row number `value`. Returns an empty string for 0.
pub fn row_label(value: usize) -> String {
    let mut letters = Vec::new();
    let mut value = value;
    while value > 0 {
        let remainder = (value - 1) % ALPHABET_LEN;
        letters.push(b'A' + remainder as u8);
        value = (value - 1) / ALPHABET_LEN;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Labels for rows `1..=rows`, in order.
pub fn row_labels(rows: usize) -> Vec<String> {
    (1..=rows).map(row_label).collect()
}

/// One-based row number for a label, or `None` if it is not made of
/// uppercase ASCII letters.
pub fn parse_row_label(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    label.bytes().try_fold(0usize, |acc, byte| {
        if !byte.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(ALPHABET_LEN)?
            .checked_add(usize::from(byte - b'A') + 1)
    })
}

/// Label of the well at zero-based `(row, column)`, e.g. `(7, 11)` -> `H12`.
pub fn well_label(row: u32, column: u32) -> String {
    compose_well_label(&row_label(row as usize + 1), column)
}

/// Joins an already generated row label with the zero-based `column`.
pub fn compose_well_label(row_label: &str, column: u32) -> String {
    format!("{}{}", row_label, u64::from(column) + 1)
}

/// Zero-based `(row, column)` for a well label such as `H12`.
pub fn parse_well_label(label: &str) -> Option<(u32, u32)> {
    let split = label.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = label.split_at(split);

    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let row = parse_row_label(letters)?;
    let column: u32 = digits.parse().ok()?;
    let row = u32::try_from(row - 1).ok()?;
    Some((row, column - 1))
}
