//! Utilities for A1-style column letters and cell references.

/// Convert column letters like "A" or "AB" into a 0-indexed column.
///
/// Returns `None` if the input contains no letters or anything other than
/// ASCII letters (surrounding whitespace and `$` markers are ignored).
pub fn column_index(letters: &str) -> Option<u32> {
    let mut col: u32 = 0;
    let mut saw_col = false;

    for ch in letters.trim().chars() {
        if ch == '$' {
            continue;
        }
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let upper = ch.to_ascii_uppercase();
        col = col
            .checked_mul(26)?
            .checked_add(upper as u32 - 'A' as u32 + 1)?;
        saw_col = true;
    }

    if !saw_col {
        return None;
    }

    Some(col - 1)
}

/// Lenient column offset for a window's starting column.
///
/// Non-letter characters are skipped and a missing or empty start column
/// means column A, so this never fails.
pub fn column_offset(letters: Option<&str>) -> u32 {
    let mut col: u32 = 0;
    for ch in letters.unwrap_or_default().chars() {
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            col = col
                .saturating_mul(26)
                .saturating_add(upper as u32 - 'A' as u32 + 1);
        }
    }
    col.saturating_sub(1)
}

/// Convert a 0-indexed column into its letters ("A", "Z", "AA", ...).
pub fn column_letters(index: u32) -> String {
    let mut n = u64::from(index) + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, so the sum stays within ASCII uppercase
        out.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(upper as u32 - 'A' as u32 + 1)?;
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((col - 1, row - 1))
}

/// Parse a cell range like "A1:B10" or "A1" into (start_row, start_col, end_row, end_col).
///
/// A leading sheet name (`Sheet1!A1:B10`) is ignored.
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    let range = range.rsplit_once('!').map_or(range, |(_, r)| r);
    if let Some((start, end)) = range.split_once(':') {
        let (start_col, start_row) = parse_cell_ref(start)?;
        let (end_col, end_row) = parse_cell_ref(end)?;
        Some((start_row, start_col, end_row, end_col))
    } else {
        let (start_col, start_row) = parse_cell_ref(range)?;
        Some((start_row, start_col, start_row, start_col))
    }
}

/// Build an A1 range string like `Sheet1!B3:F20`.
///
/// Missing bounds are left empty, which the data source reads as
/// "to the edge of the sheet".
pub fn a1_range(
    sheet_name: &str,
    column_start: Option<&str>,
    row_start: Option<u32>,
    column_end: Option<&str>,
    row_end: Option<u32>,
) -> String {
    let fmt_row = |r: Option<u32>| r.map(|r| r.to_string()).unwrap_or_default();
    format!(
        "{sheet_name}!{}{}:{}{}",
        column_start.unwrap_or_default(),
        fmt_row(row_start),
        column_end.unwrap_or_default(),
        fmt_row(row_end),
    )
}
