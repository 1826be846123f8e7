//! A1 notation helpers.

/// Convert a 1-based column number to its letters (1 -> "A", 27 -> "AA").
///
/// Panics on 0.
pub fn column_letters(mut column: usize) -> String {
    assert!(column > 0, "columns are 1-based");

    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        column = (column - 1) / 26;
    }
    letters.into_iter().rev().collect()
}

/// Quote a worksheet title for use in a range.
///
/// Titles are always quoted, embedded single quotes are doubled.
pub fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Range covering a whole worksheet.
pub fn sheet_range(title: &str) -> String {
    quote_sheet(title)
}

/// Range covering a single column (`'Sheet'!B:B`).
pub fn column_range(title: &str, column: usize) -> String {
    let letters = column_letters(column);
    format!("{}!{letters}:{letters}", quote_sheet(title))
}

/// Range covering a single cell (`'Sheet'!B2`).
pub fn cell_range(title: &str, row: usize, column: usize) -> String {
    format!("{}!{}{row}", quote_sheet(title), column_letters(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!("A", column_letters(1));
        assert_eq!("Z", column_letters(26));
        assert_eq!("AA", column_letters(27));
        assert_eq!("AZ", column_letters(52));
        assert_eq!("BA", column_letters(53));
        assert_eq!("ZZ", column_letters(702));
        assert_eq!("AAA", column_letters(703));
    }

    #[test]
    #[should_panic]
    fn letters_zero() {
        column_letters(0);
    }

    #[test]
    fn quoting() {
        assert_eq!("'Sheet1'", quote_sheet("Sheet1"));
        assert_eq!("'It''s mine'", quote_sheet("It's mine"));
    }

    #[test]
    fn ranges() {
        assert_eq!("'Feuille 1'", sheet_range("Feuille 1"));
        assert_eq!("'Feuille 1'!A:A", column_range("Feuille 1", 1));
        assert_eq!("'Feuille 1'!B2", cell_range("Feuille 1", 2, 2));
        assert_eq!("'X'!AB10", cell_range("X", 10, 28));
    }
}
