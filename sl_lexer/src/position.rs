/**
 * Position representation in a source text.
 */

/// Where lexing continues: a byte offset plus the bookkeeping needed for
/// rows and columns. `row_start` is the offset of the current row's first
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub pos: usize,
    pub row: usize,
    pub row_start: usize,
}

impl Cursor {
    pub fn new(first_row: usize) -> Self {
        Self{ pos: 0, row: first_row, row_start: 0 }
    }

    pub fn column(&self) -> usize {
        self.pos - self.row_start
    }

    /// Steps over `consumed`, the bytes starting at `pos`. Every '\n' in them
    /// starts a new row.
    pub fn advance(&mut self, consumed: &[u8]) {
        for (i, b) in consumed.iter().enumerate() {
            if *b == b'\n' {
                self.row += 1;
                self.row_start = self.pos + i + 1;
            }
        }
        self.pos += consumed.len();
    }
}
