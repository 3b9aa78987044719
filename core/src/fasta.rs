//! FASTA-style sequence output.
//!
//! Each chromosome is rendered as a record: a `>` header line followed by its classification
//! symbols wrapped at [`LINE_WIDTH`] per line.

use std::io;

/// The number of symbols per sequence line.
pub const LINE_WIDTH: usize = 60;

/// A writer of line-wrapped sequence records.
///
/// The writer performs a single forward pass over the symbols of one chromosome, holding no state
/// beyond the current line length.
#[derive(Debug)]
pub struct Writer<W> {
    inner: W,
    line_len: usize,
}

impl<W> Writer<W>
where
    W: io::Write,
{
    /// Creates a sequence writer.
    pub fn new(inner: W) -> Self {
        Self { inner, line_len: 0 }
    }

    /// Writes the record header for a chromosome.
    pub fn write_header(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.inner, ">{name}")
    }

    /// Appends one symbol, breaking the line after every 60th symbol.
    pub fn write_symbol(&mut self, symbol: u8) -> io::Result<()> {
        self.inner.write_all(&[symbol])?;
        self.line_len += 1;

        if self.line_len == LINE_WIDTH {
            self.inner.write_all(b"\n")?;
            self.line_len = 0;
        }

        Ok(())
    }

    /// Flushes the final partial line, if any, and the underlying writer.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.line_len > 0 {
            self.inner.write_all(b"\n")?;
            self.line_len = 0;
        }

        self.inner.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(name: &str, symbols: usize) -> Vec<u8> {
        let mut writer = Writer::new(Vec::new());

        writer.write_header(name).unwrap();

        for _ in 0..symbols {
            writer.write_symbol(b'2').unwrap();
        }

        writer.finish().unwrap();

        writer.into_inner()
    }

    #[test]
    fn test_wraps_after_sixty_symbols() {
        let out = write("chr1", 61);

        let expected = format!(">chr1\n{}\n2\n", "2".repeat(60));

        assert_eq!(out, expected.as_bytes());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_blank_line() {
        let out = write("chr1", 120);

        let expected = format!(">chr1\n{0}\n{0}\n", "2".repeat(60));

        assert_eq!(out, expected.as_bytes());
    }

    #[test]
    fn test_empty_record_is_header_only() {
        let out = write("chr1", 0);

        assert_eq!(out, b">chr1\n");
    }

    #[test]
    fn test_line_breaks_match_symbol_count() {
        for symbols in [1, 59, 60, 61, 150] {
            let out = write("chr1", symbols);

            let breaks = out.iter().filter(|&&b| b == b'\n').count();
            let expected = 1 + (symbols + LINE_WIDTH - 1) / LINE_WIDTH;

            assert_eq!(breaks, expected, "with {symbols} symbols");
        }
    }
}
