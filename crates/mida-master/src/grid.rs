//! Text progress grid.

use std::io::{self, Write};

use mida_engine::RowSink;

/// Prints display rows as a grid: a header naming each audicle, then one
/// line per grid unit with every cell right-aligned in three columns.
///
/// ```text
/// A1 A2
/// C4~E4 *| <
///   - *| <
/// ```
pub struct GridPrinter<W: Write> {
    out: W,
    /// First write error; later rows are skipped.
    error: Option<io::Error>,
}

impl<W: Write> GridPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush and return the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn attempt(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_none() {
            if let Err(err) = write(&mut self.out) {
                self.error = Some(err);
            }
        }
    }
}

impl<W: Write> RowSink for GridPrinter<W> {
    fn header(&mut self, track_count: usize) {
        self.attempt(|out| {
            for track in 1..=track_count {
                write!(out, "A{} ", track)?;
            }
            writeln!(out)
        });
    }

    fn row(&mut self, cells: &[String]) {
        self.attempt(|out| {
            for cell in cells {
                write!(out, "{:>3}", cell)?;
            }
            writeln!(out, " <")?;
            out.flush()
        });
    }
}
