//! Display collaborator for progress rows.

use alloc::string::String;

/// Receives display rows as playback reaches them.
pub trait RowSink {
    /// Called once before the first row.
    fn header(&mut self, track_count: usize);

    /// One row per grid unit, one cell per audicle, in time order.
    fn row(&mut self, cells: &[String]);
}

/// Discards every row.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RowSink for NullSink {
    fn header(&mut self, _track_count: usize) {}

    fn row(&mut self, _cells: &[String]) {}
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn header(&mut self, track_count: usize) {
        (**self).header(track_count);
    }

    fn row(&mut self, cells: &[String]) {
        (**self).row(cells);
    }
}
