//! Export of per-voxel viewing statistics for seeded voxels.

use std::io::{self, Write};

use crate::core::GridIndex;

/// Statistics of one seeded voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewingRecord {
    /// Voxel key.
    pub index: GridIndex,
    /// Salience score.
    pub interestingness: f32,
    /// Salient observation count.
    pub interesting_weight: f32,
    /// Shortest range the voxel was seen from.
    pub viewing_dist: f32,
}

/// Destination for viewing diagnostics.
pub trait DiagnosticsSink {
    /// Accept one record.
    fn record(&mut self, record: &ViewingRecord) -> io::Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl DiagnosticsSink for Vec<ViewingRecord> {
    fn record(&mut self, record: &ViewingRecord) -> io::Result<()> {
        self.push(*record);
        Ok(())
    }
}

/// Writes three space-separated value streams: interestingness, observation
/// count and viewing distance.
pub struct WriterSink<W: Write> {
    interestingness: W,
    counts: W,
    viewing_dist: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap three writers.
    pub fn new(interestingness: W, counts: W, viewing_dist: W) -> Self {
        Self {
            interestingness,
            counts,
            viewing_dist,
        }
    }

    /// Unwrap into `(interestingness, counts, viewing_dist)`.
    pub fn into_inner(self) -> (W, W, W) {
        (self.interestingness, self.counts, self.viewing_dist)
    }
}

impl<W: Write> DiagnosticsSink for WriterSink<W> {
    fn record(&mut self, record: &ViewingRecord) -> io::Result<()> {
        write!(self.interestingness, "{} ", record.interestingness)?;
        write!(self.counts, "{} ", record.interesting_weight)?;
        write!(self.viewing_dist, "{} ", record.viewing_dist)?;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.interestingness.flush()?;
        self.counts.flush()?;
        self.viewing_dist.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink_streams() {
        let mut sink = WriterSink::new(Vec::new(), Vec::new(), Vec::new());
        for (i, v) in [0.5f32, 0.25].iter().enumerate() {
            sink.record(&ViewingRecord {
                index: GridIndex::new(i as i32, 0, 0),
                interestingness: *v,
                interesting_weight: 2.0,
                viewing_dist: 1.5,
            })
            .unwrap();
        }
        sink.finish().unwrap();

        let (a, b, c) = sink.into_inner();
        assert_eq!(String::from_utf8(a).unwrap(), "0.5 0.25 ");
        assert_eq!(String::from_utf8(b).unwrap(), "2 2 ");
        assert_eq!(String::from_utf8(c).unwrap(), "1.5 1.5 ");
    }
}
