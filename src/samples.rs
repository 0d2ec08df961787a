//! CSV loading of sample points

use crate::monotone::Point;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading a sample CSV
#[derive(Debug, Error)]
pub enum SampleError {
    /// The header lacks an `x` or `y` column
    #[error("Missing required columns: {{\"x\", \"y\"}} (found: {found:?})")]
    MissingColumns {
        /// Header fields that were present
        found: Vec<String>,
    },
    /// The file could not be opened or read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The CSV stream itself was malformed
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Samples parsed from a CSV source, in file order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Samples {
    /// Points that parsed cleanly
    pub points: Vec<Point>,
    /// Data rows dropped because `x` or `y` was not a finite number
    pub skipped: usize,
}

/// Loads samples from a CSV file with an `x`,`y` header
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Samples, SampleError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SampleError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let samples = read_samples(file)?;
    info!(path = %path.display(), rows = samples.points.len(), skipped = samples.skipped, "samples loaded");
    Ok(samples)
}

/// Reads samples from any CSV stream.
///
/// Columns are located by header name so their position and any extra columns
/// do not matter. Rows whose `x` or `y` does not parse are skipped.
pub fn read_samples<R: Read>(reader: R) -> Result<Samples, SampleError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // byte records: a row with invalid UTF-8 is skipped, not fatal
    let headers = rdr.byte_headers()?.clone();
    let col = |name: &[u8]| headers.iter().position(|h| h == name);
    let (xi, yi) = match (col(&b"x"[..]), col(&b"y"[..])) {
        (Some(xi), Some(yi)) => (xi, yi),
        _ => {
            return Err(SampleError::MissingColumns {
                found: headers.iter().map(|h| String::from_utf8_lossy(h).into_owned()).collect(),
            })
        }
    };

    let mut out = Samples::default();
    for (row, record) in rdr.byte_records().enumerate() {
        let record = record?;
        match (parse_field(record.get(xi)), parse_field(record.get(yi))) {
            (Some(x), Some(y)) => out.points.push(Point { x, y }),
            _ => {
                debug!(row = row + 1, "skipping unparseable row");
                out.skipped += 1;
            }
        }
    }
    Ok(out)
}

fn parse_field(field: Option<&[u8]>) -> Option<f64> {
    std::str::from_utf8(field?).ok()?.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_columns_by_name() {
        let data = "t,y,x\n0,1.5,2.0\n1,2.5,2.0\n";
        let s = read_samples(data.as_bytes()).unwrap();
        assert_eq!(s.points, vec![Point::new(2.0, 1.5), Point::new(2.0, 2.5)]);
        assert_eq!(s.skipped, 0);
    }

    #[test]
    fn skips_bad_rows() {
        let data = "x,y\n0,0\nfoo,1\n0,\n0,nan\n0,inf\n0,2\n3\n";
        let s = read_samples(data.as_bytes()).unwrap();
        assert_eq!(s.points, vec![Point::new(0.0, 0.0), Point::new(0.0, 2.0)]);
        assert_eq!(s.skipped, 5);
    }

    #[test]
    fn invalid_utf8_row_is_skipped() {
        let data: &[u8] = b"x,y\n0,0\n0,5\n\xff\xfe,1\n0,4\n";
        let s = read_samples(data).unwrap();
        assert_eq!(s.points, vec![Point::new(0.0, 0.0), Point::new(0.0, 5.0), Point::new(0.0, 4.0)]);
        assert_eq!(s.skipped, 1);
    }

    #[test]
    fn missing_columns_is_an_error() {
        let err = read_samples("x,z\n0,0\n".as_bytes()).unwrap_err();
        match err {
            SampleError::MissingColumns { found } => assert_eq!(found, vec!["x", "z"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, SampleError::Io { .. }));
    }
}
