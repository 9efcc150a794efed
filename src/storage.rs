use crate::models::ReadingPoint;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save readings as CSV with header; timestamps in RFC 3339.
pub fn save_csv<P: AsRef<Path>>(points: &[ReadingPoint], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("timestamp", "value", "rate"))?;
    for p in points {
        wtr.serialize((p.timestamp.to_rfc3339(), p.value, p.rate))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save readings as pretty JSON array (timestamps in epoch milliseconds).
pub fn save_json<P: AsRef<Path>>(points: &[ReadingPoint], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(points)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Load readings previously written by [`save_json`].
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<ReadingPoint>> {
    let f = File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(f))?)
}
