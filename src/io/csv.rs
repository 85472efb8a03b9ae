/*!
# Saving Traces to CSV

Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::trace::Trace;

/**
Writes a trace as CSV to any writer.

The header row is `"draw"` followed by the parameter names. Every following
row holds the draw index and the parameter values of one record.
*/
pub fn write_trace_csv<W: Write>(trace: &Trace, writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);

    let mut header: Vec<String> = vec!["draw".to_string()];
    header.extend(trace.names().iter().cloned());
    wtr.write_record(&header)?;

    for (draw, record) in trace.iter().enumerate() {
        let mut row = vec![draw.to_string()];
        row.extend(record.values().iter().map(|v| v.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/**
Saves a trace as a CSV file at `filename`. See [`write_trace_csv`] for the
layout.

# Examples

```rust
use bayes_corr::config::SamplerConfig;
use bayes_corr::estimate::estimate_uniform;
use bayes_corr::io::csv::save_trace_csv;
use ndarray::array;

let data = array![[0.5, 0.4], [-0.5, -0.6], [1.0, 0.9], [-1.0, -0.7]];
let config = SamplerConfig { n_tune: 100, n_draws: 50, ..Default::default() };
let trace = estimate_uniform(&data, config)?;
save_trace_csv(&trace, "/tmp/uniform_trace.csv")?;
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub fn save_trace_csv<P: AsRef<Path>>(trace: &Trace, filename: P) -> Result<(), Box<dyn Error>> {
    write_trace_csv(trace, File::create(filename)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::Reader;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_empty_trace() {
        let trace = Trace::new(["r"]);
        let file = NamedTempFile::new().expect("Could not create temp file");

        save_trace_csv(&trace, file.path()).unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents.trim(), "draw,r");
    }

    #[test]
    fn test_save_trace_rows() -> Result<(), Box<dyn Error>> {
        let mut trace = Trace::new(["r", "w"]);
        trace.push(&[0.25, 1.0], true);
        trace.push(&[0.25, 1.0], false);
        trace.push(&[-0.5, 2.5], true);

        let file = NamedTempFile::new()?;
        save_trace_csv(&trace, file.path())?;
        let contents = fs::read_to_string(file.path())?;

        let mut rdr = Reader::from_reader(contents.as_bytes());
        let headers = rdr.headers()?.clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["draw", "r", "w"]);

        let records: Vec<_> = rdr.records().collect::<Result<_, _>>()?;
        assert_eq!(records.len(), 3);
        let expected = [
            ["0", "0.25", "1"],
            ["1", "0.25", "1"],
            ["2", "-0.5", "2.5"],
        ];
        for (record, exp) in records.iter().zip(expected.iter()) {
            assert_eq!(record.iter().collect::<Vec<_>>(), exp.to_vec());
        }
        Ok(())
    }
}
