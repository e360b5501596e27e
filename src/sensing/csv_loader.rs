use std::io::Read;

use crate::assets::AssetSource;
use crate::error::{VitalsError, VitalsResult};

/// Ordered samples for one accelerometer axis.
pub type SampleSeries = Vec<f32>;

/// Parse every line of a comma-separated asset into rows of floats.
pub fn load_rows(source: &dyn AssetSource, asset: &str) -> VitalsResult<Vec<Vec<f32>>> {
    let reader = source.open(asset)?;
    parse_rows(reader, asset)
}

/// Load an asset and flatten its rows into a single series. The breathing
/// captures hold one sample per line, so this is the usual entry point.
pub fn load_series(source: &dyn AssetSource, asset: &str) -> VitalsResult<SampleSeries> {
    Ok(load_rows(source, asset)?.into_iter().flatten().collect())
}

/// Blank lines are rejected rather than skipped: each line is one sample,
/// and a gap would silently shift the remaining samples of that axis.
pub fn parse_rows<R: Read>(mut reader: R, asset: &str) -> VitalsResult<Vec<Vec<f32>>> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|err| VitalsError::AssetRead {
            name: asset.to_string(),
            message: err.to_string(),
        })?;

    if let Some(index) = contents.lines().position(|line| line.trim().is_empty()) {
        return Err(VitalsError::Parse {
            asset: asset.to_string(),
            line: index as u64 + 1,
            message: "blank line".into(),
        });
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|err| VitalsError::Parse {
            asset: asset.to_string(),
            line: err.position().map(|pos| pos.line()).unwrap_or(0),
            message: err.to_string(),
        })?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);

        let row = record
            .iter()
            .map(|field| {
                field.parse::<f32>().map_err(|err| VitalsError::Parse {
                    asset: asset.to_string(),
                    line,
                    message: format!("'{field}': {err}"),
                })
            })
            .collect::<VitalsResult<Vec<f32>>>()?;
        rows.push(row);
    }

    Ok(rows)
}
