//! # Isotherm datasets
//!
//! Pure-component adsorption measurements: an ordered list of
//! `(pressure, loading)` pairs for one gas species, read from a CSV file with
//! named columns such as `Pressure(bar)` and `Loading(mmol/g)`.
//!
//! The file order of the rows is preserved. Models that need sorted data
//! (the interpolator) sort their own copy.
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^()]*?)\s*\(\s*([^()]+?)\s*\)\s*$").expect("valid regex"));

/// errors raised while reading an isotherm dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("column '{column}' not found in '{path}' (available: {available})")]
    MissingColumn {
        path: String,
        column: String,
        available: String,
    },
    #[error("cannot parse '{value}' in column '{column}' at data row {row}")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },
    #[error("value {value} in column '{column}' at data row {row} must be finite and non-negative")]
    InvalidValue {
        column: String,
        row: usize,
        value: f64,
    },
    #[error("dataset '{0}' contains no measurements")]
    Empty(String),
    #[error("pressure and loading columns differ in length ({pressures} vs {loadings})")]
    LengthMismatch { pressures: usize, loadings: usize },
}

/// Pure-component isotherm measurements of one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsothermDataset {
    pub species: String,
    pub pressure_key: String,
    pub loading_key: String,
    /// unit parsed from the pressure header, e.g. `bar` from `Pressure(bar)`
    pub pressure_unit: Option<String>,
    pub loading_unit: Option<String>,
    pub pressures: Vec<f64>,
    pub loadings: Vec<f64>,
}

impl IsothermDataset {
    /// Builds a dataset from already parsed columns
    pub fn new(
        species: &str,
        pressures: Vec<f64>,
        loadings: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        if pressures.len() != loadings.len() {
            return Err(DatasetError::LengthMismatch {
                pressures: pressures.len(),
                loadings: loadings.len(),
            });
        }
        if pressures.is_empty() {
            return Err(DatasetError::Empty(species.to_string()));
        }
        Ok(Self {
            species: species.to_string(),
            pressure_key: "Pressure".to_string(),
            loading_key: "Loading".to_string(),
            pressure_unit: None,
            loading_unit: None,
            pressures,
            loadings,
        })
    }

    /// Reads the dataset from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(
        path: P,
        species: &str,
        pressure_key: &str,
        loading_key: &str,
    ) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let path_name = path.display().to_string();
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|source| DatasetError::Csv {
                path: path_name.clone(),
                source,
            })?;
        let dataset = Self::read_records(reader, &path_name, species, pressure_key, loading_key)?;
        info!(
            "loaded {} {} measurements from '{}'",
            dataset.len(),
            species,
            path_name
        );
        Ok(dataset)
    }

    /// Reads the dataset from any CSV source (used for in-memory data)
    pub fn from_reader<R: Read>(
        source: R,
        species: &str,
        pressure_key: &str,
        loading_key: &str,
    ) -> Result<Self, DatasetError> {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        Self::read_records(reader, "<reader>", species, pressure_key, loading_key)
    }

    fn read_records<R: Read>(
        mut reader: csv::Reader<R>,
        path_name: &str,
        species: &str,
        pressure_key: &str,
        loading_key: &str,
    ) -> Result<Self, DatasetError> {
        let csv_err = |source: csv::Error| DatasetError::Csv {
            path: path_name.to_string(),
            source,
        };
        let headers = reader.headers().map_err(csv_err)?.clone();
        let p_col = find_column(&headers, pressure_key, path_name)?;
        let q_col = find_column(&headers, loading_key, path_name)?;
        let p_header = headers.get(p_col).unwrap_or(pressure_key).to_string();
        let q_header = headers.get(q_col).unwrap_or(loading_key).to_string();

        let mut pressures = Vec::new();
        let mut loadings = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let p_raw = record.get(p_col).unwrap_or("");
            let q_raw = record.get(q_col).unwrap_or("");
            // blank trailing lines are common in exported spreadsheets
            if p_raw.is_empty() && q_raw.is_empty() {
                debug!("skipping blank row {} in '{}'", row + 1, path_name);
                continue;
            }
            pressures.push(parse_cell(p_raw, &p_header, row + 1)?);
            loadings.push(parse_cell(q_raw, &q_header, row + 1)?);
        }
        if pressures.is_empty() {
            return Err(DatasetError::Empty(path_name.to_string()));
        }
        let (_, pressure_unit) = split_unit(&p_header);
        let (_, loading_unit) = split_unit(&q_header);
        Ok(Self {
            species: species.to_string(),
            pressure_key: p_header,
            loading_key: q_header,
            pressure_unit,
            loading_unit,
            pressures,
            loadings,
        })
    }

    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }

    /// (min, max) of the measured pressures
    pub fn pressure_range(&self) -> Option<(f64, f64)> {
        if self.pressures.is_empty() {
            return None;
        }
        let min = self.pressures.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self
            .pressures
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// loading of the last row in file order
    pub fn last_loading(&self) -> Option<f64> {
        self.loadings.last().copied()
    }

    pub fn sorted_pressures(&self) -> Vec<f64> {
        let mut p = self.pressures.clone();
        p.sort_by(|a, b| a.total_cmp(b));
        p
    }

    /// iterator over `(pressure, loading)` pairs in file order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.pressures
            .iter()
            .copied()
            .zip(self.loadings.iter().copied())
    }
}

/// Splits a header like `Pressure(bar)` into its name and unit
pub fn split_unit(header: &str) -> (String, Option<String>) {
    match UNIT_RE.captures(header) {
        Some(caps) => (caps[1].to_string(), Some(caps[2].to_string())),
        None => (header.trim().to_string(), None),
    }
}

fn normalize(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// exact match first, then a match ignoring case and whitespace, then the same name
/// with any unit
fn find_column(headers: &StringRecord, key: &str, path: &str) -> Result<usize, DatasetError> {
    if let Some(i) = headers.iter().position(|h| h == key) {
        return Ok(i);
    }
    let wanted = normalize(key);
    if let Some(i) = headers.iter().position(|h| normalize(h) == wanted) {
        return Ok(i);
    }
    let (key_name, key_unit) = split_unit(key);
    if key_unit.is_none() {
        let key_name = normalize(&key_name);
        if let Some(i) = headers
            .iter()
            .position(|h| normalize(&split_unit(h).0) == key_name)
        {
            return Ok(i);
        }
    }
    Err(DatasetError::MissingColumn {
        path: path.to_string(),
        column: key.to_string(),
        available: headers.iter().collect::<Vec<_>>().join(", "),
    })
}

fn parse_cell(raw: &str, column: &str, row: usize) -> Result<f64, DatasetError> {
    let value = raw.parse::<f64>().map_err(|_| DatasetError::Parse {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(DatasetError::InvalidValue {
            column: column.to_string(),
            row,
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CH4: &str = "Pressure(bar),Loading(mmol/g)\n0.5,0.17\n1.0,0.33\n2.0,0.62\n";

    #[test]
    fn reads_named_columns_in_file_order() {
        let ds =
            IsothermDataset::from_reader(CH4.as_bytes(), "CH4", "Pressure(bar)", "Loading(mmol/g)")
                .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.pressures, vec![0.5, 1.0, 2.0]);
        assert_eq!(ds.loadings, vec![0.17, 0.33, 0.62]);
        assert_eq!(ds.pressure_unit.as_deref(), Some("bar"));
        assert_eq!(ds.loading_unit.as_deref(), Some("mmol/g"));
        assert_eq!(ds.last_loading(), Some(0.62));
        assert_eq!(ds.pressure_range(), Some((0.5, 2.0)));
    }

    #[test]
    fn column_lookup_tolerates_case_spacing_and_units() {
        let data = "T(K), pressure (bar) ,LOADING(mmol/g)\n298,1.0,2.0\n298,2.0,3.0\n";
        let ds = IsothermDataset::from_reader(data.as_bytes(), "CO2", "Pressure(bar)", "Loading")
            .unwrap();
        assert_eq!(ds.pressures, vec![1.0, 2.0]);
        assert_eq!(ds.loadings, vec![2.0, 3.0]);
    }

    #[test]
    fn missing_column_is_reported() {
        let data = "P,Q\n1,2\n";
        let err = IsothermDataset::from_reader(data.as_bytes(), "CH4", "Pressure(bar)", "Q")
            .unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { .. }));
        assert!(err.to_string().contains("available: P, Q"));
    }

    #[test]
    fn bad_number_is_reported_with_row() {
        let data = "Pressure(bar),Loading(mmol/g)\n1.0,2.0\n2.0,abc\n";
        let err = IsothermDataset::from_reader(
            data.as_bytes(),
            "CH4",
            "Pressure(bar)",
            "Loading(mmol/g)",
        )
        .unwrap_err();
        match err {
            DatasetError::Parse { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let data = "Pressure(bar),Loading(mmol/g)\n";
        let err = IsothermDataset::from_reader(
            data.as_bytes(),
            "CH4",
            "Pressure(bar)",
            "Loading(mmol/g)",
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Empty(_)));
    }

    #[test]
    fn reads_from_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CH4.as_bytes()).unwrap();
        let ds = IsothermDataset::from_csv(file.path(), "CH4", "Pressure(bar)", "Loading(mmol/g)")
            .unwrap();
        assert_eq!(ds.species, "CH4");
        assert_eq!(ds.sorted_pressures(), vec![0.5, 1.0, 2.0]);
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let err = IsothermDataset::from_csv(
            "definitely/not/here.csv",
            "CH4",
            "Pressure(bar)",
            "Loading(mmol/g)",
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Csv { .. }));
    }

    #[test]
    fn split_unit_handles_plain_headers() {
        assert_eq!(split_unit("Pressure"), ("Pressure".to_string(), None));
        assert_eq!(
            split_unit("Loading (mmol/g)"),
            ("Loading".to_string(), Some("mmol/g".to_string()))
        );
    }

    #[test]
    fn negative_and_non_finite_cells_are_rejected() {
        for (cell, row) in [("-0.5", 2), ("NaN", 2), ("inf", 2)] {
            let data = format!("Pressure(bar),Loading(mmol/g)\n1.0,2.0\n2.0,{cell}\n");
            let err = IsothermDataset::from_reader(
                data.as_bytes(),
                "CH4",
                "Pressure(bar)",
                "Loading(mmol/g)",
            )
            .unwrap_err();
            match err {
                DatasetError::InvalidValue { column, row: r, .. } => {
                    assert_eq!(column, "Loading(mmol/g)");
                    assert_eq!(r, row);
                }
                other => panic!("unexpected error for '{cell}': {other:?}"),
            }
        }
    }

    #[test]
    fn split_unit_is_reused_across_headers() {
        for _ in 0..3 {
            assert_eq!(
                split_unit("Pressure(bar)"),
                ("Pressure".to_string(), Some("bar".to_string()))
            );
        }
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let err = IsothermDataset::new("CH4", vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, DatasetError::LengthMismatch { .. }));
    }
}
