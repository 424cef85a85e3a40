use super::pressure_sweep::SweepResult;
use RustedSciThe::Utils::plots::plots_terminal;
use log::info;
use nalgebra::DVector;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV export to '{path}' failed: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("JSON export to '{path}' failed: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// one successful point of an exported sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub total_pressure: f64,
    pub loadings: Vec<f64>,
}

/// serialisable form of a [`SweepResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepExport {
    pub species: Vec<String>,
    pub molar_fractions: Vec<f64>,
    pub points: Vec<SweepRecord>,
    pub skipped_pressures: Vec<f64>,
}

impl From<&SweepResult> for SweepExport {
    fn from(result: &SweepResult) -> Self {
        let points = result
            .pressures
            .iter()
            .enumerate()
            .map(|(i, p)| SweepRecord {
                total_pressure: *p,
                loadings: result.loadings.row(i).iter().copied().collect(),
            })
            .collect();
        Self {
            species: result.species.clone(),
            molar_fractions: result.molar_fractions.clone(),
            points,
            skipped_pressures: result.skipped_pressures(),
        }
    }
}

impl SweepResult {
    ////////////////////////INPUT/OUTPUT////////////////////////////////////////////////////////

    /// Row indices printed in the summary: every `max(1, n / rows)`-th point
    pub fn summary_indices(&self, rows: usize) -> Vec<usize> {
        let step = (self.len() / rows.max(1)).max(1);
        (0..self.len()).step_by(step).collect()
    }

    /// Fixed-width table of roughly `rows` evenly spaced results
    pub fn summary_table(&self, rows: usize) -> Table {
        let mut table = Table::new();
        let mut header = vec![Cell::new("Pressure (bar)")];
        for species in &self.species {
            header.push(Cell::new(&format!("{} Loading", species)));
        }
        table.set_titles(Row::new(header));
        for i in self.summary_indices(rows) {
            let mut row = vec![Cell::new(&format!("{:.1}", self.pressures[i]))];
            for j in 0..self.species.len() {
                row.push(Cell::new(&format!("{:.3}", self.loadings[(i, j)])));
            }
            table.add_row(Row::new(row));
        }
        table
    }

    /// Prints the summary table to the console
    pub fn pretty_print(&self, rows: usize) {
        println!("\nBinary Mixture Isotherm Results:");
        println!("{}", "=".repeat(50));
        self.summary_table(rows).printstd();
        println!("{}", "=".repeat(50));
        println!("Total data points calculated: {}", self.len());
        let skipped = self.skipped_pressures();
        if !skipped.is_empty() {
            println!(
                "Skipped pressures (bar): {}",
                skipped
                    .iter()
                    .map(|p| format!("{:.1}", p))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    /// Plots every species loading against the total pressure in the terminal
    pub fn plot_in_terminal(&self) {
        if self.is_empty() {
            return;
        }
        plots_terminal(
            "P".to_string(),
            self.species.clone(),
            DVector::from_vec(self.pressures.clone()),
            self.loadings.clone(),
        );
    }

    /// Writes the successful points as CSV: `Pressure(bar),<species> Loading(mmol/g),...`
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let csv_err = |source: csv::Error| ExportError::Csv {
            path: name.clone(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        let mut header = vec!["Pressure(bar)".to_string()];
        header.extend(self.species.iter().map(|s| format!("{} Loading(mmol/g)", s)));
        writer.write_record(&header).map_err(csv_err)?;
        for (i, p) in self.pressures.iter().enumerate() {
            let mut record = vec![p.to_string()];
            record.extend(self.loadings.row(i).iter().map(|q| q.to_string()));
            writer.write_record(&record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| ExportError::Io {
            path: name.clone(),
            source,
        })?;
        info!("sweep results written to '{}'", name);
        Ok(())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let content = serde_json::to_string_pretty(&SweepExport::from(self)).map_err(|source| {
            ExportError::Json {
                path: name.clone(),
                source,
            }
        })?;
        fs::write(path, content).map_err(|source| ExportError::Io {
            path: name.clone(),
            source,
        })?;
        info!("sweep results written to '{}'", name);
        Ok(())
    }

    /// Picks the format from the file extension, JSON unless it is `.csv`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => self.save_csv(path),
            _ => self.save_json(path),
        }
    }
}
