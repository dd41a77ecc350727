//! CSV bar loading.
//!
//! One file per instrument, named `<SYMBOL>.csv`, with a header row and columns
//! `date,open,high,low,close[,volume]`. Dates are `YYYY-MM-DD`.

use anyhow::{Context, Result};
use momentum_core::domain::{Bar, Symbol};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Load one CSV file, oldest bar first. Rows that fail sanity checks are
/// dropped with a warning.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<Bar>().enumerate() {
        let bar = record.with_context(|| format!("{}: bad row {}", path.display(), row + 1))?;
        if !bar.is_finite() || !bar.is_sane() {
            warn!(file = %path.display(), row = row + 1, date = %bar.date, "skipping invalid bar");
            continue;
        }
        bars.push(bar);
    }
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    Ok(bars)
}

/// Load every `*.csv` file in a directory, keyed by file stem.
pub fn load_dir(dir: &Path) -> Result<HashMap<Symbol, Vec<Bar>>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read data directory {}", dir.display()))?;

    let mut out = HashMap::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(symbol) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let bars = load_bars(&path)?;
        debug!(%symbol, bars = bars.len(), "loaded");
        out.insert(symbol.to_string(), bars);
    }
    Ok(out)
}
