//! Flat trade tape export for spreadsheets.
//!
//! Columns: id, entry_time, pair, direction, entry_type, outcome, trade_type,
//! entry_price, exit_price, stop_loss, take_profit, volume, pips,
//! risk_reward, stop_loss_amount, take_profit_amount, break_even_amount,
//! notes

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::domain::Trade;

#[derive(Debug, Error)]
pub enum CsvExportError {
    #[error("write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("flush CSV: {0}")]
    Io(#[from] io::Error),
    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const HEADER: [&str; 18] = [
    "id",
    "entry_time",
    "pair",
    "direction",
    "entry_type",
    "outcome",
    "trade_type",
    "entry_price",
    "exit_price",
    "stop_loss",
    "take_profit",
    "volume",
    "pips",
    "risk_reward",
    "stop_loss_amount",
    "take_profit_amount",
    "break_even_amount",
    "notes",
];

fn optional(v: Option<f64>, precision: usize) -> String {
    v.map(|v| format!("{v:.precision$}")).unwrap_or_default()
}

/// Write the trade tape to any writer.
pub fn write_trades<W: io::Write>(writer: W, trades: &[Trade]) -> Result<(), CsvExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for t in trades {
        let row: [&str; 18] = [
            t.id.as_str(),
            &t.entry_time.format("%Y-%m-%d %H:%M").to_string(),
            &t.pair,
            t.direction.label(),
            t.entry_type.label(),
            t.outcome.label(),
            t.trade_type.label(),
            &format!("{:.5}", t.entry_price),
            &format!("{:.5}", t.exit_price),
            &optional(t.stop_loss, 5),
            &optional(t.take_profit, 5),
            &format!("{:.2}", t.volume),
            &format!("{:.1}", t.pips()),
            &format!("{:.2}", t.risk_reward_ratio),
            &format!("{:.2}", t.stop_loss_amount),
            &format!("{:.2}", t.take_profit_amount),
            &optional(t.break_even_amount, 2),
            &t.notes,
        ];
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the trade tape as a CSV string.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String, CsvExportError> {
    let mut buf = Vec::new();
    write_trades(&mut buf, trades)?;
    Ok(String::from_utf8(buf)?)
}

pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<(), CsvExportError> {
    let file = std::fs::File::create(path)?;
    write_trades(io::BufWriter::new(file), trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, EntryType, Outcome, RecordId, TradeDraft};
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn sample_trade() -> Trade {
        let mut draft = TradeDraft::new(
            "USD/JPY",
            EntryType::ThreeTouch,
            Outcome::Win,
            Direction::Buy,
            NaiveDate::from_ymd_opt(2024, 4, 10)
                .unwrap()
                .and_hms_opt(8, 5, 0)
                .unwrap(),
            151.200,
            151.650,
            0.5,
        );
        draft.notes = "clean retest, held through NY open".into();
        Trade::from_draft(RecordId::from("t-1"), draft, Utc::now())
    }

    #[test]
    fn header_has_every_column() {
        let csv = export_trades_csv(&[]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].split(',').count(), HEADER.len());
        assert!(lines[0].starts_with("id,entry_time,pair"));
    }

    #[test]
    fn row_content_and_quoting() {
        let csv = export_trades_csv(&[sample_trade()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);

        let row = lines[1];
        assert!(row.starts_with("t-1,2024-04-10 08:05,USD/JPY,buy,3 touch,win,executed,"));
        assert!(row.contains("151.20000,151.65000,,,0.50,45.0,"));
        // Notes contain a comma and must be quoted.
        assert!(row.ends_with("\"clean retest, held through NY open\""));
    }

    #[test]
    fn writes_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        write_trades_csv(&path, &[sample_trade(), sample_trade()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
