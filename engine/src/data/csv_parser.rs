use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const COLUMNS: [&str; 5] = ["timestamp", "open", "high", "low", "close"];

pub struct CandleCsvParser;

impl CandleCsvParser {
    // CSV Header: timestamp,open,high,low,close
    // Example Row: 1704085200000,42000.5,42310,41980.25,42250
    // Column order is free; header names are matched case-insensitively.
    pub fn load_candles_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<Candle>, EngineError> {
        let path = file_path.as_ref();
        let file = File::open(path)?;
        let candles = Self::load_candles_from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), count = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }

    pub fn load_candles_from_reader<R: Read>(reader: R) -> Result<Vec<Candle>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let positions = Self::column_positions(&headers)?;

        let mut candles = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            candles.push(Self::parse_record(&record, &positions, line)?);
        }
        Ok(candles)
    }

    fn column_positions(headers: &StringRecord) -> Result<[usize; 5], EngineError> {
        let mut positions = [0usize; 5];
        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
                .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' column in CSV header", name)))?;
        }
        Ok(positions)
    }

    fn parse_record(record: &StringRecord, positions: &[usize; 5], line: usize) -> Result<Candle, EngineError> {
        let ts_raw = Self::field(record, positions, 0, line)?;
        let timestamp_ms = ts_raw.parse::<i64>().map_err(|e| {
            EngineError::CsvDataFormatError(format!("Error parsing 'timestamp' at line {}: '{}' ({})", line, ts_raw, e))
        })?;

        let open = Self::number(record, positions, 1, line)?;
        let high = Self::number(record, positions, 2, line)?;
        let low = Self::number(record, positions, 3, line)?;
        let close = Self::number(record, positions, 4, line)?;

        Candle::from_millis(timestamp_ms, open, high, low, close).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Timestamp out of range at line {}: {}", line, timestamp_ms))
        })
    }

    fn field<'a>(record: &'a StringRecord, positions: &[usize; 5], column: usize, line: usize) -> Result<&'a str, EngineError> {
        record
            .get(positions[column])
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' field at line {}", COLUMNS[column], line)))
    }

    fn number(record: &StringRecord, positions: &[usize; 5], column: usize, line: usize) -> Result<f64, EngineError> {
        let raw = Self::field(record, positions, column, line)?;
        raw.parse::<f64>().map_err(|e| {
            EngineError::CsvDataFormatError(format!(
                "Error parsing '{}' at line {}: '{}' ({})",
                COLUMNS[column], line, raw, e
            ))
        })
    }
}
