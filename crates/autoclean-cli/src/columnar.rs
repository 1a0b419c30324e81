//! Parquet output through arrow record batches.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use autoclean::{CleanError, DataTable, Result, TableEncoder, Value};

/// Writes the whole table as a single Parquet row group.
pub struct ParquetEncoder {
    props: WriterProperties,
}

impl ParquetEncoder {
    pub fn new() -> Self {
        Self {
            props: WriterProperties::builder().build(),
        }
    }
}

impl Default for ParquetEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest magnitude written as Int64. Integral values beyond it keep the
/// column as Float64 so the cast cannot saturate.
const MAX_EXACT_INT: f64 = 9.0e15;

fn fits_i64(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n.abs() < MAX_EXACT_INT)
}

/// Physical type chosen for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Int64,
    Float64,
    Utf8,
}

impl ColumnKind {
    fn of<'a>(values: impl Iterator<Item = &'a Value>) -> Self {
        let mut kind = None;
        for value in values {
            kind = match (value, kind) {
                (Value::Null, k) => k,
                (Value::Text(_), _) => return ColumnKind::Utf8,
                (Value::Number(_), Some(ColumnKind::Float64)) => Some(ColumnKind::Float64),
                (v @ Value::Number(_), _) if v.is_integral() && fits_i64(v) => Some(ColumnKind::Int64),
                (Value::Number(_), _) => Some(ColumnKind::Float64),
            };
        }
        kind.unwrap_or(ColumnKind::Utf8)
    }

    fn data_type(self) -> DataType {
        match self {
            ColumnKind::Int64 => DataType::Int64,
            ColumnKind::Float64 => DataType::Float64,
            ColumnKind::Utf8 => DataType::Utf8,
        }
    }
}

fn build_column(table: &DataTable, index: usize, kind: ColumnKind) -> ArrayRef {
    let cells = table.rows.iter().map(|row| &row[index]);
    match kind {
        ColumnKind::Int64 => Arc::new(Int64Array::from(
            cells.map(|v| v.as_f64().map(|n| n as i64)).collect::<Vec<_>>(),
        )),
        ColumnKind::Float64 => Arc::new(Float64Array::from(cells.map(Value::as_f64).collect::<Vec<_>>())),
        ColumnKind::Utf8 => Arc::new(StringArray::from(cells.map(Value::render).collect::<Vec<_>>())),
    }
}

fn to_record_batch(table: &DataTable) -> Result<RecordBatch> {
    let kinds: Vec<ColumnKind> = (0..table.column_count())
        .map(|i| ColumnKind::of(table.rows.iter().map(|row| &row[i])))
        .collect();

    let fields: Vec<Field> = table
        .headers
        .iter()
        .zip(&kinds)
        .map(|(name, kind)| Field::new(name, kind.data_type(), true))
        .collect();

    let columns: Vec<ArrayRef> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| build_column(table, i, *kind))
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| CleanError::Encode(format!("Record batch error: {}", e)))
}

impl TableEncoder for ParquetEncoder {
    fn format(&self) -> &str {
        "parquet"
    }

    fn extension(&self) -> &str {
        "parquet"
    }

    fn encode(&self, table: &DataTable) -> Result<Vec<u8>> {
        let batch = to_record_batch(table)?;

        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(self.props.clone()))
            .map_err(|e| CleanError::Encode(format!("Parquet writer error: {}", e)))?;
        writer
            .write(&batch)
            .map_err(|e| CleanError::Encode(format!("Parquet write error: {}", e)))?;
        writer
            .close()
            .map_err(|e| CleanError::Encode(format!("Parquet close error: {}", e)))?;

        Ok(buffer)
    }
}
