//! Conversion between polars DataFrames and datasets

use chrono::DateTime;
use polars::prelude as pl;
use polars::prelude::{DataFrame, DataType, TimeUnit};

use crate::error::Result;

use super::column::{Column, ColumnData};
use super::table::Dataset;

/// Convert a DataFrame into a dataset.
///
/// Numeric and boolean columns become numeric (nulls become NaN), date and
/// datetime columns become datetimes, and everything else is read as text.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let columns = df
        .get_columns()
        .iter()
        .map(column_from_polars)
        .collect::<Result<Vec<_>>>()?;
    Dataset::new(columns)
}

/// Convert a dataset into a DataFrame.
///
/// NaN becomes null; categorical columns are written as their labels.
pub fn dataset_to_frame(ds: &Dataset) -> Result<DataFrame> {
    let columns = ds
        .columns()
        .iter()
        .map(column_to_polars)
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn column_from_polars(col: &pl::Column) -> Result<Column> {
    let name = col.name().to_string();
    let dtype = col.dtype();

    let data = if dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean) {
        let values: Vec<f64> = col
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        ColumnData::Numeric(values)
    } else if matches!(dtype, DataType::Date | DataType::Datetime(_, _)) {
        let values = col
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|ms| {
                ms.and_then(DateTime::from_timestamp_millis)
                    .map(|d| d.naive_utc())
            })
            .collect();
        ColumnData::Datetime(values)
    } else {
        let values = col
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        ColumnData::Text(values)
    };

    Ok(Column::new(name, data))
}

fn column_to_polars(col: &Column) -> Result<pl::Column> {
    let name: pl::PlSmallStr = col.name().into();

    let out = match col.data() {
        ColumnData::Numeric(values) => {
            let values: Vec<Option<f64>> = values
                .iter()
                .map(|&x| if x.is_nan() { None } else { Some(x) })
                .collect();
            pl::Column::new(name, values)
        }
        ColumnData::Datetime(values) => {
            let millis: Vec<Option<i64>> = values
                .iter()
                .map(|d| d.map(|d| d.and_utc().timestamp_millis()))
                .collect();
            pl::Column::new(name, millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
        ColumnData::Categorical(_) | ColumnData::Text(_) => pl::Column::new(name, col.to_labels()),
    };

    Ok(out)
}
