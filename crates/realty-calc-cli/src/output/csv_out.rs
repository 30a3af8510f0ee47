use serde_json::{Map, Value};
use std::io;

use super::{render, row_cells, row_fields, row_headers, scalar_fields};

/// Write output as CSV to stdout.
///
/// A result holding rows (a schedule, a ranking) is written as those rows;
/// anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Err(e) = write_csv(&mut wtr, value) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match row_fields(body).first() {
                Some((_, rows)) => write_rows(wtr, rows)?,
                None => write_pairs(wtr, body)?,
            }
        }
        Value::Array(arr) => write_rows(wtr, arr)?,
        _ => wtr.write_record([render(value)])?,
    }
    wtr.flush()?;
    Ok(())
}

fn write_pairs<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in scalar_fields(map) {
        wtr.write_record([key, val])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let headers = row_headers(arr);
    if headers.is_empty() {
        for item in arr {
            wtr.write_record([render(item)])?;
        }
        return Ok(());
    }
    wtr.write_record(&headers)?;
    for item in arr {
        wtr.write_record(row_cells(item, &headers))?;
    }
    Ok(())
}
