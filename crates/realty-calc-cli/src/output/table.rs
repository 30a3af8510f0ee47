use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{render, row_cells, row_fields, row_headers, scalar_fields};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", render(value)),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_object(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Field/value table for the scalars, then one table per row-shaped field.
fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in scalar_fields(map) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in row_fields(map) {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let headers = row_headers(arr);
    if headers.is_empty() {
        for item in arr {
            println!("{}", render(item));
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        builder.push_record(row_cells(item, &headers));
    }
    println!("{}", Table::from(builder));
}
