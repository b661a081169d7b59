use serde_json::Value;

use dipscan_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render an envelope to stdout in the requested format.
pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let rendered = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{rendered}");
        }
        OutputFormat::Table => render_table(envelope),
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) {
    let records = envelope.data.get("records").and_then(Value::as_array);
    let underperformers = envelope.data.get("underperformers").and_then(Value::as_array);

    match (records, underperformers) {
        (Some(records), Some(underperformers)) => {
            print_records(records);
            println!();
            print_underperformers(underperformers);
        }
        // Command data without the screen tables (e.g. an export summary).
        _ => println!("{}", envelope.data),
    }

    for warning in &envelope.meta.warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_records(records: &[Value]) {
    println!(
        "{:<16} {:>14} {:>10} {:>10} {:>9}",
        "SYMBOL", "DMA", "CMP", "CHANGE", "%CHANGE"
    );
    for record in records {
        println!(
            "{:<16} {:>14.3} {:>10.2} {:>10.2} {:>8.2}%",
            field_str(record, "symbol"),
            field_f64(record, "moving_average"),
            field_f64(record, "price"),
            field_f64(record, "change"),
            field_f64(record, "percent_change"),
        );
    }
}

fn print_underperformers(underperformers: &[Value]) {
    println!("Top underperformers");
    println!("{:<16} {:>10} {:>9}", "SYMBOL", "CMP", "%CHANGE");
    for record in underperformers {
        println!(
            "{:<16} {:>10.2} {:>8.2}%",
            field_str(record, "symbol"),
            field_f64(record, "price"),
            field_f64(record, "percent_change"),
        );
    }
}

fn field_str<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

fn field_f64(record: &Value, field: &str) -> f64 {
    record.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}
