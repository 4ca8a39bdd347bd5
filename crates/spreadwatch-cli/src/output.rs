//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use spreadwatch_analytics::signals::{PercentileSignal, Signal};

use crate::cli::OutputFormat;

/// Output settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Selected output format.
    pub format: OutputFormat,
    /// Suppress headers and summaries.
    pub quiet: bool,
}

impl Context {
    /// Creates a context.
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Prints a section header in table mode.
    pub fn header(&self, title: &str) {
        if self.format == OutputFormat::Table && !self.quiet {
            println!("\n{}", title.bold().underline());
        }
    }
}

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(&data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints a single serializable value as JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from an optional float.
    pub fn from_opt(key: impl Into<String>, value: Option<f64>, precision: usize) -> Self {
        Self::new(key, fmt_opt(value, precision))
    }
}

/// Formats an optional float, `-` when absent.
pub fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.prec$}", v, prec = precision),
        None => "-".to_string(),
    }
}

/// Z-score signal, coloured in table mode.
pub fn signal_label(signal: Signal, format: OutputFormat) -> String {
    let label = signal.to_string();
    if format != OutputFormat::Table {
        return label;
    }
    match signal {
        Signal::Buy => label.green().bold().to_string(),
        Signal::Sell => label.red().bold().to_string(),
        Signal::Neutral => label.dimmed().to_string(),
    }
}

/// Percentile signal, coloured in table mode.
pub fn strength_label(strength: PercentileSignal, format: OutputFormat) -> String {
    let label = strength.to_string();
    if format != OutputFormat::Table {
        return label;
    }
    match strength {
        PercentileSignal::StrongBuy => label.green().bold().to_string(),
        PercentileSignal::Buy => label.green().to_string(),
        PercentileSignal::Sell => label.red().to_string(),
        PercentileSignal::StrongSell => label.red().bold().to_string(),
        PercentileSignal::Neutral | PercentileSignal::NoData => label.dimmed().to_string(),
    }
}

/// Prints a warning message on stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
