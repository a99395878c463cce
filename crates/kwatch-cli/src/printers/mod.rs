use std::io::Write;
use std::str::FromStr;

use anyhow::bail;
use kwatch_core::EventSink;

mod events;
mod json;
mod table;

pub use events::EventsPrinter;
pub use json::JsonPrinter;
pub use table::TablePrinter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Events,
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "events" => Ok(OutputFormat::Events),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => bail!("unknown output format {other:?} (expected events, json or table)"),
        }
    }
}

pub fn create_printer(format: OutputFormat, out: Box<dyn Write + Send>) -> Box<dyn EventSink> {
    match format {
        OutputFormat::Events => Box::new(EventsPrinter::new(out)),
        OutputFormat::Json => Box::new(JsonPrinter::new(out)),
        OutputFormat::Table => Box::new(TablePrinter::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("events".parse::<OutputFormat>().unwrap(), OutputFormat::Events);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
