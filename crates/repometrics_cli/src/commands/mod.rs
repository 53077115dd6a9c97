use clap::ValueEnum;
use serde::Serialize;

pub(crate) mod analyze;
pub(crate) mod fetch;
pub(crate) mod limits;
pub(crate) mod meta;
pub(crate) mod migrate;
pub(crate) mod report;
pub(crate) mod reset;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Print rows as a rounded table or pretty JSON.
pub(crate) fn print_rows<T>(rows: &[T], format: OutputFormat) -> Result<(), serde_json::Error>
where
    T: Serialize + tabled::Tabled,
{
    match format {
        OutputFormat::Table => {
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, tabled::Tabled)]
    struct Row {
        name: String,
    }

    #[test]
    fn output_format_default_is_table() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn print_rows_supports_both_formats() {
        let rows = vec![Row {
            name: "requests".to_string(),
        }];
        print_rows(&rows, OutputFormat::Table).expect("table");
        print_rows(&rows, OutputFormat::Json).expect("json");
    }
}
