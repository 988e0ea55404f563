//! CLI command execution

use super::commands::{Cli, Commands};
use crate::config::ConverterConfig;
use crate::engine::Converter;
use crate::error::Result;
use crate::format::FileReader;
use crate::input;

/// Executes a parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for a parsed CLI
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub fn run(self) -> Result<()> {
        match self.cli.command {
            Commands::Convert {
                input,
                output,
                row_group_rows,
                row_group_bytes,
                compression,
                no_dictionary,
            } => {
                let mut config = ConverterConfig::new()
                    .with_compression(compression.into())
                    .with_dictionary(!no_dictionary);
                if let Some(rows) = row_group_rows {
                    config = config.with_row_group_max_rows(rows);
                }
                if let Some(bytes) = row_group_bytes {
                    config = config.with_row_group_max_bytes(bytes);
                }

                let report = Converter::with_config(config).convert_file(&input, &output)?;
                println!(
                    "Wrote {} rows in {} row group(s) to '{}' ({} bytes)",
                    report.rows,
                    report.row_groups,
                    output.display(),
                    report.bytes_written
                );
                Ok(())
            }

            Commands::Schema { input, compact } => {
                let records = input::read_records(&input)?;
                let schema = Converter::new().infer(&records)?;
                let json = schema.to_json();
                if compact {
                    println!("{json}");
                } else {
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                Ok(())
            }

            Commands::Inspect { file } => {
                let reader = FileReader::open(&file)?;
                let footer = reader.footer();

                println!("file: {}", file.display());
                println!("format version: {}", footer.version);
                println!("total rows: {}", footer.total_rows);
                println!("row groups: {}", footer.row_groups.len());
                println!("schema:");
                for field in footer.schema.fields() {
                    let nullable = if field.nullable { "nullable" } else { "required" };
                    println!("  {}: {} ({nullable})", field.name, field.field_type);
                }

                for (idx, group) in footer.row_groups.iter().enumerate() {
                    println!(
                        "row group {idx}: {} rows, {} bytes at offset {}",
                        group.rows, group.byte_size, group.offset
                    );
                    for chunk in &group.columns {
                        let min = chunk
                            .stats
                            .min
                            .as_ref()
                            .map_or("-".to_string(), ToString::to_string);
                        let max = chunk
                            .stats
                            .max
                            .as_ref()
                            .map_or("-".to_string(), ToString::to_string);
                        let distinct = chunk
                            .stats
                            .distinct_count
                            .map_or("-".to_string(), |d| d.to_string());
                        println!(
                            "  {}: {} bytes, nulls={}, distinct={distinct}, min={min}, max={max}",
                            chunk.name, chunk.byte_size, chunk.stats.null_count
                        );
                    }
                }
                Ok(())
            }

            Commands::Cat { file, limit } => {
                let reader = FileReader::open(&file)?;
                let records = reader.read_all()?;
                let shown = limit.unwrap_or(records.len());
                for record in records.iter().take(shown) {
                    println!("{record}");
                }
                Ok(())
            }
        }
    }
}
