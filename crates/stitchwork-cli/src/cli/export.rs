//! Export command: pattern as JSON or CSV.

use stitchwork::Pattern;

use super::common::{fail, flag_value, load_pattern, write_output};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExportFormat {
    Json,
    Csv,
}

/// Execute the export command.
pub fn cmd_export(args: &[String]) {
    let mut pattern_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut format = ExportFormat::Json;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "--output")),
            "-f" | "--format" => {
                format = match flag_value(args, &mut i, "--format").to_lowercase().as_str() {
                    "json" => ExportFormat::Json,
                    "csv" => ExportFormat::Csv,
                    other => fail(&format!("unknown format: {}. Use 'json' or 'csv'.", other)),
                };
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-" => {
                if pattern_path.is_none() {
                    pattern_path = Some("-");
                }
            }
            path if !path.starts_with('-') => {
                if pattern_path.is_none() {
                    pattern_path = Some(path);
                }
            }
            unknown => {
                eprintln!("Unknown option: {}", unknown);
            }
        }
        i += 1;
    }

    let pattern_path = pattern_path.unwrap_or_else(|| {
        print_usage();
        fail("pattern file required (use '-' for stdin)");
    });

    let pattern = load_pattern(pattern_path);

    let output = match format {
        ExportFormat::Json => match pattern.to_json_pretty() {
            Ok(text) => text + "\n",
            Err(e) => fail(&format!("failed to serialize pattern: {}", e)),
        },
        ExportFormat::Csv => pattern_csv(&pattern),
    };

    write_output(output_path, &output);
}

/// One line per stitch, 1-based row and stitch numbers.
///
/// Colors are the resolved hex (stitch color, else row default, else the
/// global default), quoted.
pub fn pattern_csv(pattern: &Pattern) -> String {
    let mut csv = String::from("Row,Stitch Number,Stitch Type,Color\n");
    for (r, row) in pattern.rows.iter().enumerate() {
        for (s, stitch) in row.stitches.iter().enumerate() {
            let color = row.resolved_color(s).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},\"{}\"\n",
                r + 1,
                s + 1,
                stitch.kind.name(),
                color.to_hex()
            ));
        }
    }
    csv
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("stitchwork export - Write a pattern as JSON or CSV");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    stitchwork export <pattern> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -f, --format <fmt>     Output format: json, csv (default: json)");
    eprintln!("    -o, --output <file>    Output file (default: stdout)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    stitchwork export swatch.yaml -f json -o swatch.json");
    eprintln!("    stitchwork export granny.json -f csv > granny.csv");
}
