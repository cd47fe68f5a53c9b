//! Summary command: per-row stitch tallies.

use stitchwork::summarize;

use super::common::{fail, load_pattern};

/// Execute the summary command.
pub fn cmd_summary(args: &[String]) {
    let mut pattern_path: Option<&str> = None;
    let mut json = false;

    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                print_usage();
                return;
            }
            path if path == "-" || !path.starts_with('-') => {
                if pattern_path.is_none() {
                    pattern_path = Some(path);
                }
            }
            unknown => {
                eprintln!("Unknown option: {}", unknown);
            }
        }
    }

    let pattern_path = pattern_path.unwrap_or_else(|| {
        print_usage();
        fail("pattern file required (use '-' for stdin)");
    });

    let pattern = load_pattern(pattern_path);
    let summary = summarize(&pattern);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(&format!("failed to serialize summary: {}", e)),
        }
        return;
    }

    if !summary.name.is_empty() {
        println!("{}", summary.name);
    }
    println!(
        "{} mode, {} rows, {} stitches",
        summary.mode.name().to_uppercase(),
        summary.row_count,
        summary.stitch_count
    );
    for line in summary.lines() {
        println!("  {}", line);
    }
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("stitchwork summary - Show per-row stitch tallies");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    stitchwork summary <pattern> [--json]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    --json    Output the summary as JSON");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    stitchwork summary granny.json");
    eprintln!("    stitchwork summary swatch.yaml --json | jq '.rows[0]'");
}
