//! Build command: replay a device-protocol script into a pattern.
//!
//! A script is the same newline-delimited stream the hardware bridge sends:
//!
//! ```text
//! mode:round
//! sc
//! sc
//! row
//! preview:dc
//! dc
//! undo
//! ```
//!
//! Lines that aren't commands are skipped (and counted).

use std::fs;
use std::io::{self, Read};

use stitchwork::{parse_command, ConstructionMode, LineDecoder, Pattern, Session};

use super::common::{fail, flag_value, load_config, stem, write_output};

/// Execute the build command.
pub fn cmd_build(args: &[String]) {
    let mut script_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut config_path: Option<&str> = None;
    let mut name: Option<&str> = None;
    let mut mode = ConstructionMode::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "--output")),
            "-c" | "--config" => config_path = Some(flag_value(args, &mut i, "--config")),
            "-n" | "--name" => name = Some(flag_value(args, &mut i, "--name")),
            "-m" | "--mode" => {
                let value = flag_value(args, &mut i, "--mode");
                mode = ConstructionMode::from_name(value).unwrap_or_else(|| {
                    fail(&format!("unknown mode '{}'. Use 'flat' or 'round'.", value))
                });
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-" => {
                if script_path.is_none() {
                    script_path = Some("-");
                }
            }
            path if !path.starts_with('-') => {
                if script_path.is_none() {
                    script_path = Some(path);
                }
            }
            unknown => {
                eprintln!("Unknown option: {}", unknown);
            }
        }
        i += 1;
    }

    let script_path = script_path.unwrap_or_else(|| {
        print_usage();
        fail("script file required (use '-' for stdin)");
    });

    let script = read_script(script_path);
    let name = match name {
        Some(n) => n.to_string(),
        None if script_path == "-" => "Untitled".to_string(),
        None => stem(script_path),
    };

    let mut session = Session::new(load_config(config_path));
    session.replace_pattern(Pattern::new(name, mode));

    let (applied, skipped) = replay(&mut session, &script);
    let pattern = session.pattern();

    eprintln!(
        "Replayed {} commands ({} changed the pattern, {} lines skipped)",
        applied.0, applied.1, skipped
    );
    for line in session.frame().summary.lines() {
        eprintln!("  {}", line);
    }

    match pattern.to_json_pretty() {
        Ok(text) => write_output(output_path, &(text + "\n")),
        Err(e) => fail(&format!("failed to serialize pattern: {}", e)),
    }
}

fn read_script(path: &str) -> String {
    if path == "-" {
        eprintln!("Reading script from stdin...");
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            fail(&format!("failed to read from stdin: {}", e));
        }
        return buffer;
    }

    eprintln!("Loading: {}", path);
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("{}: {}", path, e)))
}

/// Feed a script through the line decoder into the session.
///
/// Returns `((commands, changes), skipped_lines)`. Blank lines and
/// `#` comments are neither commands nor skipped.
fn replay(session: &mut Session, script: &str) -> ((usize, usize), usize) {
    let mut decoder = LineDecoder::new();
    let mut lines = decoder.push(script);
    lines.extend(decoder.finish());

    let mut commands = 0;
    let mut changes = 0;
    let mut skipped = 0;
    for line in &lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_command(trimmed) {
            Some(event) => {
                commands += 1;
                if session.apply(event) {
                    changes += 1;
                }
            }
            None => {
                log::warn!("skipping unrecognized line: {}", trimmed);
                skipped += 1;
            }
        }
    }
    ((commands, changes), skipped)
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("stitchwork build - Replay a device-protocol script into a pattern");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    stitchwork build <script> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -n, --name <name>      Pattern name (default: script file stem)");
    eprintln!("    -m, --mode <mode>      Starting mode: flat, round (default: round)");
    eprintln!("    -c, --config <file>    Engine config (YAML or JSON)");
    eprintln!("    -o, --output <file>    Output pattern JSON (default: stdout)");
    eprintln!();
    eprintln!("SCRIPT COMMANDS:");
    eprintln!("    sc, dc, hdc, tr, inc, dec, slst    Add a stitch to the last row");
    eprintln!("    row                                Start a new row");
    eprintln!("    undo                               Remove the last stitch (or empty row)");
    eprintln!("    preview:<type>                     Select a type without adding it");
    eprintln!("    mode:flat, mode:round              Switch construction mode");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    stitchwork build magic-ring.txt -n \"Magic Ring\" -o ring.json");
    eprintln!("    printf 'sc\\nsc\\nrow\\ndc\\n' | stitchwork build - --mode flat");
}
