//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use stitchwork::{EngineConfig, Pattern};

/// Print an error and exit with status 1.
pub fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Load a pattern from a file, or from stdin when `path` is `-`.
///
/// Files ending in `.yaml`/`.yml` parse as YAML, others as JSON. Stdin is
/// tried as JSON first, then YAML.
pub fn load_pattern(path: &str) -> Pattern {
    if path == "-" {
        eprintln!("Reading pattern from stdin...");
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            fail(&format!("failed to read from stdin: {}", e));
        }
        return Pattern::from_json(&buffer)
            .or_else(|_| Pattern::from_yaml(&buffer))
            .unwrap_or_else(|e| fail(&format!("stdin: {}", e)));
    }

    eprintln!("Loading: {}", path);
    Pattern::load(path).unwrap_or_else(|e| fail(&format!("{}: {}", path, e)))
}

/// Load an engine config, or the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> EngineConfig {
    match path {
        Some(p) => EngineConfig::load(p).unwrap_or_else(|e| fail(&format!("{}: {}", p, e))),
        None => EngineConfig::default(),
    }
}

/// Write command output to a file, or stdout for `None` / `-`.
pub fn write_output(output_path: Option<&str>, content: &str) {
    match output_path {
        Some(path) if path != "-" => {
            if let Err(e) = fs::write(path, content) {
                fail(&format!("failed to write {}: {}", path, e));
            }
            eprintln!("Wrote: {}", path);
        }
        _ => print!("{}", content),
    }
}

/// File stem used as a default title (`granny.json` → `granny`).
pub fn stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pattern")
        .to_string()
}

/// Value following a flag, advancing `i`. Exits when it's missing.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(value) => value,
        None => fail(&format!("{} needs a value", flag)),
    }
}
