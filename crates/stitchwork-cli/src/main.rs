//! stitchwork - CLI for crochet pattern charts, meshes and exports
//!
//! Usage:
//!   stitchwork stitches                  List stitch types
//!   stitchwork chart <pattern> [-o svg]  Render the symbol chart
//!   stitchwork mesh <pattern> [-o obj]   Export the 3D scene
//!   stitchwork summary <pattern>         Per-row stitch tallies
//!   stitchwork export <pattern> -f csv   Pattern as JSON or CSV
//!   stitchwork build <script>            Replay device commands into a pattern

use std::env;

use stitchwork::{suggestion_prompt, EngineConfig, StitchType};

mod cli;

use cli::common::{fail, load_pattern};
use cli::{cmd_build, cmd_chart, cmd_export, cmd_mesh, cmd_summary};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "stitches" => cmd_stitches(),
        "chart" => cmd_chart(&args[2..]),
        "mesh" => cmd_mesh(&args[2..]),
        "summary" => cmd_summary(&args[2..]),
        "export" => cmd_export(&args[2..]),
        "build" => cmd_build(&args[2..]),
        "config" => cmd_config(&args[2..]),
        "prompt" => cmd_prompt(&args[2..]),
        "help" | "--help" | "-h" => print_usage(&args[0]),
        "--version" | "-V" => println!("stitchwork {}", env!("CARGO_PKG_VERSION")),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("stitchwork - crochet pattern geometry and projection");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} stitches", prog);
    eprintln!("  {} chart <pattern> [-o out.svg] [--png out.png] [--scale n] [-c config]", prog);
    eprintln!("  {} mesh <pattern> [-o out.obj] [-c config]", prog);
    eprintln!("  {} summary <pattern> [--json]", prog);
    eprintln!("  {} export <pattern> -f json|csv [-o file]", prog);
    eprintln!("  {} build <script> [-n name] [--mode flat|round] [-o out.json]", prog);
    eprintln!("  {} config --example", prog);
    eprintln!("  {} prompt <pattern>", prog);
    eprintln!();
    eprintln!("Run '{} <command> --help' for command options.", prog);
    eprintln!();
    eprintln!("Pattern files:");
    eprintln!("  .yaml/.yml files parse as YAML, everything else as JSON.");
    eprintln!("  Use '-' to read a pattern from stdin:");
    eprintln!("  cat granny.json | {} chart - -o granny.svg", prog);
    eprintln!();
    eprintln!("Logging:");
    eprintln!("  RUST_LOG=debug {} chart granny.json > /dev/null", prog);
}

fn cmd_stitches() {
    println!("Available stitches:");
    for stitch in StitchType::all() {
        let meta = stitch.metadata();
        println!(
            "  {:<5} {}  h={:.1}  {}  {}",
            stitch.name(),
            stitch.glyph(),
            stitch.height(),
            stitch.default_color(),
            meta.label
        );
    }
}

fn cmd_config(args: &[String]) {
    match args.first().map(|s| s.as_str()) {
        Some("--example") => match EngineConfig::example_yaml() {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => fail(&format!("failed to serialize config: {}", e)),
        },
        Some(path) if !path.starts_with('-') => match EngineConfig::load(path) {
            Ok(config) => match serde_yaml::to_string(&config) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => fail(&format!("failed to serialize config: {}", e)),
            },
            Err(e) => fail(&format!("{}: {}", path, e)),
        },
        _ => {
            eprintln!("stitchwork config - Show engine configuration");
            eprintln!();
            eprintln!("USAGE:");
            eprintln!("    stitchwork config --example    Print the defaults as YAML");
            eprintln!("    stitchwork config <file>       Print a config with defaults filled in");
        }
    }
}

fn cmd_prompt(args: &[String]) {
    let Some(path) = args.first() else {
        eprintln!("USAGE:");
        eprintln!("    stitchwork prompt <pattern>");
        std::process::exit(1);
    };
    let pattern = load_pattern(path);
    print!("{}", suggestion_prompt(&pattern));
}
