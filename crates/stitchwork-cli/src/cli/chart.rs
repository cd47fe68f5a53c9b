//! Chart command: render a pattern's 2D symbol chart to SVG (and PNG).

use stitchwork::{layout, render_chart, ConstructionMode};

use super::common::{fail, flag_value, load_config, load_pattern, write_output};

/// Execute the chart command.
pub fn cmd_chart(args: &[String]) {
    let mut pattern_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut config_path: Option<&str> = None;
    let mut png_output: Option<&str> = None;
    let mut png_scale = 2.0;
    let mut mode: Option<ConstructionMode> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "--output")),
            "-c" | "--config" => config_path = Some(flag_value(args, &mut i, "--config")),
            "--png" => png_output = Some(flag_value(args, &mut i, "--png")),
            "--scale" | "--png-scale" => {
                png_scale = flag_value(args, &mut i, "--scale").parse().unwrap_or(2.0);
            }
            "-m" | "--mode" => {
                let name = flag_value(args, &mut i, "--mode");
                mode = Some(ConstructionMode::from_name(name).unwrap_or_else(|| {
                    fail(&format!("unknown mode '{}'. Use 'flat' or 'round'.", name))
                }));
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

    let config = load_config(config_path);
    let mut pattern = load_pattern(pattern_path);
    if let Some(mode) = mode {
        pattern = pattern.with_mode(mode);
    }

    let placements = layout(&pattern, &config.layout);
    let scene = render_chart(&pattern, &placements, &config.chart);
    eprintln!(
        "Chart: {} rows, {} stitches, {:.0}×{:.0} px ({} mode)",
        pattern.row_count(),
        pattern.stitch_count(),
        scene.width,
        scene.height,
        pattern.mode.name()
    );

    let svg = scene.to_svg();
    write_output(output_path, &svg);

    if let Some(png_path) = png_output {
        generate_png(&svg, png_path, png_scale, scene.width, scene.height);
    }
}

/// Generate PNG from SVG content using resvg.
fn generate_png(svg_content: &str, png_path: &str, scale: f64, width: f64, height: f64) {
    use resvg::usvg;
    use tiny_skia::Pixmap;

    eprint!("Generating PNG at {}x scale...", scale);

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = match usvg::Tree::from_str(svg_content, &options) {
        Ok(t) => t,
        Err(e) => {
            eprintln!(" failed: {}", e);
            std::process::exit(1);
        }
    };

    let pixmap_width = (width * scale).ceil() as u32;
    let pixmap_height = (height * scale).ceil() as u32;

    let mut pixmap = match Pixmap::new(pixmap_width, pixmap_height) {
        Some(p) => p,
        None => {
            eprintln!(" failed: could not create pixmap");
            std::process::exit(1);
        }
    };

    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    match pixmap.save_png(png_path) {
        Ok(_) => eprintln!(" done!\nWrote: {} ({}x{})", png_path, pixmap_width, pixmap_height),
        Err(e) => {
            eprintln!(" failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("stitchwork chart - Render a pattern's symbol chart");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    stitchwork chart <pattern> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -o, --output <file>    Output SVG file (default: stdout)");
    eprintln!("    -c, --config <file>    Engine config (YAML or JSON)");
    eprintln!("    -m, --mode <mode>      Override construction mode: flat, round");
    eprintln!("    --png <file>           Also generate PNG output");
    eprintln!("    --scale <n>            PNG scale factor (default: 2.0)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    stitchwork chart granny.json -o granny.svg --png granny.png");
    eprintln!("    cat swatch.yaml | stitchwork chart - > swatch.svg");
}
