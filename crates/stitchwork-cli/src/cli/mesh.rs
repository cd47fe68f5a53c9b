//! Mesh command: export the 3D stitch scene as Wavefront OBJ.

use stitchwork::{build_scene, layout};

use super::common::{fail, flag_value, load_config, load_pattern, stem, write_output};

/// Execute the mesh command.
pub fn cmd_mesh(args: &[String]) {
    let mut pattern_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut config_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "--output")),
            "-c" | "--config" => config_path = Some(flag_value(args, &mut i, "--config")),
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
    let pattern = load_pattern(pattern_path);

    let placements = layout(&pattern, &config.layout);
    let scene = build_scene(&pattern, &placements, &config.solid);

    let name = if pattern.name.is_empty() {
        stem(pattern_path)
    } else {
        pattern.name.clone()
    };

    eprintln!(
        "Mesh: {} stitches, {} meshes, {} triangles",
        scene.solids.len(),
        scene.mesh_count(),
        scene.triangle_count()
    );
    if let Some((min, max)) = scene.bounding_box() {
        eprintln!(
            "Bounds: ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    write_output(output_path, &scene.to_obj(&name));
}

/// Print usage information.
pub fn print_usage() {
    eprintln!("stitchwork mesh - Export the 3D stitch scene as OBJ");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    stitchwork mesh <pattern> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -o, --output <file>    Output OBJ file (default: stdout)");
    eprintln!("    -c, --config <file>    Engine config (YAML or JSON)");
    eprintln!();
    eprintln!("Each stitch becomes two objects, r<row>_s<stitch>_body and");
    eprintln!("r<row>_s<stitch>_loop. Vertex colors follow the stitch color.");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    stitchwork mesh granny.json -o granny.obj");
}
