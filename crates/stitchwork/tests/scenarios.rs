//! End-to-end scenarios: author a pattern through a session, then check the
//! chart, 3D scene and exports it produces.

use stitchwork::color::{self, Color};
use stitchwork::{
    parse_command, ChartNode, ConstructionMode, EngineConfig, LineDecoder, Pattern, PatternEvent,
    Point, Session, StitchKind, StitchType,
};

fn session_from_script(script: &str) -> Session {
    let mut session = Session::new(EngineConfig::default());
    let mut decoder = LineDecoder::new();
    let events = decoder.push_events(script);
    session.apply_all(events);
    if let Some(rest) = decoder.finish() {
        session.apply_all(parse_command(&rest));
    }
    session
}

fn parse_svg(svg: &str) -> usvg::Tree {
    usvg::Tree::from_str(svg, &usvg::Options::default()).expect("chart SVG should parse")
}

// ============================================================================
// Chart output
// ============================================================================

#[test]
fn round_chart_svg_is_valid() {
    let session = session_from_script("sc\nsc\nsc\nsc\nsc\nsc\nrow\ninc\ninc\ninc\ninc\ninc\ninc\n");
    let frame = session.frame();

    let svg = frame.chart_scene.to_svg();
    let tree = parse_svg(&svg);
    assert!((tree.size().width() as f64 - frame.chart.width).abs() < 0.01);
    assert!((tree.size().height() as f64 - frame.chart.height).abs() < 0.01);

    // Two rounds, six cells each, ring guides plus a center marker.
    assert_eq!(frame.chart.cell_count(), 12);
    assert!(frame.chart_scene.group("row-1").is_some());
    assert!(frame.chart_scene.group("row-2").is_some());
    assert!(frame
        .chart_scene
        .nodes
        .iter()
        .any(|n| matches!(n, ChartNode::Circle { radius, .. } if *radius == 5.0)));
}

#[test]
fn flat_chart_svg_is_valid_with_awkward_title() {
    let pattern = Pattern::new("Scarf <v2> & \"friends\"", ConstructionMode::Flat)
        .with_stitch(StitchType::Sc)
        .with_stitch(StitchType::Hdc)
        .with_row()
        .with_row()
        .with_stitch(StitchType::Tr);
    let mut session = Session::new(EngineConfig::default());
    session.replace_pattern(pattern);

    let svg = session.frame().chart_scene.to_svg();
    assert!(svg.contains("Scarf &lt;v2&gt; &amp;"));
    parse_svg(&svg);

    // The empty middle row keeps its slot and label.
    let rows = &session.frame().chart.rows;
    assert_eq!(rows.len(), 3);
    assert!(rows[1].cells.is_empty());
    assert!(rows[2].cells[0].center.y < rows[0].cells[0].center.y);
}

#[test]
fn empty_pattern_renders_minimum_chart() {
    let session = Session::new(EngineConfig::default());
    let svg = session.frame().chart_scene.to_svg();
    let tree = parse_svg(&svg);
    assert_eq!(tree.size().width(), 200.0);
    assert!(session.frame().scene.to_obj("empty").lines().all(|l| l.starts_with('#')));
}

// ============================================================================
// Interaction
// ============================================================================

#[test]
fn drag_then_click_is_ignored_then_click_recolors() {
    let mut session = session_from_script("mode:flat\nsc\nsc\nsc\n");
    session.viewport_mut().set_container(800.0, 600.0);
    session.viewport_mut().set_scale(2.0);

    let target = session.frame().chart.rows[0].cells[2].center;
    let screen = session.viewport().to_screen(target);

    // Pan by 40px: the release click must not open the overlay.
    session.viewport_mut().pointer_down(screen);
    session.viewport_mut().pointer_move(screen + Point::new(40.0, 0.0));
    assert!(session.viewport_mut().pointer_up());
    assert!(session.click(screen).is_none());

    // The stitch moved with the pan; click where it is now.
    let screen = session.viewport().to_screen(target);
    let picked = session.click(screen).expect("click should land on the stitch");
    assert_eq!((picked.row_index, picked.stitch_index), (0, 2));
    assert_eq!(picked.current_color, StitchType::Sc.default_color());

    assert!(session.pick_row_color(color::MINT));
    let pattern = session.pattern();
    assert_eq!(pattern.rows[0].color, Some(color::MINT));
    for i in 0..3 {
        assert_eq!(pattern.resolved_color(0, i), Some(color::MINT));
    }
    assert!(session.frame().scene.solids.iter().all(|s| s.body.color == color::MINT));
}

#[test]
fn click_on_empty_space_closes_overlay() {
    let mut session = session_from_script("sc\nsc\nsc\nsc\n");
    session.viewport_mut().set_container(400.0, 400.0);

    let cell = session.frame().chart.rows[0].cells[0].center;
    let screen = session.viewport().to_screen(cell);
    assert!(session.click(screen).is_some());
    assert!(session.overlay_anchor().is_some());

    // The chart's center is empty in ROUND mode.
    let center = session.viewport().to_screen(session.frame().chart.content_center());
    assert!(session.click(center).is_none());
    assert!(session.overlay_anchor().is_none());
    assert!(!session.pick_color(color::CORAL));
}

#[test]
fn overlay_follows_undo() {
    let mut session = session_from_script("mode:flat\nsc\ndc\n");
    session.viewport_mut().set_container(400.0, 400.0);

    let cell = session.frame().chart.rows[0].cells[1].center;
    let screen = session.viewport().to_screen(cell);
    assert!(session.click(screen).is_some());

    // Undo removes the stitch under the overlay; the anchor goes with it.
    assert!(session.apply(PatternEvent::Undo));
    assert!(session.overlay_anchor().is_none());
    assert!(!session.pick_color(Color::rgb(1, 2, 3)));
}

// ============================================================================
// Pattern data
// ============================================================================

#[test]
fn unknown_kinds_survive_and_render_with_fallbacks() {
    let json = r##"{
        "name": "Bobbles",
        "mode": "FLAT",
        "rows": [
            { "id": "a", "stitches": [
                { "id": "x1", "type": "sc" },
                { "id": "x2", "type": "bobble", "color": "#123456" }
            ] }
        ]
    }"##;
    let pattern = Pattern::from_json(json).unwrap();
    assert_eq!(pattern.rows[0].stitches[1].kind, StitchKind::Unrecognized("bobble".into()));

    let mut session = Session::new(EngineConfig::default());
    session.replace_pattern(pattern);
    let frame = session.frame();
    assert_eq!(frame.chart.rows[0].cells[1].glyph, '?');
    assert_eq!(frame.summary.lines(), vec!["R1: 1 SC, 1 BOBBLE".to_string()]);
    assert_eq!(frame.scene.solids.len(), 2);

    // Authoring more keeps the unknown stitch and its id.
    session.apply(PatternEvent::AddStitch(StitchType::Dc));
    let out = session.pattern().to_json_pretty().unwrap();
    let back = Pattern::from_json(&out).unwrap();
    assert_eq!(back.rows[0].stitches[1].id, "x2");
    assert_eq!(back.rows[0].stitches[1].kind.name(), "bobble");
    assert_eq!(back.rows[0].len(), 3);
    assert_ne!(back.rows[0].stitches[2].id, "x1");
    assert_ne!(back.rows[0].stitches[2].id, "x2");
}

#[test]
fn yaml_and_json_describe_the_same_pattern() {
    let yaml = "name: Ring\nmode: ROUND\nrows:\n  - id: r1\n    color: \"#ff9999\"\n    stitches:\n      - { id: s1, type: sc }\n      - { id: s2, type: dc }\n";
    let from_yaml = Pattern::from_yaml(yaml).unwrap();
    let from_json = Pattern::from_json(&from_yaml.to_json_pretty().unwrap()).unwrap();
    assert_eq!(from_yaml, from_json);
    assert_eq!(from_yaml.resolved_color(0, 1), Some(color::CORAL));
}

#[test]
fn obj_faces_reference_existing_vertices() {
    let session = session_from_script("sc\ndc\nrow\ntr\n");
    let obj = session.frame().scene.to_obj("check");

    let vertices = obj.lines().filter(|l| l.starts_with("v ")).count();
    let normals = obj.lines().filter(|l| l.starts_with("vn ")).count();
    assert_eq!(vertices, normals);

    for face in obj.lines().filter(|l| l.starts_with("f ")) {
        for corner in face.split_whitespace().skip(1) {
            let index: usize = corner.split("//").next().unwrap().parse().unwrap();
            assert!(index >= 1 && index <= vertices, "face index {} out of range", index);
        }
    }
}

#[test]
fn suggestions_are_stored_not_applied() {
    let mut session = session_from_script("sc\nsc\n");
    let prompt = stitchwork::suggestion_prompt(session.pattern());
    assert!(prompt.contains("ROUND mode"));
    assert!(prompt.contains(r#"[["sc","sc"]]"#));

    let before = session.pattern().clone();
    session.apply(PatternEvent::Suggestion("Row 2: inc in each st around".into()));
    assert_eq!(session.pattern(), &before);
    assert_eq!(session.suggestion(), Some("Row 2: inc in each st around"));
}
