//! Example: Rendering a diagram from typed parameters
//!
//! This example calls a generator directly with its parameter struct instead
//! of going through a JSON request, then exports the scene as SVG.

use protractor::{
    DiagramBuilder,
    generate::{
        Generator,
        quadrilateral::{QuadrilateralGenerator, QuadrilateralKind, QuadrilateralParams},
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let generator = QuadrilateralGenerator::new(QuadrilateralKind::Parallelogram);

    let params = QuadrilateralParams {
        angles: vec![Some("110°".to_string()), Some("x".to_string()), None, None],
        highlight_angles: vec![1],
        show_equal_side_markers: true,
        skew_angle: 20.0,
        caption: Some("Find x.".to_string()),
        ..generator.default_params()
    };

    let scene = generator.generate(&params);
    println!(
        "Scene: {} items, {} arcs, {} markers",
        scene.items().len(),
        scene.arcs().count(),
        scene.markers().count()
    );

    let svg = DiagramBuilder::default().render_svg(&scene)?;
    println!("{svg}");

    Ok(())
}
