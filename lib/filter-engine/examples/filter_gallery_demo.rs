/// Filter gallery example
/// Renders every filter over a generated test card


use filter_engine::{FilterKind, ImageFilterEngine, ParameterKey, RasterEngine, Rgba, RgbaImage};
use std::{path::Path, sync::Arc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let card = Arc::new(RgbaImage::from_fn(320, 240, |x, y| {
        let checker = ((x / 40 + y / 40) % 2) as u8 * 60;
        Rgba([(x * 255 / 320) as u8, (y * 255 / 240) as u8, 120 + checker, 255])
    }));

    let engine = RasterEngine::new();

    for &kind in FilterKind::all() {
        let mut graph = engine.instantiate(kind);
        engine.bind_source(&mut graph, card.clone());

        // Slider midpoints, scaled the way the pipeline scales them
        for key in engine.supported_keys(&graph).iter() {
            let value = match key {
                ParameterKey::Intensity => 0.5,
                ParameterKey::Radius => 0.05 * 200.0,
                ParameterKey::Scale => 0.5 * 10.0,
            };
            engine.bind(&mut graph, key, value)?;
        }

        let Some(output) = engine.render(&graph) else {
            println!("✗ {kind} produced no output");
            continue;
        };

        let filename = format!("{}.png", kind.slug());
        output.save(output_dir.join(&filename))?;
        println!("✓ Generated {filename}");
    }

    println!("\n✓ Filter gallery rendered!");
    println!("  Images saved to: tmp/");

    Ok(())
}
