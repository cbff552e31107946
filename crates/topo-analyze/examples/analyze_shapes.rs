//! Analyze a few generated shapes and print their invariant records.
//!
//! Run with: RUST_LOG=topo_analyze=debug cargo run --example analyze_shapes

use image::{GrayImage, Luma};
use std::io::Cursor;
use topo_analyze::{analyze_batch, analyze_encoded, AnalyzeConfig, BatchSummary, BinaryImage};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Generating a perforated plate...\n");

    // A 120x90 plate with three round pores and one loose chip inside a pore.
    let mut img = GrayImage::from_pixel(120, 90, Luma([0]));
    draw_circle(&mut img, 60, 45, 40, 255);
    draw_circle(&mut img, 45, 35, 8, 0);
    draw_circle(&mut img, 75, 35, 8, 0);
    draw_circle(&mut img, 60, 60, 10, 0);
    draw_circle(&mut img, 60, 60, 4, 255);

    let mut png_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .expect("Failed to encode PNG");

    println!("Generated {}x{} PNG image ({} bytes)\n", img.width(), img.height(), png_bytes.len());

    let config = AnalyzeConfig::default();
    match analyze_encoded(&png_bytes, &config) {
        Ok(record) => {
            println!("=== Invariant Record ===\n");
            println!("{}", serde_json::to_string_pretty(&record).expect("record serializes"));
        }
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
        }
    }

    println!("\n=== Batch ===\n");

    let shapes = vec![
        ("square", BinaryImage::from_art(&["##", "##"]).expect("valid art")),
        ("ring", BinaryImage::from_art(&["###", "#.#", "###"]).expect("valid art")),
        (
            "nested",
            BinaryImage::from_art(&["#####", "#...#", "#.#.#", "#...#", "#####"])
                .expect("valid art"),
        ),
        ("diamond", BinaryImage::from_art(&[".#.", "#.#", ".#."]).expect("valid art")),
    ];
    let images: Vec<BinaryImage> = shapes.iter().map(|(_, img)| img.clone()).collect();
    let results = analyze_batch(&images, &config);

    println!(
        "{:<10} {:>3} {:>3} {:>5} {:>5} {:>5} {:>5}  consistent",
        "shape", "β0", "β1", "vef", "betti", "vcc", "3ot"
    );
    for ((name, _), result) in shapes.iter().zip(&results) {
        match result {
            Ok(r) => println!(
                "{:<10} {:>3} {:>3} {:>5} {:>5} {:>5} {:>5}  {}",
                name,
                r.beta0,
                r.beta1,
                r.euler_vef,
                r.euler_poincare,
                r.vcc.x,
                r.ot3.x,
                r.is_consistent()
            ),
            Err(e) => println!("{:<10} error: {}", name, e),
        }
    }

    let summary = BatchSummary::from_results(&results);
    println!(
        "\n{} analyzed, {} failed, {} inconsistent",
        summary.analyzed, summary.failed, summary.inconsistent
    );
}

fn draw_circle(img: &mut GrayImage, cx: i64, cy: i64, r: i64, value: u8) {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, Luma([value]));
            }
        }
    }
}
