#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

//! Compares how evenly two key strategies spread keys over a fixed number of buckets.
//!
//! Keys are random ids that are all multiples of `KEY_STRIDE`, a common shape for real
//! identifiers. Hashing them to themselves piles them into the few buckets sharing a factor
//! with the stride, while `DefaultStrategy` scatters them.

use chained_map::{ChainedMap, ConfigError, DefaultStrategy, FnStrategy, KeyStrategy};
use plotters::prelude::*;
use rand::Rng;

const NUM_KEYS: usize = 10_000;
const KEY_STRIDE: i64 = 10;
const BUCKET_COUNTS: [usize; 8] = [10, 16, 50, 64, 100, 128, 500, 1000];
const STRATEGIES: [&str; 2] = ["Identity hash", "DefaultStrategy"];
const OUTPUT: &str = "bucket_distribution.png";

#[derive(Debug, Clone, Copy)]
struct ChainStats {
    average: f64,
    max: usize,
    empty: usize,
}

fn identity(k: &i64) -> i64 {
    *k
}

fn fill<S: KeyStrategy<i64>>(
    strategy: S,
    bucket_count: usize,
    keys: &[i64],
) -> Result<ChainedMap<i64, (), S>, ConfigError> {
    let mut map = ChainedMap::with_bucket_count(strategy, bucket_count)?;
    for &key in keys {
        map.set(key, ());
    }
    Ok(map)
}

fn chain_stats<S>(map: &ChainedMap<i64, (), S>) -> ChainStats {
    let max = map.bucket_lens().max().unwrap_or(0);
    let empty = map.bucket_lens().filter(|&len| len == 0).count();
    ChainStats { average: map.load_factor(), max, empty }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let keys: Vec<i64> =
        (0..NUM_KEYS).map(|_| rng.random_range(0..1_000_000_i64) * KEY_STRIDE).collect();

    let mut max_chain: Vec<Vec<usize>> = vec![Vec::new(); STRATEGIES.len()];

    for &bucket_count in &BUCKET_COUNTS {
        println!("Testing with {bucket_count} buckets");

        let identity_map = fill(
            FnStrategy::new(identity, |a: &i64, b: &i64| a == b),
            bucket_count,
            &keys,
        )?;
        let default_map = fill(DefaultStrategy::new(), bucket_count, &keys)?;

        let results = [chain_stats(&identity_map), chain_stats(&default_map)];
        for (strategy_idx, (&name, stats)) in STRATEGIES.iter().zip(results).enumerate() {
            println!(
                "  {}: Avg chain = {:.2}, Max chain = {}, Empty buckets = {}",
                name, stats.average, stats.max, stats.empty
            );
            max_chain[strategy_idx].push(stats.max);
        }
    }

    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 35;

    let root = BitMapBackend::new(OUTPUT, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = max_chain.iter().flatten().copied().max().unwrap_or(1) as f64 * 1.1;
    let last_idx = BUCKET_COUNTS.len() - 1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Longest Chain by Key Strategy", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..last_idx, 0.0..max_y)?;

    let x_labels: Vec<String> = BUCKET_COUNTS.iter().map(ToString::to_string).collect();

    chart
        .configure_mesh()
        .x_labels(BUCKET_COUNTS.len())
        .x_label_formatter(&|x| x_labels.get(*x).cloned().unwrap_or_default())
        .x_desc("Bucket Count")
        .y_desc("Longest Chain (entries)")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    for (strategy_idx, &name) in STRATEGIES.iter().enumerate() {
        let color = &colors[strategy_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);
        let points: Vec<(usize, f64)> =
            max_chain[strategy_idx].iter().enumerate().map(|(i, &max)| (i, max as f64)).collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            points.iter().map(|&point| Circle::new(point, marker_size, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    println!("Generated plot image: {OUTPUT}");

    Ok(())
}
