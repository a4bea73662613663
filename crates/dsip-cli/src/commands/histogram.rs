//! Histogram summary of an image

use anyhow::{Context, Result};
use dsip_core::scopes::histogram::{self, BINS};

use crate::HistogramArgs;

const CHANNEL_NAMES: [&str; 4] = ["R", "G", "B", "Luma"];

pub fn run(args: HistogramArgs) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let hist = histogram::compute(&image);

    if args.json {
        let json = serde_json::to_string_pretty(&hist).context("Failed to serialize histogram")?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "{}: {}x{}, {} pixels",
        args.input.display(),
        image.width(),
        image.height(),
        hist.total
    );
    for (name, bins) in CHANNEL_NAMES.iter().zip(&hist.bins) {
        let stats = ChannelStats::from_bins(bins);
        println!(
            "  {name:<5} min {:>3}  max {:>3}  mean {:>7.2}  median {:>3}",
            stats.min, stats.max, stats.mean, stats.median
        );
    }
    println!("  peak bin {}", hist.peak);
    Ok(())
}

/// Order statistics read back from a 256-bin histogram.
#[derive(Debug, PartialEq)]
struct ChannelStats {
    min: usize,
    max: usize,
    mean: f64,
    median: usize,
}

impl ChannelStats {
    fn from_bins(bins: &[u32]) -> Self {
        let total: u64 = bins.iter().map(|&c| c as u64).sum();
        if total == 0 {
            return Self {
                min: 0,
                max: 0,
                mean: 0.0,
                median: 0,
            };
        }
        let min = bins.iter().position(|&c| c > 0).unwrap_or(0);
        let max = bins.iter().rposition(|&c| c > 0).unwrap_or(BINS - 1);
        let sum: u64 = bins.iter().enumerate().map(|(v, &c)| v as u64 * c as u64).sum();

        let half = total.div_ceil(2);
        let mut running = 0u64;
        let mut median = max;
        for (v, &c) in bins.iter().enumerate() {
            running += c as u64;
            if running >= half {
                median = v;
                break;
            }
        }

        Self {
            min,
            max,
            mean: sum as f64 / total as f64,
            median,
        }
    }
}
