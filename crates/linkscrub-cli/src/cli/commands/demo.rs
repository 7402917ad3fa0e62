//! `linkscrub demo` – run `clean --resolve` on a bundled share text.

use anyhow::{bail, Result};
use linkscrub_core::session::ButtonType;

use super::clean::{run_clean, CleanArgs};
use crate::cli::Context;

/// Share texts as shopping apps produce them: a title line, then a short link.
pub const SAMPLES: &[&str] = &[
    "PURELL Advanced Hand Sanitizer Refreshing Gel, Clean Scent, 1 Liter Pump Bottle\nhttps://a.co/d/hkteY4t",
    "Lysol Disinfectant Spray, Sanitizing and Antibacterial Spray, For Disinfecting and Deodorizing\nhttps://a.co/d/0ZV7xf0",
    "Clorox Disinfecting Wipes Value Pack, Household Essentials, 75 Count, Pack of 3\nhttps://a.co/d/9xKu4bV",
    "Mr. Clean 2X Concentrated Multi Surface Cleaner with Unstopables Fresh Scent\nhttps://a.co/d/6G5uQeb",
    "Dial Antibacterial Foaming Hand Wash, Spring Water, 7.5 fl oz (Pack of 6)\nhttps://a.co/d/b2zLzd2",
];

pub async fn run_demo(ctx: &Context, index: usize, list: bool) -> Result<i32> {
    if list {
        for (i, sample) in SAMPLES.iter().enumerate() {
            println!("{i}: {}", sample.replace('\n', " | "));
        }
        return Ok(0);
    }
    let Some(text) = SAMPLES.get(index) else {
        bail!("no sample {index}; there are {} (0-{})", SAMPLES.len(), SAMPLES.len() - 1);
    };
    eprintln!("{text}");
    let args = CleanArgs {
        text: text.to_string(),
        resolve: true,
        keep: Vec::new(),
        action: ButtonType::Return,
    };
    run_clean(ctx, args).await
}
