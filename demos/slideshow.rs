//! # Wurstball Slideshow Demo
//!
//! Shows pictures from a folder through the prefetch pipeline, then walks
//! back and forward through the history.
//!
//! Run with: `cargo run --example slideshow -- <picture-folder>`
//! Without a folder, pictures are made up on the fly.

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use wurstball::source::{DirectoryResolver, FileLoader};
use wurstball::{Config, Picture, Wurstball, WurstballResult};

fn main() -> Result<()> {
    wurstball::init_logging();

    let config = Config::default();
    let app = match std::env::args().nth(1) {
        Some(dir) => {
            let resolver = DirectoryResolver::scan(&dir)
                .with_context(|| format!("cannot scan {}", dir))?;
            anyhow::ensure!(!resolver.is_empty(), "no pictures in {}", dir);
            Wurstball::from_collaborators(config, resolver, FileLoader::new())?
        }
        None => Wurstball::from_collaborators(config, made_up_url(), made_up_bytes)?,
    };

    println!("Configuration:");
    println!("   Buffer capacity: {}", app.config().buffer_capacity);
    println!("   History capacity: {}", app.config().history_capacity);
    println!("   Workers: {}", app.config().worker_count);
    println!();

    println!("Showing 12 pictures...");
    for _ in 0..12 {
        match app.next_picture() {
            Some(picture) => describe("next", &picture),
            None => println!("   (no picture available)"),
        }
        thread::sleep(Duration::from_millis(50));
    }
    println!();

    println!("Walking back...");
    while let Some(picture) = app.back() {
        describe("back", &picture);
    }
    println!();

    println!("And forward again...");
    while let Some(picture) = app.forward() {
        describe("forward", &picture);
    }
    println!();

    let stats = app.stats();
    println!("Statistics:");
    println!("   Pictures shown: {}", stats.pictures_shown);
    println!("   Pictures fetched: {}", stats.pool.fetched);
    println!("   Failed fetch cycles: {}", stats.pool.failed_fetches);
    println!("   Still buffered: {}", app.buffered());

    app.shutdown();
    Ok(())
}

fn describe(step: &str, picture: &Picture) {
    match picture.info() {
        Some(info) => println!(
            "   {:>7}: {} ({:?}, {}x{})",
            step,
            picture.url(),
            info.format,
            info.width,
            info.height
        ),
        None => println!("   {:>7}: {} ({} bytes)", step, picture.url(), picture.size()),
    }
}

/// Stands in for scraping: every call names a new picture.
fn made_up_url() -> impl Fn() -> WurstballResult<String> + Send + Sync {
    let counter = AtomicU32::new(0);
    move || {
        let n = counter.fetch_add(1, Ordering::Relaxed);
        Ok(format!("https://wurstball.example/pics/{:04}.jpg", n))
    }
}

/// Stands in for downloading.
fn made_up_bytes(url: &str) -> WurstballResult<Vec<u8>> {
    thread::sleep(Duration::from_millis(20));
    Ok(url.bytes().rev().collect())
}
