//! The `scan` subcommand.

use gdrcam_cli::output::{format_count, format_size, Status};
use gdrcam_cli::progress::{file_progress, finish_success};
use gdrcam_core::config::Config;
use gdrcam_core::error::exit_codes;
use gdrcam_image::{extract_metadata, AspectPolicy, ImageMetadata};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

struct Scanned {
    path: PathBuf,
    meta: ImageMetadata,
    needs_crop: bool,
}

pub fn run(dir: &Path, json: bool, config: &Config) -> i32 {
    if !dir.is_dir() {
        Status::error(&format!("Not a directory: {}", dir.display()));
        return exit_codes::FAILURE;
    }

    let [ratio_w, ratio_h] = config.schema.pipeline.landscape_ratio;
    let policy = AspectPolicy {
        landscape: (ratio_w, ratio_h),
        tolerance: config.schema.pipeline.crop_tolerance,
    };

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    let pb = file_progress(files.len() as u64);
    let mut scanned: Vec<Scanned> = files
        .par_iter()
        .progress_with(pb.clone())
        .filter_map(|path| {
            let data = std::fs::read(path).ok()?;
            let meta = extract_metadata(&data)?;
            let needs_crop = meta.needs_crop(&policy);
            Some(Scanned { path: path.clone(), meta, needs_crop })
        })
        .collect();
    finish_success(&pb, "Scan complete");
    scanned.sort_by(|a, b| a.path.cmp(&b.path));

    if json {
        let rows: Vec<_> = scanned
            .iter()
            .map(|s| {
                serde_json::json!({
                    "path": s.path.to_string_lossy(),
                    "metadata": s.meta,
                    "needsCrop": s.needs_crop,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&rows) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                Status::error(&format!("JSON serialize error: {}", e));
                return exit_codes::FAILURE;
            }
        }
        return exit_codes::SUCCESS;
    }

    let total_bytes: u64 = scanned.iter().map(|s| s.meta.size_bytes as u64).sum();
    let tagged = scanned.iter().filter(|s| s.meta.has_tags).count();
    let located = scanned.iter().filter(|s| s.meta.has_gps).count();
    let to_crop = scanned.iter().filter(|s| s.needs_crop).count();

    Status::header(&format!("Found {}", format_count(scanned.len(), "image", "images")));
    Status::field("Total size", format_size(total_bytes));
    Status::field("With embedded tags", tagged);
    Status::field("With GPS", located);
    Status::field("Need cropping", to_crop);
    exit_codes::SUCCESS
}
