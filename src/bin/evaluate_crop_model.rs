//! Evaluate the crop classifier against the reference dataset
//!
//! Loads `Crop_recommendation.csv` (N,P,K,temperature,humidity,ph,rainfall,label)
//! with Polars, predicts every row in parallel and prints accuracy for the
//! exported decision forest and for the pH fallback rule.
//!
//! Usage:
//!   cargo run --features evaluation --bin evaluate_crop_model -- <csv> [model.json]

use agro_advisor::classifier::{CropClassifier, ForestModel, PhThresholdRule};
use agro_advisor::features::{FeatureField, FeatureVector};
use agro_advisor::CropLabel;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Missing column {}", name))?
        .cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn load_rows(path: &PathBuf) -> Result<(Vec<FeatureVector>, Vec<String>, usize)> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.clone()))?
        .finish()
        .with_context(|| format!("Failed to read CSV: {:?}", path))?;

    let columns: Vec<Vec<Option<f64>>> = FeatureField::ORDER
        .iter()
        .map(|field| float_column(&df, field.column_name()))
        .collect::<Result<_>>()?;

    let labels: Vec<Option<String>> = df
        .column("label")
        .context("Missing column label")?
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_lowercase()))
        .collect();

    let mut rows = Vec::with_capacity(df.height());
    let mut truth = Vec::with_capacity(df.height());
    let mut skipped = 0;

    for (i, label) in labels.into_iter().enumerate() {
        let values: Option<Vec<f64>> = columns.iter().map(|c| c[i]).collect();
        match (values, label) {
            (Some(v), Some(label)) => {
                rows.push(FeatureVector {
                    n: v[0],
                    p: v[1],
                    k: v[2],
                    temperature: v[3],
                    humidity: v[4],
                    ph: v[5],
                    rainfall: v[6],
                });
                truth.push(label);
            }
            _ => skipped += 1,
        }
    }

    Ok((rows, truth, skipped))
}

fn report(name: &str, classifier: &CropClassifier, rows: &[FeatureVector], truth: &[String]) {
    let start = Instant::now();
    let predictions = classifier.predict_batch(rows);
    let elapsed = start.elapsed();

    let mut correct = 0usize;
    let mut failures = 0usize;
    let mut per_class: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for (prediction, expected) in predictions.iter().zip(truth) {
        let entry = per_class.entry(expected.as_str()).or_default();
        entry.1 += 1;
        match prediction {
            Ok(label) if label.as_str() == expected => {
                correct += 1;
                entry.0 += 1;
            }
            Ok(_) => {}
            Err(_) => failures += 1,
        }
    }

    let accuracy = if rows.is_empty() {
        0.0
    } else {
        correct as f64 / rows.len() as f64
    };

    println!("{}", name);
    println!(
        "  Accuracy: {:.4} ({}/{}) in {:.1} ms",
        accuracy,
        correct,
        rows.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    if failures > 0 {
        println!("  Prediction failures: {}", failures);
    }
    for (class, (hit, total)) in &per_class {
        let known = if class.parse::<CropLabel>().is_ok() { "" } else { " (unknown label)" };
        println!("    {:<12} {:>4}/{:<4}{}", class, hit, total, known);
    }
    println!();
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let csv_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("Usage: evaluate_crop_model <csv> [model.json]")?;
    let model_path: Option<PathBuf> = args
        .next()
        .or_else(|| std::env::var("MODEL_PATH").ok())
        .map(PathBuf::from);

    println!("\n{}", "=".repeat(70));
    println!("Crop Classifier Evaluation");
    println!("{}", "=".repeat(70));
    println!();

    let (rows, truth, skipped) = load_rows(&csv_path)?;
    println!("Loaded {} rows from {:?} ({} skipped with nulls)\n", rows.len(), csv_path, skipped);

    if let Some(path) = model_path {
        let model = ForestModel::load(&path)?;
        println!(
            "Model: {:?} ({} trees, {} classes)\n",
            path,
            model.tree_count(),
            model.classes().len()
        );
        report("Decision forest", &CropClassifier::Trained(model), &rows, &truth);
    } else {
        println!("No model given; evaluating the pH rule only\n");
    }

    report(
        "pH rule fallback",
        &CropClassifier::RuleFallback(PhThresholdRule::default()),
        &rows,
        &truth,
    );

    Ok(())
}
