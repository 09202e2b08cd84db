//! `lcr-bench models`

use crate::console;
use anyhow::{Context, Result};
use colored::*;
use lcr_core::config::{load_models_file, mask_api_key};
use std::path::Path;

/// Print every configured model with its endpoint and masked key
pub fn list(models_path: &Path) -> Result<()> {
    let registry = load_models_file(models_path)
        .with_context(|| format!("Failed to load {}", models_path.display()))?;

    if registry.is_empty() {
        console::warn(&format!("No models defined in {}", models_path.display()));
        return Ok(());
    }

    console::print_header(&format!("Models in {}", models_path.display()));
    for name in registry.names() {
        let model = registry.get(&name)?;
        println!(
            "{:<32} {:<48} {} max_tokens={}",
            name.bold(),
            model.base_url,
            mask_api_key(&model.api_key).dimmed(),
            model.max_tokens
        );
    }
    println!("\nTotal: {} models", registry.len());
    Ok(())
}
