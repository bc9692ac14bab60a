use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::client::Client;

pub async fn download_cart(client: &Client, output_path: &Path) -> Result<()> {
    let bytes = client.shopping_cart_csv().await?;

    let mut file = File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("Failed to write to file: {}", output_path.display()))?;

    println!(
        "Saved shopping list to: {} ({} bytes)",
        output_path.display(),
        bytes.len()
    );
    Ok(())
}
