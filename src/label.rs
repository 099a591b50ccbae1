//! Relabel an existing release asset
//!
//! Select the release by tag, the asset by id or file name, then PATCH the
//! asset with its (possibly new) name and the display label.

use crate::client::ApiClient;
use crate::release::{self, AssetSelector};
use anyhow::Result;
use console::style;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RelabelRequest<'a> {
    name: &'a str,
    label: &'a str,
}

/// Set the display label of the asset `filename` on the release `tag`.
///
/// When `asset_id` is given the asset is selected by id instead of by name;
/// `filename` still becomes the asset's name after the PATCH.
pub async fn label(
    client: &ApiClient,
    api_url: &str,
    owner: &str,
    repository: &str,
    tag: &str,
    asset_id: Option<u64>,
    filename: &str,
    new_label: &str,
) -> Result<()> {
    print!("  {} Finding release {tag}... ", style("→").cyan());
    let release = release::find_release(client, api_url, owner, repository, tag).await?;
    println!("{} id {}", style("✓").green(), release.id);

    let selector = asset_id.map_or(AssetSelector::Name(filename), AssetSelector::Id);
    let asset = release::find_asset(&release.assets, &selector)?;

    let request = RelabelRequest {
        name: filename,
        label: new_label,
    };
    let updated: serde_json::Value = client.patch(&asset.url, &request).await?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}
