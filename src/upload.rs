//! Upload flows
//!
//! Two ways to get a binary onto the server: the pre-signed storage form
//! flow (prepare against the API, then POST a multipart form to the storage
//! URL) and the direct release-asset push (multipart POST straight to the
//! release's upload endpoint).

use crate::client::{self, ApiClient};
use crate::multipart::FormBody;
use crate::release::{self, Asset};
use anyhow::{Context, Result};
use console::style;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Request body for preparing a pre-signed upload.
#[derive(Debug, Serialize)]
struct PrepareRequest<'a> {
    name: &'a str,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'a str>,
}

/// Pre-signed form description returned by the prepare call.
#[derive(Debug, Deserialize)]
struct PreparedUpload {
    path: String,
    acl: String,
    name: String,
    accesskeyid: String,
    policy: String,
    signature: String,
    mime_type: String,
    s3_url: String,
}

/// Where an interrupted upload caches its prepared form.
fn resume_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.upload.tmp", path.display()))
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("No file name in path: {}", path.display()))
}

/// Fetch or replay the prepared form for `path`.
///
/// The prepare call allocates server-side state, so its response is cached
/// next to the file and reused when a previous run died before the storage
/// POST went through.
async fn prepare_upload(
    client: &ApiClient,
    api_url: &str,
    owner: &str,
    repository: &str,
    path: &Path,
    size: usize,
    description: Option<&str>,
    mime: Option<&str>,
) -> Result<PreparedUpload> {
    let resume = resume_path(path);
    if resume.exists() {
        println!(
            "  {} Reusing prepared upload from {}",
            style("→").cyan(),
            resume.display()
        );
        let cached = std::fs::read(&resume)
            .with_context(|| format!("Failed to read {}", resume.display()))?;
        return serde_json::from_slice(&cached)
            .with_context(|| format!("Stale prepare cache {}; delete it and retry", resume.display()));
    }

    let filename = file_name_of(path)?;
    let request = PrepareRequest {
        name: &filename,
        size,
        description,
        content_type: mime,
    };
    let url = format!("{api_url}/repos/{owner}/{repository}/downloads");
    let prepared: serde_json::Value = client.post(&url, &request).await?;
    println!("  {} Prepared {filename}", style("✓").green());

    // Cache the raw response before acting on it
    std::fs::write(&resume, serde_json::to_vec(&prepared)?)
        .with_context(|| format!("Failed to write {}", resume.display()))?;
    Ok(serde_json::from_value(prepared)?)
}

/// Upload `path` through the pre-signed storage form flow.
pub async fn upload(
    client: &ApiClient,
    api_url: &str,
    owner: &str,
    repository: &str,
    path: &Path,
    description: Option<&str>,
    mime: Option<&str>,
) -> Result<()> {
    println!("{}", style("=== Uploading via storage form ===\n").bold().cyan());

    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = file_name_of(path)?;

    let prepared = prepare_upload(
        client,
        api_url,
        owner,
        repository,
        path,
        data.len(),
        description,
        mime,
    )
    .await?;

    // Field order matters to some storage backends: policy fields first,
    // the file part last.
    let mut form = FormBody::new();
    form.add_text("key", &prepared.path);
    form.add_text("acl", &prepared.acl);
    form.add_text("success_action_status", "201");
    form.add_text("Filename", &prepared.name);
    form.add_text("AWSAccessKeyId", &prepared.accesskeyid);
    form.add_text("Policy", &prepared.policy);
    form.add_text("Signature", &prepared.signature);
    form.add_text("Content-Type", &prepared.mime_type);
    form.add_file("file", data, Some(&filename), mime);

    let content_type = form.content_type();
    let body = form.render();
    let status = client::post_form(&prepared.s3_url, &content_type, body).await?;
    println!("Uploading {filename}: {status}");

    // The prepared form is single-use; drop the resume cache
    let _ = std::fs::remove_file(resume_path(path));

    println!("\n{} Upload complete!", style("✓").green());
    Ok(())
}

/// Push `path` directly onto the release tagged `tag` as an asset.
pub async fn push(
    client: &ApiClient,
    api_url: &str,
    owner: &str,
    repository: &str,
    tag: &str,
    create: bool,
    path: &Path,
    mime: Option<&str>,
) -> Result<()> {
    println!("{}", style("=== Pushing release asset ===\n").bold().cyan());

    print!("  {} Finding release {tag}... ", style("→").cyan());
    let release =
        release::find_or_create_release(client, api_url, owner, repository, tag, create).await?;
    println!("{} id {}", style("✓").green(), release.id);

    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = file_name_of(path)?;

    let mut form = FormBody::new();
    form.add_file("file", data, Some(&filename), mime);
    let content_type = form.content_type();
    let body = form.render();

    let url = release::asset_upload_url(&release.upload_url, &filename);
    let asset: Asset = client.post_bytes(&url, &content_type, body).await?;
    println!(
        "  {} Uploaded {} as asset id {}",
        style("✓").green(),
        asset.name,
        asset.id
    );
    Ok(())
}
