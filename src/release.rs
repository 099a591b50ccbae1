//! Release and asset data model plus selection logic
//!
//! Sequential, read-then-act queries: list releases, find by tag (optionally
//! create), list assets, find by id or name. First match wins, no retries.

use crate::client::ApiClient;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};

/// A release as returned by the API. Only the fields the flows touch.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Numeric release id
    pub id: u64,
    /// Git tag this release points at
    pub tag_name: String,
    /// Display name, when set
    pub name: Option<String>,
    /// Asset upload endpoint, as a URI template (`{?name,label}` suffix)
    pub upload_url: String,
    /// Assets already attached to the release
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A release asset. Only the fields the flows touch.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    /// Numeric asset id
    pub id: u64,
    /// Asset file name
    pub name: String,
    /// API URL of this asset (PATCH target for relabeling)
    pub url: String,
    /// Display label, when set
    pub label: Option<String>,
}

/// Body for creating a release when `--create` is given.
#[derive(Debug, Serialize)]
pub struct NewRelease<'a> {
    /// Tag the new release points at
    pub tag_name: &'a str,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

/// Which asset to select out of a release's asset list.
#[derive(Debug, Clone)]
pub enum AssetSelector<'a> {
    /// Match on the numeric asset id
    Id(u64),
    /// Match on the asset file name
    Name(&'a str),
}

/// Pick the first release whose tag matches, if any.
#[must_use]
pub fn match_release<'a>(releases: &'a [Release], tag: &str) -> Option<&'a Release> {
    releases.iter().find(|release| release.tag_name == tag)
}

/// Pick the first asset matching the selector.
pub fn find_asset<'a>(assets: &'a [Asset], selector: &AssetSelector<'_>) -> Result<&'a Asset> {
    let found = match selector {
        AssetSelector::Id(id) => assets.iter().find(|asset| asset.id == *id),
        AssetSelector::Name(name) => assets.iter().find(|asset| asset.name == *name),
    };
    found.ok_or_else(|| CliError::AssetNotFound {
        wanted: match selector {
            AssetSelector::Id(id) => id.to_string(),
            AssetSelector::Name(name) => (*name).to_string(),
        },
    })
}

/// List the repository's releases and return the one matching `tag`.
pub async fn find_release(
    client: &ApiClient,
    api_url: &str,
    owner: &str,
    repository: &str,
    tag: &str,
) -> Result<Release> {
    let url = format!("{api_url}/repos/{owner}/{repository}/releases");
    let releases: Vec<Release> = client.get(&url).await?;
    match_release(&releases, tag)
        .cloned()
        .ok_or_else(|| CliError::ReleaseNotFound {
            tag: tag.to_string(),
        })
}

/// Find the release for `tag`, creating it when absent and `create` is set.
pub async fn find_or_create_release(
    client: &ApiClient,
    api_url: &str,
    owner: &str,
    repository: &str,
    tag: &str,
    create: bool,
) -> Result<Release> {
    match find_release(client, api_url, owner, repository, tag).await {
        Ok(release) => Ok(release),
        Err(CliError::ReleaseNotFound { .. }) if create => {
            let url = format!("{api_url}/repos/{owner}/{repository}/releases");
            let body = NewRelease {
                tag_name: tag,
                name: None,
            };
            client.post(&url, &body).await
        }
        Err(err) => Err(err),
    }
}

/// Turn a release's templated `upload_url` into a concrete upload endpoint
/// for `filename`.
///
/// The API hands back `.../assets{?name,label}`; the template suffix is
/// dropped and the name appended as a query parameter.
#[must_use]
pub fn asset_upload_url(upload_url: &str, filename: &str) -> String {
    let base = upload_url
        .find('{')
        .map_or(upload_url, |at| &upload_url[..at]);
    format!("{base}?name={}", urlencoding::encode(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_releases() -> Vec<Release> {
        let json = serde_json::json!([
            {
                "id": 1,
                "tag_name": "v0.9",
                "name": "Ancient",
                "upload_url": "https://uploads.example/repos/o/r/releases/1/assets{?name,label}",
                "assets": []
            },
            {
                "id": 2,
                "tag_name": "v1.0",
                "name": null,
                "upload_url": "https://uploads.example/repos/o/r/releases/2/assets{?name,label}",
                "assets": [
                    {"id": 10, "name": "a.bin", "url": "https://api.example/assets/10", "label": null},
                    {"id": 11, "name": "b.bin", "url": "https://api.example/assets/11", "label": "B"},
                    {"id": 12, "name": "a.bin", "url": "https://api.example/assets/12", "label": null}
                ]
            }
        ]);
        serde_json::from_value(json).unwrap_or_default()
    }

    #[test]
    fn release_matching_is_first_match_on_tag() {
        let releases = sample_releases();
        let release = match_release(&releases, "v1.0");
        assert_eq!(release.map(|r| r.id), Some(2));
        assert!(match_release(&releases, "v2.0").is_none());
    }

    #[test]
    fn asset_selection_by_id_and_by_name() {
        let releases = sample_releases();
        let assets = &releases[1].assets;

        let by_id = find_asset(assets, &AssetSelector::Id(11));
        assert!(matches!(by_id, Ok(asset) if asset.name == "b.bin"));

        // duplicate names resolve to the first match
        let by_name = find_asset(assets, &AssetSelector::Name("a.bin"));
        assert!(matches!(by_name, Ok(asset) if asset.id == 10));

        let missing = find_asset(assets, &AssetSelector::Name("missing.bin"));
        assert!(matches!(missing, Err(CliError::AssetNotFound { wanted }) if wanted == "missing.bin"));
    }

    #[test]
    fn upload_url_template_is_expanded() {
        assert_eq!(
            asset_upload_url(
                "https://uploads.example/repos/o/r/releases/2/assets{?name,label}",
                "a b.bin"
            ),
            "https://uploads.example/repos/o/r/releases/2/assets?name=a%20b.bin"
        );
        // already-concrete URLs pass through
        assert_eq!(
            asset_upload_url("https://uploads.example/assets", "x"),
            "https://uploads.example/assets?name=x"
        );
    }
}
