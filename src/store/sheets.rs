use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{TableStore, ValueInput};

/// Environment variable holding the OAuth bearer token for the Sheets API.
/// Minting the token from the service-account key happens outside this
/// process (the CI job runs `gcloud auth print-access-token`).
pub const TOKEN_ENV: &str = "SHEETS_ACCESS_TOKEN";

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Whole read range; generous enough for any table this scraper produces.
const READ_RANGE: &str = "A1:ZZ";

#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// First worksheet of one spreadsheet, driven through the Sheets v4
/// `values` endpoints. Only the whole-table operations the pipeline needs
/// are exposed.
pub struct SheetsStore {
    client: Client,
    spreadsheet_key: String,
    token: String,
}

impl SheetsStore {
    /// Open the store. Fails when the token environment variable is not
    /// set; the caller decides whether that kills the run.
    pub fn open(client: Client, spreadsheet_key: &str) -> Result<Self> {
        let token = match std::env::var(TOKEN_ENV) {
            Ok(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => bail!("environment variable {} is not set", TOKEN_ENV),
        };
        Ok(SheetsStore {
            client,
            spreadsheet_key: spreadsheet_key.to_string(),
            token,
        })
    }

    fn values_url(&self, suffix: &str) -> String {
        format!("{}/{}/values/{}", API_BASE, self.spreadsheet_key, suffix)
    }
}

impl TableStore for SheetsStore {
    async fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let resp = self
            .client
            .get(self.values_url(READ_RANGE))
            .bearer_auth(&self.token)
            .send()
            .await
            .context("reading sheet values")?;
        let status = resp.status();
        let body = resp.text().await.context("reading sheet response body")?;
        if !status.is_success() {
            bail!("sheet read failed: {} {}", status, body);
        }
        let range: ValueRange = serde_json::from_str(&body).context("decoding sheet values")?;
        Ok(range.values)
    }

    async fn clear(&self) -> Result<()> {
        let resp = self
            .client
            .post(self.values_url(&format!("{}:clear", READ_RANGE)))
            .bearer_auth(&self.token)
            .send()
            .await
            .context("clearing sheet")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("sheet clear failed: {} {}", status, body);
        }
        Ok(())
    }

    async fn write_all(&self, rows: &[Vec<String>], input: ValueInput) -> Result<()> {
        let body = ValueRange {
            values: rows.to_vec(),
        };
        let resp = self
            .client
            .put(format!(
                "{}?valueInputOption={}",
                self.values_url("A1"),
                input.as_str()
            ))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("writing sheet values")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("sheet write failed: {} {}", status, body);
        }
        Ok(())
    }
}
