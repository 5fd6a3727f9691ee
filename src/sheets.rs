use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{AtelierError, AtelierResult};

/// The spreadsheet-backed system of record. Rows are positional: appended
/// whole, read back whole, and mutated by absolute 1-based row/column.
#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn append_row(&self, row: Vec<String>) -> AtelierResult<()>;
    async fn get_all_values(&self) -> AtelierResult<Vec<Vec<String>>>;
    async fn update_cell(&self, row: u32, col: u32, value: &str) -> AtelierResult<()>;
}

/// Google Sheets v4 values API client for a single spreadsheet tab.
pub struct GoogleSheets {
    client: reqwest::Client,
    sheet_id: String,
    tab: String,
    token: String,
}

impl GoogleSheets {
    pub fn new(sheet_id: String, tab: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            sheet_id,
            tab,
            token,
        }
    }

    /// Build the client from `SHEET_ID` / `SHEET_TAB` / `SHEETS_TOKEN`.
    /// Missing credentials leave the store unconfigured rather than failing
    /// startup; handlers answer with a store-unavailable error instead.
    pub fn from_env() -> Option<Self> {
        let sheet_id = std::env::var("SHEET_ID").ok()?;
        let token = std::env::var("SHEETS_TOKEN").ok().filter(|t| !t.trim().is_empty())?;
        let tab = std::env::var("SHEET_TAB").unwrap_or_else(|_| "Sheet1".to_string());
        Some(Self::new(sheet_id, tab, token.trim().to_string()))
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            self.sheet_id, range
        )
    }

    async fn check(&self, res: reqwest::Response) -> AtelierResult<()> {
        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let body = res.text().await.unwrap_or_default();
        Err(AtelierError::Store(format!("HTTP {}: {}", status, body)))
    }
}

/// 1-based (row, col) to an A1 cell address, e.g. (2, 13) -> "M2".
fn a1_address(row: u32, col: u32) -> String {
    let mut letters = String::new();
    let mut c = col;
    while c > 0 {
        let rem = (c - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        c = (c - 1) / 26;
    }
    format!("{}{}", letters, row)
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn append_row(&self, row: Vec<String>) -> AtelierResult<()> {
        let url = format!("{}:append", self.values_url(&self.tab));
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        self.check(res).await
    }

    async fn get_all_values(&self) -> AtelierResult<Vec<Vec<String>>> {
        let res = self
            .client
            .get(self.values_url(&self.tab))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AtelierError::Store(format!("HTTP {}: {}", status, body)));
        }

        let json: Value = res.json().await?;
        let rows = json
            .get("values")
            .and_then(|v| v.as_array())
            .map(|rows| {
                rows.iter()
                    .map(|row| {
                        row.as_array()
                            .map(|cells| {
                                cells
                                    .iter()
                                    .map(|c| c.as_str().unwrap_or_default().to_string())
                                    .collect()
                            })
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn update_cell(&self, row: u32, col: u32, value: &str) -> AtelierResult<()> {
        let range = format!("{}!{}", self.tab, a1_address(row, col));
        let res = self
            .client
            .put(&self.values_url(&range))
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [[value]] }))
            .send()
            .await?;
        self.check(res).await
    }
}
