//! Google Sheets backend (Sheets API v4 over REST).

use super::google_auth::{ServiceAccount, TokenSource};
use crate::error::{StorageError, StorageResult};
use crate::traits::{RawRow, SheetInfo, SheetStore};
use async_trait::async_trait;
use liftsheet_core::config::ServiceAccountConfig;
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Spreadsheet stored in Google Sheets.
pub struct GoogleSheetsBackend {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    credentials: TokenSource,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

impl From<SheetProperties> for SheetInfo {
    fn from(p: SheetProperties) -> Self {
        SheetInfo {
            sheet_id: p.sheet_id,
            title: p.title,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GoogleSheetsBackend {
    /// Create a client for one spreadsheet using a fixed bearer token.
    pub fn new(
        endpoint: &str,
        spreadsheet_id: &str,
        access_token: &str,
        timeout: Duration,
    ) -> StorageResult<Self> {
        Self::build(
            endpoint,
            spreadsheet_id,
            TokenSource::Static(access_token.to_string()),
            timeout,
        )
    }

    /// Create a client that mints its own tokens from a service account key.
    pub fn with_service_account(
        endpoint: &str,
        spreadsheet_id: &str,
        account: &ServiceAccountConfig,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let account = ServiceAccount::from_config(account)?;
        Self::build(
            endpoint,
            spreadsheet_id,
            TokenSource::ServiceAccount(account),
            timeout,
        )
    }

    fn build(
        endpoint: &str,
        spreadsheet_id: &str,
        credentials: TokenSource,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let base_url = Url::parse(endpoint)
            .map_err(|e| StorageError::Config(format!("invalid google endpoint: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Config(format!(
                "google endpoint '{endpoint}' cannot be used as a base URL"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            spreadsheet_id: spreadsheet_id.to_string(),
            credentials,
        })
    }

    /// `{endpoint}/v4/spreadsheets/{id}{suffix}/{rest...}`
    fn url(&self, suffix: &str, rest: &[&str]) -> StorageResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StorageError::Config("google endpoint is not a base URL".into()))?;
            segments.pop_if_empty();
            segments.push("v4");
            segments.push("spreadsheets");
            segments.push(&format!("{}{suffix}", self.spreadsheet_id));
            segments.extend(rest);
        }
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> StorageResult<T> {
        let token = self.credentials.token(&self.http).await?;
        let response = req.bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("access token rejected, discarding cached token");
            self.credentials.invalidate().await;
        }
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn spreadsheet(&self) -> StorageResult<SpreadsheetResponse> {
        let mut url = self.url("", &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties");
        self.send_json(self.http.get(url)).await
    }

    async fn sheet_id(&self, title: &str) -> StorageResult<i64> {
        self.list_sheets()
            .await?
            .into_iter()
            .find(|s| s.title == title)
            .map(|s| s.sheet_id)
            .ok_or_else(|| StorageError::NotFound(title.to_string()))
    }

    async fn batch_update(&self, requests: Value) -> StorageResult<BatchUpdateResponse> {
        let url = self.url(":batchUpdate", &[])?;
        self.send_json(self.http.post(url).json(&json!({ "requests": requests })))
            .await
    }

    async fn get_values(&self, title: &str, range: &str) -> StorageResult<Vec<RawRow>> {
        let url = self.url("", &["values", range])?;
        let values: ValueRange = self
            .send_json(self.http.get(url))
            .await
            .map_err(|e| missing_sheet(e, title))?;
        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn put_row(&self, title: &str, row_number: usize, row: RawRow) -> StorageResult<()> {
        let range = format!("{}!A{row_number}", quote_title(title));
        let mut url = self.url("", &["values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({ "range": range, "majorDimension": "ROWS", "values": [row] });
        let _: Value = self
            .send_json(self.http.put(url).json(&body))
            .await
            .map_err(|e| missing_sheet(e, title))?;
        Ok(())
    }
}

/// A1 notation requires quoting titles; embedded quotes are doubled.
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn api_error(status: u16, body: &str) -> StorageError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());
    StorageError::Api { status, message }
}

/// The values API reports an unknown sheet as an unparsable range.
fn missing_sheet(err: StorageError, title: &str) -> StorageError {
    match err {
        StorageError::Api { status: 400, message } if message.contains("Unable to parse range") => {
            StorageError::NotFound(title.to_string())
        }
        other => other,
    }
}

/// addSheet reports a taken title as a 400 "already exists".
fn duplicate_sheet(err: StorageError, title: &str) -> StorageError {
    match err {
        StorageError::Api { status: 400, message } if message.contains("already exists") => {
            StorageError::AlreadyExists(title.to_string())
        }
        other => other,
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsBackend {
    #[instrument(skip(self), fields(backend = "google"))]
    async fn document_title(&self) -> StorageResult<String> {
        let doc = self.spreadsheet().await?;
        debug!(title = %doc.properties.title, "loaded spreadsheet info");
        Ok(doc.properties.title)
    }

    async fn list_sheets(&self) -> StorageResult<Vec<SheetInfo>> {
        let doc = self.spreadsheet().await?;
        Ok(doc
            .sheets
            .into_iter()
            .map(|s| SheetInfo::from(s.properties))
            .collect())
    }

    #[instrument(skip(self, header), fields(backend = "google"))]
    async fn add_sheet(&self, title: &str, header: &[String]) -> StorageResult<SheetInfo> {
        if self.list_sheets().await?.iter().any(|s| s.title == title) {
            return Err(StorageError::AlreadyExists(title.to_string()));
        }

        // Another writer may add the sheet between the check and the request.
        let response = self
            .batch_update(json!([{ "addSheet": { "properties": { "title": title } } }]))
            .await
            .map_err(|e| duplicate_sheet(e, title))?;
        let properties = response
            .replies
            .into_iter()
            .next()
            .and_then(|reply| reply.get("addSheet")?.get("properties").cloned())
            .ok_or_else(|| StorageError::Api {
                status: 200,
                message: "addSheet reply missing sheet properties".to_string(),
            })?;
        let properties: SheetProperties = serde_json::from_value(properties)?;

        self.put_row(title, 1, header.to_vec()).await?;
        Ok(properties.into())
    }

    #[instrument(skip(self), fields(backend = "google"))]
    async fn delete_sheet(&self, title: &str) -> StorageResult<()> {
        let sheet_id = self.sheet_id(title).await?;
        self.batch_update(json!([{ "deleteSheet": { "sheetId": sheet_id } }]))
            .await?;
        Ok(())
    }

    async fn header_row(&self, title: &str) -> StorageResult<RawRow> {
        let range = format!("{}!1:1", quote_title(title));
        Ok(self
            .get_values(title, &range)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    #[instrument(skip(self), fields(backend = "google"))]
    async fn rows(&self, title: &str) -> StorageResult<Vec<RawRow>> {
        let mut rows = self.get_values(title, &quote_title(title)).await?;
        if !rows.is_empty() {
            rows.remove(0);
        }
        Ok(rows)
    }

    #[instrument(skip(self, row), fields(backend = "google"))]
    async fn append_row(&self, title: &str, row: RawRow) -> StorageResult<()> {
        let range = quote_title(title);
        let mut url = self.url("", &["values", &format!("{range}:append")])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = json!({ "range": range, "majorDimension": "ROWS", "values": [row] });
        let _: Value = self
            .send_json(self.http.post(url).json(&body))
            .await
            .map_err(|e| missing_sheet(e, title))?;
        Ok(())
    }

    #[instrument(skip(self, row), fields(backend = "google"))]
    async fn update_row(&self, title: &str, index: usize, row: RawRow) -> StorageResult<()> {
        // Data row 0 is sheet row 2.
        self.put_row(title, index + 2, row).await
    }

    #[instrument(skip(self), fields(backend = "google"))]
    async fn delete_row(&self, title: &str, index: usize) -> StorageResult<()> {
        let sheet_id = self.sheet_id(title).await?;
        let start = index + 1;
        self.batch_update(json!([{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": start,
                    "endIndex": start + 1
                }
            }
        }]))
        .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "google"
    }
}
