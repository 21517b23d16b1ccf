use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{Candidate, ContentNode, ContentStore, NodeKind, StoreError};
use crate::settings::Settings;

/// Largest page the blocks endpoint will return in one call.
const PAGE_SIZE: u32 = 100;

/// Read-only client for the Notion REST API.
pub struct NotionClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    version: String,
    database_id: String,
    name_property: String,
    date_property: String,
}

#[derive(Deserialize)]
struct ListResponse<T> {
    results: Vec<T>,
}

#[derive(Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    properties: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct BlockObject {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    body: HashMap<String, Value>,
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DatabaseObject {
    #[serde(default)]
    title: Vec<Value>,
    #[serde(default)]
    properties: BTreeMap<String, PropertySchema>,
}

#[derive(Debug, Deserialize)]
struct PropertySchema {
    #[serde(rename = "type")]
    kind: String,
}

/// Database title and its columns, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSchema {
    pub title: String,
    pub properties: Vec<(String, String)>,
}

impl NotionClient {
    pub fn new(settings: &Settings) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            version: settings.version.clone(),
            database_id: settings.database_id.clone(),
            name_property: settings.name_property.clone(),
            date_property: settings.date_property.clone(),
        })
    }

    /// Fetch the database definition.
    pub async fn retrieve_schema(&self) -> Result<DatabaseSchema, StoreError> {
        let url = format!("{}/v1/databases/{}", self.api_url, self.database_id);
        let db: DatabaseObject = self.send(self.http.get(url)).await?;
        Ok(DatabaseSchema {
            title: first_plain_text(&db.title).unwrap_or_else(|| "Untitled".into()),
            properties: db
                .properties
                .into_iter()
                .map(|(name, schema)| (name, schema.kind))
                .collect(),
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn to_candidate(&self, page: PageObject) -> Candidate {
        let full_name = page
            .properties
            .get(&self.name_property)
            .and_then(property_text);
        let recording_date = page
            .properties
            .get(&self.date_property)
            .and_then(|p| p.get("date"))
            .and_then(|d| d.get("start"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Candidate {
            id: page.id,
            full_name,
            recording_date,
        }
    }
}

#[async_trait]
impl ContentStore for NotionClient {
    async fn query_by_name(&self, fragment: &str) -> Result<Vec<Candidate>, StoreError> {
        let url = format!("{}/v1/databases/{}/query", self.api_url, self.database_id);
        let body = json!({
            "filter": {
                "property": self.name_property,
                "rich_text": { "contains": fragment },
            }
        });
        let list: ListResponse<PageObject> = self.send(self.http.post(url).json(&body)).await?;
        debug!("Name query {:?} returned {} pages", fragment, list.results.len());
        Ok(list
            .results
            .into_iter()
            .map(|page| self.to_candidate(page))
            .collect())
    }

    async fn list_children(&self, node_id: &str) -> Result<Vec<ContentNode>, StoreError> {
        let url = format!("{}/v1/blocks/{}/children", self.api_url, node_id);
        let request = self.http.get(url).query(&[("page_size", PAGE_SIZE)]);
        let list: ListResponse<BlockObject> = self.send(request).await?;
        Ok(list.results.into_iter().map(BlockObject::into_node).collect())
    }
}

impl BlockObject {
    fn into_node(self) -> ContentNode {
        let payload = self.body.get(&self.kind);
        let text_runs = payload
            .and_then(|p| p.get("rich_text"))
            .and_then(Value::as_array)
            .map(|runs| {
                runs.iter()
                    .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let kind = match self.kind.as_str() {
            "paragraph" => NodeKind::Paragraph,
            "heading_1" => NodeKind::Heading(1),
            "heading_2" => NodeKind::Heading(2),
            "heading_3" => NodeKind::Heading(3),
            "bulleted_list_item" => NodeKind::BulletedItem,
            "numbered_list_item" => NodeKind::NumberedItem,
            "to_do" => NodeKind::CheckboxItem {
                checked: payload
                    .and_then(|p| p.get("checked"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            "quote" => NodeKind::Quote,
            "toggle" => NodeKind::Toggle,
            "callout" => NodeKind::Callout,
            other => NodeKind::Unsupported(other.to_string()),
        };

        ContentNode {
            id: self.id,
            kind,
            text_runs,
            has_children: self.has_children,
        }
    }
}

/// First text run of a `title` or `rich_text` property.
fn property_text(property: &Value) -> Option<String> {
    ["title", "rich_text"].iter().find_map(|key| {
        let runs = property.get(key)?.as_array()?;
        first_plain_text(runs)
    })
}

fn first_plain_text(runs: &[Value]) -> Option<String> {
    runs.first()?
        .get("plain_text")?
        .as_str()
        .map(str::to_string)
}
