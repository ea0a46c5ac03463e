use async_trait::async_trait;
use reqwest::Client;

use super::{ApiError, ApiResponse, Category, CategoryApi, CategoryId, RecordFlag, RequestBody};
use crate::config::AppConfig;

/// The `run=` action selector appended to the endpoint URL
#[derive(Debug, Clone, Copy)]
enum Action {
    GetAll,
    Insert,
    Update,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::GetAll => "get_all_main_cat",
            Action::Insert => "insert_main_catagory",
            Action::Update => "update_main_catagory",
        }
    }
}

/// `CategoryApi` over HTTP.
pub struct HttpCategoryApi {
    client: Client,
    endpoint: String,
    device_type: String,
    username: String,
}

impl HttpCategoryApi {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            endpoint: config.api_url.clone(),
            device_type: config.device_type.clone(),
            username: config.username.clone(),
        }
    }

    fn body<'a>(&'a self) -> RequestBody<'a> {
        RequestBody {
            device_type: &self.device_type,
            username: &self.username,
            cat_name: None,
            main_cat_id: None,
            deleted_flg: None,
        }
    }

    async fn call(&self, action: Action, body: &RequestBody<'_>) -> Result<ApiResponse, ApiError> {
        tracing::debug!(action = action.as_str(), "POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("run", action.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl CategoryApi for HttpCategoryApi {
    async fn get_all(&self) -> Result<Vec<Category>, ApiError> {
        self.call(Action::GetAll, &self.body()).await?.into_categories()
    }

    async fn insert(&self, name: &str) -> Result<(), ApiError> {
        let body = RequestBody {
            cat_name: Some(name),
            ..self.body()
        };
        self.call(Action::Insert, &body).await?.into_message()?;
        Ok(())
    }

    async fn update(&self, id: &CategoryId, name: &str, flag: RecordFlag) -> Result<(), ApiError> {
        let body = RequestBody {
            cat_name: Some(name),
            main_cat_id: Some(id),
            deleted_flg: Some(flag),
            ..self.body()
        };
        self.call(Action::Update, &body).await?.into_message()?;
        Ok(())
    }
}
