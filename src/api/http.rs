//! reqwest implementation of [`LibraryApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::LibraryApi;
use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{
        borrowing::CreateBorrowing,
        user::{LoginRequest, LoginResponse, RegisterRequest},
        Book, BookForm, Borrowing, Category,
    },
    services::session::SessionContext,
};

#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl HttpApi {
    /// Create a client for `config.base_url`. The bearer token is read from
    /// `session` on every request.
    pub fn new(config: &ApiConfig, session: SessionContext) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and check the `{success, message, data}` envelope.
    ///
    /// A non-2xx status or `success: false` becomes [`AppError::Server`]
    /// carrying the server's message.
    async fn execute(&self, builder: RequestBuilder) -> AppResult<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        tracing::debug!("{} {}", status.as_u16(), url);

        let parsed: Option<Value> = if body.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str(&body).ok()
        };

        let rejected = !status.is_success()
            || parsed
                .as_ref()
                .and_then(|v| v.get("success"))
                .and_then(Value::as_bool)
                == Some(false);

        if rejected {
            let message = parsed
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Permintaan gagal (HTTP {})", status.as_u16()));
            tracing::warn!("Request to {} rejected: {}", url, message);
            return Err(AppError::Server {
                status: status.as_u16(),
                message,
            });
        }

        match parsed {
            Some(value) => Ok(value),
            None => Ok(serde_json::from_str(&body)?),
        }
    }

    async fn fetch_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let mut value = self.execute(builder).await?;
        let data = if value.get("data").is_some() {
            value["data"].take()
        } else {
            value
        };
        Ok(serde_json::from_value(data)?)
    }

    async fn mutate(&self, builder: RequestBuilder) -> AppResult<Option<String>> {
        let value = self.execute(builder).await?;
        Ok(value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

#[async_trait]
impl LibraryApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let value = self
            .execute(self.request(Method::POST, "/login").json(request))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<Option<String>> {
        self.mutate(self.request(Method::POST, "/register").json(request))
            .await
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.fetch_data(self.request(Method::GET, "/books")).await
    }

    async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.fetch_data(self.request(Method::GET, &format!("/books/{}", id)))
            .await
    }

    async fn create_book(&self, form: &BookForm) -> AppResult<Option<String>> {
        self.mutate(self.request(Method::POST, "/books").json(form))
            .await
    }

    async fn update_book(&self, id: i64, form: &BookForm) -> AppResult<Option<String>> {
        self.mutate(self.request(Method::PUT, &format!("/books/{}", id)).json(form))
            .await
    }

    async fn delete_book(&self, id: i64) -> AppResult<Option<String>> {
        self.mutate(self.request(Method::DELETE, &format!("/books/{}", id)))
            .await
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.fetch_data(self.request(Method::GET, "/categories")).await
    }

    async fn list_borrowings(&self) -> AppResult<Vec<Borrowing>> {
        self.fetch_data(self.request(Method::GET, "/borrowings")).await
    }

    async fn my_borrowings(&self) -> AppResult<Vec<Borrowing>> {
        self.fetch_data(self.request(Method::GET, "/borrowings/me"))
            .await
    }

    async fn borrow_book(&self, book_id: i64) -> AppResult<Option<String>> {
        let body = CreateBorrowing { book_id };
        self.mutate(self.request(Method::POST, "/borrowings").json(&body))
            .await
    }

    async fn return_borrowing(&self, id: i64) -> AppResult<Option<String>> {
        self.mutate(self.request(Method::PUT, &format!("/borrowings/{}/return", id)))
            .await
    }
}
