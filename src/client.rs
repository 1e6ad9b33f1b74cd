// HTTP client for the restful-booker booking API
// Every call checks the status code the service documents for it; there is no retry.

use crate::booking::{AuthResponse, AuthToken, Booking, BookingId, CreatedBooking, Credentials};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://restful-booker.herokuapp.com";

// Errors raised while talking to the service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("{operation} returned status {actual}, expected {expected}")]
    UnexpectedStatus {
        operation: &'static str,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Booking {0} not found")]
    NotFound(BookingId),

    #[error("No token returned: {0}")]
    MissingToken(String),
}

impl ApiError {
    // HTTP status behind the error, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { actual, .. } => Some(*actual),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND.as_u16()),
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    // None keeps reqwest's default
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

// Operations the booking service exposes. The suite only talks to this trait.
#[async_trait]
pub trait BookingApi: Send + Sync {
    // POST /auth, expects 200 and a token
    async fn create_token(&self, credentials: &Credentials) -> Result<AuthToken, ApiError>;

    // POST /booking, expects 200
    async fn create_booking(&self, booking: &Booking) -> Result<CreatedBooking, ApiError>;

    // GET /booking/{id}, expects 200; 404 becomes ApiError::NotFound
    async fn get_booking(&self, id: BookingId) -> Result<Booking, ApiError>;

    // PUT /booking/{id}, expects 200
    async fn update_booking(
        &self,
        token: &AuthToken,
        id: BookingId,
        booking: &Booking,
    ) -> Result<Booking, ApiError>;

    // DELETE /booking/{id}, expects 201
    async fn delete_booking(&self, token: &AuthToken, id: BookingId) -> Result<(), ApiError>;
}

pub struct RestfulBookerClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestfulBookerClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Url::parse(&config.base_url).map_err(|e| {
            ClientError::ConfigError(format!("invalid base url '{}': {}", config.base_url, e))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_url(&self) -> String {
        format!("{}/auth", self.base_url)
    }

    fn bookings_url(&self) -> String {
        format!("{}/booking", self.base_url)
    }

    fn booking_url(&self, id: BookingId) -> String {
        format!("{}/booking/{}", self.base_url, id)
    }
}

// Reads the body and fails unless the status is the expected one
async fn expect_status(
    response: reqwest::Response,
    operation: &'static str,
    expected: StatusCode,
) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected {
        return Err(ApiError::UnexpectedStatus {
            operation,
            expected: expected.as_u16(),
            actual: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl BookingApi for RestfulBookerClient {
    async fn create_token(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        let url = self.auth_url();
        tracing::debug!("POST {}", url);

        let response = self.http.post(&url).json(credentials).send().await?;
        let body = expect_status(response, "authenticate", StatusCode::OK).await?;
        let auth: AuthResponse = parse_body(&body)?;

        match auth.token {
            Some(token) if !token.is_empty() => Ok(AuthToken::new(token)),
            _ => Err(ApiError::MissingToken(
                auth.reason
                    .unwrap_or_else(|| "response carried no token".to_string()),
            )),
        }
    }

    async fn create_booking(&self, booking: &Booking) -> Result<CreatedBooking, ApiError> {
        let url = self.bookings_url();
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(booking)
            .send()
            .await?;
        let body = expect_status(response, "create booking", StatusCode::OK).await?;
        parse_body(&body)
    }

    async fn get_booking(&self, id: BookingId) -> Result<Booking, ApiError> {
        let url = self.booking_url(id);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id));
        }
        let body = expect_status(response, "get booking", StatusCode::OK).await?;
        parse_body(&body)
    }

    async fn update_booking(
        &self,
        token: &AuthToken,
        id: BookingId,
        booking: &Booking,
    ) -> Result<Booking, ApiError> {
        let url = self.booking_url(id);
        tracing::debug!("PUT {}", url);

        // The service answers 418 to a PUT without an Accept header.
        let response = self
            .http
            .put(&url)
            .header(ACCEPT, "application/json")
            .header(COOKIE, token.cookie())
            .json(booking)
            .send()
            .await?;
        let body = expect_status(response, "update booking", StatusCode::OK).await?;
        parse_body(&body)
    }

    async fn delete_booking(&self, token: &AuthToken, id: BookingId) -> Result<(), ApiError> {
        let url = self.booking_url(id);
        tracing::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(&url)
            .header(COOKIE, token.cookie())
            .send()
            .await?;
        expect_status(response, "delete booking", StatusCode::CREATED).await?;
        Ok(())
    }
}
