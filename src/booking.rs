// Wire data structures for the restful-booker API
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// Identifier the service assigns to a booking on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BookingId(pub i64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookingId {
    fn from(id: i64) -> Self {
        BookingId(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    #[serde(rename = "bookingdates")]
    pub booking_dates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} ({}), {} -> {}",
            self.firstname,
            self.lastname,
            self.totalprice,
            if self.depositpaid {
                "deposit paid"
            } else {
                "no deposit"
            },
            self.booking_dates.checkin,
            self.booking_dates.checkout,
        )?;
        if let Some(needs) = &self.additionalneeds {
            write!(f, ", {}", needs)?;
        }
        Ok(())
    }
}

// Response body of POST /booking
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreatedBooking {
    #[serde(rename = "bookingid")]
    pub booking_id: BookingId,
    pub booking: Booking,
}

// Request body of POST /auth
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password123".to_string(),
        }
    }
}

// Response body of POST /auth. Bad credentials still come back as 200,
// carrying a `reason` instead of a `token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

// Session credential sent as `Cookie: token=<value>` on update and delete.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        AuthToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Value for the `Cookie` header.
    pub fn cookie(&self) -> String {
        format!("token={}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
