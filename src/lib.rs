// End-to-end test suite for the restful-booker booking API

pub mod booking;
pub mod client;
pub mod fixtures;
pub mod suite;

// Re-export key types for convenience
pub use booking::{AuthToken, Booking, BookingDates, BookingId, CreatedBooking, Credentials};
pub use client::{ApiError, BookingApi, ClientConfig, ClientError, RestfulBookerClient};
pub use suite::{
    BookingApiTestSuite, BookingIdRegistry, Phase, SuiteContext, SuiteError, SuiteStats,
};
