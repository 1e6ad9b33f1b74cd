// Fixed test data for the booking workflow

use crate::booking::{Booking, BookingDates};
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const CREATION_COUNT: usize = 10;
pub const CREATION_CHECKIN: &str = "2018-01-01";
pub const CREATION_CHECKOUT: &str = "2019-01-01";
pub const CREATION_BASE_PRICE: i64 = 111;
pub const CREATION_NEEDS: &str = "Breakfast";

pub const UPDATED_FIRSTNAME: &str = "UpdatedJim";
pub const UPDATED_LASTNAME: &str = "UpdatedBrown";
pub const UPDATED_PRICE: i64 = 222;
pub const UPDATED_NEEDS: &str = "Dinner";
pub const UPDATED_CHECKIN: NaiveDate = date(2020, 1, 1);
pub const UPDATED_CHECKOUT: NaiveDate = date(2021, 1, 1);

// Calendar date for constants; an impossible date fails the build.
const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

// One row of the creation scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub checkin: String,
    pub checkout: String,
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

// Bookings created by the scenario: Jim0/Brown0 at 111 through Jim9/Brown9 at 120.
pub fn creation_scenario() -> Vec<BookingRequest> {
    (0..CREATION_COUNT)
        .map(|i| BookingRequest {
            firstname: format!("Jim{}", i),
            lastname: format!("Brown{}", i),
            totalprice: CREATION_BASE_PRICE + i as i64,
            checkin: CREATION_CHECKIN.to_string(),
            checkout: CREATION_CHECKOUT.to_string(),
        })
        .collect()
}

// A new booking with a paid deposit and breakfast, as every created booking has.
pub fn new_booking(
    firstname: &str,
    lastname: &str,
    totalprice: i64,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Booking {
    Booking {
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        totalprice,
        depositpaid: true,
        booking_dates: BookingDates { checkin, checkout },
        additionalneeds: Some(CREATION_NEEDS.to_string()),
    }
}

// Payload every update sends
pub fn updated_booking() -> Booking {
    Booking {
        firstname: UPDATED_FIRSTNAME.to_string(),
        lastname: UPDATED_LASTNAME.to_string(),
        totalprice: UPDATED_PRICE,
        depositpaid: false,
        booking_dates: BookingDates {
            checkin: UPDATED_CHECKIN,
            checkout: UPDATED_CHECKOUT,
        },
        additionalneeds: Some(UPDATED_NEEDS.to_string()),
    }
}
