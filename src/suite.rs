// End-to-end workflow against the booking service:
// authenticate once, then create, retrieve, update and delete bookings in order.
// Any unexpected status or field mismatch ends the current phase with an error.

use crate::booking::{AuthToken, Booking, BookingId, Credentials};
use crate::client::{ApiError, BookingApi};
use crate::fixtures::{creation_scenario, new_booking, parse_date, updated_booking};
use std::fmt;
use thiserror::Error;

// Test phase a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Authentication,
    Creation,
    Retrieval,
    Update,
    Deletion,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Authentication => "Authentication",
            Phase::Creation => "Creation",
            Phase::Retrieval => "Retrieval",
            Phase::Update => "Update",
            Phase::Deletion => "Deletion",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("{phase} failed: {message}")]
    Failed { phase: Phase, message: String },

    #[error("{phase} failed: {source}")]
    Api {
        phase: Phase,
        #[source]
        source: ApiError,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl SuiteError {
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SuiteError::Failed { phase, .. } | SuiteError::Api { phase, .. } => Some(*phase),
            SuiteError::InvalidDate(_) => None,
        }
    }
}

fn api(phase: Phase) -> impl FnOnce(ApiError) -> SuiteError {
    move |source| {
        tracing::warn!("{} request failed: {}", phase, source);
        SuiteError::Api { phase, source }
    }
}

fn fail(phase: Phase, message: String) -> SuiteError {
    tracing::warn!("{} check failed: {}", phase, message);
    SuiteError::Failed { phase, message }
}

fn check_eq<T: PartialEq + fmt::Debug + ?Sized>(
    phase: Phase,
    field: &str,
    expected: &T,
    actual: &T,
) -> Result<(), SuiteError> {
    if expected == actual {
        Ok(())
    } else {
        Err(fail(
            phase,
            format!(
                "{} does not match: expected {:?}, got {:?}",
                field, expected, actual
            ),
        ))
    }
}

// Identifiers of the bookings created during a run, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingIdRegistry {
    ids: Vec<BookingId>,
}

impl BookingIdRegistry {
    pub fn register(&mut self, id: BookingId) {
        self.ids.push(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookingId> {
        self.ids.iter()
    }

    pub fn as_slice(&self) -> &[BookingId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteStats {
    pub created: usize,
    pub retrieved: usize,
    pub updated: usize,
    pub deleted: usize,
}

// State shared by the phases of one run
#[derive(Debug)]
pub struct SuiteContext {
    token: AuthToken,
    booking_ids: BookingIdRegistry,
    stats: SuiteStats,
}

impl SuiteContext {
    pub fn new(token: AuthToken) -> Self {
        Self {
            token,
            booking_ids: BookingIdRegistry::default(),
            stats: SuiteStats::default(),
        }
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn booking_ids(&self) -> &BookingIdRegistry {
        &self.booking_ids
    }

    pub fn stats(&self) -> SuiteStats {
        self.stats
    }
}

pub struct BookingApiTestSuite<C> {
    client: C,
    credentials: Credentials,
}

impl<C: BookingApi> BookingApiTestSuite<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            credentials: Credentials::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn authenticate(&self) -> Result<AuthToken, SuiteError> {
        let token = self
            .client
            .create_token(&self.credentials)
            .await
            .map_err(api(Phase::Authentication))?;
        tracing::info!("Authenticated as {}", self.credentials.username);
        Ok(token)
    }

    // Authenticates once and returns the context the phases share.
    pub async fn set_up(&self) -> Result<SuiteContext, SuiteError> {
        Ok(SuiteContext::new(self.authenticate().await?))
    }

    pub async fn create_booking(
        &self,
        ctx: &mut SuiteContext,
        firstname: &str,
        lastname: &str,
        totalprice: i64,
        checkin: &str,
        checkout: &str,
    ) -> Result<BookingId, SuiteError> {
        let checkin =
            parse_date(checkin).ok_or_else(|| SuiteError::InvalidDate(checkin.to_string()))?;
        let checkout =
            parse_date(checkout).ok_or_else(|| SuiteError::InvalidDate(checkout.to_string()))?;
        let booking = new_booking(firstname, lastname, totalprice, checkin, checkout);

        let created = self
            .client
            .create_booking(&booking)
            .await
            .map_err(api(Phase::Creation))?;

        let echoed = &created.booking;
        check_eq(Phase::Creation, "firstname", &booking.firstname, &echoed.firstname)?;
        check_eq(Phase::Creation, "lastname", &booking.lastname, &echoed.lastname)?;
        check_eq(Phase::Creation, "totalprice", &booking.totalprice, &echoed.totalprice)?;
        check_eq(Phase::Creation, "depositpaid", &booking.depositpaid, &echoed.depositpaid)?;

        ctx.booking_ids.register(created.booking_id);
        ctx.stats.created += 1;
        tracing::info!("Booking created with ID: {}", created.booking_id);
        Ok(created.booking_id)
    }

    pub async fn get_booking_by_id(&self, id: BookingId) -> Result<Booking, SuiteError> {
        self.fetch(Phase::Retrieval, id).await
    }

    async fn fetch(&self, phase: Phase, id: BookingId) -> Result<Booking, SuiteError> {
        let booking = self.client.get_booking(id).await.map_err(api(phase))?;
        tracing::info!("Retrieved booking ID: {}", id);
        tracing::debug!("Booking details: {}", booking);
        Ok(booking)
    }

    // Replaces the booking with the fixed update payload and reads it back.
    pub async fn update_booking(
        &self,
        ctx: &SuiteContext,
        id: BookingId,
    ) -> Result<(), SuiteError> {
        let expected = updated_booking();

        self.client
            .update_booking(ctx.token(), id, &expected)
            .await
            .map_err(api(Phase::Update))?;

        let actual = self.fetch(Phase::Update, id).await?;
        check_eq(Phase::Update, "firstname", &expected.firstname, &actual.firstname)?;
        check_eq(Phase::Update, "lastname", &expected.lastname, &actual.lastname)?;
        check_eq(Phase::Update, "totalprice", &expected.totalprice, &actual.totalprice)?;
        check_eq(Phase::Update, "depositpaid", &expected.depositpaid, &actual.depositpaid)?;
        check_eq(
            Phase::Update,
            "additionalneeds",
            &expected.additionalneeds,
            &actual.additionalneeds,
        )?;
        check_eq(
            Phase::Update,
            "checkin",
            &expected.booking_dates.checkin,
            &actual.booking_dates.checkin,
        )?;
        check_eq(
            Phase::Update,
            "checkout",
            &expected.booking_dates.checkout,
            &actual.booking_dates.checkout,
        )?;

        tracing::info!("Booking updated with ID: {}", id);
        Ok(())
    }

    // Deletes the booking, then requires a 404 when fetching it again.
    pub async fn delete_booking(
        &self,
        ctx: &SuiteContext,
        id: BookingId,
    ) -> Result<(), SuiteError> {
        self.client
            .delete_booking(ctx.token(), id)
            .await
            .map_err(api(Phase::Deletion))?;

        match self.client.get_booking(id).await {
            Err(ApiError::NotFound(_)) => {
                tracing::info!("Booking deleted with ID: {}", id);
                Ok(())
            }
            Ok(_) => Err(fail(
                Phase::Deletion,
                format!("booking {} still retrievable after delete, expected status 404", id),
            )),
            Err(ApiError::UnexpectedStatus { actual, .. }) => Err(fail(
                Phase::Deletion,
                format!("expected status 404 for deleted booking {}, got {}", id, actual),
            )),
            Err(source) => Err(api(Phase::Deletion)(source)),
        }
    }

    pub async fn create_phase(&self, ctx: &mut SuiteContext) -> Result<(), SuiteError> {
        for row in creation_scenario() {
            self.create_booking(
                ctx,
                &row.firstname,
                &row.lastname,
                row.totalprice,
                &row.checkin,
                &row.checkout,
            )
            .await?;
        }
        Ok(())
    }

    pub async fn retrieve_phase(&self, ctx: &mut SuiteContext) -> Result<(), SuiteError> {
        let ids = ctx.booking_ids.as_slice().to_vec();
        for id in ids {
            self.get_booking_by_id(id).await?;
            ctx.stats.retrieved += 1;
        }
        Ok(())
    }

    pub async fn update_phase(&self, ctx: &mut SuiteContext) -> Result<(), SuiteError> {
        let ids = ctx.booking_ids.as_slice().to_vec();
        for id in ids {
            self.update_booking(ctx, id).await?;
            ctx.stats.updated += 1;
        }
        Ok(())
    }

    pub async fn delete_phase(&self, ctx: &mut SuiteContext) -> Result<(), SuiteError> {
        let ids = ctx.booking_ids.as_slice().to_vec();
        for id in ids {
            self.delete_booking(ctx, id).await?;
            ctx.stats.deleted += 1;
        }
        Ok(())
    }

    // Full run: authenticate, then the create, retrieve, update and delete phases.
    pub async fn run(&self) -> Result<SuiteStats, SuiteError> {
        let mut ctx = self.set_up().await?;
        self.create_phase(&mut ctx).await?;
        self.retrieve_phase(&mut ctx).await?;
        self.update_phase(&mut ctx).await?;
        self.delete_phase(&mut ctx).await?;

        tracing::info!("Booking run finished: {:?}", ctx.stats);
        Ok(ctx.stats)
    }
}
