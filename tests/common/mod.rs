// Stateful fake of the restful-booker service for integration tests.
//
// Built on wiremock: each route is a `Respond` implementation sharing one
// in-memory booking table, so a booking created through `POST /booking`
// can be read, updated and deleted by later requests.

use restful_booker_suite::{Booking, Credentials};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "a1b2c3d4e5f6g7h";

const BOOKING_PATH: &str = r"^/booking/\d+$";

#[derive(Default)]
struct State {
    bookings: Mutex<BTreeMap<i64, Booking>>,
    next_id: AtomicI64,
    ignore_deletes: AtomicBool,
}

#[derive(Clone, Copy)]
enum Route {
    Auth,
    Create,
    Get,
    Update,
    Delete,
}

struct Responder {
    state: Arc<State>,
    route: Route,
}

fn booking_id(request: &Request) -> Option<i64> {
    request
        .url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|id| id.parse().ok())
}

fn has_token(request: &Request) -> bool {
    request
        .headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .map(|cookie| cookie == format!("token={}", TOKEN))
        .unwrap_or(false)
}

fn accepts_json(request: &Request) -> bool {
    request
        .headers
        .get("accept")
        .and_then(|value| value.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

impl Respond for Responder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.route {
            Route::Auth => match request.body_json::<Credentials>() {
                Ok(credentials) if credentials == Credentials::default() => {
                    ResponseTemplate::new(200).set_body_json(json!({ "token": TOKEN }))
                }
                _ => ResponseTemplate::new(200)
                    .set_body_json(json!({ "reason": "Bad credentials" })),
            },
            Route::Create => match request.body_json::<Booking>() {
                Ok(booking) => {
                    let id = self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    self.state
                        .bookings
                        .lock()
                        .unwrap()
                        .insert(id, booking.clone());
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "bookingid": id, "booking": booking }))
                }
                Err(_) => ResponseTemplate::new(500).set_body_string("Internal Server Error"),
            },
            Route::Get => {
                let bookings = self.state.bookings.lock().unwrap();
                match booking_id(request).and_then(|id| bookings.get(&id)) {
                    Some(booking) => ResponseTemplate::new(200).set_body_json(booking),
                    None => ResponseTemplate::new(404).set_body_string("Not Found"),
                }
            }
            Route::Update => {
                if !has_token(request) {
                    return ResponseTemplate::new(403).set_body_string("Forbidden");
                }
                if !accepts_json(request) {
                    return ResponseTemplate::new(418).set_body_string("I'm a Teapot");
                }
                let Ok(booking) = request.body_json::<Booking>() else {
                    return ResponseTemplate::new(400).set_body_string("Bad Request");
                };
                let mut bookings = self.state.bookings.lock().unwrap();
                let stored = match booking_id(request) {
                    Some(id) => bookings.get_mut(&id),
                    None => None,
                };
                match stored {
                    Some(stored) => {
                        *stored = booking.clone();
                        ResponseTemplate::new(200).set_body_json(booking)
                    }
                    None => ResponseTemplate::new(405).set_body_string("Method Not Allowed"),
                }
            }
            Route::Delete => {
                if !has_token(request) {
                    return ResponseTemplate::new(403).set_body_string("Forbidden");
                }
                let mut bookings = self.state.bookings.lock().unwrap();
                let Some(id) = booking_id(request).filter(|id| bookings.contains_key(id)) else {
                    return ResponseTemplate::new(405).set_body_string("Method Not Allowed");
                };
                if !self.state.ignore_deletes.load(Ordering::SeqCst) {
                    bookings.remove(&id);
                }
                ResponseTemplate::new(201).set_body_string("Created")
            }
        }
    }
}

// In-process restful-booker backed by a wiremock server.
pub struct FakeRestfulBooker {
    server: MockServer,
    state: Arc<State>,
}

impl FakeRestfulBooker {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(State::default());
        let fake = Self { server, state };

        fake.mount("POST", "^/auth$", Route::Auth).await;
        fake.mount("POST", "^/booking$", Route::Create).await;
        fake.mount("GET", BOOKING_PATH, Route::Get).await;
        fake.mount("PUT", BOOKING_PATH, Route::Update).await;
        fake.mount("DELETE", BOOKING_PATH, Route::Delete).await;
        fake
    }

    async fn mount(&self, verb: &str, route_path: &str, route: Route) {
        Mock::given(method(verb))
            .and(path_regex(route_path))
            .respond_with(Responder {
                state: Arc::clone(&self.state),
                route,
            })
            .mount(&self.server)
            .await;
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    // Makes DELETE answer 201 without removing anything.
    pub fn ignore_deletes(&self) {
        self.state.ignore_deletes.store(true, Ordering::SeqCst);
    }

    pub fn stored(&self) -> usize {
        self.state.bookings.lock().unwrap().len()
    }

    pub fn booking(&self, id: i64) -> Option<Booking> {
        self.state.bookings.lock().unwrap().get(&id).cloned()
    }

    // Mounts a fixed answer for one route ahead of the stateful responder.
    pub async fn override_route(&self, verb: &str, route_path: &str, response: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path_regex(route_path))
            .respond_with(response)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    pub async fn override_create(&self, response: ResponseTemplate) {
        self.override_route("POST", "^/booking$", response).await;
    }

    pub async fn override_auth(&self, response: ResponseTemplate) {
        self.override_route("POST", "^/auth$", response).await;
    }

    pub async fn override_get(&self, response: ResponseTemplate) {
        self.override_route("GET", BOOKING_PATH, response).await;
    }
}
