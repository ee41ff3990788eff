//! Where the initial rows come from: fixed seed data or a one-shot fetch of a
//! remote user listing.
//!
//! The fetch runs on its own thread and reports back over a channel, so the
//! event loop keeps handling keys while the request is in flight. There is no
//! retry, cancellation or timeout: a server that never answers leaves the load
//! pending.
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use rand::Rng;
use serde::Deserialize;

use crate::error::FetchError;
use crate::table::{Age, Record};

/// Endpoint used when none is configured.
pub const DEFAULT_USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Inclusive lower and exclusive upper bound of generated ages.
pub const MOCK_AGE_RANGE: std::ops::Range<i64> = 20..50;

/// A user object from the remote listing. Only `name` is read.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RemoteUser {
    pub name: String,
}

/// Anything that can produce the raw user list in order, or fail.
pub trait UserSource: Send {
    fn fetch_users(&self) -> Result<Vec<RemoteUser>, FetchError>;
}

/// Blocking HTTP GET against a fixed URL.
pub struct HttpUserSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpUserSource {
    /// Build the client with reqwest's default 30 s request timeout turned off.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { url: url.into(), client })
    }
}

impl UserSource for HttpUserSource {
    fn fetch_users(&self) -> Result<Vec<RemoteUser>, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        let body = resp.text().map_err(|e| FetchError::Network(e.to_string()))?;
        parse_users(&body)
    }
}

/// Decode a JSON array of user objects.
pub fn parse_users(body: &str) -> Result<Vec<RemoteUser>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Turn fetched users into rows: ids follow response position, ages are random.
pub fn into_records<R: Rng>(users: Vec<RemoteUser>, rng: &mut R) -> Vec<Record> {
    users
        .into_iter()
        .enumerate()
        .map(|(index, user)| Record {
            id: index as u64 + 1,
            name: user.name,
            age: Age::Years(rng.gen_range(MOCK_AGE_RANGE)),
        })
        .collect()
}

/// Rows shown by the static variant.
pub fn seed_records() -> Vec<Record> {
    vec![
        Record::new(1, "Alice", 25),
        Record::new(2, "Bob", 30),
        Record::new(3, "Charlie", 35),
    ]
}

/// Handle to an in-flight load.
pub struct Loader {
    rx: Receiver<Result<Vec<RemoteUser>, FetchError>>,
}

impl Loader {
    /// Non-blocking check for the result. Returns `None` while pending.
    ///
    /// A fetch thread that died without sending (e.g. it panicked) reports a
    /// network error, so the load always ends. Drop the loader once this
    /// returns `Some`.
    pub fn poll(&self) -> Option<Result<Vec<RemoteUser>, FetchError>> {
        match self.rx.try_recv() {
            Ok(res) => Some(res),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(thread_exited())),
        }
    }

    /// Block until the result arrives.
    pub fn wait(self) -> Result<Vec<RemoteUser>, FetchError> {
        self.rx.recv().unwrap_or_else(|_| Err(thread_exited()))
    }
}

fn thread_exited() -> FetchError {
    FetchError::Network("loader thread exited".to_string())
}

/// Start fetching on a background thread.
pub fn spawn_load<S: UserSource + 'static>(source: S) -> Loader {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let res = source.fetch_users();
        // receiver gone means the app already quit
        let _ = tx.send(res);
    });
    Loader { rx }
}
