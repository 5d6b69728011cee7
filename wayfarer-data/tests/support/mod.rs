//! Local stand-in for the places HTTP API.
//!
//! Each connection is answered on its own thread with the JSON produced by
//! the supplied handler, then closed.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Maps a request target (path and query) to a status code and JSON body.
pub type Handler = dyn Fn(&str) -> (u16, String) + Send + Sync;

/// A running fake API and the request targets it has received.
#[derive(Clone)]
pub struct FakePlacesApi {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakePlacesApi {
    /// Bind to an ephemeral local port and serve `handler` in the background.
    pub fn start(handler: impl Fn(&str) -> (u16, String) + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake API");
        let address = listener.local_addr().expect("fake API address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(connection) = stream else { continue };
                let responder = Arc::clone(&handler);
                let log = Arc::clone(&recorded);
                thread::spawn(move || serve(connection, &*responder, &log));
            }
        });

        Self {
            base_url: format!("http://{address}/maps/api"),
            requests,
        }
    }

    /// API root to configure the source with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Targets received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }

    /// Targets whose path contains `endpoint`.
    pub fn requests_to(&self, endpoint: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|target| target.contains(endpoint))
            .collect()
    }
}

fn serve(mut stream: TcpStream, handler: &Handler, requests: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => {}
        }
    }

    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_owned();
    requests.lock().expect("request log").push(target.clone());

    let (status, body) = handler(&target);
    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    stream.flush().ok();
}

/// Query value of `name` in `target`, percent-decoded.
pub fn query_param(target: &str, name: &str) -> Option<String> {
    let (_, query) = target.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// A successful geocoding answer centred on Paris.
pub fn geocode_ok() -> String {
    r#"{"status":"OK","results":[{"geometry":{"location":{"lat":48.8566,"lng":2.3522}}}]}"#
        .to_owned()
}

/// A search result, with `weekday_text` when `hours` is given.
pub fn search_result(place_id: &str, rating: f32, hours: Option<&str>) -> String {
    let opening_hours = hours.map_or_else(
        || r#"{"open_now":true}"#.to_owned(),
        |line| format!(r#"{{"weekday_text":["{line}"]}}"#),
    );
    format!(
        r#"{{"place_id":"{place_id}","name":"{place_id}","geometry":{{"location":{{"lat":48.86,"lng":2.35}}}},"rating":{rating},"price_level":2,"opening_hours":{opening_hours}}}"#
    )
}

/// A nearby-search body holding `results`, or `ZERO_RESULTS` when empty.
pub fn search_page(results: &[String]) -> String {
    if results.is_empty() {
        return r#"{"status":"ZERO_RESULTS","results":[]}"#.to_owned();
    }
    format!(r#"{{"status":"OK","results":[{}]}}"#, results.join(","))
}

/// A details body carrying one weekday line.
pub fn details(line: &str) -> String {
    format!(r#"{{"status":"OK","result":{{"opening_hours":{{"weekday_text":["{line}"]}}}}}}"#)
}
