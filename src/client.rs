use crate::config::Config;
use crate::error::{config_error, contract_error, Error, TeamupResult};
use crate::models::{CalendarEvent, EventQuery, RecurringDeletionMode, Subcalendar};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// TeamUp REST API base URL
const BASE_URL: &str = "https://api.teamup.com/";

/// Fixed timeout bounding every request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Response envelope for the subcalendars endpoint
#[derive(serde::Deserialize)]
struct SubcalendarsEnvelope {
    subcalendars: Vec<Subcalendar>,
}

/// Response envelope for the events endpoint
#[derive(serde::Deserialize)]
struct EventsEnvelope {
    events: Vec<Value>,
}

/// Response envelope for an event deletion
#[derive(serde::Deserialize)]
struct UndoEnvelope {
    undo_id: Value,
}

/// Client for the TeamUp calendar REST API
///
/// Holds the immutable authentication headers and performs one blocking
/// HTTP request per operation. No retries, no local state; a failed call
/// surfaces immediately to the caller.
pub struct CalendarClient {
    http: HttpClient,
    headers: HeaderMap,
    base_url: String,
}

impl CalendarClient {
    /// Create a client talking to the live TeamUp API
    pub fn new(config: &Config) -> TeamupResult<Self> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client against an alternative base URL
    ///
    /// Used to point the client at a local mock server in tests.
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> TeamupResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Teamup-Token",
            HeaderValue::from_str(&config.api_token)
                .map_err(|_| config_error("TeamUp API token is not a valid header value"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.bearer_token))
            .map_err(|_| config_error("TeamUp bearer token is not a valid header value"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(CalendarClient {
            http,
            headers,
            base_url,
        })
    }

    /// Single request/response round trip shared by all operations
    fn request<Q>(
        &self,
        method: Method,
        resource: &str,
        query: Option<&Q>,
        body: Option<&Value>,
    ) -> TeamupResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, resource);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .headers(self.headers.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(Error::Api {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }

    /// General GET request against a resource path
    pub fn get<Q>(&self, resource: &str, query: Option<&Q>) -> TeamupResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, resource, query, None)
    }

    /// General PUT request against a resource path
    pub fn put<Q>(&self, resource: &str, query: Option<&Q>) -> TeamupResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        self.request(Method::PUT, resource, query, None)
    }

    /// General POST request with a JSON body
    pub fn post(&self, resource: &str, body: &Value) -> TeamupResult<Value> {
        self.request::<()>(Method::POST, resource, None, Some(body))
    }

    /// General DELETE request against a resource path
    pub fn delete<Q>(&self, resource: &str, query: Option<&Q>) -> TeamupResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        self.request(Method::DELETE, resource, query, None)
    }

    /// Fetch a calendar resource
    ///
    /// The identifier is either the calendar secret key (ksXXXXX) or the
    /// numeric calendar id tied to a user account; the caller is
    /// responsible for passing one the API accepts.
    pub fn get_calendar(&self, calendar_key_or_id: &str) -> TeamupResult<Value> {
        self.get::<()>(&format!("calendars/{calendar_key_or_id}"), None)
    }

    /// Fetch the subcalendars of a calendar
    pub fn get_subcalendars(&self, calendar_key_or_id: &str) -> TeamupResult<Vec<Subcalendar>> {
        let response = self.get::<()>(&format!("{calendar_key_or_id}/subcalendars"), None)?;
        let envelope: SubcalendarsEnvelope = parse_envelope(response)?;
        Ok(envelope.subcalendars)
    }

    /// Look up a subcalendar id by exact name
    ///
    /// The first match wins when names are duplicated; no match is a
    /// normal outcome and returns `Ok(None)`.
    pub fn get_subcalendar_by_name(
        &self,
        calendar_key_or_id: &str,
        name: &str,
    ) -> TeamupResult<Option<u64>> {
        let subcalendars = self.get_subcalendars(calendar_key_or_id)?;
        Ok(subcalendars
            .into_iter()
            .find(|subcalendar| subcalendar.name == name)
            .map(|subcalendar| subcalendar.id))
    }

    /// List events, optionally constrained to a date range
    ///
    /// Without a query the API applies its own default range of "today".
    pub fn get_calendar_events(
        &self,
        calendar_key_or_id: &str,
        query: Option<&EventQuery>,
    ) -> TeamupResult<Vec<Value>> {
        let resource = format!("{calendar_key_or_id}/events");
        let response = self.get(&resource, query)?;
        let envelope: EventsEnvelope = parse_envelope(response)?;
        Ok(envelope.events)
    }

    /// Create an event and return the created resource
    pub fn create_calendar_event(
        &self,
        calendar_key_or_id: &str,
        event: &CalendarEvent,
    ) -> TeamupResult<Value> {
        // Validate the request before any network I/O happens.
        if event.subcalendar_ids.is_empty() {
            return Err(contract_error(
                "CalendarEvent requires at least one subcalendar id",
            ));
        }
        if event.title.is_empty() {
            return Err(contract_error("CalendarEvent requires a title"));
        }

        let body = serde_json::to_value(event)?;
        self.post(&format!("{calendar_key_or_id}/events"), &body)
    }

    /// Delete an event and return the undo id the API hands back
    ///
    /// `mode` selects the recurring-deletion scope; omitting it defers to
    /// the remote default of deleting only this occurrence.
    pub fn delete_calendar_event(
        &self,
        calendar_key_or_id: &str,
        event_id: &str,
        mode: Option<RecurringDeletionMode>,
    ) -> TeamupResult<Value> {
        let resource = format!("{calendar_key_or_id}/events/{event_id}");
        let response = match mode {
            Some(mode) => self.delete(&resource, Some(&[("redit", mode.as_str())]))?,
            None => self.delete::<()>(&resource, None)?,
        };
        let envelope: UndoEnvelope = parse_envelope(response)?;
        Ok(envelope.undo_id)
    }
}

/// Extract a typed envelope out of a verbatim response body
fn parse_envelope<T: DeserializeOwned>(response: Value) -> TeamupResult<T> {
    Ok(serde_json::from_value(response)?)
}
