//! Blocking client for the CGM follower service.
//!
//! The service is addressed by a single chart endpoint. A request carries the requested
//! time span as a base64-encoded JSON `param` query value and authenticates with the
//! `session` / `userid` cookies of a logged-in browser session. The response nests the
//! sensor glucose series under `data.chart.sg` as `[epoch_seconds, mmol, rate]` triples.
//!
//! Typical usage:
//! ```no_run
//! # use glucotv::api::{DataSource, HttpDataSource};
//! let source = HttpDataSource::new("https://example.invalid/chart", "session", "user")?;
//! let raw = source.fetch(6)?;
//! let readings = glucotv::models::preprocess(&raw);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::RawSample;
use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::COOKIE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Time zone offset the service expects alongside the span, in hours.
pub const DEFAULT_TZ_OFFSET_HOURS: i32 = -3;

/// Anything that can produce raw samples for the last `span_hours`.
pub trait DataSource {
    fn fetch(&self, span_hours: u32) -> Result<Vec<RawSample>>;
}

#[derive(Debug, Clone)]
pub struct HttpDataSource {
    pub api_url: String,
    pub tz_offset_hours: i32,
    session_cookie: String,
    userid_cookie: String,
    http: HttpClient,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    sg: Vec<RawSample>,
}

/// Encode the `param` query value: base64 of `{"ts": [cutoff, now], "tz": offset}`,
/// with both instants in (fractional) epoch seconds.
pub fn build_param(span_secs: f64, now: DateTime<Utc>, tz_offset_hours: i32) -> String {
    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    let payload = json!({
        "ts": [now_secs - span_secs, now_secs],
        "tz": tz_offset_hours,
    });
    STANDARD.encode(payload.to_string())
}

/// Extract `data.chart.sg` from a decoded response body.
pub fn parse_chart_response(v: Value) -> Result<Vec<RawSample>> {
    let envelope: Envelope =
        serde_json::from_value(v).context("parse chart response (expected data.chart.sg)")?;
    Ok(envelope.data.chart.sg)
}

impl HttpDataSource {
    pub fn new(
        api_url: impl Into<String>,
        session_cookie: impl Into<String>,
        userid_cookie: impl Into<String>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("glucotv/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            api_url: api_url.into(),
            tz_offset_hours: DEFAULT_TZ_OFFSET_HOURS,
            session_cookie: session_cookie.into(),
            userid_cookie: userid_cookie.into(),
            http,
        })
    }

    pub fn with_tz_offset(mut self, hours: i32) -> Self {
        self.tz_offset_hours = hours;
        self
    }

    /// Full request URL for a span ending at `now`.
    pub fn request_url(&self, span_hours: u32, now: DateTime<Utc>) -> String {
        let param = build_param(span_hours as f64 * 3600.0, now, self.tz_offset_hours);
        format!(
            "{}?param={}",
            self.api_url,
            utf8_percent_encode(&param, NON_ALPHANUMERIC)
        )
    }

    fn cookie_header(&self) -> String {
        format!(
            "session={}; userid={}",
            self.session_cookie, self.userid_cookie
        )
    }
}

impl DataSource for HttpDataSource {
    fn fetch(&self, span_hours: u32) -> Result<Vec<RawSample>> {
        let url = self.request_url(span_hours, Utc::now());

        // Small retry for transient failures (5xx / network errors)
        let get_json = |u: &str| -> Result<Value> {
            let mut last_err: Option<anyhow::Error> = None;
            for backoff_ms in [100u64, 300, 700] {
                match self.http.get(u).header(COOKIE, self.cookie_header()).send() {
                    Ok(r) if r.status().is_success() => {
                        return r.json().context("decode json");
                    }
                    Ok(r) if r.status().is_server_error() => {
                        log::warn!("data source answered HTTP {}; retrying", r.status());
                    }
                    Ok(r) => bail!("request failed with HTTP {}", r.status()),
                    Err(e) => last_err = Some(e.into()),
                }
                std::thread::sleep(Duration::from_millis(backoff_ms));
            }
            bail!("network error: {:?}", last_err);
        };

        let v = get_json(&url).with_context(|| format!("GET {}", self.api_url))?;
        let samples = parse_chart_response(v)?;
        log::info!("fetched {} sample(s) for the last {}h", samples.len(), span_hours);
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn param_encodes_span_and_tz() {
        let p = build_param(3600.0, now(), -3);
        let raw = STANDARD.decode(p).unwrap();
        let v: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(v["ts"][0].as_f64(), Some(1_699_996_400.0));
        assert_eq!(v["ts"][1].as_f64(), Some(1_700_000_000.0));
        assert_eq!(v["tz"].as_i64(), Some(-3));
    }

    #[test]
    fn request_url_percent_encodes_param() {
        let src = HttpDataSource::new("https://example.invalid/chart", "s", "u").unwrap();
        let url = src.request_url(6, now());
        assert!(url.starts_with("https://example.invalid/chart?param="));
        let query = url.split_once("?param=").unwrap().1;
        assert!(!query.contains('='));
        assert!(!query.contains('+'));
    }

    #[test]
    fn parses_sg_series() {
        let body = json!({"data": {"chart": {"sg": [[1700000000, 5.5, 1], [1700000300, 5.8, 2]]}}});
        let sg = parse_chart_response(body).unwrap();
        assert_eq!(sg.len(), 2);
        assert_eq!(sg[1].rate, 2);
    }

    #[test]
    fn missing_chart_is_an_error() {
        assert!(parse_chart_response(json!({"data": {}})).is_err());
        let empty = parse_chart_response(json!({"data": {"chart": {}}})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn cookie_header_carries_both_cookies() {
        let src = HttpDataSource::new("https://example.invalid", "abc", "42").unwrap();
        assert_eq!(src.cookie_header(), "session=abc; userid=42");
    }
}
