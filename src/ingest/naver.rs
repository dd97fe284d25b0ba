//! Naver DataLab search trend client
//!
//! Retrieves relative search interest (`ratio`, 0-100 within one request)
//! for a keyword over a date range, optionally filtered by device, gender
//! and age bracket.
//!
//! API Documentation: https://developers.naver.com/docs/serviceapi/datalab/search/search.md

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::NaverSettings;
use crate::error::TrendError;
use crate::model::{Device, Gender, TimeUnit, TrendPoint};

// ============================================================================
// Capability
// ============================================================================

/// One trend request.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendQuery<'a> {
    pub keyword: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_unit: TimeUnit,
    pub device: Option<Device>,
    pub gender: Option<Gender>,
    /// DataLab age bracket codes ("1".."11"); empty means all ages.
    pub ages: &'a [String],
}

/// Anything that can answer a trend query with a `(period, ratio)` series.
pub trait TrendSource {
    fn fetch_trend(&self, query: &TrendQuery<'_>) -> Result<Vec<TrendPoint>, TrendError>;
}

// ============================================================================
// DataLab Request/Response Structures
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatalabRequest<'a> {
    pub start_date: String,
    pub end_date: String,
    pub time_unit: &'static str,
    pub keyword_groups: Vec<KeywordGroup<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<&'static str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub ages: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroup<'a> {
    pub group_name: &'a str,
    pub keywords: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct DatalabResponse {
    pub results: Vec<DatalabResult>,
}

#[derive(Debug, Deserialize)]
pub struct DatalabResult {
    pub title: String,
    #[serde(default)]
    pub data: Vec<TrendPoint>,
}

/// Build the JSON body for one keyword query. The keyword is also the
/// group name.
pub fn build_request<'a>(query: &TrendQuery<'a>) -> DatalabRequest<'a> {
    DatalabRequest {
        start_date: query.start_date.format("%Y-%m-%d").to_string(),
        end_date: query.end_date.format("%Y-%m-%d").to_string(),
        time_unit: query.time_unit.as_str(),
        keyword_groups: vec![KeywordGroup {
            group_name: query.keyword,
            keywords: vec![query.keyword],
        }],
        device: query.device.map(|d| d.code()),
        gender: query.gender.map(|g| g.code()),
        ages: query.ages,
    }
}

/// Extract the series of the first keyword group. No groups means no data.
pub fn parse_response(body: &str) -> Result<Vec<TrendPoint>, TrendError> {
    let response: DatalabResponse =
        serde_json::from_str(body).map_err(|e| TrendError::Parse(e.to_string()))?;

    Ok(response
        .results
        .into_iter()
        .next()
        .map(|r| r.data)
        .unwrap_or_default())
}

// ============================================================================
// API Client
// ============================================================================

pub struct NaverDatalabClient {
    http: reqwest::blocking::Client,
    api_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl NaverDatalabClient {
    pub fn new(settings: &NaverSettings) -> Result<Self, TrendError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        })
    }
}

impl TrendSource for NaverDatalabClient {
    fn fetch_trend(&self, query: &TrendQuery<'_>) -> Result<Vec<TrendPoint>, TrendError> {
        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(TrendError::MissingCredentials);
        };

        let response = self
            .http
            .post(&self.api_url)
            .header("X-Naver-Client-Id", id)
            .header("X-Naver-Client-Secret", secret)
            .json(&build_request(query))
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(TrendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}

// ============================================================================
// Tests
// ============================================================================
