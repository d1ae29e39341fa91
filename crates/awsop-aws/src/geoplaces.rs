//! Amazon Location Service Places (v2) operations.
//!
//! REST JSON under `https://places.geo.{region}.amazonaws.com/v2/...`, signed
//! as `geo-places`. Request and response members are PascalCase. An API key,
//! when given, travels as the `key` query parameter.
//!
//! Positions are given on the command line as `lon,lat` and bounding boxes
//! as `west,south,east,north`.

use crate::error::AwsResult;
use crate::protocol::{AwsOperation, ServiceSpec, WireRequest};
use awsop_core::request::{collapse, non_empty, require_one_of, require_range, require_str};
use awsop_core::{Operation, Page, PagedRequest, ValidationError};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub static SERVICE: ServiceSpec = ServiceSpec {
    name: "geo-places",
    endpoint_prefix: "places.geo",
    signing_name: "geo-places",
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum IntendedUse {
    #[cfg_attr(feature = "cli", value(name = "SingleUse"))]
    SingleUse,
    #[cfg_attr(feature = "cli", value(name = "Storage"))]
    Storage,
}

impl IntendedUse {
    fn as_str(self) -> &'static str {
        match self {
            IntendedUse::SingleUse => "SingleUse",
            IntendedUse::Storage => "Storage",
        }
    }
}

// ── Coordinates ─────────────────────────────────────────────────────────

/// Parse `n` comma-separated numbers.
fn parse_numbers(parameter: &'static str, raw: &str, n: usize) -> Result<Vec<f64>, ValidationError> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ValidationError::invalid(parameter, format!("'{}' is not a list of numbers", raw)))?;
    if values.len() != n {
        return Err(ValidationError::invalid(
            parameter,
            format!("expected {} numbers, got {}", n, values.len()),
        ));
    }
    Ok(values)
}

fn check_lon_lat(parameter: &'static str, lon: f64, lat: f64) -> Result<(), ValidationError> {
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::invalid(
            parameter,
            format!("{},{} is not a valid longitude,latitude", lon, lat),
        ));
    }
    Ok(())
}

/// `lon,lat` → `[lon, lat]`.
pub fn parse_position(parameter: &'static str, raw: &str) -> Result<[f64; 2], ValidationError> {
    let v = parse_numbers(parameter, raw, 2)?;
    check_lon_lat(parameter, v[0], v[1])?;
    Ok([v[0], v[1]])
}

/// `west,south,east,north` → `[west, south, east, north]`.
pub fn parse_bounding_box(parameter: &'static str, raw: &str) -> Result<[f64; 4], ValidationError> {
    let v = parse_numbers(parameter, raw, 4)?;
    check_lon_lat(parameter, v[0], v[1])?;
    check_lon_lat(parameter, v[2], v[3])?;
    if v[1] > v[3] {
        return Err(ValidationError::invalid(parameter, "south edge is north of the north edge"));
    }
    Ok([v[0], v[1], v[2], v[3]])
}

fn check_position(parameter: &'static str, raw: &Option<String>) -> Result<(), ValidationError> {
    match raw {
        Some(raw) => parse_position(parameter, raw).map(|_| ()),
        None => Ok(()),
    }
}

fn check_bounding_box(parameter: &'static str, raw: &Option<String>) -> Result<(), ValidationError> {
    match raw {
        Some(raw) => parse_bounding_box(parameter, raw).map(|_| ()),
        None => Ok(()),
    }
}

// Only called after validation succeeded, so parse failures cannot occur.
fn position(raw: &Option<String>) -> Option<[f64; 2]> {
    raw.as_deref().and_then(|r| parse_position("position", r).ok())
}

fn bounding_box(raw: &Option<String>) -> Option<[f64; 4]> {
    raw.as_deref().and_then(|r| parse_bounding_box("bbox", r).ok())
}

// ── Shared response shapes ──────────────────────────────────────────────

/// One place in a search or geocode result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PlaceResult {
    pub place_id: Option<String>,
    pub place_type: Option<String>,
    pub title: Option<String>,
    pub address: Option<Value>,
    pub position: Option<Vec<f64>>,
    pub distance: Option<i64>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResponse {
    pub pricing_bucket: Option<String>,
    #[serde(default)]
    pub result_items: Vec<PlaceResult>,
    pub next_token: Option<String>,
}

impl Page for SearchResponse {
    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    fn item_count(&self) -> usize {
        self.result_items.len()
    }

    fn truncate_items(&mut self, keep: usize) {
        self.result_items.truncate(keep);
    }
}

const SEARCH_FIELDS: &[&str] = &["PricingBucket", "ResultItems", "NextToken"];

// ── SearchNearby ────────────────────────────────────────────────────────

/// Places near a position, optionally filtered by category, chain or food type.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct SearchNearbyInput {
    /// Centre of the search as lon,lat.
    #[serde(rename = "QueryPosition")]
    #[cfg_attr(feature = "cli", arg(long, allow_hyphen_values = true))]
    pub query_position: Option<String>,
    /// Search radius in metres.
    #[serde(rename = "QueryRadius")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub query_radius: Option<u64>,
    /// Page size requested from the service (1-100).
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
    /// Only places inside west,south,east,north.
    #[serde(rename = "Filter_BoundingBox")]
    #[cfg_attr(feature = "cli", arg(long = "bounding-box", allow_hyphen_values = true))]
    pub filter_bounding_box: Option<String>,
    /// ISO 3166 country codes.
    #[serde(rename = "Filter_IncludeCountries", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "include-countries", value_delimiter = ','))]
    pub filter_include_countries: Vec<String>,
    #[serde(rename = "Filter_IncludeCategories", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "include-categories", value_delimiter = ','))]
    pub filter_include_categories: Vec<String>,
    #[serde(rename = "Filter_ExcludeCategories", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "exclude-categories", value_delimiter = ','))]
    pub filter_exclude_categories: Vec<String>,
    #[serde(rename = "Filter_IncludeBusinessChains", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "include-business-chains", value_delimiter = ','))]
    pub filter_include_business_chains: Vec<String>,
    #[serde(rename = "Filter_ExcludeBusinessChains", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "exclude-business-chains", value_delimiter = ','))]
    pub filter_exclude_business_chains: Vec<String>,
    #[serde(rename = "Filter_IncludeFoodTypes", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "include-food-types", value_delimiter = ','))]
    pub filter_include_food_types: Vec<String>,
    #[serde(rename = "Filter_ExcludeFoodTypes", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "exclude-food-types", value_delimiter = ','))]
    pub filter_exclude_food_types: Vec<String>,
    /// Extra result sections, e.g. Contact, TimeZone, Phonemes.
    #[serde(rename = "AdditionalFeatures", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub additional_features: Vec<String>,
    /// BCP 47 language tag for results.
    #[serde(rename = "Language")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub language: Option<String>,
    #[serde(rename = "PoliticalView")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub political_view: Option<String>,
    #[serde(rename = "IntendedUse")]
    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub intended_use: Option<IntendedUse>,
    /// API key sent instead of SigV4 credentials.
    #[serde(rename = "Key")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchNearbyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_business_chains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_business_chains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_food_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_food_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchNearbyRequest {
    pub query_position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_radius: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<SearchNearbyFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_use: Option<IntendedUse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip)]
    pub key: Option<String>,
}

impl PagedRequest for SearchNearbyRequest {
    const MAX_PAGE_SIZE: Option<usize> = Some(100);

    fn set_next_token(&mut self, token: Option<String>) {
        self.next_token = token;
    }

    fn page_size(&self) -> Option<usize> {
        self.max_results.map(|n| n as usize)
    }

    fn set_page_size(&mut self, size: usize) {
        self.max_results = Some(size as u32);
    }
}

pub struct SearchNearby;

impl Operation for SearchNearby {
    type Input = SearchNearbyInput;
    type Request = SearchNearbyRequest;
    type Response = SearchResponse;

    const NAME: &'static str = "SearchNearby";
    const DEFAULT_SELECT: &'static str = "ResultItems";
    const RESPONSE_FIELDS: &'static [&'static str] = SEARCH_FIELDS;
    const PARAMETERS: &'static [&'static str] = &[
        "QueryPosition",
        "QueryRadius",
        "MaxResult",
        "Filter_BoundingBox",
        "Filter_IncludeCountries",
        "Filter_IncludeCategories",
        "Filter_ExcludeCategories",
        "Filter_IncludeBusinessChains",
        "Filter_ExcludeBusinessChains",
        "Filter_IncludeFoodTypes",
        "Filter_ExcludeFoodTypes",
        "AdditionalFeatures",
        "Language",
        "PoliticalView",
        "IntendedUse",
        "Key",
    ];
    const PASS_THRU: Option<&'static str> = Some("QueryPosition");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("QueryPosition", &input.query_position)?;
        check_position("QueryPosition", &input.query_position)?;
        check_bounding_box("Filter_BoundingBox", &input.filter_bounding_box)?;
        require_range("QueryRadius", input.query_radius, 1, 21_000_000)?;
        require_range("MaxResult", input.max_result, 1, 100)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        let filter = collapse(SearchNearbyFilter {
            bounding_box: bounding_box(&input.filter_bounding_box),
            include_countries: non_empty(input.filter_include_countries.clone()),
            include_categories: non_empty(input.filter_include_categories.clone()),
            exclude_categories: non_empty(input.filter_exclude_categories.clone()),
            include_business_chains: non_empty(input.filter_include_business_chains.clone()),
            exclude_business_chains: non_empty(input.filter_exclude_business_chains.clone()),
            include_food_types: non_empty(input.filter_include_food_types.clone()),
            exclude_food_types: non_empty(input.filter_exclude_food_types.clone()),
        });
        SearchNearbyRequest {
            query_position: position(&input.query_position).unwrap_or_default(),
            query_radius: input.query_radius,
            max_results: input.max_result,
            filter,
            additional_features: non_empty(input.additional_features.clone()),
            language: input.language.clone(),
            political_view: input.political_view.clone(),
            intended_use: input.intended_use,
            next_token: None,
            key: input.key.clone(),
        }
    }
}

impl AwsOperation for SearchNearby {
    const SERVICE: &'static ServiceSpec = &SERVICE;

    fn wire_request(request: &Self::Request) -> AwsResult<WireRequest> {
        Ok(WireRequest::rest_json(Method::POST, &["v2", "search-nearby"], request)?
            .query("key", request.key.as_deref()))
    }
}

// ── SearchText ──────────────────────────────────────────────────────────

/// Free-text place search, or a follow-up on a suggestion's query id.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct SearchTextInput {
    /// Free text, e.g. an address or a business name.
    #[serde(rename = "QueryText")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub query_text: Option<String>,
    /// Query id returned by a suggestion.
    #[serde(rename = "QueryId")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub query_id: Option<String>,
    /// Rank results near this lon,lat.
    #[serde(rename = "BiasPosition")]
    #[cfg_attr(feature = "cli", arg(long, allow_hyphen_values = true))]
    pub bias_position: Option<String>,
    /// Only places inside west,south,east,north.
    #[serde(rename = "Filter_BoundingBox")]
    #[cfg_attr(feature = "cli", arg(long = "bounding-box", allow_hyphen_values = true))]
    pub filter_bounding_box: Option<String>,
    /// Only places within a circle around this lon,lat.
    #[serde(rename = "Filter_Circle_Center")]
    #[cfg_attr(feature = "cli", arg(long = "circle-center", allow_hyphen_values = true))]
    pub filter_circle_center: Option<String>,
    /// Circle radius in metres.
    #[serde(rename = "Filter_Circle_Radius")]
    #[cfg_attr(feature = "cli", arg(long = "circle-radius"))]
    pub filter_circle_radius: Option<u64>,
    #[serde(rename = "Filter_IncludeCountries", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "include-countries", value_delimiter = ','))]
    pub filter_include_countries: Vec<String>,
    /// Page size requested from the service (1-100).
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
    #[serde(rename = "AdditionalFeatures", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub additional_features: Vec<String>,
    #[serde(rename = "Language")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub language: Option<String>,
    #[serde(rename = "PoliticalView")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub political_view: Option<String>,
    #[serde(rename = "IntendedUse")]
    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub intended_use: Option<IntendedUse>,
    #[serde(rename = "Key")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Circle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchTextFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<Circle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_countries: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchTextRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_position: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<SearchTextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_use: Option<IntendedUse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip)]
    pub key: Option<String>,
}

impl PagedRequest for SearchTextRequest {
    const MAX_PAGE_SIZE: Option<usize> = Some(100);

    fn set_next_token(&mut self, token: Option<String>) {
        self.next_token = token;
    }

    fn page_size(&self) -> Option<usize> {
        self.max_results.map(|n| n as usize)
    }

    fn set_page_size(&mut self, size: usize) {
        self.max_results = Some(size as u32);
    }
}

pub struct SearchText;

impl Operation for SearchText {
    type Input = SearchTextInput;
    type Request = SearchTextRequest;
    type Response = SearchResponse;

    const NAME: &'static str = "SearchText";
    const DEFAULT_SELECT: &'static str = "ResultItems";
    const RESPONSE_FIELDS: &'static [&'static str] = SEARCH_FIELDS;
    const PARAMETERS: &'static [&'static str] = &[
        "QueryText",
        "QueryId",
        "BiasPosition",
        "Filter_BoundingBox",
        "Filter_Circle_Center",
        "Filter_Circle_Radius",
        "Filter_IncludeCountries",
        "MaxResult",
        "AdditionalFeatures",
        "Language",
        "PoliticalView",
        "IntendedUse",
        "Key",
    ];
    const PASS_THRU: Option<&'static str> = Some("QueryText");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        let has_text = input.query_text.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_id = input.query_id.as_deref().is_some_and(|s| !s.trim().is_empty());
        require_one_of(&[("QueryText", has_text), ("QueryId", has_id)])?;
        if has_text && has_id {
            return Err(ValidationError::Conflict("QueryText", "QueryId"));
        }
        check_position("BiasPosition", &input.bias_position)?;
        check_bounding_box("Filter_BoundingBox", &input.filter_bounding_box)?;
        check_position("Filter_Circle_Center", &input.filter_circle_center)?;
        require_range("Filter_Circle_Radius", input.filter_circle_radius, 1, 21_000_000)?;
        require_range("MaxResult", input.max_result, 1, 100)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        let circle = collapse(Circle {
            center: position(&input.filter_circle_center),
            radius: input.filter_circle_radius,
        });
        let filter = collapse(SearchTextFilter {
            bounding_box: bounding_box(&input.filter_bounding_box),
            circle,
            include_countries: non_empty(input.filter_include_countries.clone()),
        });
        SearchTextRequest {
            query_text: input.query_text.clone(),
            query_id: input.query_id.clone(),
            bias_position: position(&input.bias_position),
            filter,
            max_results: input.max_result,
            additional_features: non_empty(input.additional_features.clone()),
            language: input.language.clone(),
            political_view: input.political_view.clone(),
            intended_use: input.intended_use,
            next_token: None,
            key: input.key.clone(),
        }
    }
}

impl AwsOperation for SearchText {
    const SERVICE: &'static ServiceSpec = &SERVICE;

    fn wire_request(request: &Self::Request) -> AwsResult<WireRequest> {
        Ok(WireRequest::rest_json(Method::POST, &["v2", "search-text"], request)?
            .query("key", request.key.as_deref()))
    }
}

// ── ReverseGeocode ──────────────────────────────────────────────────────

/// Addresses and places at a position.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ReverseGeocodeInput {
    /// Position to look up as lon,lat.
    #[serde(rename = "QueryPosition")]
    #[cfg_attr(feature = "cli", arg(long, allow_hyphen_values = true))]
    pub query_position: Option<String>,
    /// Search radius in metres.
    #[serde(rename = "QueryRadius")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub query_radius: Option<u64>,
    #[serde(rename = "MaxResult")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub max_result: Option<u32>,
    /// Place types to include, e.g. Locality, Street, PointAddress.
    #[serde(rename = "Filter_IncludePlaceTypes", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long = "include-place-types", value_delimiter = ','))]
    pub filter_include_place_types: Vec<String>,
    #[serde(rename = "AdditionalFeatures", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub additional_features: Vec<String>,
    #[serde(rename = "Language")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub language: Option<String>,
    #[serde(rename = "PoliticalView")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub political_view: Option<String>,
    #[serde(rename = "IntendedUse")]
    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub intended_use: Option<IntendedUse>,
    #[serde(rename = "Key")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReverseGeocodeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_place_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReverseGeocodeRequest {
    pub query_position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_radius: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ReverseGeocodeFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_use: Option<IntendedUse>,
    #[serde(skip)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReverseGeocodeResponse {
    pub pricing_bucket: Option<String>,
    #[serde(default)]
    pub result_items: Vec<PlaceResult>,
}

pub struct ReverseGeocode;

impl Operation for ReverseGeocode {
    type Input = ReverseGeocodeInput;
    type Request = ReverseGeocodeRequest;
    type Response = ReverseGeocodeResponse;

    const NAME: &'static str = "ReverseGeocode";
    const DEFAULT_SELECT: &'static str = "ResultItems";
    const RESPONSE_FIELDS: &'static [&'static str] = &["PricingBucket", "ResultItems"];
    const PARAMETERS: &'static [&'static str] = &[
        "QueryPosition",
        "QueryRadius",
        "MaxResult",
        "Filter_IncludePlaceTypes",
        "AdditionalFeatures",
        "Language",
        "PoliticalView",
        "IntendedUse",
        "Key",
    ];
    const PASS_THRU: Option<&'static str> = Some("QueryPosition");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("QueryPosition", &input.query_position)?;
        check_position("QueryPosition", &input.query_position)?;
        require_range("QueryRadius", input.query_radius, 1, 21_000_000)?;
        require_range("MaxResult", input.max_result, 1, 100)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        ReverseGeocodeRequest {
            query_position: position(&input.query_position).unwrap_or_default(),
            query_radius: input.query_radius,
            max_results: input.max_result,
            filter: collapse(ReverseGeocodeFilter {
                include_place_types: non_empty(input.filter_include_place_types.clone()),
            }),
            additional_features: non_empty(input.additional_features.clone()),
            language: input.language.clone(),
            political_view: input.political_view.clone(),
            intended_use: input.intended_use,
            key: input.key.clone(),
        }
    }
}

impl AwsOperation for ReverseGeocode {
    const SERVICE: &'static ServiceSpec = &SERVICE;

    fn wire_request(request: &Self::Request) -> AwsResult<WireRequest> {
        Ok(WireRequest::rest_json(Method::POST, &["v2", "reverse-geocode"], request)?
            .query("key", request.key.as_deref()))
    }
}

// ── GetPlace ────────────────────────────────────────────────────────────

/// Full details of one place by id.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct GetPlaceInput {
    /// Place id from a search result.
    #[serde(rename = "PlaceId")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub place_id: Option<String>,
    #[serde(rename = "AdditionalFeatures", skip_serializing_if = "Vec::is_empty")]
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub additional_features: Vec<String>,
    #[serde(rename = "Language")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub language: Option<String>,
    #[serde(rename = "PoliticalView")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub political_view: Option<String>,
    #[serde(rename = "IntendedUse")]
    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub intended_use: Option<IntendedUse>,
    #[serde(rename = "Key")]
    #[cfg_attr(feature = "cli", arg(long))]
    pub key: Option<String>,
}

/// Everything travels in the path and query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetPlaceRequest {
    pub place_id: String,
    pub additional_features: Vec<String>,
    pub language: Option<String>,
    pub political_view: Option<String>,
    pub intended_use: Option<IntendedUse>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPlaceResponse {
    pub place_id: Option<String>,
    pub place_type: Option<String>,
    pub title: Option<String>,
    pub pricing_bucket: Option<String>,
    pub address: Option<Value>,
    pub position: Option<Vec<f64>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

pub struct GetPlace;

impl Operation for GetPlace {
    type Input = GetPlaceInput;
    type Request = GetPlaceRequest;
    type Response = GetPlaceResponse;

    const NAME: &'static str = "GetPlace";
    const RESPONSE_FIELDS: &'static [&'static str] = &[
        "PlaceId",
        "PlaceType",
        "Title",
        "PricingBucket",
        "Address",
        "AddressNumberCorrected",
        "PostalCodeDetails",
        "Position",
        "MapView",
        "Categories",
        "FoodTypes",
        "BusinessChains",
        "Contacts",
        "OpeningHours",
        "AccessPoints",
        "AccessRestrictions",
        "TimeZone",
        "PoliticalView",
        "Phonemes",
    ];
    const PARAMETERS: &'static [&'static str] = &[
        "PlaceId",
        "AdditionalFeatures",
        "Language",
        "PoliticalView",
        "IntendedUse",
        "Key",
    ];
    const PASS_THRU: Option<&'static str> = Some("PlaceId");

    fn validate(input: &Self::Input) -> Result<(), ValidationError> {
        require_str("PlaceId", &input.place_id)
    }

    fn build_request(input: &Self::Input) -> Self::Request {
        GetPlaceRequest {
            place_id: input.place_id.clone().unwrap_or_default(),
            additional_features: input.additional_features.clone(),
            language: input.language.clone(),
            political_view: input.political_view.clone(),
            intended_use: input.intended_use,
            key: input.key.clone(),
        }
    }
}

impl AwsOperation for GetPlace {
    const SERVICE: &'static ServiceSpec = &SERVICE;

    fn wire_request(request: &Self::Request) -> AwsResult<WireRequest> {
        Ok(WireRequest::rest(Method::GET, &["v2", "place", &request.place_id])
            .query_list("additional-features", &request.additional_features)
            .query("language", request.language.as_deref())
            .query("political-view", request.political_view.as_deref())
            .query("intended-use", request.intended_use.map(IntendedUse::as_str))
            .query("key", request.key.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body<O: AwsOperation>(input: &O::Input) -> Value {
        let wire = O::wire_request(&O::build_request(input)).unwrap();
        serde_json::from_slice(&wire.body).unwrap()
    }

    #[test]
    fn positions_parse_and_range_check() {
        assert_eq!(parse_position("QueryPosition", "-123.11, 49.28").unwrap(), [-123.11, 49.28]);
        assert!(parse_position("QueryPosition", "49.28").is_err());
        assert!(parse_position("QueryPosition", "200,10").is_err());
        assert!(parse_position("QueryPosition", "a,b").is_err());
        assert!(parse_bounding_box("Filter_BoundingBox", "-124,48,-122,50").is_ok());
        assert!(parse_bounding_box("Filter_BoundingBox", "-124,50,-122,48").is_err());
    }

    #[test]
    fn unset_lists_echo_nothing() {
        let ctx = awsop_core::InvocationContext::resolve::<SearchNearby>(&awsop_core::InvocationOptions {
            select: Some("^Filter_IncludeCountries".into()),
            ..Default::default()
        })
        .unwrap();
        let mut input = SearchNearbyInput {
            query_position: Some("-123.11,49.28".into()),
            ..Default::default()
        };
        assert_eq!(ctx.projector.echo(&input).unwrap(), None);

        input.filter_include_countries = vec!["CAN".into()];
        assert_eq!(ctx.projector.echo(&input).unwrap(), Some(json!(["CAN"])));
    }

    #[test]
    fn search_nearby_minimal_body() {
        let input = SearchNearbyInput {
            query_position: Some("-123.11,49.28".into()),
            key: Some("v1.public.abc".into()),
            ..Default::default()
        };
        SearchNearby::validate(&input).unwrap();
        assert_eq!(
            body::<SearchNearby>(&input),
            json!({ "QueryPosition": [-123.11, 49.28] })
        );
        let wire = SearchNearby::wire_request(&SearchNearby::build_request(&input)).unwrap();
        let url = wire.url("https://places.geo.us-west-2.amazonaws.com").unwrap();
        assert_eq!(url.path(), "/v2/search-nearby");
        assert_eq!(url.query(), Some("key=v1.public.abc"));
    }

    #[test]
    fn search_nearby_filter_group() {
        let input = SearchNearbyInput {
            query_position: Some("-123.11,49.28".into()),
            filter_include_categories: vec!["restaurant".into(), "cafe".into()],
            filter_include_countries: vec!["CAN".into()],
            max_result: Some(10),
            ..Default::default()
        };
        assert_eq!(
            body::<SearchNearby>(&input),
            json!({
                "QueryPosition": [-123.11, 49.28],
                "MaxResults": 10,
                "Filter": {
                    "IncludeCountries": ["CAN"],
                    "IncludeCategories": ["restaurant", "cafe"]
                }
            })
        );
    }

    #[test]
    fn search_text_needs_exactly_one_query() {
        assert_eq!(
            SearchText::validate(&SearchTextInput::default()),
            Err(ValidationError::MissingOneOf(vec!["QueryText", "QueryId"]))
        );
        let both = SearchTextInput {
            query_text: Some("coffee".into()),
            query_id: Some("q-1".into()),
            ..Default::default()
        };
        assert_eq!(
            SearchText::validate(&both),
            Err(ValidationError::Conflict("QueryText", "QueryId"))
        );
    }

    #[test]
    fn search_text_circle_nests_under_filter() {
        let input = SearchTextInput {
            query_text: Some("coffee".into()),
            filter_circle_center: Some("-123.11,49.28".into()),
            filter_circle_radius: Some(500),
            ..Default::default()
        };
        SearchText::validate(&input).unwrap();
        assert_eq!(
            body::<SearchText>(&input),
            json!({
                "QueryText": "coffee",
                "Filter": { "Circle": { "Center": [-123.11, 49.28], "Radius": 500 } }
            })
        );
    }

    #[test]
    fn reverse_geocode_omits_empty_filter() {
        let input = ReverseGeocodeInput {
            query_position: Some("2.35,48.85".into()),
            ..Default::default()
        };
        assert!(body::<ReverseGeocode>(&input).get("Filter").is_none());
        assert_eq!(
            ReverseGeocode::validate(&ReverseGeocodeInput::default()),
            Err(ValidationError::MissingParameter("QueryPosition"))
        );
    }

    #[test]
    fn get_place_uses_path_and_query() {
        let input = GetPlaceInput {
            place_id: Some("AQAAAFUA/xyz".into()),
            additional_features: vec!["Contact".into(), "TimeZone".into()],
            language: Some("fr".into()),
            intended_use: Some(IntendedUse::Storage),
            ..Default::default()
        };
        let wire = GetPlace::wire_request(&GetPlace::build_request(&input)).unwrap();
        assert_eq!(wire.method, Method::GET);
        assert!(wire.body.is_empty());
        let url = wire.url("https://places.geo.eu-west-1.amazonaws.com").unwrap();
        assert_eq!(url.path(), "/v2/place/AQAAAFUA%2Fxyz");
        assert_eq!(
            url.query(),
            Some("additional-features=Contact%2CTimeZone&language=fr&intended-use=Storage")
        );
    }

    #[test]
    fn place_results_keep_extra_sections() {
        let raw = json!({
            "ResultItems": [{
                "PlaceId": "p-1",
                "PlaceType": "PointOfInterest",
                "Title": "Cafe",
                "Distance": 42,
                "Contacts": { "Phones": [{ "Value": "+1 555" }] }
            }],
            "NextToken": "n-1"
        });
        let resp: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.next_token(), Some("n-1"));
        assert_eq!(resp.result_items[0].distance, Some(42));
        let back = serde_json::to_value(&resp.result_items[0]).unwrap();
        assert_eq!(back["Contacts"]["Phones"][0]["Value"], "+1 555");
    }
}
