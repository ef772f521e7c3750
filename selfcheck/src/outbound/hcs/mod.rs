//! HCS outbound adapters.
//!
//! This module provides a reqwest implementation of the `SchoolDirectory`,
//! `SessionGateway` and `SurveyGateway` ports.

mod dto;
mod endpoints;
mod http_client;

pub use endpoints::{
    DEFAULT_REGION_BASE_TEMPLATE, DEFAULT_SEARCH_BASE_URL, HcsEndpoints, HcsEndpointsError,
    REGION_PLACEHOLDER,
};
pub use http_client::HcsHttpClient;
