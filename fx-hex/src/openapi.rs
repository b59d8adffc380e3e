//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use fx_types::domain::{AlertCondition, AlertEvaluation, AlertId, FeeBreakdown, RateSource};
use fx_types::dto::{
    AlertResponse, ConversionResponse, ConvertRequest, ConvertedAmountResponse,
    CreateAlertRequest, CurrencyInfo, MultiConvertRequest, MultiConvertResponse, QuoteRequest,
    QuoteResponse, RateEntry, RatesResponse,
};
use fx_types::CurrencyCode;
use utoipa::OpenApi;

use crate::inbound::{CheckAlertsResponse, ErrorResponse};

// Stand-ins carrying the path documentation; the real handlers are generic
// over the snapshot store.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List the supported currencies
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "rates",
    responses(
        (status = 200, description = "Supported currencies", body = Vec<CurrencyInfo>)
    )
)]
async fn list_currencies() {}

/// List every effective rate with its source
#[utoipa::path(
    get,
    path = "/api/rates",
    tag = "rates",
    responses(
        (status = 200, description = "Installed rate table", body = RatesResponse),
        (status = 503, description = "Rates have not been loaded", body = ErrorResponse)
    )
)]
async fn list_rates() {}

/// Fetch fresh rates, falling back to the saved snapshot
#[utoipa::path(
    post,
    path = "/api/rates/refresh",
    tag = "rates",
    responses(
        (status = 200, description = "Rates installed; `offline` is true when the snapshot was used", body = RatesResponse),
        (status = 503, description = "Provider failed and no snapshot is available", body = ErrorResponse)
    )
)]
async fn refresh_rates() {}

/// Convert an amount between two currencies
#[utoipa::path(
    post,
    path = "/api/convert",
    tag = "conversions",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Conversion result", body = ConversionResponse),
        (status = 400, description = "Unsupported currency, negative amount or result out of range", body = ErrorResponse),
        (status = 503, description = "Rates have not been loaded", body = ErrorResponse)
    )
)]
async fn convert() {}

/// Convert one amount into several currencies
#[utoipa::path(
    post,
    path = "/api/convert/multi",
    tag = "conversions",
    request_body = MultiConvertRequest,
    responses(
        (status = 200, description = "One result per target, in request order", body = MultiConvertResponse),
        (status = 400, description = "Invalid input or duplicate target", body = ErrorResponse),
        (status = 503, description = "Rates have not been loaded", body = ErrorResponse)
    )
)]
async fn convert_many() {}

/// Convert and apply fee and tax percentages
#[utoipa::path(
    post,
    path = "/api/quote",
    tag = "conversions",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Conversion with fee breakdown", body = QuoteResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 503, description = "Rates have not been loaded", body = ErrorResponse)
    )
)]
async fn quote() {}

/// Create a rate alert
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = AlertResponse),
        (status = 400, description = "Unsupported currency or non-positive target", body = ErrorResponse)
    )
)]
async fn create_alert() {}

/// List alerts in creation order
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "alerts",
    responses(
        (status = 200, description = "All alerts", body = Vec<AlertResponse>)
    )
)]
async fn list_alerts() {}

/// Evaluate every alert and notify the ones that just fired
#[utoipa::path(
    post,
    path = "/api/alerts/check",
    tag = "alerts",
    responses(
        (status = 200, description = "Evaluation of every alert", body = CheckAlertsResponse),
        (status = 503, description = "Rates have not been loaded", body = ErrorResponse)
    )
)]
async fn check_alerts() {}

/// Activate or deactivate an alert
#[utoipa::path(
    post,
    path = "/api/alerts/{id}/toggle",
    tag = "alerts",
    params(
        ("id" = String, Path, description = "Alert ID (UUID)")
    ),
    responses(
        (status = 200, description = "Alert after the toggle", body = AlertResponse),
        (status = 400, description = "Malformed alert ID", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse)
    )
)]
async fn toggle_alert() {}

/// Delete an alert
#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    tag = "alerts",
    params(
        ("id" = String, Path, description = "Alert ID (UUID)")
    ),
    responses(
        (status = 204, description = "Alert deleted"),
        (status = 400, description = "Malformed alert ID", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse)
    )
)]
async fn remove_alert() {}

/// OpenAPI documentation for the FX API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FX Currency Conversion API",
        version = "1.0.0",
        description = "Currency conversion over a directed rate table with reciprocal completion, multi-currency conversion, fee and tax quotes, and rate alerts.\n\nCurrency codes are case-insensitive. Amounts may be sent as numbers or numeric text; malformed amounts count as 0.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_currencies,
        list_rates,
        refresh_rates,
        convert,
        convert_many,
        quote,
        create_alert,
        list_alerts,
        check_alerts,
        toggle_alert,
        remove_alert,
    ),
    components(
        schemas(
            CurrencyCode,
            CurrencyInfo,
            RateSource,
            RateEntry,
            RatesResponse,
            ConvertRequest,
            ConversionResponse,
            MultiConvertRequest,
            ConvertedAmountResponse,
            MultiConvertResponse,
            QuoteRequest,
            QuoteResponse,
            FeeBreakdown,
            AlertId,
            AlertCondition,
            CreateAlertRequest,
            AlertResponse,
            AlertEvaluation,
            CheckAlertsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Supported currencies and the installed rate table"),
        (name = "conversions", description = "Single, multi-currency and quoted conversions"),
        (name = "alerts", description = "Rate alert management and checking"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/api/currencies",
            "/api/rates",
            "/api/rates/refresh",
            "/api/convert",
            "/api/convert/multi",
            "/api/quote",
            "/api/alerts",
            "/api/alerts/check",
            "/api/alerts/{id}",
            "/api/alerts/{id}/toggle",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let alerts = &doc.paths.paths["/api/alerts"];
        assert!(alerts.get.is_some() && alerts.post.is_some());
    }
}
