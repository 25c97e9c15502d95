//! HTTP behavior of the OpenWeather fetcher and the Gemini client against a
//! mock server.

use skycast_core::{
    Endpoint, FetchError, ForecastWindow, GeminiClient, GenerationError, Narrator,
    OpenWeatherProvider, ReportKind, Session, TextGenerator, Units, WeatherFetcher, narrator,
    session::{self, fetch_cycle},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_response() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -84.39, "lat": 33.75},
        "weather": [{"id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d"}],
        "main": {
            "temp": 22.5, "feels_like": 21.9, "temp_min": 20.1, "temp_max": 24.0,
            "pressure": 1018, "humidity": 48
        },
        "wind": {"speed": 3.1, "deg": 250},
        "dt": 1705330800,
        "sys": {"country": "US", "sunrise": 1705322000, "sunset": 1705359000},
        "timezone": -18000,
        "name": "Atlanta",
        "cod": 200
    })
}

// 2024-01-15 05:00 UTC is midnight in Atlanta (UTC-5).
const ATLANTA_MIDNIGHT: i64 = 1_705_294_800;

fn forecast_response() -> serde_json::Value {
    forecast_response_from(ATLANTA_MIDNIGHT)
}

fn forecast_response_from(start: i64) -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            serde_json::json!({
                "dt": start + i * 3 * 3600,
                "main": {"temp": 10.0 + i as f64, "humidity": 50 + (i % 10)},
                "weather": [{"description": "clear sky", "icon": "01d"}]
            })
        })
        .collect();
    serde_json::json!({
        "cod": "200",
        "cnt": 40,
        "list": list,
        "city": {"name": "Atlanta", "country": "US", "timezone": -18000}
    })
}

async fn mount_weather(server: &MockServer, units: &str) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Atlanta"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", units))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response()))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url("test-key", server.uri())
}

// ============================================================================
// OpenWeather
// ============================================================================

#[tokio::test]
async fn fetch_current_sends_query_and_parses() {
    let server = MockServer::start().await;
    mount_weather(&server, "imperial").await;

    let current = provider(&server).fetch_current("Atlanta", Units::Imperial).await;

    let current = current.expect("current conditions should parse");
    assert_eq!(current.name, "Atlanta");
    assert_eq!(current.country, "US");
    assert_eq!(current.humidity, 48);
    assert_eq!(current.icon, "02d");
    assert_eq!(current.utc_offset_secs, -18000);
}

#[tokio::test]
async fn fetch_forecast_returns_all_points_in_order() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_response())).await;

    let points = provider(&server).fetch_forecast("Atlanta", Units::Metric).await.unwrap();

    assert_eq!(points.len(), 40);
    assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let err = provider(&server).fetch_current("Nowhere", Units::Metric).await.unwrap_err();

    match err {
        FetchError::Status { endpoint, status, body } => {
            assert_eq!(endpoint, Endpoint::Current);
            assert_eq!(status, 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_string("{not json")).await;

    let err = provider(&server).fetch_forecast("Atlanta", Units::Metric).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { endpoint: Endpoint::Forecast, .. }));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = OpenWeatherProvider::with_base_url("k", uri)
        .fetch_current("Atlanta", Units::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Request { endpoint: Endpoint::Current, .. }));
}

// ============================================================================
// Full cycle
// ============================================================================

#[tokio::test]
async fn cycle_normalizes_in_location_time() {
    let server = MockServer::start().await;
    mount_weather(&server, "metric").await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_response())).await;

    let mut session = Session::new();
    let snapshot = fetch_cycle(
        &provider(&server),
        &mut session,
        "Atlanta",
        Units::Metric,
        ForecastWindow::CurrentDay,
    )
    .await
    .unwrap();

    assert_eq!(snapshot.location, "Atlanta, US");
    assert_eq!(snapshot.current.temperature, "22.5°C");
    assert_eq!(snapshot.forecast.len(), 8);
    assert_eq!(snapshot.forecast[0].time_label, "12 AM");
    assert_eq!(snapshot.forecast[5].time_label, "3 PM");
    assert!(snapshot.forecast.iter().all(|p| p.date_label == "2024-01-15"));
}

#[tokio::test]
async fn cycle_five_day_resamples() {
    let server = MockServer::start().await;
    mount_weather(&server, "metric").await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_response())).await;

    let mut session = Session::new();
    let snapshot = fetch_cycle(
        &provider(&server),
        &mut session,
        "Atlanta",
        Units::Metric,
        ForecastWindow::FiveDay,
    )
    .await
    .unwrap();

    assert_eq!(snapshot.forecast.len(), 20);
    let labels: Vec<&str> = snapshot
        .forecast
        .iter()
        .take(4)
        .map(|p| p.time_label.as_str())
        .collect();
    assert_eq!(labels, ["12 AM", "6 AM", "12 PM", "6 PM"]);
}

#[tokio::test]
async fn forecast_failure_yields_no_snapshot() {
    let server = MockServer::start().await;
    mount_weather(&server, "metric").await;
    mount_forecast(&server, ResponseTemplate::new(500).set_body_string("internal error")).await;

    let mut session = Session::new();
    let result = fetch_cycle(
        &provider(&server),
        &mut session,
        "Atlanta",
        Units::Metric,
        ForecastWindow::ThreeDay,
    )
    .await;

    assert!(result.is_err());
    assert!(session.snapshot().is_none());
}

// ============================================================================
// Gemini
// ============================================================================

fn gemini(server: &MockServer) -> GeminiClient {
    GeminiClient::with_endpoint("llm-key", server.uri(), "gemini-pro")
        .expect("client should build")
}

#[tokio::test]
async fn gemini_generate_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(query_param("key", "llm-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Expect sunshine."}]}}]
        })))
        .mount(&server)
        .await;

    let text = gemini(&server).generate("Weather?").await.unwrap();

    assert_eq!(text, "Expect sunshine.");
}

#[tokio::test]
async fn gemini_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = gemini(&server).generate("Weather?").await.unwrap_err();

    assert!(matches!(err, GenerationError::Status { status: 403, .. }));
}

#[tokio::test]
async fn chat_over_http_falls_back_to_apology() {
    let server = MockServer::start().await;
    mount_weather(&server, "metric").await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast_response())).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = Session::new();
    fetch_cycle(
        &provider(&server),
        &mut session,
        "Atlanta",
        Units::Metric,
        ForecastWindow::CurrentDay,
    )
    .await
    .unwrap();
    let narrator = Narrator::new(gemini(&server));

    let answer = session::ask(&narrator, &mut session, "Umbrella?").await.unwrap();

    assert_eq!(answer, narrator::CHAT_APOLOGY);
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn evening_report_sends_next_eight_entries() {
    let server = MockServer::start().await;
    mount_weather(&server, "metric").await;
    // 21:00 in Atlanta, three hours before local midnight.
    let evening = ATLANTA_MIDNIGHT + 21 * 3600;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(forecast_response_from(evening)),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Cool night ahead."}]}}]
        })))
        .mount(&server)
        .await;

    let mut session = Session::new();
    let snapshot = fetch_cycle(
        &provider(&server),
        &mut session,
        "Atlanta",
        Units::Metric,
        ForecastWindow::CurrentDay,
    )
    .await
    .unwrap();
    assert_eq!(snapshot.forecast.len(), 1);

    let narrator = Narrator::new(gemini(&server));
    let text = session::report(&narrator, &session, ReportKind::News).await.unwrap();
    assert_eq!(text, "Cool night ahead.");

    let requests = server.received_requests().await.unwrap();
    let sent = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("generateContent should be called");
    let body: serde_json::Value = serde_json::from_slice(&sent.body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();

    assert_eq!(prompt.matches("clear sky").count(), 8);
    assert!(prompt.contains("2024-01-15 9 PM: 10°C"));
    assert!(prompt.contains("2024-01-16 6 PM: 17°C"));
}
