//! OpenWeather fetcher behaviour against a mock HTTP server.

use chrono::Weekday;
use fieldcast_core::{
    Coordinates, DisabledGeolocator, LocationResolver, OpenWeatherProvider, SubRequest,
    WeatherError, WeatherProvider, normalize,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body() -> Value {
    json!({
        "name": "Ludhiana",
        "coord": {"lat": 30.9, "lon": 75.85},
        "main": {"temp": 36.2, "feels_like": 38.0, "humidity": 22},
        "weather": [{"main": "Clear", "description": "clear sky"}],
        "wind": {"speed": 3.6, "deg": 315}
    })
}

/// Ten 3-hour samples: four on the first date, six on the next.
fn forecast_body() -> Value {
    let list: Vec<Value> = (0..10)
        .map(|i| {
            let hour = 12 + 3 * i;
            let (day, hour) = (1 + hour / 24, hour % 24);
            json!({
                "dt": 1_717_243_200 + i * 10_800,
                "dt_txt": format!("2024-06-{day:02} {hour:02}:00:00"),
                "main": {"temp": 30.0 + i as f64},
                "weather": [{"main": "Clouds", "description": format!("clouds {i}")}]
            })
        })
        .collect();

    json!({ "list": list })
}

async fn mount(server: &MockServer, endpoint: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(template)
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("test_key".to_string()).with_base_url(server.uri())
}

#[tokio::test]
async fn fetch_by_coordinates_returns_full_bundle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "30.9"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_body())).await;
    mount(&server, "/uvi", ResponseTemplate::new(200).set_body_json(json!({"value": 9.1}))).await;

    let coords = Coordinates::new(30.9, 75.85).unwrap();
    let bundle = provider(&server).fetch_by_coordinates(coords).await.unwrap();

    assert_eq!(bundle.current.location_name, "Ludhiana");
    assert_eq!(bundle.current.humidity_pct, 22);
    assert_eq!(bundle.forecast.len(), 10);
    assert_eq!(bundle.uv_index, Some(9.1));

    let days = normalize(&bundle.forecast, Weekday::Sat);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day_label, "Today");
    assert_eq!(days[1].tooltip, "clouds 4");
}

#[tokio::test]
async fn failed_uv_request_fails_the_whole_fetch() {
    let server = MockServer::start().await;

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_body())).await;
    mount(&server, "/uvi", ResponseTemplate::new(500).set_body_string("boom")).await;

    let coords = Coordinates::new(30.9, 75.85).unwrap();
    let err = provider(&server).fetch_by_coordinates(coords).await.unwrap_err();

    match err {
        WeatherError::WeatherFetch { request, status, .. } => {
            assert_eq!(request, SubRequest::UvIndex);
            assert_eq!(status.map(|s| s.as_u16()), Some(500));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_main_is_a_malformed_response() {
    let server = MockServer::start().await;

    let mut body = current_body();
    body.as_object_mut().unwrap().remove("main");

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(body)).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_body())).await;
    mount(&server, "/uvi", ResponseTemplate::new(200).set_body_json(json!({"value": 4.0}))).await;

    let coords = Coordinates::new(30.9, 75.85).unwrap();
    let err = provider(&server).fetch_by_coordinates(coords).await.unwrap_err();

    assert!(err.is_fetch_failure());
    assert!(matches!(
        err,
        WeatherError::MalformedResponse { request: SubRequest::Current, .. }
    ));
}

#[tokio::test]
async fn fetch_by_city_uses_coordinates_from_current_conditions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Ludhiana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Ludhiana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uvi"))
        .and(query_param("lat", "30.9"))
        .and(query_param("lon", "75.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 7.5})))
        .expect(1)
        .mount(&server)
        .await;

    let bundle = provider(&server).fetch_by_city_name("Ludhiana").await.unwrap();

    assert_eq!(bundle.current.coordinates, Coordinates::new(30.9, 75.85).unwrap());
    assert_eq!(bundle.uv_index, Some(7.5));
}

#[tokio::test]
async fn uv_value_may_be_absent() {
    let server = MockServer::start().await;

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(json!({"list": []}))).await;
    mount(&server, "/uvi", ResponseTemplate::new(200).set_body_json(json!({}))).await;

    let coords = Coordinates::new(30.9, 75.85).unwrap();
    let bundle = provider(&server).fetch_by_coordinates(coords).await.unwrap();

    assert_eq!(bundle.uv_index, None);
    assert!(normalize(&bundle.forecast, Weekday::Mon).is_empty());
}

#[tokio::test]
async fn unknown_city_is_a_lookup_error() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/weather",
        ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
    )
    .await;

    let resolver = LocationResolver::new(Box::new(DisabledGeolocator), Coordinates::default());
    let err = resolver
        .resolve_from_city_name(&provider(&server), "Nowhereville")
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Lookup(name) if name == "Nowhereville"));
}

#[tokio::test]
async fn city_name_resolves_to_embedded_coordinates() {
    let server = MockServer::start().await;

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;

    let resolver = LocationResolver::new(Box::new(DisabledGeolocator), Coordinates::default());
    let coords = resolver
        .resolve_from_city_name(&provider(&server), "Ludhiana")
        .await
        .unwrap();

    assert_eq!(coords.latitude, 30.9);
    assert_eq!(coords.longitude, 75.85);
}

fn failed_request(err: WeatherError) -> (SubRequest, Option<u16>) {
    match err {
        WeatherError::WeatherFetch { request, status, .. } => (request, status.map(|s| s.as_u16())),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_forecast_fails_coordinate_fetch() {
    let server = MockServer::start().await;

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(
        &server,
        "/forecast",
        ResponseTemplate::new(401).set_body_json(json!({"cod": 401, "message": "Invalid API key"})),
    )
    .await;
    mount(&server, "/uvi", ResponseTemplate::new(200).set_body_json(json!({"value": 5.0}))).await;

    let coords = Coordinates::new(30.9, 75.85).unwrap();
    let err = provider(&server).fetch_by_coordinates(coords).await.unwrap_err();

    assert_eq!(failed_request(err), (SubRequest::Forecast, Some(401)));
}

#[tokio::test]
async fn unavailable_uv_fails_city_fetch() {
    let server = MockServer::start().await;

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_body())).await;
    mount(&server, "/uvi", ResponseTemplate::new(503).set_body_string("maintenance")).await;

    let err = provider(&server).fetch_by_city_name("Ludhiana").await.unwrap_err();

    assert_eq!(failed_request(err), (SubRequest::UvIndex, Some(503)));
}

#[tokio::test]
async fn failed_forecast_fails_city_fetch() {
    let server = MockServer::start().await;

    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(current_body())).await;
    mount(&server, "/forecast", ResponseTemplate::new(500).set_body_string("boom")).await;
    mount(&server, "/uvi", ResponseTemplate::new(200).set_body_json(json!({"value": 7.5}))).await;

    let err = provider(&server).fetch_by_city_name("Ludhiana").await.unwrap_err();

    assert_eq!(failed_request(err), (SubRequest::Forecast, Some(500)));
}

#[tokio::test]
async fn unknown_city_fails_city_fetch_as_lookup() {
    let server = MockServer::start().await;

    let not_found =
        || ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"}));
    mount(&server, "/weather", not_found()).await;
    mount(&server, "/forecast", not_found()).await;

    let err = provider(&server).fetch_by_city_name("Nowhereville").await.unwrap_err();

    assert!(!err.is_fetch_failure());
    assert!(matches!(err, WeatherError::Lookup(name) if name == "Nowhereville"));
}
