use fieldcast_core::{
    Advisory, DailyForecastEntry, IconKind, MarketPrice, WeatherReport, report::CurrentSummary,
};
use serde_json::json;

fn icon(kind: IconKind) -> &'static str {
    match kind {
        IconKind::Sun => "☀",
        IconKind::Cloud => "☁",
        IconKind::Rain => "🌧",
    }
}

/// "light rain" -> "Light Rain"
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_current(current: &CurrentSummary) -> String {
    let wind = match current.wind_speed_mps {
        Some(speed) => format!("{speed} m/s {}", current.wind_direction.unwrap_or_default())
            .trim_end()
            .to_string(),
        None => "--".to_string(),
    };
    let uv = current
        .uv_index
        .map_or_else(|| "--".to_string(), |uv| uv.to_string());

    format!(
        "{}\n  {}°C  {}  (feels like {}°C)\n  Wind: {}  Humidity: {}%  Rain: {} mm  UV Index: {}",
        current.location_name,
        current.temperature_c,
        capitalize_words(&current.description),
        current.feels_like_c,
        wind,
        current.humidity_pct,
        current.rain_mm,
        uv,
    )
}

fn format_forecast(days: &[DailyForecastEntry]) -> String {
    days.iter()
        .map(|d| {
            format!(
                "  {:<6} {} {:>4}°C  {}",
                d.day_label,
                icon(d.icon),
                d.temperature_c,
                d.tooltip
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_report(report: &WeatherReport) {
    println!("{}", format_current(&report.current));
    println!();
    println!("Advisory: {}", report.advisory_message);
    println!();
    println!("Forecast:");
    println!("{}", format_forecast(&report.forecast));
}

/// Static sample content shown when live weather could not be loaded.
pub fn placeholder_forecast() -> Vec<DailyForecastEntry> {
    [
        ("Today", 28, "Sunny", IconKind::Sun),
        ("Tue", 25, "Partly Cloudy", IconKind::Cloud),
        ("Wed", 22, "Light Rain", IconKind::Rain),
        ("Thu", 26, "Sunny", IconKind::Sun),
        ("Fri", 27, "Sunny", IconKind::Sun),
        ("Sat", 29, "Sunny", IconKind::Sun),
        ("Sun", 30, "Sunny", IconKind::Sun),
    ]
    .into_iter()
    .map(|(day, temp, condition, icon)| DailyForecastEntry {
        day_label: day.to_string(),
        temperature_c: temp,
        condition: condition.to_string(),
        icon,
        tooltip: condition.to_string(),
    })
    .collect()
}

pub fn print_placeholder() {
    println!("Advisory: {}", Advisory::IdealIrrigation);
    println!();
    println!("Forecast (sample data):");
    println!("{}", format_forecast(&placeholder_forecast()));
}

/// The placeholder as JSON, flagged so scripts can tell it from live data.
pub fn placeholder_json() -> serde_json::Value {
    json!({
        "placeholder": true,
        "advisory": Advisory::IdealIrrigation,
        "advisory_message": Advisory::IdealIrrigation.to_string(),
        "forecast": placeholder_forecast(),
    })
}

pub fn print_placeholder_json() -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(&placeholder_json())?);
    Ok(())
}

pub fn print_market_prices(prices: &[MarketPrice]) {
    if prices.is_empty() {
        println!("No prices listed.");
        return;
    }

    for p in prices {
        println!("  {:<16} {:<20} ₹{:.2}", p.crop, p.market, p.price);
    }
}
