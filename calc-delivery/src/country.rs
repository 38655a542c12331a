//! Best-effort visitor country detection.
//!
//! Tries a handful of public IP geolocation endpoints in order, with a
//! short per-attempt timeout, and falls back to mapping the process
//! locale when none of them answer. Detection can never fail the session;
//! the worst outcome is an "Unknown" country line in the lead message.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Deserialize)]
struct IpapiResponse {
    country_name: Option<String>,
    country_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreeIpApiResponse {
    country_name: Option<String>,
    country_code: Option<String>,
}

#[derive(Deserialize)]
struct IpWhoResponse {
    country: Option<String>,
    country_code: Option<String>,
}

/// Resolves the visitor's country as `"Name (CODE)"`, or a locale-based
/// guess, or `"Unknown"`.
pub async fn detect(client: &Client) -> String {
    if let Some(country) = from_ipapi(client).await {
        return country;
    }
    if let Some(country) = from_freeipapi(client).await {
        return country;
    }
    if let Some(country) = from_ipwho(client).await {
        return country;
    }
    if let Some(country) = from_cloudflare(client).await {
        return country;
    }

    debug!("all geolocation endpoints failed, falling back to locale");
    locale_fallback(std::env::var("LANG").ok().as_deref())
}

async fn from_ipapi(client: &Client) -> Option<String> {
    let data: IpapiResponse = client
        .get("https://ipapi.co/json/")
        .timeout(ATTEMPT_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .await
        .ok()?;
    Some(format!("{} ({})", data.country_name?, data.country_code?))
}

async fn from_freeipapi(client: &Client) -> Option<String> {
    let data: FreeIpApiResponse = client
        .get("https://freeipapi.com/api/json")
        .timeout(ATTEMPT_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .await
        .ok()?;
    Some(format!("{} ({})", data.country_name?, data.country_code?))
}

async fn from_ipwho(client: &Client) -> Option<String> {
    let data: IpWhoResponse = client
        .get("https://ipwho.is/")
        .timeout(ATTEMPT_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .await
        .ok()?;
    Some(format!("{} ({})", data.country?, data.country_code?))
}

async fn from_cloudflare(client: &Client) -> Option<String> {
    let text = client
        .get("https://www.cloudflare.com/cdn-cgi/trace")
        .timeout(ATTEMPT_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .text()
        .await
        .ok()?;
    parse_trace(&text)
}

/// Pulls the `loc=XX` line out of a Cloudflare trace response.
fn parse_trace(text: &str) -> Option<String> {
    let code = text
        .lines()
        .find_map(|line| line.strip_prefix("loc="))
        .map(str::trim)?;
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Some(format!("Detected via CF ({code})"))
    } else {
        None
    }
}

/// Maps a locale string like `"de_DE.UTF-8"` or `"en-US"` to a country
/// guess. Unmapped locales render as `"Unknown (lang)"`.
fn locale_fallback(lang: Option<&str>) -> String {
    let Some(lang) = lang else {
        return "Unknown".to_string();
    };
    let normalized = lang
        .split('.')
        .next()
        .unwrap_or("")
        .replace('_', "-")
        .to_lowercase();

    let lookup = |tag: &str| -> Option<&'static str> {
        match tag {
            "ru" => Some("Russia (RU)"),
            "en-us" => Some("USA (US)"),
            "en-gb" => Some("United Kingdom (GB)"),
            "uk" => Some("Ukraine (UA)"),
            "kk" => Some("Kazakhstan (KZ)"),
            "be" => Some("Belarus (BY)"),
            "de" => Some("Germany (DE)"),
            "fr" => Some("France (FR)"),
            _ => None,
        }
    };

    let primary = normalized.split('-').next().unwrap_or("");
    lookup(&normalized)
        .or_else(|| lookup(primary))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown ({normalized})"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // parse_trace tests
    // =========================================================================

    #[test]
    fn trace_parsing_extracts_the_loc_line() {
        let trace = "fl=123abc\nip=198.51.100.7\nloc=NL\ncolo=AMS\n";

        assert_eq!(parse_trace(trace), Some("Detected via CF (NL)".to_string()));
    }

    #[test]
    fn trace_parsing_rejects_malformed_codes() {
        assert_eq!(parse_trace("loc=nl\n"), None);
        assert_eq!(parse_trace("loc=NLD\n"), None);
        assert_eq!(parse_trace("colo=AMS\n"), None);
    }

    // =========================================================================
    // locale_fallback tests
    // =========================================================================

    #[test]
    fn locale_fallback_maps_known_tags() {
        assert_eq!(locale_fallback(Some("de_DE.UTF-8")), "Germany (DE)");
        assert_eq!(locale_fallback(Some("en-US")), "USA (US)");
        assert_eq!(locale_fallback(Some("ru_RU.KOI8-R")), "Russia (RU)");
    }

    #[test]
    fn locale_fallback_tries_the_primary_subtag() {
        // en-AU is unmapped but "en" alone is not either; fr-CA maps via "fr"
        assert_eq!(locale_fallback(Some("fr_CA.UTF-8")), "France (FR)");
        assert_eq!(locale_fallback(Some("de-AT")), "Germany (DE)");
    }

    #[test]
    fn locale_fallback_reports_unmapped_and_missing_locales() {
        assert_eq!(locale_fallback(Some("ja_JP.UTF-8")), "Unknown (ja-jp)");
        assert_eq!(locale_fallback(None), "Unknown");
    }
}
