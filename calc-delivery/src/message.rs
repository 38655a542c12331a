//! Lead message composition.
//!
//! Produces the Markdown text posted to every recipient chat: contact
//! details, optional social handles, the calculator summary as the
//! source, and session metadata (time on site, detected country,
//! submission timestamp).

use std::time::Duration;

use calc_core::models::{Lead, PricingContext};
use chrono::{DateTime, Local};

/// Session facts that travel with the lead but are not part of it.
#[derive(Debug, Clone)]
pub struct SessionMeta {
    /// How long the visitor had the calculator open.
    pub time_on_site: Duration,
    /// Best-effort detected country, e.g. `"Germany (DE)"` or `"Unknown"`.
    pub country: String,
    pub submitted_at: DateTime<Local>,
}

/// Formats a session duration the way it appears in the message:
/// `"2h 5m"`, `"4m 32s"` or `"17s"` depending on magnitude.
pub fn format_time_on_site(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else if minutes > 0 {
        format!("{minutes}m {}s", seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Renders the full message body for one lead.
///
/// The pricing context becomes the "Source" block when present; leads
/// captured without a quote fall back to a plain source label. Optional
/// handles are omitted entirely rather than rendered empty.
pub fn compose(lead: &Lead, context: Option<&PricingContext>, meta: &SessionMeta) -> String {
    let mut social = String::new();
    if !lead.telegram.is_empty() {
        social.push_str(&format!("\n✈️ *Telegram:* {}", lead.telegram));
    }
    if !lead.instagram.is_empty() {
        social.push_str(&format!("\n📷 *Instagram:* {}", lead.instagram));
    }

    let source = match context {
        Some(context) => context.to_string(),
        None => "Website".to_string(),
    };

    format!(
        "📩 *New Request from Website*\n\
         \n\
         👤 *Name:* {name}\n\
         📱 *Phone:* {phone}{social}\n\
         📋 *Source:* {source}\n\
         ⏱️ *Time on site:* {time}\n\
         🌍 *Country:* {country}\n\
         🕐 *Submitted at:* {submitted}",
        name = lead.name,
        phone = lead.phone,
        social = social,
        source = source,
        time = format_time_on_site(meta.time_on_site),
        country = meta.country,
        submitted = meta.submitted_at.format("%-m/%-d/%Y, %-I:%M:%S %p"),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn meta() -> SessionMeta {
        SessionMeta {
            time_on_site: Duration::from_secs(272),
            country: "Germany (DE)".to_string(),
            submitted_at: Local.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap(),
        }
    }

    // =========================================================================
    // format_time_on_site tests
    // =========================================================================

    #[test]
    fn duration_formats_scale_with_magnitude() {
        assert_eq!(format_time_on_site(Duration::from_secs(17)), "17s");
        assert_eq!(format_time_on_site(Duration::from_secs(272)), "4m 32s");
        assert_eq!(format_time_on_site(Duration::from_secs(7500)), "2h 5m");
    }

    #[test]
    fn zero_duration_renders_as_seconds() {
        assert_eq!(format_time_on_site(Duration::ZERO), "0s");
    }

    // =========================================================================
    // compose tests
    // =========================================================================

    #[test]
    fn compose_includes_contact_and_session_lines() {
        let lead = Lead::new("Ada Lovelace", "+1 555 0100", "", "");

        let text = compose(&lead, None, &meta());

        assert!(text.starts_with("📩 *New Request from Website*"));
        assert!(text.contains("👤 *Name:* Ada Lovelace"));
        assert!(text.contains("📱 *Phone:* +1 555 0100"));
        assert!(text.contains("📋 *Source:* Website"));
        assert!(text.contains("⏱️ *Time on site:* 4m 32s"));
        assert!(text.contains("🌍 *Country:* Germany (DE)"));
        assert!(text.contains("🕐 *Submitted at:* 3/14/2025, 3:09:26 PM"));
    }

    #[test]
    fn compose_omits_empty_social_handles() {
        let lead = Lead::new("Ada", "5550100", "", "");

        let text = compose(&lead, None, &meta());

        assert!(!text.contains("*Telegram:*"));
        assert!(!text.contains("*Instagram:*"));
    }

    #[test]
    fn compose_appends_social_handles_after_phone() {
        let lead = Lead::new("Ada", "5550100", "@ada", "ada.gram");

        let text = compose(&lead, None, &meta());

        assert!(text.contains("📱 *Phone:* 5550100\n✈️ *Telegram:* @ada\n📷 *Instagram:* ada.gram"));
    }

    #[test]
    fn compose_embeds_pricing_summary_as_source() {
        let lead = Lead::new("Ada", "5550100", "", "");
        let context = PricingContext {
            license_label: "Exclusive license".to_string(),
            marketing_opt_in: false,
            workdays: 10,
            services: 3,
            monthly: dec!(73500),
            yearly: dec!(882000),
        };

        let text = compose(&lead, Some(&context), &meta());

        assert!(text.contains("📋 *Source:* Profitability Calculator"));
        assert!(text.contains("License: Exclusive license"));
        assert!(text.contains("Marketing: No"));
        assert!(text.contains("Monthly Estimate: €73,500"));
        assert!(text.contains("Yearly Estimate: €882,000"));
    }
}
