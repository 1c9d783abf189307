use url::Url;

use crate::attribution::Attribution;

/// Convenience wrapper for URL generation functions.
#[derive(Clone)]
pub struct Urls {
    /// The partner site bookings are handed off to.
    partner: Url,
}

impl Urls {
    /// Creates a new instance.
    pub fn new(partner: impl AsRef<str>) -> Self {
        let partner = Url::parse(partner.as_ref())
            .unwrap_or_else(|_| panic!("parse {} as URL", partner.as_ref()));

        Urls { partner }
    }

    /// Builds the partner handoff URL for a booking, attaching the
    /// experience slug and whatever attribution has been captured so the
    /// operator can credit the referral.
    pub fn booking_redirect(
        &self,
        experience_slug: &str,
        attribution: Option<&Attribution>,
    ) -> Url {
        let mut url = self.partner.clone();

        {
            let mut params = url.query_pairs_mut();
            params.append_pair("experience", experience_slug);

            if let Some(attribution) = attribution {
                if let Some(click_id) = &attribution.click_id {
                    params.append_pair("click_id", click_id);
                }

                if let Some(utm) = &attribution.utm {
                    if let Some(source) = &utm.source {
                        params.append_pair("utm_source", source);
                    }
                    if let Some(medium) = &utm.medium {
                        params.append_pair("utm_medium", medium);
                    }
                    if let Some(campaign) = &utm.campaign {
                        params.append_pair("utm_campaign", campaign);
                    }
                    if let Some(content) = &utm.content {
                        params.append_pair("utm_content", content);
                    }
                    if let Some(term) = &utm.term {
                        params.append_pair("utm_term", term);
                    }
                }
            }
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::Urls;
    use crate::attribution::{Attribution, UtmParams};

    #[test]
    fn bare_bookings_carry_only_the_experience() {
        let urls = Urls::new("https://partner.example/book");

        let url = urls.booking_redirect("teide-sunset-tour", None);
        assert_eq!(
            url.as_str(),
            "https://partner.example/book?experience=teide-sunset-tour"
        );
    }

    #[test]
    fn captured_attribution_is_attached_field_by_field() {
        let urls = Urls::new("https://partner.example/book");

        let attribution = Attribution {
            click_id: Some("abc".to_owned()),
            utm: Some(UtmParams {
                source: Some("google".to_owned()),
                campaign: Some("summer".to_owned()),
                ..Default::default()
            }),
            first_touch_timestamp: 1000,
            last_touch_timestamp: 2000,
        };

        let url = urls.booking_redirect("siam-park-ticket", Some(&attribution));
        assert_eq!(
            url.as_str(),
            "https://partner.example/book?experience=siam-park-ticket&click_id=abc&utm_source=google&utm_campaign=summer"
        );
    }
}
