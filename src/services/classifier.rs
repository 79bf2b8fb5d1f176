use crate::models::{AvailabilityType, ShowRecord};

/// True when `show` is streamable by subscription on `platform_id` in
/// `country`. Rent, buy, free and add-on tiers do not count.
pub fn is_subscription_only(show: &ShowRecord, country: &str, platform_id: &str) -> bool {
    show.options_in(country).iter().any(|option| {
        option.service_id() == Some(platform_id)
            && option.availability() == Some(AvailabilityType::Subscription)
    })
}

/// Keeps the shows that pass [`is_subscription_only`], preserving order
pub fn subscription_matches(
    shows: Vec<ShowRecord>,
    country: &str,
    platform_id: &str,
) -> Vec<ShowRecord> {
    shows
        .into_iter()
        .filter(|show| is_subscription_only(show, country, platform_id))
        .collect()
}
