//! Phone-prefix catalog for the passenger-details form.

/// One entry of the phone-prefix catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCode {
    /// International dialing prefix, with the leading plus.
    pub dial: &'static str,
    /// ISO 3166-1 alpha-2 country code.
    pub iso: &'static str,
    pub name: &'static str,
}

const fn entry(dial: &'static str, iso: &'static str, name: &'static str) -> CountryCode {
    CountryCode { dial, iso, name }
}

/// Dialing prefix seeded into empty drafts unless configuration says
/// otherwise.
pub const DEFAULT_COUNTRY_CODE: &str = "+66";

/// The dialing prefixes offered by the phone-prefix picker, home market
/// first.
pub const COUNTRY_CODES: &[CountryCode] = &[
    entry("+66", "TH", "Thailand"),
    entry("+1", "US", "United States"),
    entry("+44", "GB", "United Kingdom"),
    entry("+65", "SG", "Singapore"),
    entry("+86", "CN", "China"),
    entry("+91", "IN", "India"),
    entry("+81", "JP", "Japan"),
    entry("+82", "KR", "South Korea"),
    entry("+61", "AU", "Australia"),
    entry("+49", "DE", "Germany"),
    entry("+33", "FR", "France"),
    entry("+39", "IT", "Italy"),
    entry("+34", "ES", "Spain"),
    entry("+7", "RU", "Russia"),
    entry("+55", "BR", "Brazil"),
    entry("+52", "MX", "Mexico"),
    entry("+27", "ZA", "South Africa"),
    entry("+20", "EG", "Egypt"),
    entry("+971", "AE", "United Arab Emirates"),
    entry("+966", "SA", "Saudi Arabia"),
    entry("+90", "TR", "Turkey"),
    entry("+31", "NL", "Netherlands"),
    entry("+46", "SE", "Sweden"),
    entry("+41", "CH", "Switzerland"),
    entry("+47", "NO", "Norway"),
    entry("+45", "DK", "Denmark"),
    entry("+48", "PL", "Poland"),
    entry("+351", "PT", "Portugal"),
    entry("+32", "BE", "Belgium"),
    entry("+43", "AT", "Austria"),
    entry("+353", "IE", "Ireland"),
    entry("+64", "NZ", "New Zealand"),
    entry("+60", "MY", "Malaysia"),
    entry("+62", "ID", "Indonesia"),
    entry("+63", "PH", "Philippines"),
    entry("+84", "VN", "Vietnam"),
    entry("+852", "HK", "Hong Kong"),
    entry("+886", "TW", "Taiwan"),
    entry("+94", "LK", "Sri Lanka"),
    entry("+880", "BD", "Bangladesh"),
    entry("+92", "PK", "Pakistan"),
    entry("+977", "NP", "Nepal"),
    entry("+95", "MM", "Myanmar"),
    entry("+855", "KH", "Cambodia"),
    entry("+856", "LA", "Laos"),
];

/// Catalog entry for a dialing prefix, if it is one we offer.
pub fn country_for_dial(dial: &str) -> Option<&'static CountryCode> {
    COUNTRY_CODES.iter().find(|c| c.dial == dial.trim())
}
