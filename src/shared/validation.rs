use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Tracking codes handed out to citizens: `RPT-YYYYMMDD-NNNN`
    pub static ref TRACKING_CODE_REGEX: Regex = Regex::new(r"^RPT-\d{8}-\d{4}$").unwrap();

    /// Category colors are stored as `#rrggbb`
    pub static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();

    /// Loose phone number check: optional leading +, digits, spaces and dashes
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap();
}

/// Validate a latitude/longitude pair
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
