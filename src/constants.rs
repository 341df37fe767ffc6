//! Application constants for the postal extremes processor
//!
//! Field widths of the postal record layout, report column widths and the
//! defaults used when no configuration overrides them.

// =============================================================================
// Postal Record Layout
// =============================================================================

/// Maximum length of the postal code (e.g. "10001")
pub const CODE_LENGTH: usize = 5;

/// Maximum length of the place name
pub const PLACE_LENGTH: usize = 50;

/// Maximum length of the subdivision code (e.g. "NY")
pub const SUBDIVISION_LENGTH: usize = 2;

/// Maximum length of the county name
pub const COUNTY_LENGTH: usize = 50;

/// Maximum length of a latitude or longitude text (e.g. "-123.4567")
pub const COORDINATE_LENGTH: usize = 10;

/// Number of positional fields in a postal record
pub const RECORD_FIELD_COUNT: usize = 6;

/// Field sizes in positional order: code, place, subdivision, county, latitude, longitude
pub const RECORD_FIELD_SIZES: [usize; RECORD_FIELD_COUNT] = [
    CODE_LENGTH,
    PLACE_LENGTH,
    SUBDIVISION_LENGTH,
    COUNTY_LENGTH,
    COORDINATE_LENGTH,
    COORDINATE_LENGTH,
];

/// Decimal places used when coordinates are written out
pub const COORDINATE_PRECISION: usize = 4;

// =============================================================================
// Report Layout
// =============================================================================

/// Width of the region column in table reports
pub const REGION_COLUMN_WIDTH: usize = 8;

/// Width of every other column in table reports
pub const VALUE_COLUMN_WIDTH: usize = 15;

/// Extremes table column widths: region, east, west, north, south
pub const EXTREMES_COLUMN_WIDTHS: [usize; 5] = [
    REGION_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
];

/// Listing table column widths: region, id, latitude, longitude
pub const LISTING_COLUMN_WIDTHS: [usize; 4] = [
    REGION_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
    VALUE_COLUMN_WIDTH,
];

pub const EXTREMES_HEADERS: [&str; 5] = [
    "Region",
    "Easternmost",
    "Westernmost",
    "Northernmost",
    "Southernmost",
];

pub const LISTING_HEADERS: [&str; 4] = ["Region", "Code", "Latitude", "Longitude"];

/// Separator character drawn under table headers
pub const SEPARATOR_CHAR: char = '-';

// =============================================================================
// Input Defaults
// =============================================================================

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// Default input file
pub const DEFAULT_INPUT_PATH: &str = "data/us_postal_codes.csv";

/// Application directory name under the user config directory
pub const APP_CONFIG_DIR: &str = "postal-extremes";

/// Config file name inside [`APP_CONFIG_DIR`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Records between progress spinner refreshes
pub const PROGRESS_UPDATE_INTERVAL: usize = 1_000;
