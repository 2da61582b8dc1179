/// ORSO file format version written by this crate
pub const ORSO_FORMAT_VERSION: &str = "1.0";

/// Format name on the first line of a text file
pub const ORSO_FORMAT_NAME: &str = "ORSO reflectivity data file";

/// Reference URL on the first line of a text file
pub const ORSO_URL: &str = "https://www.reflectometry.org/";

/// File extension for the text format
pub const ORT_EXTENSION: &str = "ort";

/// File extension for the hierarchical format
pub const ORB_EXTENSION: &str = "orb";

/// MIME type stored as the first entry of a hierarchical container
pub const ORB_MIMETYPE: &str = "application/vnd.orso.orb";

/// MIME type marking leaves that carry an embedded JSON document
pub const JSON_MIMETYPE: &str = "application/json";

/// Schema name of the root header record
pub const ROOT_SCHEMA: &str = "Orso";

/// Header field carrying the dataset identifier
pub const DATA_SET_FIELD: &str = "data_set";

/// Header field carrying the column descriptors
pub const COLUMNS_FIELD: &str = "columns";

/// First line of a text file for the given format version
pub fn designate(version: &str) -> String {
    format!(
        "# {} | {} standard | YAML encoding | {}",
        ORSO_FORMAT_NAME, version, ORSO_URL
    )
}
