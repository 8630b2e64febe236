/// File name of a Composer project manifest.
pub const MANIFEST_FILENAME: &str = "composer.json";

/// Directory, relative to a project root, holding installed dependencies.
pub const VENDOR_DIR: &str = "vendor";

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "COMPOSER_SYNC_LOG";
