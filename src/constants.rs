//! Shared constants and defaults.

/// Default HTTP port for `notecraft serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "notecraft.toml";

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "NOTECRAFT_HOME";

/// Default data directory, relative to the current directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// JSON catalog snapshot file name inside the data directory.
pub const CATALOG_FILE: &str = "db.json";

/// redb catalog file name inside the data directory.
pub const CATALOG_REDB_FILE: &str = "catalog.redb";

/// Asset directory name inside the data directory.
pub const UPLOADS_DIR: &str = "uploads";

/// URL prefix under which assets are served.
pub const UPLOADS_URL_PREFIX: &str = "/api/uploads/";

/// Cache-Control header for assets. Asset paths are never reused.
pub const ASSET_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Default image model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";

/// Default image model API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default environment variable holding the image model API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default timeout for one image model call.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;

/// Default page size for image listing.
pub const DEFAULT_PAGE_LIMIT: usize = 12;

/// Prefix added to the prompt of records produced by an edit.
pub const EDIT_PROMPT_PREFIX: &str = "[edit] ";

/// Maximum JSON request body (edit/generate payloads are small; images travel out, not in).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
