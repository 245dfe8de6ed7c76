// src/config/consts.rs

// Source
pub const SOURCE_URL: &str = "https://www.coolpc.com.tw/evaluate.php";
pub const CHROME_BIN: &str = "chrome";
pub const HTTP_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("price_watch/", env!("CARGO_PKG_VERSION"));

// Local data
pub const DATA_DIR_NAME: &str = ".coolpc";
pub const DB_FILE: &str = "coolpc.db";
pub const CONFIG_FILE: &str = "watch.conf";

// Scope: group labels (lower-cased) must contain one of these
pub const DEFAULT_CATEGORIES: &[&str] = &["nvidia gt", "nvidia rt", "amd rx"];
pub const DEFAULT_LABEL_NOISE: &[&str] = &[" (無類比輸出)"];
// Non-catalog rows: placeholders, pickup/assembly-only bundles, section headers
pub const DEFAULT_ITEM_REJECTS: &[&str] = &["disabled", "支援組裝", r#"class="r""#];

// Mail
pub const SENDMAIL_BIN: &str = "sendmail";
pub const REPORT_SUBJECT: &str = "[Coolpc] Price Watchlist";
pub const TEST_SUBJECT: &str = "Coolpc test mail";
pub const TEST_BODY: &str = "This is a test mail from coolpc crawler.";
