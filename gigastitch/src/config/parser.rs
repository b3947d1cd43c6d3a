//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::clamp_parallel_downloads;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            validate_base_url(v).map_err(|reason| invalid("source", "base_url", v, reason))?;
            config.source.base_url = v.to_string();
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            const REASON: &str = "must be a positive integer (seconds)";
            let timeout: u64 = parse_number(v, "download", "timeout", REASON)?;
            if timeout == 0 {
                return Err(invalid("download", "timeout", v, REASON));
            }
            config.download.timeout = timeout;
        }
        if let Some(v) = section.get("parallel_downloads") {
            let parsed: usize = parse_number(
                v,
                "download",
                "parallel_downloads",
                "must be a positive integer",
            )?;
            config.download.parallel_downloads = clamp_parallel_downloads(parsed);
        }
        if let Some(v) = section.get("max_retries") {
            config.download.max_retries =
                parse_number(v, "download", "max_retries", "must be a non-negative integer")?;
        }
        if let Some(v) = section.get("retry_base_delay_ms") {
            config.download.retry_base_delay_ms = parse_number(
                v,
                "download",
                "retry_base_delay_ms",
                "must be a non-negative integer (milliseconds)",
            )?;
        }
    }

    // [assembly] section
    if let Some(section) = ini.section(Some("assembly")) {
        if let Some(v) = section.get("compositor") {
            config.assembly.compositor = v
                .parse()
                .map_err(|_| invalid("assembly", "compositor", v, "must be 'raster' or 'magick'"))?;
        }
        if let Some(v) = section.get("magick_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.assembly.magick_path = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("trim_fuzz") {
            config.assembly.trim_fuzz =
                parse_number(v, "assembly", "trim_fuzz", "must be an integer between 0 and 255")?;
        }
        if let Some(v) = section.get("jpeg_quality") {
            let quality: u8 =
                parse_number(v, "assembly", "jpeg_quality", "must be an integer between 1 and 100")?;
            if !(1..=100).contains(&quality) {
                return Err(invalid(
                    "assembly",
                    "jpeg_quality",
                    v,
                    "must be an integer between 1 and 100",
                ));
            }
            config.assembly.jpeg_quality = quality;
        }
        if let Some(v) = section.get("parallel_rows") {
            let rows: usize =
                parse_number(v, "assembly", "parallel_rows", "must be a positive integer")?;
            config.assembly.parallel_rows = rows.max(1);
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.directory = expand_tilde(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks that a tile host URL is an http or https URL.
///
/// Returns the reason on rejection, for use in error messages.
pub fn validate_base_url(url: &str) -> Result<(), &'static str> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        Some(_) => Err("must include a host"),
        None => Err("must start with http:// or https://"),
    }
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
