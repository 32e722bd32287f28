//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;

use super::file::ConfigFileError;
use super::keys::{expand_tilde, parse_bool};
use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [dataset] section
    if let Some(section) = ini.section(Some("dataset")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.dataset.path = Some(expand_tilde(v).display().to_string());
            }
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
    }

    // [engine] section
    if let Some(section) = ini.section(Some("engine")) {
        if let Some(v) = section.get("name") {
            let v = v.trim();
            if !v.is_empty() {
                config.engine.name = v.to_string();
            }
        }
        if let Some(v) = section.get("tile_zoom") {
            config.engine.tile_zoom = v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|z| *z <= MAX_ZOOM)
                .ok_or_else(|| invalid("engine", "tile_zoom", v, "must be an integer 0-22"))?;
        }
        if let Some(v) = section.get("publish_interval") {
            config.engine.publish_interval = v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    invalid("engine", "publish_interval", v, "must be a positive integer")
                })?;
        }
    }

    // [pump] section
    if let Some(section) = ini.section(Some("pump")) {
        if let Some(v) = section.get("rate_hz") {
            config.pump.rate_hz = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite() && *r >= 0.0)
                .ok_or_else(|| {
                    invalid("pump", "rate_hz", v, "must be a non-negative number (0 = unthrottled)")
                })?;
        }
        if let Some(v) = section.get("should_stop") {
            let flag = v
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid("pump", "should_stop", v, "must be an integer"))?;
            config.pump.should_stop = flag != 0;
        }
    }

    // [export] section
    if let Some(section) = ini.section(Some("export")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.export.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("tile_file") {
            config.export.tile_file = file_name("export", "tile_file", v)?;
        }
        if let Some(v) = section.get("map_file") {
            config.export.map_file = file_name("export", "map_file", v)?;
        }
    }

    // [app] section
    if let Some(section) = ini.section(Some("app")) {
        if let Some(v) = section.get("stop_on_gui_exit") {
            config.app.stop_on_gui_exit = parse_bool(v).ok_or_else(|| {
                invalid("app", "stop_on_gui_exit", v, "must be true/false, yes/no, 1/0, or on/off")
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            config.logging.file = file_name("logging", "file", v)?;
        }
    }

    Ok(config)
}

fn file_name(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let v = value.trim();
    if v.is_empty() || v.contains('/') || v.contains('\\') {
        return Err(invalid(section, key, value, "must be a plain file name"));
    }
    Ok(v.to_string())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
