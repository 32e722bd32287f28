//! INI serialization logic for converting `ConfigFile` → INI string.

use super::keys::path_to_display;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let dataset_path = config.dataset.path.as_deref().unwrap_or("");
    let bool_str = |b: bool| if b { "true" } else { "false" };

    format!(
        r#"[dataset]
; Dataset to stream: a manifest.json file or a directory containing one.
; Required. Can be overridden with --dataset.
path = {}

[cache]
; Scratch directory. It is DELETED and recreated at every start.
directory = {}

[engine]
; Mapping engine identifier (built-in: footprint)
name = {}
; Zoom level of the coverage tiles (0-22)
tile_zoom = {}
; Frames between artifact publications
publish_interval = {}

[pump]
; Frame loop rate in Hz (0 = as fast as the dataset allows)
rate_hz = {}
; Non-zero starts with the stop flag raised; no frame is read
should_stop = {}

[export]
; Where the final tile raster and map are written on shutdown
directory = {}
tile_file = {}
map_file = {}

[app]
; Closing the dashboard stops the frame pump (false = finish the dataset first)
stop_on_gui_exit = {}

[logging]
; Session log, cleared at every start
directory = {}
file = {}
"#,
        dataset_path,
        path_to_display(&config.cache.directory),
        config.engine.name,
        config.engine.tile_zoom,
        config.engine.publish_interval,
        config.pump.rate_hz,
        if config.pump.should_stop { 1 } else { 0 },
        path_to_display(&config.export.directory),
        config.export.tile_file,
        config.export.map_file,
        bool_str(config.app.stop_on_gui_exit),
        path_to_display(&config.logging.directory),
        config.logging.file,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;

    #[test]
    fn test_written_config_parses_back() {
        let mut config = ConfigFile::default();
        config.dataset.path = Some("/data/flight".to_string());
        config.pump.rate_hz = 12.5;
        config.pump.should_stop = true;
        config.app.stop_on_gui_exit = false;

        let content = to_config_string(&config);
        let ini = Ini::load_from_str(&content).unwrap();
        let parsed = super::super::parser::parse_ini(&ini).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unset_dataset_written_empty() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("path = \n"));
    }
}
