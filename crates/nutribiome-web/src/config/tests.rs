#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.data.path, "india_species_abundance_clean.tsv");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.display.histogram_bins, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8080

            [simulation]
            delta_max = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.simulation.delta_max, 1.0);
        assert_eq!(config.simulation.delta_min, -0.2);
    }

    #[test]
    fn test_default_slider_range_contains_default_delta() {
        let sim = SimulationConfig::default();
        assert!(sim.delta_min < sim.delta_default && sim.delta_default < sim.delta_max,
            "default delta ({}) should lie inside [{}, {}]",
            sim.delta_default, sim.delta_min, sim.delta_max);
    }

    #[test]
    fn test_validate_delta_bounds() {
        let sim = SimulationConfig::default();
        assert!(sim.validate_delta(-0.2).is_ok());
        assert!(sim.validate_delta(0.5).is_ok());
        assert!(sim.validate_delta(0.51).is_err());
        assert!(sim.validate_delta(-1.0).is_err());
        assert!(sim.validate_delta(f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_slider_configuration_is_rejected() {
        let config = Config::from_toml_str("[simulation]\ndelta_default = 2.0\n").unwrap();
        assert!(matches!(config.validate(), Err(NutribiomeError::Config(_))));
    }

    #[test]
    fn test_histogram_bins_above_ceiling_is_rejected() {
        let config = Config::from_toml_str("[display]\nhistogram_bins = 800\n").unwrap();
        assert_eq!(config.display.max_histogram_bins, 500);
        assert!(matches!(config.validate(), Err(NutribiomeError::Config(_))));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nutribiome.toml");
        std::fs::write(&path, "[data]\npath = \"otu.tsv\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data.path, "otu.tsv");
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_unreadable_config_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("absent.toml")),
            Err(NutribiomeError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        assert!(matches!(
            Config::from_toml_str("[server\nport = 1"),
            Err(NutribiomeError::Config(_))
        ));
    }
}
