use std::path::PathBuf;

use tdenoise_core::pipeline::{AlignmentConfig, DenoiseConfig, DenoiseParams, FlowParams};

#[test]
fn test_default_params() {
    let params = DenoiseParams::default();
    assert_eq!(params.radius, 3);
    assert_eq!(params.spatial_kernel, 0);
    assert!(params.alignment.enabled);
    assert_eq!(
        params.alignment.flow,
        FlowParams {
            window_size: 15,
            levels: 3,
            iterations: 3,
        }
    );
}

#[test]
fn test_config_toml_round_trip() {
    let config = DenoiseConfig {
        output_dir: Some(PathBuf::from("out")),
        params: DenoiseParams {
            radius: 5,
            spatial_kernel: 3,
            alignment: AlignmentConfig {
                enabled: false,
                flow: FlowParams {
                    window_size: 21,
                    levels: 4,
                    iterations: 2,
                },
            },
        },
    };

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: DenoiseConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_config_uses_defaults() {
    let text = r#"
[params]
radius = 1

[params.alignment.flow]
levels = 5
"#;
    let config: DenoiseConfig = toml::from_str(text).unwrap();

    assert_eq!(config.output_dir, None);
    assert_eq!(config.params.radius, 1);
    assert_eq!(config.params.spatial_kernel, 0);
    assert!(config.params.alignment.enabled);
    assert_eq!(config.params.alignment.flow.levels, 5);
    assert_eq!(config.params.alignment.flow.window_size, 15);
}

#[test]
fn test_empty_config_is_default() {
    let config: DenoiseConfig = toml::from_str("").unwrap();
    assert_eq!(config, DenoiseConfig::default());
}

#[test]
fn test_display_summaries() {
    let mut alignment = AlignmentConfig::default();
    assert_eq!(alignment.to_string(), "on (window 15, 3 levels, 3 iterations)");
    alignment.enabled = false;
    assert_eq!(alignment.to_string(), "off");
}

#[test]
fn test_window_len_saturates() {
    let params = |radius| DenoiseParams {
        radius,
        ..Default::default()
    };
    assert_eq!(params(0).window_len(), 1);
    assert_eq!(params(3).window_len(), 7);
    assert_eq!(params(usize::MAX).window_len(), usize::MAX);
}
