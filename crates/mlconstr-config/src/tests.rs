//! Tests for environment parameters.

use super::*;

#[test]
fn test_defaults() {
    let params = EnvParams::default();
    assert_eq!(params.output_flag, 1);
    assert_eq!(params.non_convex, -1);
    assert_eq!(params.feasibility_tol, 1e-6);
    assert_eq!(params.size_limit, None);
    assert!(params.logging_enabled());
    assert!(!params.allows_nonconvex());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        output_flag = 0
        non_convex = 2
        feasibility_tol = 1e-7
        size_limit = 2000
    "#;

    let params = EnvParams::from_toml_str(toml).unwrap();
    assert_eq!(params.output_flag, 0);
    assert!(params.allows_nonconvex());
    assert_eq!(params.feasibility_tol, 1e-7);
    assert_eq!(params.size_limit, Some(2000));
}

#[test]
fn test_toml_solver_style_names() {
    let toml = r#"
        OutputFlag = 0
        NonConvex = 2
    "#;

    let params = EnvParams::from_toml_str(toml).unwrap();
    assert!(!params.logging_enabled());
    assert_eq!(params.non_convex, 2);
    assert_eq!(params.feasibility_tol, 1e-6);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        output_flag: 0
        non_convex: 2
        size_limit: 10
    "#;

    let params = EnvParams::from_yaml_str(yaml).unwrap();
    assert_eq!(params.output_flag, 0);
    assert_eq!(params.size_limit, Some(10));
}

#[test]
fn test_rejects_non_positive_tolerance() {
    let err = EnvParams::from_toml_str("feasibility_tol = 0.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let params = EnvParams::load("does-not-exist.toml").unwrap_or_default();
    assert_eq!(params, EnvParams::default());
}

#[test]
fn test_from_pairs_coerces_integers() {
    let params = EnvParams::from_pairs([("OutputFlag", "0"), ("NonConvex", "2")]).unwrap();
    assert_eq!(params.output_flag, 0);
    assert_eq!(params.non_convex, 2);
}

#[test]
fn test_set_param_floats_and_names() {
    let mut params = EnvParams::new();
    params.set_param("feasibility_tol", "1e-5").unwrap();
    params.set_param("FeasibilityTol", "1").unwrap();
    assert_eq!(params.feasibility_tol, 1.0);

    params.set_param("SIZE_LIMIT", "5").unwrap();
    assert_eq!(params.size_limit, Some(5));
    params.set_param("SizeLimit", "-1").unwrap();
    assert_eq!(params.size_limit, None);
}

#[test]
fn test_set_param_errors() {
    let mut params = EnvParams::new();
    assert!(matches!(
        params.set_param("Threads", "4"),
        Err(ConfigError::UnknownParameter(_))
    ));
    assert!(matches!(
        params.set_param("OutputFlag", "0.5"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        params.set_param("NonConvex", "two"),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_builder() {
    let params = EnvParams::new()
        .with_output_flag(0)
        .with_non_convex(2)
        .with_feasibility_tol(1e-9)
        .with_size_limit(100);

    assert!(!params.logging_enabled());
    assert!(params.allows_nonconvex());
    assert_eq!(params.feasibility_tol, 1e-9);
    assert_eq!(params.size_limit, Some(100));
}
