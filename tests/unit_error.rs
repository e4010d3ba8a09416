/// Unit tests for ContainerError, ResolutionError, and DiResult.
use latchkey::{ContainerError, DiResult, ResolutionError};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = ContainerError::NotFound("TestService".to_string());
    let display_str = format!("{}", error);
    assert_eq!(display_str, "service 'TestService' not found");
    assert!(error.is_not_found());
}

#[test]
fn test_error_display_circular() {
    let path = vec!["ServiceA".to_string(), "ServiceB".to_string(), "ServiceA".to_string()];
    let error = ResolutionError::Circular(path);
    let display_str = format!("{}", error);
    assert_eq!(
        display_str,
        "circular dependency: ServiceA -> ServiceB -> ServiceA"
    );
}

#[test]
fn test_error_display_not_constructible() {
    let error = ResolutionError::NotConstructible("AbstractHandler".to_string());
    assert_eq!(
        error.to_string(),
        "type 'AbstractHandler' is not constructible"
    );
}

#[test]
fn test_error_display_parameter() {
    let error = ResolutionError::Parameter {
        name: "db".to_string(),
        declared: "Database|ReadReplica".to_string(),
        owner: "UserService".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "cannot resolve constructor parameter 'db' (Database|ReadReplica) for UserService"
    );
}

#[test]
fn test_error_display_factory() {
    let error = ResolutionError::Factory {
        id: "mailer".to_string(),
        message: "smtp handshake failed".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "factory for 'mailer' failed: smtp handshake failed"
    );
}

#[test]
fn test_error_display_downcast() {
    let error = ResolutionError::Downcast {
        id: "port".to_string(),
        expected: "u16",
    };
    assert_eq!(error.to_string(), "service 'port' is not a u16");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = ResolutionError::DepthExceeded(1024);
    assert_eq!(error.to_string(), "max depth 1024 exceeded");
}

#[test]
fn test_resolution_error_wraps_into_container_error() {
    let error: ContainerError = ResolutionError::Circular(vec!["X".to_string(), "X".to_string()]).into();
    assert!(!error.is_not_found());
    assert!(error.to_string().contains("circular dependency"));
}

#[test]
fn test_errors_are_std_errors() {
    let error = ContainerError::NotFound("svc".to_string());
    let as_std: &dyn Error = &error;
    assert!(as_std.source().is_none());
}

#[test]
fn test_diresult_round_trip() {
    let ok: DiResult<u8> = Ok(1);
    assert_eq!(ok.unwrap(), 1);

    let err: DiResult<u8> = Err(ContainerError::NotFound("gone".to_string()));
    assert!(err.unwrap_err().is_not_found());
}
