use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::qualification::{ProfileError, QualificationServiceError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Decode(serde_json::Error),
    Source(reqwest::Error),
    Qualification(QualificationServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Decode(err) => write!(f, "invalid json input: {}", err),
            AppError::Source(err) => write!(f, "notice source setup failed: {}", err),
            AppError::Qualification(err) => write!(f, "qualification error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Decode(err) => Some(err),
            AppError::Source(err) => Some(err),
            AppError::Qualification(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::Source(value)
    }
}

impl From<QualificationServiceError> for AppError {
    fn from(value: QualificationServiceError) -> Self {
        Self::Qualification(value)
    }
}

impl From<ProfileError> for AppError {
    fn from(value: ProfileError) -> Self {
        Self::Qualification(QualificationServiceError::Profile(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn rejected_profile_is_a_caller_qualification_error() {
        let error = AppError::from(ProfileError::MissingAccount);

        match &error {
            AppError::Qualification(inner) => assert!(inner.is_caller_error()),
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(error.to_string().starts_with("qualification error: "));
        assert!(error.source().is_some());
    }

    #[test]
    fn listener_failures_surface_as_io() {
        let error = AppError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));

        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(error.to_string(), "io error: address in use");
    }
}
