use thiserror::Error;
use updraft_platform::AppPathsError;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Paths(#[from] AppPathsError),
}

impl SettingsError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

#[cfg(test)]
mod tests {
    use updraft_platform::AppPathsError;

    use super::SettingsError;

    #[test]
    fn io_error_display_includes_context() {
        let error = SettingsError::io(
            "failed to write settings",
            std::io::Error::other("read-only file system"),
        );

        assert_eq!(
            error.to_string(),
            "failed to write settings: read-only file system"
        );
    }

    #[test]
    fn path_errors_are_transparent() {
        let error = SettingsError::from(AppPathsError::ConfigDirUnavailable);

        assert_eq!(error.to_string(), "Could not determine config directory");
    }
}
