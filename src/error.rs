use thiserror::Error;

/// Failures raised by validation and the store.
///
/// The first three variants are client-fixable and carry a message that is
/// safe to show. The rest are persistence failures whose detail stays in the
/// log.
#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP-class status code for the shared response envelope.
    pub(crate) fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Csv(_) | Self::Io(_) => 500,
        }
    }

    pub(crate) fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::validation("bad").status(), 400);
        assert_eq!(Error::NotFound("gone".into()).status(), 404);
        assert_eq!(Error::Conflict("dup".into()).status(), 409);
        assert_eq!(
            Error::Database(rusqlite::Error::QueryReturnedNoRows).status(),
            500
        );
    }

    #[test]
    fn test_client_errors_display_message_verbatim() {
        let err = Error::validation("Amount must be greater than 0");
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Amount must be greater than 0");
    }
}
