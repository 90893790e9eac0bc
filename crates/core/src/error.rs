use svr_types::Programme;

/// Errors raised by the status generators.
///
/// Missing evidence is never an error; every generator degrades to its
/// lowest-priority status when a collection is empty. The only fatal
/// condition is a programme family the dose-selection rules do not cover,
/// which indicates a missing rule rather than bad data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("no dose-selection rule for programme: {0}")]
    UnsupportedProgramme(Programme),
}

pub type StatusResult<T> = std::result::Result<T, StatusError>;
