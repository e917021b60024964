use core::fmt;

/// Failure of one iteration of the polling task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<S, O> {
    /// A pin failed while scanning the matrix
    Scan(S),
    /// The output transport refused an event
    Output(O),
}

impl<S: fmt::Debug, O: fmt::Debug> fmt::Display for Error<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Scan(e) => write!(f, "matrix scan failed: {:?}", e),
            Error::Output(e) => write!(f, "key output failed: {:?}", e),
        }
    }
}
