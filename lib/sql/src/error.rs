use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),
}

impl SQLError {
    /// Whether this error is a unique-constraint violation.
    ///
    /// Services race their precondition checks against concurrent writers
    /// and rely on the constraint as the final arbiter; this is how they
    /// recognize the loser of that race.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SQLError::Query(msg) | SQLError::Execution(msg) | SQLError::Connection(msg) => {
                msg.contains("UNIQUE constraint")
            }
        }
    }
}
