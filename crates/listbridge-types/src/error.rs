use thiserror;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("unknown journal bucket '{name}'")]
    UnknownBucket { name: String },
}
