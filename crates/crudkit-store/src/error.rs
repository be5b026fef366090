/// Repository failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entity with key {0} already exists")]
    Conflict(String),
    #[error("serialized entity has no key field `{0}`")]
    MissingKeyField(&'static str),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("mongodb error")]
    Backend(#[from] mongodb::error::Error),
}
