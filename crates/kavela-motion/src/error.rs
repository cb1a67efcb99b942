use kavela_dom::DomError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MotionError>;

#[derive(Error, Debug)]
pub enum MotionError {
    /// A root margin string was not a list of one to four `px`/`%` values.
    #[error("invalid root margin: {0:?}")]
    RootMargin(String),

    #[error("unknown easing function: {0:?}")]
    Easing(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}
