use std::path::PathBuf;

use crate::layout::ParticipantId;

/// Why a spin request was turned down. The wheel is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinRejection {
    AlreadySpinning,
    EmptyLayout,
    NotInLayout(ParticipantId),
}

impl std::fmt::Display for SpinRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpinRejection::AlreadySpinning => write!(f, "a spin is already in progress"),
            SpinRejection::EmptyLayout => write!(f, "the wheel has no sectors"),
            SpinRejection::NotInLayout(id) => write!(f, "participant {id} is not on the wheel"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WheelError {
    #[error("invalid spin request: {0}")]
    InvalidSpinRequest(SpinRejection),

    #[error("no participants remaining")]
    NoParticipantsRemaining,

    #[error("a selection is already waiting for its spin to finish")]
    SelectionPending,

    #[error("participant {0} is not available for selection")]
    UnknownParticipant(ParticipantId),

    #[error("failed to read font {path:?}: {source}")]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font {0:?} could not be parsed")]
    InvalidFont(PathBuf),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface error: {0}")]
    Surface(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, WheelError>;

impl WheelError {
    /// True for the local, recoverable rejections a host should log and ignore.
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            WheelError::InvalidSpinRequest(_)
                | WheelError::NoParticipantsRemaining
                | WheelError::SelectionPending
                | WheelError::UnknownParticipant(_)
        )
    }
}
