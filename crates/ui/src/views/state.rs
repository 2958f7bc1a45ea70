use services::{QuestionBankError, SessionError};

/// User-facing failure categories; details go to the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    EmptyPool,
    DataSource,
    SaveFailed,
    HistoryUnavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyPool => "선택한 난이도에 해당하는 문제가 없습니다.",
            Self::DataSource => "문제 은행을 불러올 수 없습니다.",
            Self::SaveFailed => "결과를 저장하지 못했습니다. 다시 시도해 주세요.",
            Self::HistoryUnavailable => "저장된 기록을 읽을 수 없습니다.",
            Self::Unknown => "문제가 발생했습니다. 다시 시도해 주세요.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::Bank(QuestionBankError::EmptyPool { .. }) | SessionError::Empty => {
                Self::EmptyPool
            }
            SessionError::Bank(_) => Self::DataSource,
            SessionError::Save(_) => Self::SaveFailed,
            SessionError::Storage(_) => Self::HistoryUnavailable,
            _ => Self::Unknown,
        }
    }
}
