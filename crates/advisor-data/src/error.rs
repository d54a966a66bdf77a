//! 데이터 모듈 오류 타입.

use advisor_core::SeriesError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    /// 파일 내용 파싱 오류
    #[error("파싱 오류: {0}")]
    Parse(String),

    /// 검증을 통과하지 못한 데이터
    #[error("잘못된 데이터: {0}")]
    InvalidData(String),

    /// 종목 데이터 파일 없음
    #[error("종목을 찾을 수 없음: {0}")]
    NotFound(String),
}

impl From<SeriesError> for DataError {
    fn from(err: SeriesError) -> Self {
        DataError::InvalidData(err.to_string())
    }
}

/// 데이터 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;
