//! 데이터 제공자 인터페이스.
//!
//! 가격/펀더멘털 조회는 엔진 밖의 협력자입니다. 실제 수집원(거래소 API,
//! 크롤러 등)을 어떻게 조합하든, 엔진에는 최종적으로 해석된 시계열과
//! 레코드 하나 또는 실패만 전달됩니다.

pub mod csv;
pub mod sidecar;

use advisor_core::{FundamentalRecord, PriceSeries};
use async_trait::async_trait;

use crate::error::Result;

pub use csv::CsvPriceProvider;
pub use sidecar::SidecarFundamentalProvider;

/// 가격 이력 제공자.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// 종목의 일봉 시계열을 조회합니다.
    ///
    /// 최신 `lookback`개 일봉만 반환합니다 (보유량이 더 적으면 전부).
    async fn fetch_series(&self, ticker: &str, lookback: usize) -> Result<PriceSeries>;
}

/// 펀더멘털 제공자.
///
/// `security_kind` 분류는 이 인터페이스 구현의 책임입니다.
#[async_trait]
pub trait FundamentalProvider: Send + Sync {
    /// 종목의 펀더멘털 레코드를 조회합니다.
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalRecord>;
}
