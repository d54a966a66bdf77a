//! 기술적 지표 모듈.
//!
//! 일봉 종가/거래량 시계열에서 파생 지표를 계산합니다.
//! 모든 지표는 인과적(과거 참조) 윈도우만 사용하며, 윈도우가 차지 않는
//! 초기 구간은 `None`으로 표시됩니다.
//!
//! # 지원 지표
//!
//! - **SMA**: 단순 이동평균 (5/20/60일선)
//! - **EMA**: 지수 이동평균 (MACD의 구성 요소)
//! - **MACD**: 이동평균 수렴/확산 (12-26-9)
//! - **RSI**: 상대강도지수 (Wilder, 14일)
//! - **Bollinger Bands**: 볼린저 밴드 (20일, ±2σ)

pub mod momentum;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use thiserror::Error;

pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdPoint, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerPoint, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 윈도우보다 짧은 데이터
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 통합 지표 엔진.
///
/// 프레임 조립에 필요한 지표 계산을 하나의 인터페이스로 묶습니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// 처음 `period - 1`개는 `None`입니다.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// MACD 라인 / 시그널 라인 / 차이를 계산합니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdPoint>> {
        self.trend.macd(prices, params)
    }

    /// RSI (Wilder) 계산. 결과는 0~100 범위입니다.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// 볼린저 밴드 (상단/중단/하단) 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerPoint>> {
        self.volatility.bollinger_bands(prices, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
            dec!(111.0),
            dec!(110.0),
            dec!(112.0),
            dec!(114.0),
            dec!(113.0),
        ]
    }

    #[test]
    fn test_sma_warmup_prefix() {
        let engine = IndicatorEngine::new();
        let sma = engine
            .sma(&sample_prices(), SmaParams { period: 5 })
            .unwrap();

        assert!(sma[3].is_none());
        assert!(sma[4].is_some());
    }

    #[test]
    fn test_rsi_within_bounds() {
        let engine = IndicatorEngine::new();
        let rsi = engine
            .rsi(&sample_prices(), RsiParams { period: 14 })
            .unwrap();

        for value in rsi.iter().flatten() {
            assert!(*value >= Decimal::ZERO);
            assert!(*value <= dec!(100));
        }
    }

    #[test]
    fn test_insufficient_data_is_an_error() {
        let engine = IndicatorEngine::new();
        let prices = vec![dec!(100.0), dec!(101.0)];

        let result = engine.sma(&prices, SmaParams { period: 20 });
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData {
                required: 20,
                provided: 2
            })
        ));
    }
}
