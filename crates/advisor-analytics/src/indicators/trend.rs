//! 추세 지표 (이동평균 계열).
//!
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터 (기본 12-26-9).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간.
    pub fast_period: usize,
    /// 장기 EMA 기간.
    pub slow_period: usize,
    /// 시그널 라인 기간.
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// 한 시점의 MACD 값.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdPoint {
    /// MACD 라인 (단기 EMA − 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD 라인의 EMA).
    pub signal: Option<Decimal>,
    /// MACD − 시그널.
    pub diff: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    fn check_period(prices: &[Decimal], period: usize) -> IndicatorResult<()> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }
        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }
        Ok(())
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// `sma[i]` = 인덱스 `[i-period+1, i]` 구간 종가의 산술 평균.
    /// 처음 `period - 1`개는 `None`입니다.
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        Self::check_period(prices, period)?;

        let divisor = Decimal::from(period);
        let mut result = vec![None; period - 1];

        // 이동 합으로 윈도우 합을 유지
        let mut window_sum: Decimal = prices[..period].iter().sum();
        result.push(Some(window_sum / divisor));

        for i in period..prices.len() {
            window_sum += prices[i] - prices[i - period];
            result.push(Some(window_sum / divisor));
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// `k = 2 / (period + 1)`, 첫 EMA는 첫 `period`개의 SMA로 시작합니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        Self::check_period(prices, period)?;

        let multiplier = dec!(2) / Decimal::from(period + 1);
        let mut result = vec![None; period - 1];

        let mut ema: Decimal =
            prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(ema));

        for price in &prices[period..] {
            ema = (*price - ema) * multiplier + ema;
            result.push(Some(ema));
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = EMA(fast) − EMA(slow),
    /// 시그널 라인 = MACD 라인이 정의된 구간에 대한 EMA(signal),
    /// diff = MACD − 시그널.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdPoint>> {
        let min_required = params.slow_period + params.signal_period;
        if prices.len() < min_required {
            return Err(IndicatorError::InsufficientData {
                required: min_required,
                provided: prices.len(),
            });
        }

        let fast = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow = self.ema(prices, EmaParams { period: params.slow_period })?;

        // MACD 라인: 두 EMA가 모두 정의된 구간
        let macd_line: Vec<Option<Decimal>> = fast
            .iter()
            .zip(slow.iter())
            .map(|pair| match pair {
                (Some(f), Some(s)) => Some(*f - *s),
                _ => None,
            })
            .collect();

        // 시그널 라인: 정의된 MACD 값들에 대한 EMA
        let defined: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_over_defined = if defined.len() >= params.signal_period {
            self.ema(&defined, EmaParams { period: params.signal_period })?
        } else {
            vec![None; defined.len()]
        };

        let mut result = Vec::with_capacity(prices.len());
        let mut defined_idx = 0;

        for macd in macd_line.iter() {
            match macd {
                Some(m) => {
                    let signal = signal_over_defined.get(defined_idx).copied().flatten();
                    result.push(MacdPoint {
                        macd: Some(*m),
                        signal,
                        diff: signal.map(|s| *m - s),
                    });
                    defined_idx += 1;
                }
                None => result.push(MacdPoint {
                    macd: None,
                    signal: None,
                    diff: None,
                }),
            }
        }

        Ok(result)
    }
}
