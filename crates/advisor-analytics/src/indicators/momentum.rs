//! 모멘텀 지표.
//!
//! 과매수/과매도 상태를 측정하는 RSI (Wilder 방식)를 제공합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// `RSI = 100 × 평균 상승폭 / (평균 상승폭 + 평균 하락폭)`
    ///
    /// 상승/하락 평균은 지수 가중 이동평균(α = 1/period, 초기값은 단순
    /// 평균)으로 부드럽게 만든 Wilder 방식입니다. 보합일은 양쪽 모두
    /// 0으로 기여하며, 평균 하락폭이 0이면 RSI는 100입니다.
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }
        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        // 하루 단위 종가 변화를 상승분/하락분으로 분리
        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());
        gains.push(Decimal::ZERO);
        losses.push(Decimal::ZERO);

        for pair in prices.windows(2) {
            let delta = pair[1] - pair[0];
            if delta > Decimal::ZERO {
                gains.push(delta);
                losses.push(Decimal::ZERO);
            } else {
                gains.push(Decimal::ZERO);
                losses.push(-delta);
            }
        }

        let alpha = Decimal::ONE / Decimal::from(period);
        let avg_gains = ewm(&gains, alpha, period);
        let avg_losses = ewm(&losses, alpha, period);

        let result = avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|pair| match pair {
                (Some(gain), Some(loss)) => {
                    let magnitude = *gain + *loss;
                    if magnitude == Decimal::ZERO {
                        // 변화가 전혀 없는 구간은 중립
                        Some(dec!(50))
                    } else {
                        Some(dec!(100) * *gain / magnitude)
                    }
                }
                _ => None,
            })
            .collect();

        Ok(result)
    }
}

/// 지수 가중 이동평균 (EWM).
///
/// `min_periods - 1`번째 인덱스에서 단순 평균으로 시작하고,
/// 이후 `v × α + 이전값 × (1 − α)`로 갱신합니다. 그 이전 인덱스는
/// `None`이지만 내부 상태는 계속 누적합니다.
fn ewm(values: &[Decimal], alpha: Decimal, min_periods: usize) -> Vec<Option<Decimal>> {
    let mut result = Vec::with_capacity(values.len());
    if values.is_empty() {
        return result;
    }

    let one_minus_alpha = Decimal::ONE - alpha;
    let mut state = values[0];

    for (i, value) in values.iter().enumerate() {
        if i < min_periods - 1 {
            result.push(None);
            if i > 0 {
                state = *value * alpha + state * one_minus_alpha;
            }
        } else if i == min_periods - 1 {
            let sum: Decimal = values[..=i].iter().sum();
            state = sum / Decimal::from(i + 1);
            result.push(Some(state));
        } else {
            state = *value * alpha + state * one_minus_alpha;
            result.push(Some(state));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rsi_bounds() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = [
            100, 102, 101, 103, 105, 104, 106, 108, 107, 109, 111, 110, 112, 114, 113, 115,
        ]
        .iter()
        .map(|p| Decimal::from(*p))
        .collect();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert_eq!(rsi.len(), prices.len());
        for value in rsi.iter().flatten() {
            assert!(*value >= Decimal::ZERO && *value <= dec!(100));
        }
    }

    #[test]
    fn test_rsi_warmup_prefix() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert!(rsi[12].is_none());
        assert!(rsi[13].is_some());
    }

    #[test]
    fn test_rsi_is_100_when_only_gains() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert_eq!(rsi.last().unwrap().unwrap(), dec!(100));
    }

    #[test]
    fn test_rsi_is_low_in_downtrend() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(200 - i)).collect();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert_eq!(rsi.last().unwrap().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_rsi_neutral_when_flat() {
        let momentum = MomentumCalculator::new();
        let prices = vec![dec!(100); 20];

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert_eq!(rsi.last().unwrap().unwrap(), dec!(50));
    }

    #[test]
    fn test_rsi_requires_period_plus_one() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..14).map(|i| Decimal::from(100 + i)).collect();

        assert!(matches!(
            momentum.rsi(&prices, RsiParams { period: 14 }),
            Err(IndicatorError::InsufficientData {
                required: 15,
                provided: 14
            })
        ));
    }
}
