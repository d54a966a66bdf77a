//! 변동성 지표.
//!
//! 주가가 통계적으로 얼마나 늘어나 있는지 측정하는 볼린저 밴드를
//! 제공합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 한 시점의 볼린저 밴드 값.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerPoint {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA − k × σ).
    pub lower: Option<Decimal>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// σ는 윈도우에 대한 모집단 표준편차(분모 n)입니다.
    /// 처음 `period - 1`개는 미정의입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerPoint>> {
        let period = params.period;

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

        let divisor = Decimal::from(period);
        let mut result = vec![
            BollingerPoint {
                upper: None,
                middle: None,
                lower: None,
            };
            period - 1
        ];

        for i in period - 1..prices.len() {
            let window = &prices[i + 1 - period..=i];

            let mean: Decimal = window.iter().sum::<Decimal>() / divisor;
            let variance: Decimal = window
                .iter()
                .map(|p| {
                    let diff = *p - mean;
                    diff * diff
                })
                .sum::<Decimal>()
                / divisor;

            let deviation = params.std_dev_multiplier * sqrt_decimal(variance);

            result.push(BollingerPoint {
                upper: Some(mean + deviation),
                middle: Some(mean),
                lower: Some(mean - deviation),
            });
        }

        Ok(result)
    }
}

/// Decimal 제곱근 계산 (Newton-Raphson 방법).
///
/// Decimal 타입에는 기본 제곱근 함수가 없어 직접 근사합니다.
fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let two = dec!(2);
    let mut x = value;

    // 10회 반복이면 충분한 정밀도
    for _ in 0..10 {
        x = (x + value / x) / two;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bollinger_bands_symmetry() {
        let volatility = VolatilityIndicators::new();
        let prices: Vec<Decimal> = (0..30).map(|i| Decimal::from(100 + i % 5)).collect();

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        assert_eq!(bands.len(), prices.len());
        assert!(bands[18].middle.is_none());

        let last = bands.last().unwrap();
        let (upper, middle, lower) = (
            last.upper.unwrap(),
            last.middle.unwrap(),
            last.lower.unwrap(),
        );

        // 상단과 하단은 중단을 기준으로 대칭
        let diff = (upper - middle) - (middle - lower);
        assert!(diff.abs() < dec!(0.0001));
        assert!(upper > lower);
    }

    #[test]
    fn test_bands_collapse_on_constant_prices() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100); 25];

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        let last = bands.last().unwrap();
        assert_eq!(last.upper, Some(dec!(100)));
        assert_eq!(last.middle, Some(dec!(100)));
        assert_eq!(last.lower, Some(dec!(100)));
    }

    #[test]
    fn test_sqrt_decimal_accuracy() {
        let sqrt = sqrt_decimal(dec!(25));
        assert!((sqrt - dec!(5)).abs() < dec!(0.0001));

        let sqrt2 = sqrt_decimal(dec!(2));
        assert!((sqrt2 - dec!(1.41421356)).abs() < dec!(0.0001));

        assert_eq!(sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_insufficient_data() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100); 10];

        assert!(volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .is_err());
    }
}
