//! 지표 프레임.
//!
//! `PriceSeries`에 파생 지표 열(ma5/ma20/ma60, rsi14, macd 3종,
//! 볼린저 밴드 2종)을 더한 `IndicatorFrame`을 조립합니다.
//!
//! 각 열은 한 번만 계산되고 이후 갱신되지 않습니다. 윈도우가 차지 않는
//! 초기 구간은 `None`이며, 열 계산이 실패하더라도 프레임 조립은
//! 실패하지 않습니다. 해당 열 전체를 미정의로 대체하고 경고만 남겨
//! 스코어링이 부분 점수로라도 진행되게 합니다.

use advisor_core::PriceSeries;
use rust_decimal::Decimal;
use tracing::warn;

use crate::indicators::{
    BollingerBandsParams, IndicatorEngine, IndicatorError, MacdParams, RsiParams, SmaParams,
};

/// 파생 지표 열이 채워진 일봉 프레임.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    closes: Vec<Decimal>,
    volumes: Vec<Decimal>,
    ma5: Vec<Option<Decimal>>,
    ma20: Vec<Option<Decimal>>,
    ma60: Vec<Option<Decimal>>,
    rsi14: Vec<Option<Decimal>>,
    macd: Vec<Option<Decimal>>,
    macd_signal: Vec<Option<Decimal>>,
    macd_diff: Vec<Option<Decimal>>,
    bb_upper: Vec<Option<Decimal>>,
    bb_lower: Vec<Option<Decimal>>,
}

/// 프레임의 한 행.
///
/// 미정의 셀은 0으로 대체된 구체 값입니다. 스코어링은 길이 불변식
/// (60일 이상) 덕분에 실제로는 항상 정의된 구간만 읽습니다.
#[derive(Debug, Clone, Copy)]
pub struct FrameRow {
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
    /// 5일 이동평균
    pub ma5: Decimal,
    /// 20일 이동평균
    pub ma20: Decimal,
    /// 60일 이동평균
    pub ma60: Decimal,
    /// RSI (14일)
    pub rsi14: Decimal,
    /// MACD 라인
    pub macd: Decimal,
    /// MACD 시그널 라인
    pub macd_signal: Decimal,
    /// MACD − 시그널
    pub macd_diff: Decimal,
    /// 볼린저 밴드 상단
    pub bb_upper: Decimal,
    /// 볼린저 밴드 하단
    pub bb_lower: Decimal,
}

impl IndicatorFrame {
    /// 시계열에서 모든 파생 열을 계산하여 프레임을 조립합니다.
    ///
    /// 열 계산 실패는 전파되지 않습니다 (미정의 열로 대체).
    pub fn from_series(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();
        let len = closes.len();
        let engine = IndicatorEngine::new();

        let ma5 = recover(engine.sma(&closes, SmaParams { period: 5 }), len, "ma5");
        let ma20 = recover(engine.sma(&closes, SmaParams { period: 20 }), len, "ma20");
        let ma60 = recover(engine.sma(&closes, SmaParams { period: 60 }), len, "ma60");
        let rsi14 = recover(engine.rsi(&closes, RsiParams { period: 14 }), len, "rsi14");

        let (macd, macd_signal, macd_diff) = match engine.macd(&closes, MacdParams::default()) {
            Ok(points) => {
                let mut macd = Vec::with_capacity(len);
                let mut signal = Vec::with_capacity(len);
                let mut diff = Vec::with_capacity(len);
                for point in points {
                    macd.push(point.macd);
                    signal.push(point.signal);
                    diff.push(point.diff);
                }
                (macd, signal, diff)
            }
            Err(error) => {
                warn!(column = "macd", %error, "지표 계산 실패, 미정의 열로 대체합니다");
                (vec![None; len], vec![None; len], vec![None; len])
            }
        };

        let (bb_upper, bb_lower) =
            match engine.bollinger_bands(&closes, BollingerBandsParams::default()) {
                Ok(points) => {
                    let upper = points.iter().map(|p| p.upper).collect();
                    let lower = points.iter().map(|p| p.lower).collect();
                    (upper, lower)
                }
                Err(error) => {
                    warn!(column = "bollinger", %error, "지표 계산 실패, 미정의 열로 대체합니다");
                    (vec![None; len], vec![None; len])
                }
            };

        Self {
            closes,
            volumes,
            ma5,
            ma20,
            ma60,
            rsi14,
            macd,
            macd_signal,
            macd_diff,
            bb_upper,
            bb_lower,
        }
    }

    /// 행 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// 특정 인덱스의 행을 반환합니다. 미정의 셀은 0으로 대체됩니다.
    pub fn row(&self, index: usize) -> FrameRow {
        let cell = |column: &[Option<Decimal>]| column[index].unwrap_or(Decimal::ZERO);

        FrameRow {
            close: self.closes[index],
            volume: self.volumes[index],
            ma5: cell(&self.ma5),
            ma20: cell(&self.ma20),
            ma60: cell(&self.ma60),
            rsi14: cell(&self.rsi14),
            macd: cell(&self.macd),
            macd_signal: cell(&self.macd_signal),
            macd_diff: cell(&self.macd_diff),
            bb_upper: cell(&self.bb_upper),
            bb_lower: cell(&self.bb_lower),
        }
    }

    /// 마지막 두 행 (직전, 최신)을 반환합니다.
    ///
    /// 프레임이 2행 이상이라는 전제에서 호출해야 합니다
    /// (스코어러는 60일 불변식을 먼저 확인합니다).
    pub fn last_two(&self) -> (FrameRow, FrameRow) {
        let last = self.len() - 1;
        (self.row(last - 1), self.row(last))
    }

    /// 특정 열이 해당 인덱스에서 정의되어 있는지 확인합니다.
    pub fn is_defined(&self, index: usize) -> bool {
        self.ma60[index].is_some()
            && self.rsi14[index].is_some()
            && self.macd_signal[index].is_some()
            && self.bb_upper[index].is_some()
    }
}

fn recover(
    result: Result<Vec<Option<Decimal>>, IndicatorError>,
    len: usize,
    column: &str,
) -> Vec<Option<Decimal>> {
    match result {
        Ok(values) => values,
        Err(error) => {
            warn!(column, %error, "지표 계산 실패, 미정의 열로 대체합니다");
            vec![None; len]
        }
    }
}
