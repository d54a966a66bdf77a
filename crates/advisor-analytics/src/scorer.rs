//! 매수 확률 스코어러.
//!
//! 지표 프레임과 펀더멘털 레코드에서 4개 영역의 규칙을 평가하여
//! 0~100 종합 점수와 근거 리포트를 생성합니다.
//!
//! # 4개 영역 (상한 합계 = 100)
//!
//! 1. **추세 (30점)**: 5/20일선 배열 + 골든크로스 + 60일선 위치
//! 2. **가격 위치 (20점)**: 볼린저 밴드 내 위치 + 거래량 확인
//! 3. **타이밍 (30점)**: RSI 과매도/과매수 + MACD 방향
//! 4. **기업 가치 (20점)**: PER/PBR 저평가 (ETF/해외 종목은 중립 고정)
//!
//! 모든 규칙은 프레임의 마지막 두 행만 읽습니다. 동일 입력은 항상
//! 동일 리포트를 만듭니다 (숨은 상태나 시각 의존 없음).

use advisor_core::{
    FundamentalRecord, PriceSeries, Recommendation, ReportLine, ReportSection, ScoreReport,
    ScoringConfig, SecurityKind, SubScores, MIN_HISTORY,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::frame::{FrameRow, IndicatorFrame};

/// 스코어링 오류.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// 60일 미만의 시계열. 부분 점수 없이 전체 요청이 거부됩니다.
    #[error("거래 이력 부족: 필요 {required}일, 제공 {provided}일")]
    InsufficientHistory { required: usize, provided: usize },
}

/// 매수 확률 스코어러.
///
/// 임계값 설정만 들고 있는 가벼운 값 타입이며, 호출 간 공유 상태가
/// 없어 요청마다 독립적으로 사용해도 안전합니다.
#[derive(Debug, Clone, Default)]
pub struct BuyScorer {
    config: ScoringConfig,
}

impl BuyScorer {
    /// 기본 임계값으로 스코어러를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 임계값 설정으로 스코어러를 생성합니다.
    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// 시계열과 펀더멘털에서 매수 확률 리포트를 생성합니다.
    ///
    /// # 에러
    ///
    /// 시계열이 60일 미만이면 `ScoreError::InsufficientHistory`.
    /// 제공자 계층이 먼저 걸러야 할 조건이지만 방어적으로 재확인합니다.
    pub fn score(
        &self,
        series: &PriceSeries,
        fundamentals: &FundamentalRecord,
    ) -> Result<ScoreReport, ScoreError> {
        if series.len() < MIN_HISTORY {
            return Err(ScoreError::InsufficientHistory {
                required: MIN_HISTORY,
                provided: series.len(),
            });
        }

        let frame = IndicatorFrame::from_series(series);
        let (prev, curr) = frame.last_two();
        let volume_mean = recent_volume_mean(&series.volumes());

        let mut lines = Vec::new();
        let sub_scores = SubScores {
            trend: self.score_trend(&curr, &prev, &mut lines),
            price: self.score_price_position(&curr, &prev, volume_mean, &mut lines),
            momentum: self.score_momentum(&curr, &mut lines),
            value: self.score_valuation(fundamentals, &mut lines),
        };

        // 상한 합계가 100이라 clamp는 방어적 동작
        let composite = sub_scores.total().min(100) as u8;
        let recommendation = Recommendation::from_score(composite);

        debug!(
            ticker = series.ticker(),
            composite,
            trend = sub_scores.trend,
            price = sub_scores.price,
            momentum = sub_scores.momentum,
            value = sub_scores.value,
            "스코어링 완료"
        );

        Ok(ScoreReport {
            ticker: series.ticker().to_string(),
            composite,
            sub_scores,
            recommendation,
            lines,
        })
    }

    /// 추세 점수 (최대 30점).
    ///
    /// 골든크로스 가산(+10)은 단기 상승 배열(+15)이 성립한 경우에만
    /// 검사됩니다.
    fn score_trend(&self, curr: &FrameRow, prev: &FrameRow, lines: &mut Vec<ReportLine>) -> u8 {
        let mut score = 0;

        if curr.ma5 > curr.ma20 {
            score += 15;
            lines.push(ReportLine::new(
                ReportSection::Trend,
                15,
                "단기 상승 추세 (+15점): 5일선이 20일선 위에 있습니다.",
            ));

            if prev.ma5 <= prev.ma20 {
                score += 10;
                lines.push(ReportLine::new(
                    ReportSection::Trend,
                    10,
                    "골든크로스 발생 (+10점): 5일선이 20일선을 방금 뚫었습니다.",
                ));
            }
        } else {
            lines.push(ReportLine::new(
                ReportSection::Trend,
                0,
                "단기 하락 추세 (0점): 5일선이 20일선 아래에 있습니다.",
            ));
        }

        if curr.close > curr.ma60 {
            score += 5;
            lines.push(ReportLine::new(
                ReportSection::Trend,
                5,
                "중기 상승 (+5점): 주가가 60일선 위에 있습니다.",
            ));
        } else {
            lines.push(ReportLine::new(
                ReportSection::Trend,
                0,
                "중기 하락 (0점): 주가가 60일선 아래에 있습니다.",
            ));
        }

        score
    }

    /// 가격 위치 점수 (최대 20점).
    ///
    /// 밴드 위치 세 분기는 상호 배타적이며 정확히 하나만 성립합니다.
    /// 거래량 확인 규칙은 밴드 분기와 독립적으로 가산됩니다.
    fn score_price_position(
        &self,
        curr: &FrameRow,
        prev: &FrameRow,
        volume_mean: Decimal,
        lines: &mut Vec<ReportLine>,
    ) -> u8 {
        let mut score = 0;

        let near_lower = curr.bb_lower * (Decimal::ONE + self.config.band_proximity);
        let near_upper = curr.bb_upper * (Decimal::ONE - self.config.band_proximity);

        if curr.close <= near_lower {
            score += 15;
            lines.push(ReportLine::new(
                ReportSection::Price,
                15,
                "바닥권 도달 (+15점): 주가가 밴드 하단에 있어 반등 확률이 높습니다.",
            ));
        } else if curr.close >= near_upper {
            lines.push(ReportLine::new(
                ReportSection::Price,
                0,
                "천장권 도달 (0점): 주가가 밴드 상단에 있어 조정 위험이 있습니다.",
            ));
        } else {
            score += 5;
            lines.push(ReportLine::new(
                ReportSection::Price,
                5,
                "중간 지대 (+5점): 주가가 밴드 중간에서 평범하게 움직이고 있습니다.",
            ));
        }

        if self.config.volume_rule_enabled
            && curr.volume > volume_mean * self.config.volume_spike_ratio
        {
            if curr.close > prev.close {
                score += 5;
                lines.push(ReportLine::new(
                    ReportSection::Price,
                    5,
                    "거래량 폭발 (매수세, +5점): 주가 상승과 함께 거래량이 크게 늘었습니다.",
                ));
            } else {
                lines.push(ReportLine::new(
                    ReportSection::Price,
                    0,
                    "거래량 폭발 (매도세, 0점): 주가 하락과 함께 거래량이 늘어 위험합니다.",
                ));
            }
        }

        score
    }

    /// 타이밍 점수 (최대 30점).
    ///
    /// RSI 분기(최대 20)와 MACD 가산(+10)이 같은 버킷을 공유하므로
    /// 상한 30은 구조적으로 보장됩니다.
    fn score_momentum(&self, curr: &FrameRow, lines: &mut Vec<ReportLine>) -> u8 {
        let mut score = 0;
        let rsi = curr.rsi14.round_dp(1);

        if curr.rsi14 < Decimal::from(30) {
            score += 20;
            lines.push(ReportLine::new(
                ReportSection::Momentum,
                20,
                format!("RSI 과매도 ({rsi}, +20점): 공포 구간은 역발상 매수 기회입니다."),
            ));
        } else if curr.rsi14 > Decimal::from(70) {
            lines.push(ReportLine::new(
                ReportSection::Momentum,
                0,
                format!("RSI 과매수 ({rsi}, 0점): 탐욕 구간이니 추격 매수 금지!"),
            ));
        } else {
            score += 5;
            lines.push(ReportLine::new(
                ReportSection::Momentum,
                5,
                format!("RSI 중간 구간 ({rsi}, +5점): 중립"),
            ));
        }

        if curr.macd > curr.macd_signal {
            score += 10;
            lines.push(ReportLine::new(
                ReportSection::Momentum,
                10,
                "MACD 상승 (+10점): 매수 에너지가 매도 에너지보다 셉니다.",
            ));
        }

        score
    }

    /// 기업 가치 점수 (최대 20점).
    ///
    /// ETF와 분류 불가(해외) 종목은 래퍼 상품의 PER/PBR이 의미가 없어
    /// 0점 배제 대신 중립 고정 점수(+10)를 받습니다. 레코드에 PER/PBR이
    /// 들어 있어도 무시합니다.
    fn score_valuation(&self, fundamentals: &FundamentalRecord, lines: &mut Vec<ReportLine>) -> u8 {
        if fundamentals.security_kind != SecurityKind::Equity {
            lines.push(ReportLine::new(
                ReportSection::Value,
                10,
                "가치 평가 생략 (+10점): 차트 중심 상품(ETF/해외 종목)이라 중립 점수를 부여합니다.",
            ));
            return 10;
        }

        let per = match fundamentals.per.filter(|p| *p > Decimal::ZERO) {
            Some(per) => per,
            None => {
                lines.push(ReportLine::new(
                    ReportSection::Value,
                    0,
                    "재무 지표 부족 (0점): PER 정보가 없어 가치 점수에서 제외됩니다.",
                ));
                return 0;
            }
        };

        let mut score = 0;
        let per_display = per.round_dp(1);

        if per < self.config.per_undervalued {
            score += 10;
            lines.push(ReportLine::new(
                ReportSection::Value,
                10,
                format!("PER 적정/저평가 (+10점): (현재 PER: {per_display})"),
            ));
        } else if per > self.config.per_richly_valued {
            lines.push(ReportLine::new(
                ReportSection::Value,
                0,
                format!("PER 고평가 (0점): 성장 프리미엄 구간입니다. (현재 PER: {per_display})"),
            ));
        } else {
            score += 5;
            lines.push(ReportLine::new(
                ReportSection::Value,
                5,
                format!("PER 적정 수준 (+5점): (현재 PER: {per_display})"),
            ));
        }

        if let Some(pbr) = fundamentals.pbr.filter(|p| *p > Decimal::ZERO) {
            let pbr_display = pbr.round_dp(2);
            if pbr < self.config.pbr_cheap {
                score += 10;
                lines.push(ReportLine::new(
                    ReportSection::Value,
                    10,
                    format!("PBR 자산 저평가 (+10점): (현재 PBR: {pbr_display})"),
                ));
            } else {
                lines.push(ReportLine::new(
                    ReportSection::Value,
                    0,
                    format!("PBR 적정/고평가 (0점): (현재 PBR: {pbr_display})"),
                ));
            }
        }

        if fundamentals.operating_profit_positive() == Some(true) {
            lines.push(ReportLine::new(
                ReportSection::Value,
                0,
                "영업이익 흑자: 본업에서 이익을 내고 있는 기업입니다.",
            ));
        }

        score
    }
}

/// 최근 20일 거래량 평균.
fn recent_volume_mean(volumes: &[Decimal]) -> Decimal {
    let window = &volumes[volumes.len().saturating_sub(20)..];
    if window.is_empty() {
        return Decimal::ZERO;
    }
    window.iter().sum::<Decimal>() / Decimal::from(window.len())
}
