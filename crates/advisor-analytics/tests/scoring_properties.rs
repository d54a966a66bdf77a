//! 스코어링 엔진의 성질 기반 테스트.
//!
//! 임의의 유효한 시계열에 대해 문서화된 불변식이 항상 성립하는지
//! 확인합니다:
//! - 영역별 점수는 상한 이내, 종합 점수는 0~100
//! - 동일 입력은 동일 리포트 (멱등성)
//! - 골든크로스 가산은 단기 상승 배열 없이는 성립하지 않음
//! - 밴드 위치 분기는 정확히 하나만 성립
//! - ETF는 PER/PBR 값과 무관하게 가치 점수가 중립 고정

use advisor_analytics::BuyScorer;
use advisor_core::{
    FundamentalRecord, PriceBar, PriceSeries, ReportSection, SecurityKind, SubScores,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// 랜덤 워크에서 유효한 시계열을 만듭니다.
fn series_from_walk(start_price: i64, steps: &[(i64, i64)]) -> PriceSeries {
    let start_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut price = start_price;

    let bars: Vec<PriceBar> = steps
        .iter()
        .enumerate()
        .map(|(i, (delta, volume))| {
            price = (price + delta).max(1);
            let close = Decimal::from(price);
            let low = if close > Decimal::ONE {
                close - Decimal::ONE
            } else {
                Decimal::ZERO
            };

            PriceBar {
                date: start_date + chrono::Duration::days(i as i64),
                open: close,
                high: close + Decimal::ONE,
                low,
                close,
                volume: Decimal::from(*volume),
            }
        })
        .collect();

    PriceSeries::new("PROP", bars).unwrap()
}

fn walk_strategy() -> impl Strategy<Value = (i64, Vec<(i64, i64)>)> {
    (
        1000i64..100_000,
        prop::collection::vec(((-50i64..=50), (0i64..=1_000_000)), 60..=120),
    )
}

fn equity_record(per: i64, pbr_hundredths: i64) -> FundamentalRecord {
    FundamentalRecord {
        security_kind: SecurityKind::Equity,
        per: Some(Decimal::from(per)),
        pbr: Some(Decimal::new(pbr_hundredths, 2)),
        ..FundamentalRecord::unknown("PROP")
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sub_scores_and_composite_stay_in_bounds(
        (start, steps) in walk_strategy(),
        per in 0i64..100,
        pbr in 0i64..300,
    ) {
        let scorer = BuyScorer::new();
        let series = series_from_walk(start, &steps);
        let report = scorer.score(&series, &equity_record(per, pbr)).unwrap();

        prop_assert!(report.sub_scores.trend <= SubScores::TREND_MAX);
        prop_assert!(report.sub_scores.price <= SubScores::PRICE_MAX);
        prop_assert!(report.sub_scores.momentum <= SubScores::MOMENTUM_MAX);
        prop_assert!(report.sub_scores.value <= SubScores::VALUE_MAX);
        prop_assert!(report.composite <= 100);
        prop_assert_eq!(report.composite as u16, report.sub_scores.total().min(100));
    }

    #[test]
    fn identical_inputs_give_identical_reports((start, steps) in walk_strategy()) {
        let scorer = BuyScorer::new();
        let series = series_from_walk(start, &steps);
        let fundamentals = equity_record(12, 110);

        let first = scorer.score(&series, &fundamentals).unwrap();
        let second = scorer.score(&series, &fundamentals).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn golden_cross_implies_short_term_uptrend((start, steps) in walk_strategy()) {
        let scorer = BuyScorer::new();
        let series = series_from_walk(start, &steps);
        let report = scorer.score(&series, &FundamentalRecord::unknown("PROP")).unwrap();

        let has_cross = report.lines.iter().any(|l| l.text.contains("골든크로스"));
        let has_uptrend = report.lines.iter().any(|l| l.text.contains("단기 상승 추세"));

        if has_cross {
            prop_assert!(has_uptrend);
            prop_assert!(report.sub_scores.trend >= 25);
        }
    }

    #[test]
    fn exactly_one_band_branch_fires((start, steps) in walk_strategy()) {
        let scorer = BuyScorer::new();
        let series = series_from_walk(start, &steps);
        let report = scorer.score(&series, &FundamentalRecord::unknown("PROP")).unwrap();

        let price_lines = report.section_lines(ReportSection::Price);
        let fired = ["바닥권", "천장권", "중간 지대"]
            .iter()
            .map(|marker| {
                price_lines
                    .iter()
                    .filter(|l| l.text.contains(marker))
                    .count()
            })
            .sum::<usize>();

        prop_assert_eq!(fired, 1);
    }

    #[test]
    fn etf_valuation_is_flat_regardless_of_ratios(
        (start, steps) in walk_strategy(),
        per in 0i64..100,
        pbr in 0i64..300,
    ) {
        let scorer = BuyScorer::new();
        let series = series_from_walk(start, &steps);

        let etf = FundamentalRecord {
            security_kind: SecurityKind::Etf,
            ..equity_record(per, pbr)
        };
        let report = scorer.score(&series, &etf).unwrap();

        prop_assert_eq!(report.sub_scores.value, 10);
    }
}
