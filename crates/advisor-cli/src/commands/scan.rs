//! 일괄 스캔 명령.
//!
//! 종목마다 독립적인 tokio 태스크로 분석을 실행합니다. 엔진은 공유
//! 가변 상태가 없는 순수 계산이라 태스크 간 동기화가 필요 없고,
//! 제공자만 캐시 계층을 사이에 두고 공유됩니다.

use advisor_analytics::BuyScorer;
use advisor_core::{AdvisorConfig, ScoreReport};
use advisor_data::{
    CachedFundamentalProvider, CachedPriceProvider, CsvPriceProvider, FundamentalProvider,
    PriceProvider, SidecarFundamentalProvider,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// scan 명령 설정.
pub struct ScanConfig {
    /// 분석할 종목 목록
    pub tickers: Vec<String>,
    /// 데이터 디렉토리
    pub data_dir: String,
    /// 조회할 최대 일봉 수
    pub lookback: usize,
}

/// 여러 종목을 병렬 분석하고 점수순으로 출력합니다.
pub async fn run_scan(app: &AdvisorConfig, config: ScanConfig) -> anyhow::Result<()> {
    let prices = Arc::new(CachedPriceProvider::new(
        CsvPriceProvider::new(&config.data_dir),
        Duration::from_secs(app.data.price_cache_ttl_secs),
    ));
    let fundamentals = Arc::new(CachedFundamentalProvider::new(
        SidecarFundamentalProvider::new(&config.data_dir),
        Duration::from_secs(app.data.fundamental_cache_ttl_secs),
    ));
    let scorer = BuyScorer::with_config(app.scoring.clone());

    let mut handles = Vec::with_capacity(config.tickers.len());
    for ticker in config.tickers {
        let prices = Arc::clone(&prices);
        let fundamentals = Arc::clone(&fundamentals);
        let scorer = scorer.clone();
        let lookback = config.lookback;

        handles.push(tokio::spawn(async move {
            let series = prices
                .fetch_series(&ticker, lookback)
                .await
                .with_context(|| format!("'{}' 일봉 조회 실패", ticker))?;
            let record = fundamentals
                .fetch_fundamentals(&ticker)
                .await
                .with_context(|| format!("'{}' 펀더멘털 조회 실패", ticker))?;

            let report = scorer
                .score(&series, &record)
                .with_context(|| format!("'{}' 스코어링 실패", ticker))?;

            Ok::<ScoreReport, anyhow::Error>(report)
        }));
    }

    let mut reports = Vec::new();
    for handle in handles {
        match handle.await? {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(error = %e, "스캔 항목 실패");
                println!("⚠️  {e:#}");
            }
        }
    }

    reports.sort_by(|a, b| b.composite.cmp(&a.composite));
    print_ranking(&reports);

    Ok(())
}

fn print_ranking(reports: &[ScoreReport]) {
    if reports.is_empty() {
        println!("\n분석에 성공한 종목이 없습니다.");
        return;
    }

    println!("\n종목별 매수 확률 (높은 순):");
    println!(
        "{:<10} {:>4} {:>4} {:>4} {:>4} {:>4}  추천",
        "티커", "종합", "추세", "가격", "타이밍", "가치"
    );

    for report in reports {
        println!(
            "{:<10} {:>4} {:>4} {:>4} {:>4} {:>4}  {}",
            report.ticker,
            report.composite,
            report.sub_scores.trend,
            report.sub_scores.price,
            report.sub_scores.momentum,
            report.sub_scores.value,
            report.recommendation
        );
    }
}
