//! 단일 종목 분석 명령.

use advisor_analytics::{BuyScorer, ScoreError};
use advisor_core::{
    AdvisorConfig, Currency, FundamentalRecord, PriceSeries, ReportSection, ScoreReport, SubScores,
};
use advisor_data::{CsvPriceProvider, FundamentalProvider, PriceProvider, SidecarFundamentalProvider};
use anyhow::Context;
use rust_decimal::Decimal;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 사람이 읽는 리포트
    Text,
    /// 기계 소비용 JSON
    Json,
}

impl OutputFormat {
    /// 문자열에서 출력 형식을 파싱합니다.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// analyze 명령 설정.
pub struct AnalyzeConfig {
    /// 종목 코드/심볼
    pub ticker: String,
    /// 데이터 디렉토리
    pub data_dir: String,
    /// 조회할 최대 일봉 수
    pub lookback: usize,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 한 종목을 분석하고 리포트를 출력합니다.
pub async fn run_analyze(app: &AdvisorConfig, config: AnalyzeConfig) -> anyhow::Result<()> {
    let prices = CsvPriceProvider::new(&config.data_dir);
    let fundamentals_provider = SidecarFundamentalProvider::new(&config.data_dir);

    let series = prices
        .fetch_series(&config.ticker, config.lookback)
        .await
        .with_context(|| format!("'{}' 일봉 조회 실패", config.ticker))?;
    let fundamentals = fundamentals_provider
        .fetch_fundamentals(&config.ticker)
        .await
        .with_context(|| format!("'{}' 펀더멘털 조회 실패", config.ticker))?;

    let scorer = BuyScorer::with_config(app.scoring.clone());
    let report = match scorer.score(&series, &fundamentals) {
        Ok(report) => report,
        Err(ScoreError::InsufficientHistory { required, provided }) => {
            anyhow::bail!(
                "'{}' 분석 불가: 거래일이 {}일뿐입니다 (최소 {}일 필요)",
                config.ticker,
                provided,
                required
            );
        }
    };

    match config.format {
        OutputFormat::Text => print_report(&report, &series, &fundamentals),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// 리포트를 원본 UI와 같은 구성으로 출력합니다:
/// 현재가 → 종합 점수/추천 → 영역별 강도 → 섹션별 상세 근거 → 재무 요약.
fn print_report(report: &ScoreReport, series: &PriceSeries, fundamentals: &FundamentalRecord) {
    let currency = Currency::infer(&report.ticker);
    let name = fundamentals.name.as_deref().unwrap_or(&report.ticker);

    println!("\n📢 {} ({}) 분석 리포트", name, report.ticker);
    println!("현재가: {}", currency.format_price(series.last().close));

    println!("\n🤖 AI 최종 매수 확률: {}%", report.composite);
    println!("{}", report.recommendation);

    println!("\n요소별 매수 강도:");
    print_strength("📈 추세", report.sub_scores.trend, SubScores::TREND_MAX);
    print_strength("📉 가격 위치", report.sub_scores.price, SubScores::PRICE_MAX);
    print_strength("⏱️ 타이밍", report.sub_scores.momentum, SubScores::MOMENTUM_MAX);
    print_strength("💰 기업 가치", report.sub_scores.value, SubScores::VALUE_MAX);

    println!("\n📝 상세 분석 이유:");
    for section in ReportSection::ORDER {
        let lines = report.section_lines(section);
        if lines.is_empty() {
            continue;
        }

        println!("\n#### {}", section.heading());
        for line in lines {
            println!("- {}", line.text);
        }
    }

    print_financial_summary(fundamentals);
}

fn print_strength(label: &str, score: u8, max: u8) {
    let pct = score as f64 / max as f64 * 100.0;
    println!("  {label}: {pct:.1}% ({score} / {max}점)");
}

/// 재무 요약 (있는 항목만 표시).
fn print_financial_summary(fundamentals: &FundamentalRecord) {
    let mut entries: Vec<String> = Vec::new();

    if let Some(cap) = fundamentals.market_cap {
        let in_100m = (cap / Decimal::from(100_000_000)).round();
        entries.push(format!("시가총액 {in_100m}억원"));
    }
    if let Some(div) = fundamentals.dividend_yield {
        entries.push(format!("배당수익률 {div}%"));
    }
    if let Some(roe) = fundamentals.roe {
        entries.push(format!("ROE {roe}%"));
    }

    if !entries.is_empty() {
        println!("\n📑 재무 요약: {}", entries.join(" · "));
    }
}
