//! CSV 일봉 제공자.
//!
//! `<데이터 디렉토리>/<티커>.csv` 파일에서 일봉을 읽습니다.
//! 형식은 다운로드 도구가 저장하는 그대로입니다:
//!
//! ```text
//! date,open,high,low,close,volume
//! 2024-01-02,71000,72100,70800,71500,13258921
//! ```

use advisor_core::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DataError, Result};
use crate::provider::PriceProvider;

/// CSV 파일 기반 가격 제공자.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    data_dir: PathBuf,
}

impl CsvPriceProvider {
    /// 지정한 디렉토리에서 읽는 제공자를 생성합니다.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

#[async_trait]
impl PriceProvider for CsvPriceProvider {
    async fn fetch_series(&self, ticker: &str, lookback: usize) -> Result<PriceSeries> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(DataError::NotFound(format!(
                "{} (경로: {})",
                ticker,
                path.display()
            )));
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let mut bars = parse_csv(&content, &path)?;

        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }

        let series = PriceSeries::new(ticker, bars)?;
        debug!(ticker, bars = series.len(), path = %path.display(), "일봉 로드 완료");

        Ok(series)
    }
}

/// CSV 본문을 일봉 목록으로 파싱합니다. 헤더와 빈 줄은 건너뜁니다.
fn parse_csv(content: &str, path: &Path) -> Result<Vec<PriceBar>> {
    let mut bars = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || (line_no == 0 && line.starts_with("date")) {
            continue;
        }

        bars.push(parse_bar(line).map_err(|reason| {
            DataError::Parse(format!(
                "{} {}행: {}",
                path.display(),
                line_no + 1,
                reason
            ))
        })?);
    }

    Ok(bars)
}

fn parse_bar(line: &str) -> std::result::Result<PriceBar, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 6 {
        return Err(format!("6개 필드가 필요하지만 {}개입니다", fields.len()));
    }

    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .map_err(|_| format!("잘못된 날짜 형식: {}", fields[0]))?;

    let number = |field: &str| -> std::result::Result<Decimal, String> {
        field
            .parse::<Decimal>()
            .map_err(|_| format!("잘못된 숫자: {}", field))
    };

    Ok(PriceBar {
        date,
        open: number(fields[1])?,
        high: number(fields[2])?,
        low: number(fields[3])?,
        close: number(fields[4])?,
        volume: number(fields[5])?,
    })
}
