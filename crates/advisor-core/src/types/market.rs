//! 시장 데이터 타입.
//!
//! 이 모듈은 가격 데이터 관련 타입을 정의합니다:
//! - `PriceBar` - 하루치 OHLCV 일봉
//! - `PriceSeries` - 검증된 일봉 시계열
//! - `Currency` - 표시 통화

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 스코어링에 필요한 최소 거래일 수.
///
/// 60일 이동평균이 정의되려면 최소 60개의 일봉이 필요합니다.
pub const MIN_HISTORY: usize = 60;

/// 하루치 OHLCV 일봉.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl PriceBar {
    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// 시계열 검증 오류.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// 일봉이 하나도 없음
    #[error("빈 시계열입니다")]
    Empty,

    /// 날짜 역순
    #[error("날짜가 오름차순이 아닙니다: {prev} 다음에 {curr}")]
    OutOfOrder { prev: NaiveDate, curr: NaiveDate },

    /// 같은 거래일 중복
    #[error("중복된 거래일: {0}")]
    DuplicateDate(NaiveDate),

    /// 음수 가격/거래량
    #[error("음수 값이 포함된 일봉: {0}")]
    NegativeValue(NaiveDate),
}

/// 검증된 일봉 시계열.
///
/// 생성 시점에 날짜 오름차순, 중복 없음, 음수 없음을 보장하며,
/// 스코어링 동안 불변으로 취급됩니다. 분석 요청마다 새로 구성되고
/// 리포트 생성 후 폐기됩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 일봉 목록을 검증하여 시계열을 생성합니다.
    ///
    /// # 에러
    ///
    /// - 빈 목록
    /// - 날짜 역순 또는 중복
    /// - 음수 가격/거래량
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for pair in bars.windows(2) {
            if pair[1].date < pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    prev: pair[0].date,
                    curr: pair[1].date,
                });
            }
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate(pair[1].date));
            }
        }

        for bar in &bars {
            let values = [bar.open, bar.high, bar.low, bar.close, bar.volume];
            if values.iter().any(|v| *v < Decimal::ZERO) {
                return Err(SeriesError::NegativeValue(bar.date));
            }
        }

        Ok(Self {
            ticker: ticker.into(),
            bars,
        })
    }

    /// 종목 코드를 반환합니다.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// 일봉 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 일봉이 없는지 확인합니다 (생성 규칙상 항상 false).
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 전체 일봉 슬라이스를 반환합니다.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// 마지막(최신) 일봉을 반환합니다.
    pub fn last(&self) -> &PriceBar {
        // 생성 시 Empty를 거부하므로 항상 존재
        self.bars.last().unwrap()
    }

    /// 종가 열을 반환합니다.
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// 거래량 열을 반환합니다.
    pub fn volumes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// 스코어링에 충분한 이력이 있는지 확인합니다.
    pub fn has_min_history(&self) -> bool {
        self.bars.len() >= MIN_HISTORY
    }
}

/// 표시 통화.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// 원화 (국내 종목)
    Krw,
    /// 달러 (해외 종목)
    Usd,
}

impl Currency {
    /// 티커 형식으로 통화를 추론합니다.
    ///
    /// 숫자로만 이루어진 티커(예: 005930)는 국내 종목으로 간주합니다.
    pub fn infer(ticker: &str) -> Self {
        if !ticker.is_empty() && ticker.chars().all(|c| c.is_ascii_digit()) {
            Self::Krw
        } else {
            Self::Usd
        }
    }

    /// 가격을 통화 관례에 맞게 표시합니다.
    ///
    /// 원화는 천 단위 콤마가 있는 정수, 달러는 소수점 둘째 자리까지.
    pub fn format_price(&self, price: Decimal) -> String {
        match self {
            Self::Krw => {
                let rounded = price.round();
                format!("{} KRW", group_thousands(&rounded.to_string()))
            }
            Self::Usd => format!("{:.2} USD", price),
        }
    }
}

/// 정수 문자열에 천 단위 콤마를 삽입합니다.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}
