//! 펀더멘털 데이터 타입.
//!
//! 이 모듈은 종목의 기업 가치 지표 관련 타입을 정의합니다:
//! - `SecurityKind` - 증권 구분 (주식/ETF/미상)
//! - `FundamentalRecord` - 종목별 펀더멘털 레코드

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 증권 구분.
///
/// 데이터 제공자 계층에서 분류를 끝낸 채로 전달되는 태그입니다.
/// 엔진은 종목명 패턴 매칭 같은 재판정을 하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityKind {
    /// 개별 주식
    Equity,
    /// 상장지수펀드 (여러 발행사를 묶은 래퍼 상품)
    Etf,
    /// 분류 불가 (펀더멘털이 제공되지 않는 해외 종목 등)
    #[default]
    Unknown,
}

impl fmt::Display for SecurityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equity => write!(f, "EQUITY"),
            Self::Etf => write!(f, "ETF"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// 종목 펀더멘털 레코드.
///
/// 요청당 한 번 조회되며 스코어링에는 읽기 전용 입력으로 전달됩니다.
/// PER/PBR이 없거나 0인 것은 정상적인 입력 상태입니다 (§가치 평가에서
/// "데이터 부족" 분기로 처리).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    /// 종목 코드 (사이드카에서 생략되면 제공자가 채움)
    #[serde(default)]
    pub ticker: String,

    /// 종목명
    #[serde(default)]
    pub name: Option<String>,

    /// 증권 구분 (제공자 계층에서 분류 완료)
    #[serde(default)]
    pub security_kind: SecurityKind,

    /// PER (주가수익비율, 0 또는 None = 미상)
    #[serde(default)]
    pub per: Option<Decimal>,

    /// PBR (주가순자산비율)
    #[serde(default)]
    pub pbr: Option<Decimal>,

    /// PSR (주가매출비율)
    #[serde(default)]
    pub psr: Option<Decimal>,

    /// ROE (자기자본이익률, %)
    #[serde(default)]
    pub roe: Option<Decimal>,

    /// 영업이익 (자유 형식 텍스트, 예: "6조5,000억원", "-1,200억원")
    #[serde(default)]
    pub operating_profit: Option<String>,

    /// 시가총액 (원)
    #[serde(default)]
    pub market_cap: Option<Decimal>,

    /// 배당수익률 (%)
    #[serde(default)]
    pub dividend_yield: Option<Decimal>,
}

impl FundamentalRecord {
    /// 펀더멘털이 제공되지 않는 종목용 레코드를 생성합니다.
    pub fn unknown(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// 유효한(양수) PER이 있는지 확인합니다.
    pub fn has_per(&self) -> bool {
        matches!(self.per, Some(p) if p > Decimal::ZERO)
    }

    /// 유효한(양수) PBR이 있는지 확인합니다.
    pub fn has_pbr(&self) -> bool {
        matches!(self.pbr, Some(p) if p > Decimal::ZERO)
    }

    /// 영업이익 텍스트가 흑자를 나타내는지 판정합니다.
    ///
    /// - `None` / 빈 문자열 / "unknown" → `None` (판정 불가)
    /// - 음수 부호 또는 "적자" 표기 → `Some(false)`
    /// - 숫자가 포함된 그 외 표기 → `Some(true)`
    pub fn operating_profit_positive(&self) -> Option<bool> {
        let text = self.operating_profit.as_deref()?.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("unknown") {
            return None;
        }

        if text.starts_with('-') || text.contains("적자") {
            return Some(false);
        }

        if text.chars().any(|c| c.is_ascii_digit()) {
            Some(true)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unknown_record_defaults() {
        let record = FundamentalRecord::unknown("TSLA");

        assert_eq!(record.ticker, "TSLA");
        assert_eq!(record.security_kind, SecurityKind::Unknown);
        assert!(!record.has_per());
        assert!(!record.has_pbr());
    }

    #[test]
    fn test_per_validity() {
        let mut record = FundamentalRecord::unknown("005930");
        assert!(!record.has_per());

        record.per = Some(Decimal::ZERO);
        assert!(!record.has_per());

        record.per = Some(dec!(12.3));
        assert!(record.has_per());
    }

    #[test]
    fn test_operating_profit_parsing() {
        let mut record = FundamentalRecord::unknown("005930");
        assert_eq!(record.operating_profit_positive(), None);

        record.operating_profit = Some("6조5,000억원".to_string());
        assert_eq!(record.operating_profit_positive(), Some(true));

        record.operating_profit = Some("-1,200억원".to_string());
        assert_eq!(record.operating_profit_positive(), Some(false));

        record.operating_profit = Some("적자 전환".to_string());
        assert_eq!(record.operating_profit_positive(), Some(false));

        record.operating_profit = Some("unknown".to_string());
        assert_eq!(record.operating_profit_positive(), None);
    }

    #[test]
    fn test_toml_sidecar_roundtrip() {
        let toml_text = r#"
            ticker = "005930"
            name = "삼성전자"
            security_kind = "equity"
            per = 12.5
            pbr = 1.1
        "#;

        let record: FundamentalRecord = toml::from_str(toml_text).unwrap();
        assert_eq!(record.security_kind, SecurityKind::Equity);
        assert_eq!(record.per, Some(dec!(12.5)));
        assert_eq!(record.psr, None);
    }
}
