//! 펀더멘털 사이드카 제공자.
//!
//! `<데이터 디렉토리>/<티커>.toml` 파일에서 펀더멘털 레코드를 읽습니다.
//!
//! ```toml
//! ticker = "005930"
//! name = "삼성전자"
//! security_kind = "equity"
//! per = 12.5
//! pbr = 1.1
//! operating_profit = "6조5,000억원"
//! ```
//!
//! 사이드카가 없는 종목은 분류 불가 레코드로 대체되어 차트 전용으로
//! 분석이 진행됩니다. PER/PBR 부재는 오류가 아니라 정상 입력입니다.

use advisor_core::FundamentalRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::provider::FundamentalProvider;

/// TOML 사이드카 기반 펀더멘털 제공자.
#[derive(Debug, Clone)]
pub struct SidecarFundamentalProvider {
    data_dir: PathBuf,
}

impl SidecarFundamentalProvider {
    /// 지정한 디렉토리에서 읽는 제공자를 생성합니다.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn sidecar_path(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.toml", ticker.to_uppercase()))
    }
}

#[async_trait]
impl FundamentalProvider for SidecarFundamentalProvider {
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalRecord> {
        let path = self.sidecar_path(ticker);
        if !path.exists() {
            warn!(ticker, "펀더멘털 사이드카 없음, 차트 전용으로 진행합니다");
            return Ok(FundamentalRecord::unknown(ticker));
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let mut record: FundamentalRecord = toml::from_str(&content)
            .map_err(|e| DataError::Parse(format!("{}: {}", path.display(), e)))?;

        if record.ticker.is_empty() {
            record.ticker = ticker.to_string();
        }

        debug!(
            ticker,
            kind = %record.security_kind,
            per = ?record.per,
            pbr = ?record.pbr,
            "펀더멘털 로드 완료"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::SecurityKind;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[tokio::test]
    async fn test_sidecar_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("005930.toml")).unwrap();
        writeln!(
            file,
            r#"
ticker = "005930"
name = "삼성전자"
security_kind = "equity"
per = 12.5
pbr = 1.1
operating_profit = "6조5,000억원"
"#
        )
        .unwrap();

        let provider = SidecarFundamentalProvider::new(dir.path());
        let record = provider.fetch_fundamentals("005930").await.unwrap();

        assert_eq!(record.security_kind, SecurityKind::Equity);
        assert_eq!(record.per, Some(dec!(12.5)));
        assert_eq!(record.operating_profit_positive(), Some(true));
    }

    #[tokio::test]
    async fn test_missing_sidecar_degrades_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SidecarFundamentalProvider::new(dir.path());

        let record = provider.fetch_fundamentals("TSLA").await.unwrap();

        assert_eq!(record.ticker, "TSLA");
        assert_eq!(record.security_kind, SecurityKind::Unknown);
        assert!(!record.has_per());
    }

    #[tokio::test]
    async fn test_broken_sidecar_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("BAD.toml")).unwrap();
        writeln!(file, "per = \"not a number").unwrap();

        let provider = SidecarFundamentalProvider::new(dir.path());
        let result = provider.fetch_fundamentals("BAD").await;

        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}
