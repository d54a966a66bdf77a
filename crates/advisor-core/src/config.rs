//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 스코어링 임계값은 원본 시스템의 사본마다 값이 달랐던 항목들이라
//! 하드코딩 대신 명시적 설정으로 노출합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdvisorConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 스코어링 임계값 설정
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// 데이터 계층 설정
    #[serde(default)]
    pub data: DataConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 스코어링 임계값 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// PER 저평가 기준. 이 값 미만이면 저평가 (+10점).
    /// 성장주를 고려한 완화 기준 15를 기본값으로 사용합니다.
    pub per_undervalued: Decimal,

    /// PER 고평가 기준. 이 값 초과면 성장 프리미엄 (0점)
    pub per_richly_valued: Decimal,

    /// PBR 자산 저평가 기준. 이 값 미만이면 자산 저평가 (+10점)
    pub pbr_cheap: Decimal,

    /// 밴드 근접 허용 비율. 하단 × (1+x) 이하 / 상단 × (1−x) 이상
    pub band_proximity: Decimal,

    /// 거래량 급증 배수 (20일 평균 대비)
    pub volume_spike_ratio: Decimal,

    /// 거래량 확인 규칙 사용 여부
    pub volume_rule_enabled: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            per_undervalued: dec!(15),
            per_richly_valued: dec!(50),
            pbr_cheap: dec!(1.0),
            band_proximity: dec!(0.02),
            volume_spike_ratio: dec!(1.5),
            volume_rule_enabled: true,
        }
    }
}

/// 데이터 계층 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// 일봉 CSV 디렉토리
    pub data_dir: String,
    /// 시세 캐시 TTL (초)
    pub price_cache_ttl_secs: u64,
    /// 펀더멘털 캐시 TTL (초)
    pub fundamental_cache_ttl_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            price_cache_ttl_secs: 300,
            fundamental_cache_ttl_secs: 3600,
        }
    }
}

impl AdvisorConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `ADVISOR__` 접두사와 `__` 구분자를 사용합니다
    /// (예: `ADVISOR__SCORING__PER_UNDERVALUED=10`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("ADVISOR")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 설정 파일이 주어지면 로드하고, 없으면 기본값을 사용합니다.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, config::ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
