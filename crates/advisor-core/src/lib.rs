//! # Advisor Core
//!
//! 매수 확률 분석기의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 및 시계열 타입 (`PriceBar`, `PriceSeries`)
//! - 펀더멘털 레코드 (`FundamentalRecord`, `SecurityKind`)
//! - 분석 리포트 타입 (`ScoreReport`, `Recommendation`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod logging;
pub mod types;

pub use config::*;
pub use logging::*;
pub use types::*;
