//! 캐시 계층 (cache-aside).
//!
//! (종목, 요청 종류) 키로 값과 수집 시각을 보관하는 TTL 캐시와, 이를
//! 이용해 제공자 호출을 감싸는 래퍼를 제공합니다. 엔진의 순수 함수
//! 계약 밖에 있으며, 캐시 적중 여부는 스코어링 결과에 영향을 주지
//! 않습니다 (동일 종목·동일 조회 조건 전제).

use advisor_core::{FundamentalRecord, PriceSeries};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::provider::{FundamentalProvider, PriceProvider};

/// 캐시되는 요청 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// 일봉 시계열 조회
    Price,
    /// 펀더멘털 레코드 조회
    Fundamental,
}

/// TTL 기반 인메모리 캐시.
///
/// 항목은 (값, 수집 시각)으로 저장되고, TTL이 지난 항목은 조회 시
/// 무시됩니다.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<(String, RequestKind), (V, Instant)>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// 지정한 TTL의 캐시를 생성합니다.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// 신선한 항목이 있으면 반환합니다.
    pub async fn get(&self, ticker: &str, kind: RequestKind) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(&(ticker.to_string(), kind))
            .filter(|(_, fetched_at)| fetched_at.elapsed() < self.ttl)
            .map(|(value, _)| value.clone())
    }

    /// 항목을 저장합니다 (기존 항목은 교체).
    pub async fn insert(&self, ticker: &str, kind: RequestKind, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert((ticker.to_string(), kind), (value, Instant::now()));
    }
}

/// 캐시를 끼운 가격 제공자.
///
/// 같은 종목을 반복 분석할 때 파일/네트워크 조회를 아낍니다.
/// 같은 종목에는 같은 lookback을 쓴다는 전제이며, lookback을 바꾸면
/// 캐시 항목이 이전 조회 기준으로 반환될 수 있습니다.
pub struct CachedPriceProvider<P> {
    inner: P,
    cache: TtlCache<PriceSeries>,
}

impl<P: PriceProvider> CachedPriceProvider<P> {
    /// 제공자를 TTL 캐시로 감쌉니다.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl<P: PriceProvider> PriceProvider for CachedPriceProvider<P> {
    async fn fetch_series(&self, ticker: &str, lookback: usize) -> Result<PriceSeries> {
        if let Some(series) = self.cache.get(ticker, RequestKind::Price).await {
            debug!(ticker, "가격 캐시 적중");
            return Ok(series);
        }

        let series = self.inner.fetch_series(ticker, lookback).await?;
        self.cache
            .insert(ticker, RequestKind::Price, series.clone())
            .await;
        Ok(series)
    }
}

/// 캐시를 끼운 펀더멘털 제공자.
pub struct CachedFundamentalProvider<P> {
    inner: P,
    cache: TtlCache<FundamentalRecord>,
}

impl<P: FundamentalProvider> CachedFundamentalProvider<P> {
    /// 제공자를 TTL 캐시로 감쌉니다.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl<P: FundamentalProvider> FundamentalProvider for CachedFundamentalProvider<P> {
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalRecord> {
        if let Some(record) = self.cache.get(ticker, RequestKind::Fundamental).await {
            debug!(ticker, "펀더멘털 캐시 적중");
            return Ok(record);
        }

        let record = self.inner.fetch_fundamentals(ticker).await?;
        self.cache
            .insert(ticker, RequestKind::Fundamental, record.clone())
            .await;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::PriceBar;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceProvider for CountingProvider {
        async fn fetch_series(&self, ticker: &str, _lookback: usize) -> Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let bar = PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: dec!(100),
                high: dec!(101),
                low: dec!(99),
                close: dec!(100),
                volume: dec!(1000),
            };
            Ok(PriceSeries::new(ticker, vec![bar]).unwrap())
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_inner_provider() {
        let provider = CachedPriceProvider::new(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            Duration::from_secs(60),
        );

        provider.fetch_series("005930", 60).await.unwrap();
        provider.fetch_series("005930", 60).await.unwrap();
        provider.fetch_series("000660", 60).await.unwrap();

        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let provider = CachedPriceProvider::new(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            Duration::from_millis(10),
        );

        provider.fetch_series("005930", 60).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        provider.fetch_series("005930", 60).await.unwrap();

        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_kinds_do_not_collide() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        cache.insert("005930", RequestKind::Price, 1).await;
        cache.insert("005930", RequestKind::Fundamental, 2).await;

        assert_eq!(cache.get("005930", RequestKind::Price).await, Some(1));
        assert_eq!(cache.get("005930", RequestKind::Fundamental).await, Some(2));
        assert_eq!(cache.get("000660", RequestKind::Price).await, None);
    }
}
