//! 매수 확률 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 삼성전자 분석 (data/005930.csv + data/005930.toml)
//! advisor analyze -t 005930
//!
//! # 다른 데이터 디렉토리, JSON 출력
//! advisor analyze -t SPY -d ./prices -f json
//!
//! # 여러 종목 일괄 스캔 (점수 높은 순 정렬)
//! advisor scan -t 005930,000660,TSLA
//! ```

use advisor_core::{init_logging, AdvisorConfig};
use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use commands::analyze::{run_analyze, AnalyzeConfig, OutputFormat};
use commands::scan::{run_scan, ScanConfig};

#[derive(Parser)]
#[command(name = "advisor")]
#[command(about = "AI 주식 과외 선생님 - 지표와 기업 가치 기반 매수 확률 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (TOML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 한 종목의 매수 확률 분석
    Analyze {
        /// 종목 코드/심볼 (예: 005930, SPY)
        #[arg(short, long)]
        ticker: String,

        /// 일봉 CSV / 펀더멘털 사이드카 디렉토리 (설정 파일보다 우선)
        #[arg(short, long)]
        data_dir: Option<String>,

        /// 조회할 최대 일봉 수
        #[arg(long, default_value = "365")]
        lookback: usize,

        /// 출력 형식 (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// 여러 종목을 일괄 분석하고 점수순으로 정렬
    Scan {
        /// 쉼표로 구분한 종목 목록 (예: 005930,000660,SPY)
        #[arg(short, long)]
        tickers: String,

        /// 일봉 CSV / 펀더멘털 사이드카 디렉토리 (설정 파일보다 우선)
        #[arg(short, long)]
        data_dir: Option<String>,

        /// 조회할 최대 일봉 수
        #[arg(long, default_value = "365")]
        lookback: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let app_config = AdvisorConfig::load_or_default(cli.config.as_deref())?;
    init_logging(&app_config.logging)?;

    match cli.command {
        Commands::Analyze {
            ticker,
            data_dir,
            lookback,
            format,
        } => {
            let format = OutputFormat::from_str(&format)
                .ok_or_else(|| format!("잘못된 출력 형식: {}. 지원: text, json", format))?;

            let config = AnalyzeConfig {
                ticker,
                data_dir: data_dir.unwrap_or_else(|| app_config.data.data_dir.clone()),
                lookback,
                format,
            };

            if let Err(e) = run_analyze(&app_config, config).await {
                error!("분석 실패: {e:#}");
                return Err(e.into());
            }
        }

        Commands::Scan {
            tickers,
            data_dir,
            lookback,
        } => {
            let tickers: Vec<String> = tickers
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();

            if tickers.is_empty() {
                return Err("스캔할 종목이 없습니다".into());
            }

            let config = ScanConfig {
                tickers,
                data_dir: data_dir.unwrap_or_else(|| app_config.data.data_dir.clone()),
                lookback,
            };

            if let Err(e) = run_scan(&app_config, config).await {
                error!("스캔 실패: {e:#}");
                return Err(e.into());
            }
        }
    }

    Ok(())
}
