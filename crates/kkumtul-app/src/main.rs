//! KKUMTUL 실행 바이너리.
//!
//! CLI 파싱, 어댑터 DI 와이어링, 라이프사이클(시작/Ctrl+C 종료)을 담당한다.
//! 자동화 실행은 유효한 동의가 있어야만 시작된다.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kkumtul_automation::{
    create_platform_injector, create_platform_window_controller, ActivityLog, CycleScheduler,
    NoOpInjector, NoOpWindowController,
};
use kkumtul_core::config::AppConfig;
use kkumtul_core::config_manager::ConfigManager;
use kkumtul_core::consent::{ConsentManager, ConsentPermissions, ConsentStatus};
use kkumtul_core::ports::activity_source::ActivitySource;
use kkumtul_core::ports::input_injector::InputInjector;
use kkumtul_core::ports::window_controller::WindowController;
use kkumtul_monitor::{ActivityWatcher, IdleProbe, SystemIdleProbe};

/// 활동 저널 파일 이름
const JOURNAL_FILE_NAME: &str = "activity.log";

/// 동의 기록 파일 이름
const CONSENT_FILE_NAME: &str = "consent.json";

/// 상태 로그 출력 주기
const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(30);

// ============================================================
// CLI 정의
// ============================================================

/// KKUMTUL — 데스크톱 활동 시뮬레이터
#[derive(Parser)]
#[command(name = "kkumtul", version, about = "데스크톱 활동 시뮬레이터")]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 자동화 사이클 실행
    Run(RunArgs),
    /// 자동화 실행 동의 관리
    Consent {
        #[command(subcommand)]
        action: ConsentAction,
    },
    /// 설정 조회/변경
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// 총 실행 시간(초) 재정의
    #[arg(long)]
    total_runtime_secs: Option<u64>,

    /// 활성 위상 길이(초) 재정의
    #[arg(long)]
    active_secs: Option<u64>,

    /// 복귀 유예(초) 재정의
    #[arg(long)]
    resume_grace_secs: Option<u64>,

    /// 난수 시드 고정 (재현 가능한 실행)
    #[arg(long)]
    seed: Option<u64>,

    /// 실제 입력을 주입하지 않는 건식 실행
    #[arg(long)]
    dry_run: bool,

    /// 활동 저널 파일 경로 재정의
    #[arg(long)]
    journal: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConsentAction {
    /// 자동화 실행 동의 부여
    Grant {
        /// 입력 주입 권한만 부여 (기본: 전체 권한)
        #[arg(long)]
        injection_only: bool,
    },
    /// 동의 철회
    Revoke,
    /// 동의 상태 출력
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 현재 설정 출력
    Show,
    /// 설정 값 변경 및 저장
    Set(SetArgs),
}

#[derive(clap::Args)]
struct SetArgs {
    /// 총 실행 시간(초)
    #[arg(long)]
    total_runtime_secs: Option<u64>,

    /// 활성 위상 길이(초)
    #[arg(long)]
    active_secs: Option<u64>,

    /// 복귀 유예(초)
    #[arg(long)]
    resume_grace_secs: Option<u64>,

    /// 활동 감시 폴링 주기(밀리초)
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

// ============================================================
// 진입점
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;

    match args.command {
        Command::Run(run_args) => run(config_manager, run_args).await,
        Command::Consent { action } => handle_consent(action),
        Command::Config { action } => handle_config(&config_manager, action),
    }
}

/// tracing 구독자 초기화.
///
/// `RUST_LOG` 환경 변수가 있으면 우선하고, 없으면 `--log-level` 값으로
/// 워크스페이스 크레이트 필터를 구성한다.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kkumtul={level},kkumtul_core={level},kkumtul_monitor={level},kkumtul_automation={level}",
            level = log_level
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_banner() {
    println!(
        r#"
  _  ___  ___   _ __  __ _____ _   _ _
 | |/ / |/ / | | |  \/  |_   _| | | | |
 | ' /| ' /| | | | |\/| | | | | | | | |
 | . \| . \| |_| | |  | | | | | |_| | |___
 |_|\_\_|\_\\___/|_|  |_| |_|  \___/|_____|

 데스크톱 활동 시뮬레이터 v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

// ============================================================
// run — 자동화 실행
// ============================================================

async fn run(config_manager: ConfigManager, args: RunArgs) -> Result<()> {
    print_banner();

    // CLI 재정의는 메모리 내에서만 적용 (설정 파일에는 저장하지 않음)
    let mut config = config_manager.get();
    apply_overrides(&mut config, &args);
    config.cycle.validate().context("설정 검증 실패")?;

    // 동의 게이트 — 건식 실행은 입력을 주입하지 않으므로 면제
    if !args.dry_run {
        let consent = ConsentManager::new(data_file(CONSENT_FILE_NAME)?);
        consent
            .require_automation_consent()
            .context("자동화 실행 동의 확인 실패")?;
    }

    // ── 어댑터 생성 (DI 와이어링) ──

    // 1. 활동 감시자: 시스템 유휴 프로브 + 폴링 감시
    let probe: Arc<dyn IdleProbe> = Arc::new(SystemIdleProbe::new());
    let activity: Arc<dyn ActivitySource> = Arc::new(ActivityWatcher::new(
        Arc::clone(&probe),
        config.monitor.poll_interval(),
    ));

    // 2. 입력 주입기 (건식 실행은 No-Op)
    let injector: Arc<dyn InputInjector> = if args.dry_run {
        Arc::new(NoOpInjector::new())
    } else {
        create_platform_injector()
    };

    // 3. 창 제어기 (건식 실행은 No-Op)
    let windows: Arc<dyn WindowController> = if args.dry_run {
        Arc::new(NoOpWindowController::new(Arc::clone(&injector)))
    } else {
        create_platform_window_controller(Arc::clone(&injector))
    };

    // 플랫폼 능력 상태 — 실제 구동되는 구현체를 시작 전에 드러낸다
    info!(
        capabilities = %capability_summary(probe.as_ref(), injector.as_ref(), windows.as_ref()),
        dry_run = args.dry_run,
        "플랫폼 능력 확인"
    );

    // 4. 활동 저널
    let journal = if config.journal.enabled {
        let path = resolve_journal_path(args.journal.clone(), config.journal.path.clone())?;
        info!("활동 저널: {}", path.display());
        Some(ActivityLog::new(path))
    } else {
        None
    };

    // 5. 사이클 스케줄러
    let mut scheduler = CycleScheduler::new(config.clone(), activity, injector, windows);
    if let Some(journal) = journal {
        scheduler = scheduler.with_journal(journal);
    }
    if let Some(seed) = args.seed {
        scheduler = scheduler.with_seed(seed);
    }

    let handle = scheduler.start().await.context("자동화 시작 실패")?;
    info!(
        total_secs = config.cycle.total_runtime_secs,
        dry_run = args.dry_run,
        "자동화 실행 중 — Ctrl+C로 중지"
    );

    // 만료 또는 Ctrl+C까지 대기, 주기적으로 상태 로그 출력
    let wait = handle.wait();
    tokio::pin!(wait);
    let mut status_interval = tokio::time::interval(STATUS_LOG_INTERVAL);
    status_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut wait => break,
            _ = tokio::signal::ctrl_c() => {
                info!("종료 신호 수신, 실행을 중지합니다");
                handle.stop().await;
            }
            _ = status_interval.tick() => {
                let snapshot = handle.snapshot();
                info!(
                    phase = %snapshot.phase,
                    cycles = snapshot.cycle_count,
                    elapsed_secs = snapshot.run_elapsed.as_secs(),
                    "실행 상태"
                );
            }
        }
    }

    let snapshot = handle.snapshot();
    info!(
        cycles = snapshot.cycle_count,
        elapsed_secs = snapshot.run_elapsed.as_secs(),
        "실행 종료"
    );
    Ok(())
}

/// CLI 재정의를 설정에 반영
fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(secs) = args.total_runtime_secs {
        config.cycle.total_runtime_secs = secs;
    }
    if let Some(secs) = args.active_secs {
        config.cycle.active_duration_secs = secs;
    }
    if let Some(secs) = args.resume_grace_secs {
        config.cycle.resume_grace_secs = secs;
    }
}

/// 활동 저널 경로 해석: CLI 재정의 > 설정 파일 > 기본 데이터 디렉토리
fn resolve_journal_path(
    override_path: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> Result<PathBuf> {
    match override_path.or(configured) {
        Some(path) => Ok(path),
        None => data_file(JOURNAL_FILE_NAME),
    }
}

/// 플랫폼 데이터 디렉토리 하위 파일 경로
fn data_file(name: &str) -> Result<PathBuf> {
    Ok(ConfigManager::data_file(name)?)
}

/// 플랫폼 능력 요약 — 프로브/주입기/창 제어기의 실제 구현체 이름
fn capability_summary(
    probe: &dyn IdleProbe,
    injector: &dyn InputInjector,
    windows: &dyn WindowController,
) -> String {
    format!(
        "probe={} injector={} windows={}",
        probe.name(),
        injector.platform(),
        windows.platform()
    )
}

// ============================================================
// consent — 동의 관리
// ============================================================

fn handle_consent(action: ConsentAction) -> Result<()> {
    let mut manager = ConsentManager::new(data_file(CONSENT_FILE_NAME)?);

    match action {
        ConsentAction::Grant { injection_only } => {
            let permissions = if injection_only {
                ConsentPermissions {
                    input_injection: true,
                    ..Default::default()
                }
            } else {
                ConsentPermissions::full()
            };
            manager.grant_consent(permissions)?;
            println!("자동화 실행 동의가 기록되었습니다.");
        }
        ConsentAction::Revoke => {
            manager.revoke_consent()?;
            println!("동의가 철회되었습니다.");
        }
        ConsentAction::Status => match manager.check_consent() {
            ConsentStatus::NotGranted => println!("동의 상태: 없음"),
            ConsentStatus::Expired => println!("동의 상태: 만료됨 (재동의 필요)"),
            ConsentStatus::UpdateRequired => println!("동의 상태: 정책 변경 (재동의 필요)"),
            ConsentStatus::Valid => {
                println!("동의 상태: 유효");
                if let Some(record) = manager.current_consent() {
                    println!("  동의 시각: {}", record.granted_at.to_rfc3339());
                    println!("  입력 주입: {}", record.permissions.input_injection);
                    println!("  창 제어:   {}", record.permissions.window_control);
                    println!("  활동 저널: {}", record.permissions.activity_journal);
                }
            }
        },
    }
    Ok(())
}

// ============================================================
// config — 설정 조회/변경
// ============================================================

fn handle_config(config_manager: &ConfigManager, action: Option<ConfigAction>) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = config_manager.get();
            println!("설정 파일: {}", config_manager.config_path().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set(set) => {
            let mut config = config_manager.get();
            apply_set(&mut config, &set);
            config.cycle.validate().context("설정 검증 실패")?;
            config_manager.update(config)?;
            println!(
                "설정이 저장되었습니다: {}",
                config_manager.config_path().display()
            );
        }
    }
    Ok(())
}

/// `config set` 값을 설정에 반영
fn apply_set(config: &mut AppConfig, set: &SetArgs) {
    if let Some(secs) = set.total_runtime_secs {
        config.cycle.total_runtime_secs = secs;
    }
    if let Some(secs) = set.active_secs {
        config.cycle.active_duration_secs = secs;
    }
    if let Some(secs) = set.resume_grace_secs {
        config.cycle.resume_grace_secs = secs;
    }
    if let Some(ms) = set.poll_interval_ms {
        config.monitor.poll_interval_ms = ms;
    }
}

// ============================================================
// 테스트
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn overrides_apply_to_cycle_config() {
        let mut config = AppConfig::default_config();
        let args = RunArgs {
            total_runtime_secs: Some(7200),
            active_secs: Some(60),
            resume_grace_secs: None,
            seed: None,
            dry_run: true,
            journal: None,
        };

        apply_overrides(&mut config, &args);
        assert_eq!(config.cycle.total_runtime_secs, 7200);
        assert_eq!(config.cycle.active_duration_secs, 60);
        // 재정의하지 않은 필드는 기본값 유지
        assert_eq!(config.cycle.resume_grace_secs, 120);
    }

    #[test]
    fn journal_path_prefers_cli_override() {
        let cli = Some(PathBuf::from("/tmp/cli.log"));
        let configured = Some(PathBuf::from("/tmp/config.log"));

        assert_eq!(
            resolve_journal_path(cli.clone(), configured.clone()).unwrap(),
            PathBuf::from("/tmp/cli.log")
        );
        assert_eq!(
            resolve_journal_path(None, configured).unwrap(),
            PathBuf::from("/tmp/config.log")
        );
    }

    #[test]
    fn config_set_persists_changed_fields() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::with_path(config_path.clone()).unwrap();

        let set = SetArgs {
            total_runtime_secs: Some(1800),
            active_secs: None,
            resume_grace_secs: None,
            poll_interval_ms: Some(250),
        };
        handle_config(&manager, Some(ConfigAction::Set(set))).unwrap();

        // 새 관리자로 다시 로드해 파일에 반영됐는지 확인
        let reloaded = ConfigManager::with_path(config_path).unwrap().get();
        assert_eq!(reloaded.cycle.total_runtime_secs, 1800);
        assert_eq!(reloaded.monitor.poll_interval_ms, 250);
        // 변경하지 않은 필드는 기본값 유지
        assert_eq!(reloaded.cycle.resume_grace_secs, 120);
    }

    #[test]
    fn capability_summary_names_adapters() {
        let injector: Arc<dyn InputInjector> = Arc::new(NoOpInjector::new());
        let windows = NoOpWindowController::new(Arc::clone(&injector));
        let probe = SystemIdleProbe::new();

        let summary = capability_summary(&probe, injector.as_ref(), &windows);
        assert!(summary.contains("probe="), "summary = {summary}");
        assert!(summary.contains("injector=noop"), "summary = {summary}");
        assert!(summary.contains("windows=noop"), "summary = {summary}");
    }
}
