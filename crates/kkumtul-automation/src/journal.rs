//! 활동 저널.
//!
//! 위상 전이와 합성 액션 디스패치를 append-only 텍스트 파일에 기록한다.
//! 한 줄 = 한 이벤트. 실행 후 무슨 일이 있었는지 추적하는 용도이므로
//! 기록 실패는 경고만 남기고 실행을 막지 않는다.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use kkumtul_core::error::CoreError;
use kkumtul_core::models::cycle::Phase;
use tracing::warn;

/// 활동 저널 — append-only 라인 로그
#[derive(Debug, Clone)]
pub struct ActivityLog {
    /// 저널 파일 경로
    path: PathBuf,
}

impl ActivityLog {
    /// 새 활동 저널 생성 (파일은 첫 기록 시 생성)
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 저널 파일 경로
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// 이벤트 한 줄 추가
    ///
    /// 형식: `2026-08-29T12:34:56Z | ACTIVE | move_pointer | (512, 384)`
    pub fn append(&self, phase: Phase, event: &str, detail: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        writeln!(file, "{timestamp} | {phase} | {event} | {detail}")?;
        Ok(())
    }

    /// 기록 실패를 경고로 강등하는 편의 메서드
    pub fn record(&self, phase: Phase, event: &str, detail: &str) {
        if let Err(e) = self.append(phase, event, detail) {
            warn!("활동 저널 기록 실패: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_file_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.log");
        let log = ActivityLog::new(path.clone());

        log.append(Phase::Active, "move_pointer", "(512, 384)")
            .unwrap();
        log.append(Phase::Active, "phase_change", "ACTIVE -> IDLE")
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ACTIVE | move_pointer | (512, 384)"));
        assert!(lines[1].contains("phase_change | ACTIVE -> IDLE"));
    }

    #[test]
    fn append_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.log");
        let log = ActivityLog::new(path.clone());

        log.append(Phase::Active, "a", "1").unwrap();
        // 두 번째 핸들로도 이어서 기록
        let log2 = ActivityLog::new(path.clone());
        log2.append(Phase::Idle, "b", "2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("journal.log");
        let log = ActivityLog::new(path.clone());

        log.append(Phase::Stopped, "run_start", "").unwrap();
        assert!(path.exists());
    }
}
