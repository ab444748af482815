//! 동의 관리 시스템.
//!
//! 입력 주입과 창 제어는 사용자 세션을 직접 조작하므로 명시적 동의 없이는
//! 실행을 시작하지 않는다. 동의 기록, 검증, 철회를 처리한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;

/// 현재 동의 정책 버전 — 정책 변경 시 증가하여 재동의 요구
pub const CURRENT_POLICY_VERSION: &str = "1.0.0";

// ============================================================
// 동의 권한 모델
// ============================================================

/// 사용자가 부여한 권한 목록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentPermissions {
    /// 합성 마우스/키보드 입력 주입 허용
    #[serde(default)]
    pub input_injection: bool,
    /// 창 열거/포커스 전환 허용
    #[serde(default)]
    pub window_control: bool,
    /// 활동 저널 파일 기록 허용
    #[serde(default)]
    pub activity_journal: bool,
}

impl Default for ConsentPermissions {
    /// 기본값: 최소 권한 (모두 비활성)
    fn default() -> Self {
        Self {
            input_injection: false,
            window_control: false,
            activity_journal: false,
        }
    }
}

impl ConsentPermissions {
    /// 자동화 실행에 필요한 전체 권한
    pub fn full() -> Self {
        Self {
            input_injection: true,
            window_control: true,
            activity_journal: true,
        }
    }
}

// ============================================================
// 동의 기록
// ============================================================

/// 동의 기록 — JSON 파일로 로컬 저장
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// 동의 고유 ID
    pub consent_id: String,
    /// 동의 정책 버전
    pub version: String,
    /// 동의 시각
    pub granted_at: DateTime<Utc>,
    /// 동의 만료 시각 (None이면 무기한)
    pub expires_at: Option<DateTime<Utc>>,
    /// 부여된 권한 목록
    pub permissions: ConsentPermissions,
}

// ============================================================
// 동의 상태
// ============================================================

/// 동의 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentStatus {
    /// 동의하지 않음 (첫 실행)
    NotGranted,
    /// 유효한 동의
    Valid,
    /// 동의 만료
    Expired,
    /// 정책 버전 변경으로 재동의 필요
    UpdateRequired,
}

// ============================================================
// ConsentManager
// ============================================================

/// 동의 관리자 — 로컬 JSON 파일 기반 동의 기록 관리
pub struct ConsentManager {
    /// 동의 파일 저장 경로
    storage_path: PathBuf,
    /// 현재 동의 기록
    current_consent: Option<ConsentRecord>,
}

impl ConsentManager {
    /// 새 ConsentManager 생성 + 기존 파일 로드
    pub fn new(storage_path: PathBuf) -> Self {
        let current_consent = Self::load_from_file(&storage_path);
        Self {
            storage_path,
            current_consent,
        }
    }

    /// 동의 상태 확인
    pub fn check_consent(&self) -> ConsentStatus {
        match &self.current_consent {
            None => ConsentStatus::NotGranted,
            Some(record) => {
                // 만료 확인
                if let Some(expires) = record.expires_at {
                    if Utc::now() > expires {
                        return ConsentStatus::Expired;
                    }
                }
                // 정책 버전 확인
                if record.version != CURRENT_POLICY_VERSION {
                    return ConsentStatus::UpdateRequired;
                }
                ConsentStatus::Valid
            }
        }
    }

    /// 현재 동의 기록 반환
    pub fn current_consent(&self) -> Option<&ConsentRecord> {
        self.current_consent.as_ref()
    }

    /// 동의 부여
    pub fn grant_consent(&mut self, permissions: ConsentPermissions) -> Result<(), CoreError> {
        let record = ConsentRecord {
            consent_id: uuid::Uuid::new_v4().to_string(),
            version: CURRENT_POLICY_VERSION.to_string(),
            granted_at: Utc::now(),
            expires_at: None,
            permissions,
        };

        self.save_to_file(&record)?;
        self.current_consent = Some(record);
        Ok(())
    }

    /// 동의 철회 (파일 삭제)
    pub fn revoke_consent(&mut self) -> Result<(), CoreError> {
        if self.storage_path.exists() {
            std::fs::remove_file(&self.storage_path)?;
        }
        self.current_consent = None;
        Ok(())
    }

    /// 특정 권한 허용 여부 확인
    pub fn is_permitted(&self, check: impl Fn(&ConsentPermissions) -> bool) -> bool {
        self.current_consent
            .as_ref()
            .map(|r| check(&r.permissions))
            .unwrap_or(false)
    }

    /// 자동화 실행 가능 여부 검증.
    ///
    /// 유효한 동의와 입력 주입 권한이 모두 필요하다. 실패 시 치명 에러 —
    /// 실행은 시작되지 않는다.
    pub fn require_automation_consent(&self) -> Result<(), CoreError> {
        match self.check_consent() {
            ConsentStatus::Valid => {}
            ConsentStatus::Expired => return Err(CoreError::ConsentExpired),
            ConsentStatus::NotGranted => {
                return Err(CoreError::ConsentRequired(
                    "동의 기록이 없습니다. `kkumtul consent grant`를 먼저 실행하세요".to_string(),
                ))
            }
            ConsentStatus::UpdateRequired => {
                return Err(CoreError::ConsentRequired(
                    "동의 정책이 변경되었습니다. 재동의가 필요합니다".to_string(),
                ))
            }
        }
        if !self.is_permitted(|p| p.input_injection) {
            return Err(CoreError::ConsentRequired(
                "입력 주입 권한이 부여되지 않았습니다".to_string(),
            ));
        }
        Ok(())
    }

    // --- 내부 유틸 ---

    /// 파일에서 동의 기록 로드
    fn load_from_file(path: &PathBuf) -> Option<ConsentRecord> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// 동의 기록을 파일에 저장
    fn save_to_file(&self, record: &ConsentRecord) -> Result<(), CoreError> {
        // 부모 디렉토리 생성
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.storage_path, json)?;
        Ok(())
    }
}

// ============================================================
// 테스트
// ============================================================
