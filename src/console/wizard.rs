//! 创建向导状态机
//!
//! 三步线性向导：服务类型 → 目标配置 → 可选项。`next()` 验证当前步骤，
//! 通过才前进；`prev()` 总是成功（下限第 1 步）；提交仅在第 3 步可用。
//! 提交失败时草稿保留，供操作员修改后重试。

use std::collections::HashMap;

use crate::errors::{ConsoleError, Result};
use crate::gateway::{CreateLinkRequest, SecurityConfig};
use crate::models::{ServiceType, Strategy, Target};
use crate::utils::url_validator::validate_absolute_url;
use crate::utils::{generate_random_code, TimeParser, GENERATED_CODE_LENGTH};

/// 向导总步数
pub const TOTAL_STEPS: u8 = 3;

/// 跨步骤累积的表单草稿，提交或取消时丢弃，从不持久化
#[derive(Debug, Clone, Default)]
pub struct WizardDraft {
    /// 短码输入，留空则由服务端生成
    pub short_code: String,
    pub service_type: Option<ServiceType>,
    /// 简单模式的目标输入（URL 或路径，按服务类型解释）
    pub target_input: String,
    /// 高级模式的原始 JSON 目标列表
    pub targets_json: String,
    /// true = 使用 targets_json 的多目标高级模式
    pub advanced_mode: bool,
    pub strategy: Strategy,
    pub expire_input: String,
    pub description: String,
    pub enable_cache: bool,
}

/// 三步创建向导
#[derive(Debug, Default)]
pub struct CreationWizard {
    step: u8,
    draft: WizardDraft,
    /// 字段名 -> 错误消息，供视图层渲染
    validation_errors: HashMap<String, String>,
}

impl CreationWizard {
    pub fn new() -> Self {
        Self {
            step: 1,
            ..Self::default()
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut WizardDraft {
        &mut self.draft
    }

    /// 提交是否可用（仅终态步骤）
    pub fn at_final_step(&self) -> bool {
        self.step == TOTAL_STEPS
    }

    pub fn validation_error(&self, field: &str) -> Option<&String> {
        self.validation_errors.get(field)
    }

    /// 填入随机 12 位短码
    pub fn generate_code(&mut self) -> &str {
        self.draft.short_code = generate_random_code(GENERATED_CODE_LENGTH);
        &self.draft.short_code
    }

    /// 验证当前步骤并前进；失败时停留原步骤并返回错误
    pub fn next(&mut self) -> Result<u8> {
        match self.validate_current_step() {
            Ok(()) => {
                self.validation_errors.clear();
                if self.step < TOTAL_STEPS {
                    self.step += 1;
                }
                Ok(self.step)
            }
            Err(err) => {
                self.validation_errors
                    .insert(error_field(&err).to_string(), err.message().to_string());
                Err(err)
            }
        }
    }

    /// 后退一步，下限第 1 步，永不失败
    pub fn prev(&mut self) -> u8 {
        if self.step > 1 {
            self.step -= 1;
        }
        self.step
    }

    /// 回到第 1 步并清空草稿
    pub fn reset(&mut self) {
        self.step = 1;
        self.draft = WizardDraft::default();
        self.validation_errors.clear();
    }

    fn validate_current_step(&mut self) -> Result<()> {
        match self.step {
            1 => self.validate_service_type().map(|_| ()),
            2 => self.validate_target(),
            _ => self.validate_options(),
        }
    }

    fn validate_service_type(&self) -> Result<ServiceType> {
        self.draft
            .service_type
            .ok_or_else(|| ConsoleError::missing_field("service_type"))
    }

    /// 第二步：general 要求完整 URL；其余类型要求非空路径，
    /// 缺少前导 `/` 时自动补全（幂等）
    fn validate_target(&mut self) -> Result<()> {
        let service_type = self.validate_service_type()?;

        if self.draft.advanced_mode {
            let targets = parse_targets_json(&self.draft.targets_json)?;
            crate::models::validate_targets(service_type, &targets)?;
            return Ok(());
        }

        if service_type.uses_cdn_path() {
            let trimmed = self.draft.target_input.trim();
            if trimmed.is_empty() {
                return Err(ConsoleError::validation("target path cannot be empty"));
            }
            self.draft.target_input = normalize_path(trimmed);
            Ok(())
        } else {
            validate_absolute_url(&self.draft.target_input)
                .map_err(|e| ConsoleError::invalid_url(e.to_string()))
        }
    }

    /// 第三步：过期时间若填写必须可解析；描述可选
    fn validate_options(&self) -> Result<()> {
        if !self.draft.expire_input.trim().is_empty() {
            TimeParser::parse_expire_time(&self.draft.expire_input)
                .map_err(ConsoleError::date_parse)?;
        }
        Ok(())
    }

    /// 构造最终的创建请求。简单模式固定单目标、权重 1；
    /// 高级模式使用 JSON 中的目标列表。只在第 3 步调用。
    pub fn build_request(&self) -> Result<CreateLinkRequest> {
        if !self.at_final_step() {
            return Err(ConsoleError::invalid_state(format!(
                "wizard is at step {} of {}; submit is only available at the final step",
                self.step, TOTAL_STEPS
            )));
        }

        let service_type = self.validate_service_type()?;

        let targets = if self.draft.advanced_mode {
            let targets = parse_targets_json(&self.draft.targets_json)?;
            crate::models::validate_targets(service_type, &targets)?;
            targets
        } else if service_type.uses_cdn_path() {
            vec![Target::path(normalize_path(self.draft.target_input.trim()), 1)]
        } else {
            validate_absolute_url(&self.draft.target_input)
                .map_err(|e| ConsoleError::invalid_url(e.to_string()))?;
            vec![Target::url(self.draft.target_input.trim(), 1)]
        };

        let expires_at = if self.draft.expire_input.trim().is_empty() {
            None
        } else {
            Some(
                TimeParser::parse_expire_time(&self.draft.expire_input)
                    .map_err(ConsoleError::date_parse)?,
            )
        };

        let description = {
            let trimmed = self.draft.description.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        let short_code = {
            let trimmed = self.draft.short_code.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        Ok(CreateLinkRequest {
            short_code,
            service_type,
            targets,
            strategy: self.draft.strategy,
            security_config: SecurityConfig {
                enable_cache: self.draft.enable_cache,
            },
            description,
            expires_at,
        })
    }
}

/// 补全前导斜杠；已有斜杠时原样返回（幂等）
fn normalize_path(input: &str) -> String {
    if input.starts_with('/') {
        input.to_string()
    } else {
        format!("/{}", input)
    }
}

/// 高级模式：原始 JSON 必须反序列化为非空目标列表
fn parse_targets_json(raw: &str) -> Result<Vec<Target>> {
    let targets: Vec<Target> = serde_json::from_str(raw)
        .map_err(|e| ConsoleError::validation(format!("targets must be a JSON array: {}", e)))?;
    if targets.is_empty() {
        return Err(ConsoleError::validation("targets must not be empty"));
    }
    Ok(targets)
}

/// 错误挂到哪个表单字段上
fn error_field(err: &ConsoleError) -> &'static str {
    match err {
        ConsoleError::MissingField(_) => "service_type",
        ConsoleError::InvalidUrl(_) => "target_url",
        ConsoleError::DateParse(_) => "expire_time",
        _ => "target_path",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_at_step2(service_type: ServiceType) -> CreationWizard {
        let mut wizard = CreationWizard::new();
        wizard.draft_mut().service_type = Some(service_type);
        wizard.next().unwrap();
        assert_eq!(wizard.step(), 2);
        wizard
    }

    #[test]
    fn test_step1_requires_service_type() {
        let mut wizard = CreationWizard::new();
        let err = wizard.next().unwrap_err();
        assert!(matches!(err, ConsoleError::MissingField(_)));
        assert_eq!(err.message(), "service_type");
        assert_eq!(wizard.step(), 1);
        assert!(wizard.validation_error("service_type").is_some());
    }

    #[test]
    fn test_step2_general_requires_absolute_url() {
        let mut wizard = wizard_at_step2(ServiceType::General);
        wizard.draft_mut().target_input = "not a url".into();
        let err = wizard.next().unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidUrl(_)));
        assert_eq!(wizard.step(), 2);

        wizard.draft_mut().target_input = "https://example.com/page".into();
        assert_eq!(wizard.next().unwrap(), 3);
    }

    #[test]
    fn test_step2_blank_path_never_advances() {
        let mut wizard = wizard_at_step2(ServiceType::Imagebed);
        wizard.draft_mut().target_input = "   ".into();
        assert!(wizard.next().is_err());
        assert_eq!(wizard.step(), 2);
    }

    #[test]
    fn test_step2_auto_prefixes_path() {
        let mut wizard = wizard_at_step2(ServiceType::Imagebed);
        wizard.draft_mut().target_input = "foo/bar".into();
        wizard.next().unwrap();
        assert_eq!(wizard.draft().target_input, "/foo/bar");
    }

    #[test]
    fn test_path_prefix_is_idempotent() {
        assert_eq!(normalize_path("/foo/bar"), "/foo/bar");
        assert_eq!(normalize_path(normalize_path("foo/bar").as_str()), "/foo/bar");
    }

    #[test]
    fn test_prev_floors_at_step_one() {
        let mut wizard = CreationWizard::new();
        assert_eq!(wizard.prev(), 1);
        wizard.draft_mut().service_type = Some(ServiceType::General);
        wizard.next().unwrap();
        assert_eq!(wizard.prev(), 1);
        assert_eq!(wizard.prev(), 1);
    }

    #[test]
    fn test_submit_only_at_final_step() {
        let mut wizard = wizard_at_step2(ServiceType::General);
        assert!(matches!(
            wizard.build_request(),
            Err(ConsoleError::InvalidState(_))
        ));
        wizard.draft_mut().target_input = "https://example.com".into();
        wizard.next().unwrap();
        assert!(wizard.build_request().is_ok());
    }

    #[test]
    fn test_build_request_single_target_weight_one() {
        let mut wizard = wizard_at_step2(ServiceType::General);
        wizard.draft_mut().target_input = "https://example.com/a".into();
        wizard.next().unwrap();
        let req = wizard.build_request().unwrap();
        assert_eq!(req.targets.len(), 1);
        assert_eq!(req.targets[0].weight(), 1);
        assert_eq!(req.targets[0].location(), "https://example.com/a");
        assert!(req.short_code.is_none());
        assert!(req.expires_at.is_none());
    }

    #[test]
    fn test_build_request_cdn_path() {
        let mut wizard = wizard_at_step2(ServiceType::File);
        wizard.draft_mut().target_input = "downloads/report.pdf".into();
        wizard.next().unwrap();
        let req = wizard.build_request().unwrap();
        assert_eq!(req.targets[0].location(), "/downloads/report.pdf");
    }

    #[test]
    fn test_step3_rejects_bad_expire_input() {
        let mut wizard = wizard_at_step2(ServiceType::General);
        wizard.draft_mut().target_input = "https://example.com".into();
        wizard.next().unwrap();
        wizard.draft_mut().expire_input = "not-a-time".into();
        assert!(matches!(
            wizard.next().unwrap_err(),
            ConsoleError::DateParse(_)
        ));
        wizard.draft_mut().expire_input = "7d".into();
        wizard.next().unwrap();
        let req = wizard.build_request().unwrap();
        assert!(req.expires_at.is_some());
    }

    #[test]
    fn test_advanced_mode_requires_non_empty_list() {
        let mut wizard = wizard_at_step2(ServiceType::Imagebed);
        wizard.draft_mut().advanced_mode = true;
        wizard.draft_mut().targets_json = "[]".into();
        assert!(wizard.next().is_err());

        wizard.draft_mut().targets_json = "{not json".into();
        assert!(wizard.next().is_err());

        wizard.draft_mut().targets_json =
            r#"[{"path":"/img/a.jpg","weight":2},{"path":"/img/b.jpg","weight":1}]"#.into();
        wizard.next().unwrap();
        wizard.next().unwrap();
        let req = wizard.build_request().unwrap();
        assert_eq!(req.targets.len(), 2);
        assert_eq!(req.targets[0].weight(), 2);
    }

    #[test]
    fn test_reset_clears_draft_and_step() {
        let mut wizard = wizard_at_step2(ServiceType::Video);
        wizard.draft_mut().target_input = "/v/x.mp4".into();
        wizard.reset();
        assert_eq!(wizard.step(), 1);
        assert!(wizard.draft().service_type.is_none());
        assert!(wizard.draft().target_input.is_empty());
    }

    #[test]
    fn test_generate_code_fills_draft() {
        let mut wizard = CreationWizard::new();
        let code = wizard.generate_code().to_string();
        assert_eq!(code.len(), 12);
        assert_eq!(wizard.draft().short_code, code);
    }

    #[test]
    fn test_enable_cache_lands_in_security_config() {
        let mut wizard = wizard_at_step2(ServiceType::General);
        wizard.draft_mut().target_input = "https://example.com".into();
        wizard.draft_mut().enable_cache = true;
        wizard.next().unwrap();
        let req = wizard.build_request().unwrap();
        assert!(req.security_config.enable_cache);
    }
}
