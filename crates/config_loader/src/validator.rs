//! 配置校验模块
//!
//! 校验规则：
//! - host / cluster 必填且非空
//! - logMessageURL 必须是 http(s) 地址
//! - 备份文件与恢复文件模板不能相同

use contracts::{ContractError, ReportingConfig};

/// 校验 ReportingConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &ReportingConfig) -> Result<(), ContractError> {
    config.identity()?;
    validate_message_url(config)?;
    validate_file_roles(config)?;
    Ok(())
}

/// 校验消息服务地址
fn validate_message_url(config: &ReportingConfig) -> Result<(), ContractError> {
    if let Some(url) = config.log_message_url() {
        let url = url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ContractError::config_validation(
                "msgServer.logMessageURL",
                format!("expected an http(s) URL, got '{url}'"),
            ));
        }
    }
    Ok(())
}

/// 校验文件角色：两个角色共用同一模板会让记录混在一起
fn validate_file_roles(config: &ReportingConfig) -> Result<(), ContractError> {
    if let (Some(backup), Some(recovery)) = (config.backup_template(), config.recovery_template())
    {
        if backup == recovery {
            return Err(ContractError::config_validation(
                "recoveryFiles.fileName",
                format!("recovery file template must differ from backup file template '{backup}'"),
            ));
        }
    }
    Ok(())
}
