//! 批量导入管线
//!
//! 按扩展名识别 CSV / JSON，解析为候选列表后一次性提交给
//! `/links/import`，服务端返回的 success/failed/total 汇总原样透传。
//! 解析失败在任何网络调用之前就中止；零候选同样本地中止。

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{ConsoleError, Result};
use crate::gateway::{ImportSummary, LinkGateway};

/// 支持的导入文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

/// 按文件扩展名识别格式
pub fn detect_format(path: &Path) -> Result<ImportFormat> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("csv") => Ok(ImportFormat::Csv),
        Some("json") => Ok(ImportFormat::Json),
        other => Err(ConsoleError::import_parse(format!(
            "unsupported import file format: {:?}; expected .csv or .json",
            other.unwrap_or("<none>")
        ))),
    }
}

/// CSV 行解析出的导入候选（按列位置，不按表头名）
///
/// `expire_time` 为空白或不可解析时序列化为 null，与服务端约定一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportCandidate {
    pub short_code: String,
    pub service_type: String,
    pub path: String,
    pub strategy: String,
    pub expire_time: Option<i64>,
    pub note: String,
}

const DEFAULT_STRATEGY: &str = "round_robin";

/// 解析 CSV 内容。表头行丢弃；空行跳过；不足 3 列的行跳过；
/// 第 4 列留空时策略取 round_robin；第 5 列按整数秒解析。
pub fn parse_csv(content: &str) -> Vec<ImportCandidate> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut candidates = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row_num = idx + 2; // 1-based，跳过表头
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(row = row_num, error = %err, "import: skipping unparsable CSV row");
                continue;
            }
        };
        if record.len() < 3 {
            warn!(row = row_num, fields = record.len(), "import: skipping short CSV row");
            continue;
        }

        let strategy = match record.get(3).map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_STRATEGY.to_string(),
        };
        let expire_time = record
            .get(4)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<i64>().ok());

        candidates.push(ImportCandidate {
            short_code: record.get(0).unwrap_or_default().to_string(),
            service_type: record.get(1).unwrap_or_default().to_string(),
            path: record.get(2).unwrap_or_default().to_string(),
            strategy,
            expire_time,
            note: record.get(5).unwrap_or_default().to_string(),
        });
    }
    candidates
}

#[derive(Debug, Deserialize)]
struct JsonImportFile {
    links: Vec<Value>,
}

/// 解析 JSON 内容：必须是含 `links` 数组的对象，元素原样透传
pub fn parse_json(content: &str) -> Result<Vec<Value>> {
    let file: JsonImportFile = serde_json::from_str(content).map_err(|e| {
        ConsoleError::import_parse(format!("expected an object with a 'links' array: {}", e))
    })?;
    Ok(file.links)
}

/// 读取并解析一个上传文件，返回待提交的候选列表
pub fn load_candidates(path: &Path) -> Result<Vec<Value>> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConsoleError::file_operation(format!("failed to read '{}': {}", path.display(), e))
    })?;
    match format {
        ImportFormat::Json => parse_json(&content),
        ImportFormat::Csv => parse_csv(&content)
            .into_iter()
            .map(|c| serde_json::to_value(c).map_err(ConsoleError::from))
            .collect(),
    }
}

/// 提交候选列表。零候选在本地中止，不发起网络调用；
/// 服务端汇总原样返回。
pub async fn submit_import(
    gateway: &dyn LinkGateway,
    candidates: &[Value],
) -> Result<ImportSummary> {
    if candidates.is_empty() {
        return Err(ConsoleError::validation("nothing to import"));
    }
    let summary = gateway.import_links(candidates).await?;
    info!(
        success = summary.success_count,
        failed = summary.failed_count,
        total = summary.total,
        "import finished"
    );
    Ok(summary)
}
