//! 请求内容构建 - 业务能力层
//!
//! 着目关键词与排除条件原样写入每一次请求

use crate::models::JobParams;
use crate::services::llm_service::GenerationRequest;

const NOT_SPECIFIED: &str = "无特别指定";
const DEFAULT_FOCUS: &str = "整体技术趋势";

const BATCH_SYSTEM: &str = "Analyze the patent batch objectively.";
const REPORT_SYSTEM: &str = "Output raw HTML only. No markdown fences. Use <table> for lists.";

/// 分块分析请求
pub fn chunk_analysis(
    params: &JobParams,
    chunk_text: &str,
    batch_number: usize,
    total_batches: usize,
) -> GenerationRequest {
    let user = format!(
        r#"你是专利分析专家。
你正在负责一项大规模专利调查中的一部分（Batch {batch_number}/{total_batches}）。
请分析以下专利数据，撰写中间分析报告。

### 用户着目点
{focus}

### 排除条件
{exclude}

### 输出内容
1. **技术集群**: 本批次中的主要技术主题。
2. **重要专利**: 值得关注的专利（公开号、申请人、理由）。
3. **申请人**: 突出的申请人。

### 数据
{chunk_text}"#,
        focus = or_placeholder(&params.focus, NOT_SPECIFIED),
        exclude = or_placeholder(&params.exclude, NOT_SPECIFIED),
    );

    GenerationRequest::new(user).with_system(BATCH_SYSTEM)
}

/// 单次模式：直接基于全部摘要生成最终报告
pub fn single_pass_report(params: &JobParams, data: &str) -> GenerationRequest {
    let user = format!(
        r#"你是经验丰富的专利代理人。
请根据提供的专利列表撰写《专利调查报告》。

{conditions}

### 数据
{data}"#,
        conditions = report_instructions(params),
    );

    GenerationRequest::new(user).with_system(REPORT_SYSTEM)
}

/// map-reduce 模式：基于各批次中间报告进行汇总
pub fn synthesis_report(params: &JobParams, combined_summaries: &str) -> GenerationRequest {
    let user = format!(
        r#"你是专利分析专家。
以下是将大规模数据分批分析后得到的"中间报告"集合，并非原始数据。
请整合这些中间报告，撰写最终的《专利调查报告》。

{conditions}

### 中间报告集合
{combined_summaries}"#,
        conditions = report_instructions(params),
    );

    GenerationRequest::new(user).with_system(REPORT_SYSTEM)
}

fn report_instructions(params: &JobParams) -> String {
    format!(
        r#"### 用户指定条件
- **着目关键词**: {focus}
- **排除对象**: {exclude}

### 报告结构（HTML 格式）
必须直接输出纯 HTML 标签（不需要 Markdown 的 ```html ... ```）。

1. **整体总结**: 趋势分析，用 `<div class="summary-box">` 包裹重要摘要。
2. **重要专利**: 使用 `<table>`、`<thead>`、`<tbody>`、`<tr>`、`<th>`、`<td>` 整理。
3. **按技术类别详解**: 按主题进行说明。"#,
        focus = or_placeholder(&params.focus, DEFAULT_FOCUS),
        exclude = or_placeholder(&params.exclude, NOT_SPECIFIED),
    )
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_request_carries_params_verbatim() {
        let params = JobParams::new("固态电池 <电解质>", "2010年以前");
        let request = chunk_analysis(&params, "title: A | ", 2, 3);

        assert!(request.user.contains("Batch 2/3"));
        assert!(request.user.contains("固态电池 <电解质>"));
        assert!(request.user.contains("2010年以前"));
        assert!(request.user.ends_with("title: A | "));
        assert_eq!(request.system.as_deref(), Some(BATCH_SYSTEM));
    }

    #[test]
    fn blank_params_use_placeholders() {
        let request = single_pass_report(&JobParams::default(), "data");
        assert!(request.user.contains(DEFAULT_FOCUS));
        assert!(request.user.contains(NOT_SPECIFIED));
    }

    #[test]
    fn synthesis_says_it_works_from_intermediate_reports() {
        let params = JobParams::default();
        let single = single_pass_report(&params, "X");
        let synthesis = synthesis_report(&params, "X");
        assert!(synthesis.user.contains("中间报告"));
        assert!(!single.user.contains("中间报告"));
    }
}
