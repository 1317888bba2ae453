//! 步骤之间的校验
//!
//! 每个函数在校验失败时返回 [`WorkflowError::InvariantViolated`]（令牌校验除外）。

use chrono::{DateTime, Utc};

use crate::oss::{AuthSession, Metadata};
use crate::workflow::{Step, WorkflowError};

/// 令牌的过期时间必须严格晚于 `now`
pub fn ensure_token_fresh(session: &AuthSession, now: DateTime<Utc>) -> Result<(), WorkflowError> {
    if session.is_valid_at(now) {
        Ok(())
    } else {
        Err(WorkflowError::TokenExpired {
            expires: session.expires,
        })
    }
}

/// 列举结果中 `expected` 必须恰好出现一次
pub fn ensure_listed_once<'a, I>(step: Step, names: I, expected: &str) -> Result<(), WorkflowError>
where
    I: IntoIterator<Item = &'a str>,
{
    let hits = names.into_iter().filter(|name| *name == expected).count();
    match hits {
        1 => Ok(()),
        0 => Err(WorkflowError::invariant(
            step,
            format!("{} listed once", expected),
            "missing",
        )),
        n => Err(WorkflowError::invariant(
            step,
            format!("{} listed once", expected),
            format!("listed {} times", n),
        )),
    }
}

/// 回读的元数据中 `key` 的值必须等于写入的值
pub fn ensure_metadata(
    step: Step,
    metadata: &Metadata,
    key: &str,
    expected: &str,
) -> Result<(), WorkflowError> {
    match metadata.get(key) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(WorkflowError::invariant(
            step,
            format!("{} = {}", key, expected),
            format!("{} = {}", key, actual),
        )),
        None => Err(WorkflowError::invariant(
            step,
            format!("{} = {}", key, expected),
            format!("{} absent", key),
        )),
    }
}

/// 下载内容必须与上传内容逐字节一致
pub fn ensure_same_bytes(step: Step, expected: &[u8], actual: &[u8]) -> Result<(), WorkflowError> {
    if expected == actual {
        return Ok(());
    }

    let actual_desc = match expected.iter().zip(actual).position(|(a, b)| a != b) {
        Some(offset) => format!("{} bytes, first difference at offset {}", actual.len(), offset),
        None => format!("{} bytes", actual.len()),
    };
    Err(WorkflowError::invariant(
        step,
        format!("{} identical bytes", expected.len()),
        actual_desc,
    ))
}
