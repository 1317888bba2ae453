//! 人性化时长的解析与格式化
//!
//! 配置中的时长（如令牌有效期）统一写成 `"1h30m"`、`"500ms"` 这样的字符串。

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub use serde_with::{serde_as, DeserializeAs, SerializeAs};

/// `serde_with` 适配器，配合 `#[serde_as(as = "HumanDur")]` 使用
///
/// 支持的单位: `ns`、`us`、`ms`、`s`、`m`、`h`、`d`，可组合，如 `"1d2h"`
pub struct HumanDur;

impl SerializeAs<Duration> for HumanDur {
    fn serialize_as<S>(source: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*source))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumanDur {
    fn deserialize_as<D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// 解析时长字符串: "1h30m45s" -> Duration
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(anyhow!("空字符串"));
    }

    let mut total = Duration::ZERO;
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        let mut number = String::new();
        while let Some(&c) = chars.peek() {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            number.push(c);
            chars.next();
        }
        if number.is_empty() {
            return Err(anyhow!("期望数字: {}", s));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| anyhow!("无效数字: {}", number))?;

        let mut unit = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_alphabetic() {
                break;
            }
            unit.push(c);
            chars.next();
        }

        let part = match unit.as_str() {
            "ns" => from_nanos_f64(value)?,
            "us" | "μs" => from_nanos_f64(value * 1e3)?,
            "ms" => from_nanos_f64(value * 1e6)?,
            "s" => from_secs_f64(value)?,
            "m" => from_secs_f64(value * 60.0)?,
            "h" => from_secs_f64(value * 3600.0)?,
            "d" => from_secs_f64(value * 86400.0)?,
            "" => return Err(anyhow!("缺少时间单位: {}", s)),
            _ => return Err(anyhow!("不支持的时间单位: {}", unit)),
        };
        total = total
            .checked_add(part)
            .ok_or_else(|| anyhow!("时长超出范围: {}", s))?;
    }

    Ok(total)
}

fn from_nanos_f64(nanos: f64) -> Result<Duration> {
    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(anyhow!("时长超出范围: {}ns", nanos));
    }
    Ok(Duration::from_nanos(nanos as u64))
}

fn from_secs_f64(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|e| anyhow!("时长超出范围: {}s, {}", secs, e))
}

/// 格式化时长: Duration -> "1h30m45s"
///
/// 秒以下的部分会把剩余秒数一并折算成毫秒，保证能被 [`parse_duration`] 解析回来
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let nanos = duration.subsec_nanos();

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            n if n % 1_000_000 == 0 => format!("{}ms", n / 1_000_000),
            n if n % 1_000 == 0 => format!("{}us", n / 1_000),
            n => format!("{}ns", n),
        };
    }

    let mut out = String::new();
    let mut rest = secs;
    for (unit, size) in [("d", 86400), ("h", 3600), ("m", 60)] {
        if rest >= size {
            out.push_str(&format!("{}{}", rest / size, unit));
            rest %= size;
        }
    }

    if nanos > 0 {
        out.push_str(&format!("{}ms", rest * 1000 + u64::from(nanos) / 1_000_000));
    } else if rest > 0 {
        out.push_str(&format!("{}s", rest));
    }

    out
}
