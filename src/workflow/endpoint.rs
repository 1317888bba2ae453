use crate::oss::ServiceEntry;
use crate::workflow::WorkflowError;

/// 对象存储服务在服务目录中的类型名
pub const OBJECT_STORE: &str = "object-store";

/// 从服务目录中选出指定类型服务的地址
///
/// 取第一个类型匹配的条目的第一个地址，并保证以 `/` 结尾。
/// 没有匹配条目、匹配条目没有地址或地址为空时返回 [`WorkflowError::EndpointNotFound`]，
/// 不会继续查看后面的同类型条目。
pub fn select_endpoint(
    catalog: &[ServiceEntry],
    service_type: &str,
) -> Result<String, WorkflowError> {
    let not_found = || WorkflowError::EndpointNotFound {
        service_type: service_type.to_string(),
    };

    let entry = catalog
        .iter()
        .find(|entry| entry.service_type == service_type)
        .ok_or_else(not_found)?;

    let url = entry
        .endpoints
        .first()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .ok_or_else(not_found)?;

    if url.ends_with('/') {
        Ok(url.to_string())
    } else {
        Ok(format!("{}/", url))
    }
}
