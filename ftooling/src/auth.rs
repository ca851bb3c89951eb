//! Authorization predicate and claim lookup for auth-sourced parameters.
//!
//! ```rust
//! use ftooling::is_authorized;
//!
//! let required = vec!["google".to_string()];
//! assert!(is_authorized(&[], &[]));
//! assert!(is_authorized(&required, &["google".to_string()]));
//! assert!(!is_authorized(&required, &["github".to_string()]));
//! ```

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{ParamAuthService, ToolError};

/// Verified claims keyed by authorization service name.
pub type ClaimsMap = HashMap<String, Map<String, Value>>;

/// True when nothing is required or at least one required service was verified.
pub fn is_authorized(required: &[String], verified: &[String]) -> bool {
    required.is_empty() || required.iter().any(|service| verified.contains(service))
}

/// Reads an auth-sourced parameter from the first listed service whose claims
/// are present.
pub(crate) fn value_from_claims(
    parameter: &str,
    auth_services: &[ParamAuthService],
    claims: &ClaimsMap,
) -> Result<Value, ToolError> {
    for service in auth_services {
        let Some(service_claims) = claims.get(&service.name) else {
            continue;
        };
        return service_claims.get(&service.field).cloned().ok_or_else(|| {
            ToolError::unauthorized(format!(
                "parameter '{parameter}': no field named '{}' in claims of '{}'",
                service.field, service.name
            ))
        });
    }
    Err(ToolError::unauthorized(format!(
        "parameter '{parameter}': missing or invalid authentication"
    )))
}
