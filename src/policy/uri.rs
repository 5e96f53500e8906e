use crate::config::PolicyConfig;

/// Management API path of the API-scoped policy resource
pub fn policy_resource_uri(config: &PolicyConfig) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/{}/service/{}/apis/{}/policies/policy?api-version={}",
        config.subscription_id,
        config.resource_group,
        config.provider,
        config.service_name,
        config.api_id,
        config.api_version,
    )
}
