use crate::config::{PolicyConfig, RoutingRule};

use super::PolicyDocument;

/// Render the routing policy for `config`.
///
/// Pure and infallible: the same config always yields the same bytes. Values
/// are substituted without XML escaping (see [`PolicyConfig::validate`]).
pub fn render_policy(config: &PolicyConfig) -> PolicyDocument {
    let origins = config
        .frontend_origins
        .iter()
        .map(|origin| format!("                <origin>{origin}</origin>"))
        .collect::<Vec<_>>()
        .join("\n");

    let rules = config
        .routing_rules()
        .into_iter()
        .map(render_rule)
        .collect::<Vec<_>>()
        .join("\n");

    let max_age = config.preflight_max_age;

    PolicyDocument(format!(
        r#"<policies>
    <inbound>
        <base />
        <cors allow-credentials="true">
            <allowed-origins>
{origins}
            </allowed-origins>
            <allowed-methods preflight-result-max-age="{max_age}">
                <method>*</method>
            </allowed-methods>
            <allowed-headers>
                <header>*</header>
            </allowed-headers>
        </cors>
        <choose>
{rules}
        </choose>
    </inbound>
    <backend>
        <base />
    </backend>
    <outbound>
        <base />
    </outbound>
    <on-error>
        <base />
    </on-error>
</policies>"#
    ))
}

fn render_rule(rule: &RoutingRule) -> String {
    let RoutingRule {
        marker,
        base_url,
        rewrite_uri,
    } = rule;

    format!(
        r#"            <when condition="@(context.Request.Url.Path.Contains(&quot;{marker}&quot;))">
                <set-backend-service base-url="{base_url}" />
                <rewrite-uri template="{rewrite_uri}" />
            </when>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Policy currently deployed on the capstone dev gateway
    const DEPLOYED_POLICY: &str = r#"<policies>
    <inbound>
        <base />
        <cors allow-credentials="true">
            <allowed-origins>
                <origin>http://app-capstone-ui-dev-ari999.azurewebsites.net</origin>
                <origin>https://app-capstone-ui-dev-ari999.azurewebsites.net</origin>
            </allowed-origins>
            <allowed-methods preflight-result-max-age="300">
                <method>*</method>
            </allowed-methods>
            <allowed-headers>
                <header>*</header>
            </allowed-headers>
        </cors>
        <choose>
            <when condition="@(context.Request.Url.Path.Contains(&quot;/A:&quot;))">
                <set-backend-service base-url="http://132.196.250.187:8080" />
                <rewrite-uri template="/api/a" />
            </when>
            <when condition="@(context.Request.Url.Path.Contains(&quot;/B:&quot;))">
                <set-backend-service base-url="http://68.220.237.26:8080" />
                <rewrite-uri template="/api/b" />
            </when>
        </choose>
    </inbound>
    <backend>
        <base />
    </backend>
    <outbound>
        <base />
    </outbound>
    <on-error>
        <base />
    </on-error>
</policies>"#;

    #[test]
    fn default_config_matches_deployed_policy() {
        let document = render_policy(&PolicyConfig::default());
        assert_eq!(document.as_str(), DEPLOYED_POLICY);
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = PolicyConfig::default();
        assert_eq!(render_policy(&config), render_policy(&config));
    }

    #[test]
    fn exactly_two_routing_rules() {
        let document = render_policy(&PolicyConfig::default());
        let xml = document.as_str();

        assert_eq!(xml.matches("<when ").count(), 2);
        assert_eq!(xml.matches("Contains(&quot;/A:&quot;)").count(), 1);
        assert_eq!(xml.matches("Contains(&quot;/B:&quot;)").count(), 1);
    }

    #[test]
    fn each_rule_pairs_marker_with_its_backend() {
        let document = render_policy(&PolicyConfig::default());
        let xml = document.as_str();

        let a = xml.find("&quot;/A:&quot;").unwrap();
        let b = xml.find("&quot;/B:&quot;").unwrap();
        let backend_a = xml.find(r#"base-url="http://132.196.250.187:8080""#).unwrap();
        let backend_b = xml.find(r#"base-url="http://68.220.237.26:8080""#).unwrap();
        let rewrite_a = xml.find(r#"template="/api/a""#).unwrap();
        let rewrite_b = xml.find(r#"template="/api/b""#).unwrap();

        assert!(a < backend_a && backend_a < rewrite_a && rewrite_a < b);
        assert!(b < backend_b && backend_b < rewrite_b);
    }

    #[test]
    fn substitutes_custom_values() {
        let mut config = PolicyConfig::default();
        config.backend_b = RoutingRule::new("/C:", "https://10.1.2.3:9443", "/api/c");
        config.frontend_origins = vec!["https://ui.example.test".to_string()];
        config.preflight_max_age = 60;

        let document = render_policy(&config);
        let xml = document.as_str();

        assert!(xml.contains("Contains(&quot;/C:&quot;)"));
        assert!(xml.contains(r#"<set-backend-service base-url="https://10.1.2.3:9443" />"#));
        assert!(xml.contains(r#"<rewrite-uri template="/api/c" />"#));
        assert!(xml.contains(r#"preflight-result-max-age="60""#));
        assert_eq!(xml.matches("<origin>").count(), 1);
        assert!(!xml.contains("/B:"));
    }

    #[test]
    fn values_are_not_escaped() {
        let mut config = PolicyConfig::default();
        config.backend_a.base_url = "http://host/?a=1&b=2".to_string();

        let document = render_policy(&config);
        assert!(document.as_str().contains(r#"base-url="http://host/?a=1&b=2""#));
    }
}
