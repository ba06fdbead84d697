use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed kubeconfig document, post key normalization.
///
/// Collections default to empty so a partial document stays usable; the
/// loader replaces the whole snapshot on every refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,

    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    #[serde(default)]
    pub contexts: Vec<NamedContext>,
    #[serde(default)]
    pub users: Vec<NamedUser>,

    // Optional in kubeconfig; carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: ClusterDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterDetails {
    pub server: String,
    #[serde(
        rename = "certificate-authority",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority: Option<String>,
    #[serde(
        rename = "certificate-authority-data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority_data: Option<String>,
    #[serde(
        rename = "insecure-skip-tls-verify",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub insecure_skip_tls_verify: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedContext {
    pub name: String,
    pub context: ContextRef,
}

/// The triple a context points at: cluster and user by name, plus an
/// optional namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRef {
    pub cluster: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedUser {
    pub name: String,
    pub user: UserCredentials,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ExecCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<ExecEnvVar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provide_cluster_info: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecEnvVar {
    pub name: String,
    pub value: String,
}

/// Result of resolving a context name against a document. Any of the
/// three may be unset; a dangling cluster or user reference is not an
/// error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvedContext<'a> {
    pub context: Option<&'a NamedContext>,
    pub cluster: Option<&'a NamedCluster>,
    pub user: Option<&'a NamedUser>,
}

impl KubeConfig {
    pub fn context_by_name(&self, name: &str) -> Option<&NamedContext> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn cluster_by_name(&self, name: &str) -> Option<&NamedCluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn user_by_name(&self, name: &str) -> Option<&NamedUser> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Resolve a selected context into its referenced cluster and user
    /// records. Pure; callable repeatedly as the selection changes.
    ///
    /// An unset or unknown context name leaves all three results unset.
    pub fn resolve(&self, context_name: Option<&str>) -> ResolvedContext<'_> {
        let Some(context) = context_name.and_then(|name| self.context_by_name(name)) else {
            return ResolvedContext::default();
        };
        ResolvedContext {
            cluster: self.cluster_by_name(&context.context.cluster),
            user: self.user_by_name(&context.context.user),
            context: Some(context),
        }
    }

    /// Server URL of the cluster behind the current context, if both
    /// sides of that chain exist.
    pub fn current_server(&self) -> Option<&str> {
        self.resolve(self.current_context.as_deref())
            .cluster
            .map(|cluster| cluster.cluster.server.as_str())
    }
}

impl NamedContext {
    /// Namespace shown for this context: the configured one when present
    /// and non-empty, otherwise the literal `"default"`.
    pub fn effective_namespace(&self) -> &str {
        match self.context.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => ns,
            _ => "default",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> KubeConfig {
        serde_json::from_value(json!({
            "currentContext": "dev",
            "clusters": [
                {"name": "c1", "cluster": {"server": "https://one.example:6443"}},
                {"name": "c2", "cluster": {
                    "server": "https://two.example:6443",
                    "certificate-authority-data": "Zm9v"
                }}
            ],
            "contexts": [
                {"name": "dev", "context": {"cluster": "c1", "user": "u1"}},
                {"name": "prod", "context": {
                    "cluster": "c2", "user": "u2", "namespace": "payments"
                }},
                {"name": "broken", "context": {"cluster": "ghost", "user": "nobody"}}
            ],
            "users": [
                {"name": "u1", "user": {"token": "t-1"}},
                {"name": "u2", "user": {
                    "clientCertificate": "cert.pem", "clientKey": "key.pem"
                }}
            ]
        }))
        .expect("sample config")
    }

    #[test]
    fn resolves_context_cluster_and_user() {
        let cfg = sample_config();
        let resolved = cfg.resolve(Some("prod"));

        assert_eq!(resolved.context.map(|c| c.name.as_str()), Some("prod"));
        assert_eq!(resolved.cluster.map(|c| c.name.as_str()), Some("c2"));
        assert_eq!(resolved.user.map(|u| u.name.as_str()), Some("u2"));
        assert_eq!(
            resolved.user.and_then(|u| u.user.client_certificate.as_deref()),
            Some("cert.pem")
        );
    }

    #[test]
    fn unknown_or_unset_context_resolves_to_nothing() {
        let cfg = sample_config();

        for selection in [None, Some("does-not-exist")] {
            let resolved = cfg.resolve(selection);
            assert!(resolved.context.is_none());
            assert!(resolved.cluster.is_none());
            assert!(resolved.user.is_none());
        }
    }

    #[test]
    fn dangling_references_resolve_leniently() {
        let cfg = sample_config();
        let resolved = cfg.resolve(Some("broken"));

        assert_eq!(resolved.context.map(|c| c.name.as_str()), Some("broken"));
        assert!(resolved.cluster.is_none());
        assert!(resolved.user.is_none());
    }

    #[test]
    fn effective_namespace_defaults_when_unset_or_empty() {
        let cfg = sample_config();

        let dev = cfg.context_by_name("dev").expect("dev context");
        assert_eq!(dev.effective_namespace(), "default");

        let prod = cfg.context_by_name("prod").expect("prod context");
        assert_eq!(prod.effective_namespace(), "payments");

        let empty: NamedContext = serde_json::from_value(json!({
            "name": "blank",
            "context": {"cluster": "c1", "user": "u1", "namespace": ""}
        }))
        .expect("context");
        assert_eq!(empty.effective_namespace(), "default");
    }

    #[test]
    fn current_server_follows_the_current_context_chain() {
        let cfg = sample_config();
        assert_eq!(cfg.current_server(), Some("https://one.example:6443"));

        let mut detached = cfg.clone();
        detached.current_context = Some("broken".to_string());
        assert_eq!(detached.current_server(), None);

        detached.current_context = None;
        assert_eq!(detached.current_server(), None);
    }

    #[test]
    fn serializes_with_normalized_key_names() {
        let cfg = sample_config();
        let value = serde_json::to_value(&cfg).expect("serialize");

        assert!(value.get("currentContext").is_some());
        assert!(value.get("current-context").is_none());

        let user = &value["users"][1]["user"];
        assert_eq!(user["clientCertificate"], "cert.pem");
        assert_eq!(user["clientKey"], "key.pem");
        assert!(user.get("client-certificate").is_none());
    }
}
