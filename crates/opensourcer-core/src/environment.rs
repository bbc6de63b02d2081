use crate::token;
use opensourcer_schema::{EnvironmentSet, SoftwareDefinition};
use std::collections::BTreeMap;

pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const SECRET_KEY: &str = "SECRET_KEY";
pub const BASIC_AUTH_PASSWORD: &str = "BASIC_AUTH_PASSWORD";
pub const DOMAIN: &str = "DOMAIN";

const DEFAULT_DOMAIN: &str = "localhost";
const INPUT_SECRET_LEN: usize = 12;

/// Secrets present in every environment, with their generated length.
const BASELINE_SECRETS: &[(&str, usize)] = &[
    (DB_PASSWORD, 16),
    (ADMIN_PASSWORD, 12),
    (SECRET_KEY, 48),
];

/// Well-known input keys and the variable names catalog compositions expect.
pub const KEY_TRANSLATIONS: &[(&str, &str)] = &[
    ("domain", DOMAIN),
    ("timezone", "TIMEZONE"),
    ("basic_auth_user", "BASIC_AUTH_USER"),
    ("basic_auth_password", BASIC_AUTH_PASSWORD),
    ("admin_user", "ADMIN_USER"),
    ("admin_password", ADMIN_PASSWORD),
    ("admin_email", "ADMIN_EMAIL"),
    ("site_title", "SITE_TITLE"),
];

/// Credentials worth echoing back to the user after a deploy, with labels.
const REPORTED_CREDENTIALS: &[(&str, &str)] = &[
    (DB_PASSWORD, "DB Password"),
    (ADMIN_PASSWORD, "Admin Password"),
    (BASIC_AUTH_PASSWORD, "Auth Password"),
];

/// Environment variable name for an input key.
pub fn env_var_name(key: &str) -> String {
    KEY_TRANSLATIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| key.replace('-', "_").to_uppercase(), |(_, v)| (*v).to_owned())
}

/// Build the full environment for deploying `definition` with `inputs`.
///
/// User values win over generated ones, every password-typed input ends up
/// with a value, and `DOMAIN` falls back to `localhost`.
pub fn synthesize(
    definition: &SoftwareDefinition,
    inputs: &BTreeMap<String, String>,
) -> EnvironmentSet {
    let mut env = EnvironmentSet::new();

    for (name, len) in BASELINE_SECRETS {
        env.insert(*name, token::generate(*len));
    }

    for (key, value) in inputs {
        if value.is_empty() {
            continue;
        }
        env.insert(env_var_name(key), value.clone());
    }

    for (key, _) in definition.secret_inputs() {
        let name = env_var_name(key);
        if !env.contains_key(&name) {
            env.insert(name, token::generate(INPUT_SECRET_LEN));
        }
    }

    if !env.contains_key(DOMAIN) {
        env.insert(DOMAIN, DEFAULT_DOMAIN);
    }

    env
}

/// Generated (not user-supplied) credentials from `env`, labelled for display.
pub fn credential_summary(
    env: &EnvironmentSet,
    inputs: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let supplied: Vec<String> = inputs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, _)| env_var_name(k))
        .collect();

    REPORTED_CREDENTIALS
        .iter()
        .filter(|(name, _)| !supplied.iter().any(|s| s == name))
        .filter_map(|(name, label)| env.get(name).map(|v| ((*label).to_owned(), v.to_owned())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensourcer_schema::parse_definition_str;

    fn definition() -> SoftwareDefinition {
        parse_definition_str(
            r#"{
                "name": "n8n",
                "inputs": {
                    "domain": {"label": "Domain", "type": "text"},
                    "basic_auth_user": {"label": "User", "type": "text"},
                    "basic_auth_password": {"label": "Password", "type": "password", "required": true},
                    "smtp-relay-password": {"label": "SMTP", "type": "password"},
                    "site_title": {"label": "Title", "type": "text"}
                }
            }"#,
        )
        .unwrap()
    }

    fn inputs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn translation_table_and_mechanical_fallback() {
        assert_eq!(env_var_name("domain"), "DOMAIN");
        assert_eq!(env_var_name("admin_password"), "ADMIN_PASSWORD");
        assert_eq!(env_var_name("smtp-relay-password"), "SMTP_RELAY_PASSWORD");
        assert_eq!(env_var_name("mattermost_site_url"), "MATTERMOST_SITE_URL");
    }

    #[test]
    fn baseline_secrets_always_present() {
        let env = synthesize(&definition(), &BTreeMap::new());
        assert_eq!(env.get(DB_PASSWORD).unwrap().len(), 16);
        assert_eq!(env.get(ADMIN_PASSWORD).unwrap().len(), 12);
        assert_eq!(env.get(SECRET_KEY).unwrap().len(), 48);
    }

    #[test]
    fn every_secret_input_gets_a_value() {
        let env = synthesize(&definition(), &BTreeMap::new());
        for name in ["BASIC_AUTH_PASSWORD", "SMTP_RELAY_PASSWORD"] {
            let value = env.get(name).unwrap_or_default();
            assert_eq!(value.len(), 12, "{name} must be generated");
        }
        assert!(!env.contains_key("BASIC_AUTH_USER"));
        assert!(!env.contains_key("SITE_TITLE"));
    }

    #[test]
    fn user_values_are_kept_verbatim() {
        let user = inputs(&[
            ("admin_password", "correct horse"),
            ("basic_auth_password", "s3cret=with=equals"),
            ("site_title", "My Site"),
            ("custom-flag", "on"),
        ]);
        let env = synthesize(&definition(), &user);
        assert_eq!(env.get(ADMIN_PASSWORD), Some("correct horse"));
        assert_eq!(env.get(BASIC_AUTH_PASSWORD), Some("s3cret=with=equals"));
        assert_eq!(env.get("SITE_TITLE"), Some("My Site"));
        assert_eq!(env.get("CUSTOM_FLAG"), Some("on"));
    }

    #[test]
    fn empty_user_values_are_ignored() {
        let env = synthesize(&definition(), &inputs(&[("basic_auth_password", "")]));
        assert_eq!(env.get(BASIC_AUTH_PASSWORD).unwrap().len(), 12);
    }

    #[test]
    fn domain_defaults_to_localhost() {
        let env = synthesize(&definition(), &BTreeMap::new());
        assert_eq!(env.get(DOMAIN), Some("localhost"));
        let env = synthesize(&definition(), &inputs(&[("domain", "blog.example.com")]));
        assert_eq!(env.get(DOMAIN), Some("blog.example.com"));
    }

    #[test]
    fn definition_without_inputs_yields_baseline_only() {
        let def = parse_definition_str(r#"{"name": "bare"}"#).unwrap();
        let env = synthesize(&def, &BTreeMap::new());
        let keys: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![ADMIN_PASSWORD, DB_PASSWORD, DOMAIN, SECRET_KEY]);
    }

    #[test]
    fn generated_secrets_differ_between_deploys() {
        let a = synthesize(&definition(), &BTreeMap::new());
        let b = synthesize(&definition(), &BTreeMap::new());
        assert_ne!(a.get(SECRET_KEY), b.get(SECRET_KEY));
    }

    #[test]
    fn summary_omits_user_supplied_credentials() {
        let user = inputs(&[("admin_password", "mine")]);
        let env = synthesize(&definition(), &user);
        let labels: Vec<_> = credential_summary(&env, &user)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["DB Password", "Auth Password"]);
    }
}
