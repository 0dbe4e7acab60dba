use crate::error::{LunaError, LunaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A secret needed by a collaborator (model API key, search API key).
///
/// Deployments differ only in where secrets live, so the source is plain
/// configuration:
///
/// ```toml
/// api_key = "sk-inline"                 # inline
/// api_key = { env = "GEMINI_API_KEY" }  # environment variable
/// api_key = { file = "/run/secrets/k" } # file contents, trimmed
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credential {
    /// The secret itself.
    Inline(String),
    /// Name of an environment variable holding the secret.
    Env {
        /// Variable name.
        env: String,
    },
    /// Path of a file whose trimmed contents are the secret.
    File {
        /// File path.
        file: PathBuf,
    },
}

impl Credential {
    /// Resolve the secret. Empty secrets are configuration errors.
    pub fn resolve(&self) -> LunaResult<String> {
        let value = match self {
            Credential::Inline(value) => value.clone(),
            Credential::Env { env } => std::env::var(env).map_err(|_| {
                LunaError::Config(format!("environment variable {env} is not set"))
            })?,
            Credential::File { file } => std::fs::read_to_string(file)
                .map_err(|e| {
                    LunaError::Config(format!(
                        "failed to read credential file '{}': {e}",
                        file.display()
                    ))
                })?
                .trim()
                .to_string(),
        };

        if value.is_empty() {
            return Err(LunaError::Config(format!("{self:?} resolved to an empty value")));
        }
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Inline(_) => f.write_str("Credential::Inline(<redacted>)"),
            Credential::Env { env } => write!(f, "Credential::Env({env})"),
            Credential::File { file } => write!(f, "Credential::File({})", file.display()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_resolves_to_itself() {
        let cred = Credential::Inline("abc".into());
        assert_eq!(cred.resolve().unwrap(), "abc");
    }

    #[test]
    fn test_file_is_trimmed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("key");
        std::fs::write(&path, "  secret-value\n").unwrap();
        let cred = Credential::File { file: path };
        assert_eq!(cred.resolve().unwrap(), "secret-value");
    }

    #[test]
    fn test_missing_env_is_config_error() {
        let cred = Credential::Env {
            env: "LUNA_TEST_CREDENTIAL_THAT_IS_NEVER_SET".into(),
        };
        assert!(matches!(cred.resolve(), Err(LunaError::Config(_))));
    }

    #[test]
    fn test_empty_inline_rejected() {
        assert!(Credential::Inline(String::new()).resolve().is_err());
    }

    #[test]
    fn test_debug_redacts_inline_secret() {
        let rendered = format!("{:?}", Credential::Inline("sk-live-123".into()));
        assert!(!rendered.contains("sk-live-123"));
    }

    #[test]
    fn test_untagged_deserialization() {
        let inline: Credential = serde_json::from_str(r#""k""#).unwrap();
        assert_eq!(inline, Credential::Inline("k".into()));

        let env: Credential = serde_json::from_str(r#"{"env":"GEMINI_API_KEY"}"#).unwrap();
        assert_eq!(
            env,
            Credential::Env {
                env: "GEMINI_API_KEY".into()
            }
        );

        let file: Credential = serde_json::from_str(r#"{"file":"/tmp/k"}"#).unwrap();
        assert_eq!(
            file,
            Credential::File {
                file: PathBuf::from("/tmp/k")
            }
        );
    }
}
