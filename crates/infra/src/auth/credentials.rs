//! Environment-backed credential store
//!
//! Variables follow `<REGION>_<ENV>_<CLASS>_CLIENT_ID` and
//! `<REGION>_<ENV>_<CLASS>_CLIENT_SECRET`, e.g. `US_QA_GENERAL_CLIENT_ID`.
//! The store reads a declared schema of (target, class) pairs once; later
//! lookups never consult the environment again.

use std::collections::HashMap;

use ciam_core::auth::CredentialSource;
use ciam_domain::{CiamError, Credential, CredentialClass, Result, Target};
use tracing::debug;

use crate::config::EnvLookup;

type SchemaKey = (Target, CredentialClass);

/// Credentials loaded from the environment for a fixed schema.
#[derive(Debug, Default)]
pub struct EnvCredentialStore {
    loaded: HashMap<SchemaKey, Credential>,
    missing: HashMap<SchemaKey, Vec<String>>,
}

impl EnvCredentialStore {
    /// Read every pair in `schema`, remembering which are incomplete.
    pub fn load(schema: &[SchemaKey], lookup: EnvLookup<'_>) -> Self {
        let mut store = Self::default();
        for &(target, class) in schema {
            let keys = class.env_keys(&target);
            let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

            match (read(&keys.client_id), read(&keys.client_secret)) {
                (Some(id), Some(secret)) => {
                    store.loaded.insert((target, class), Credential::new(target, class, id, secret));
                }
                (id, secret) => {
                    let mut missing = Vec::new();
                    if id.is_none() {
                        missing.push(keys.client_id);
                    }
                    if secret.is_none() {
                        missing.push(keys.client_secret);
                    }
                    store.missing.insert((target, class), missing);
                }
            }
        }
        debug!(loaded = store.loaded.len(), incomplete = store.missing.len(), "credential schema read");
        store
    }

    /// Like [`load`](Self::load) but fails on the first incomplete pair.
    ///
    /// # Errors
    ///
    /// `CiamError::MissingCredential` naming the absent variables.
    pub fn require(schema: &[SchemaKey], lookup: EnvLookup<'_>) -> Result<Self> {
        let store = Self::load(schema, lookup);
        for key in schema {
            if let Some(missing) = store.missing.get(key) {
                return Err(missing_error(*key, missing.clone()));
            }
        }
        Ok(store)
    }
}

impl CredentialSource for EnvCredentialStore {
    fn resolve(&self, target: Target, class: CredentialClass) -> Result<Credential> {
        if let Some(credential) = self.loaded.get(&(target, class)) {
            return Ok(credential.clone());
        }
        let missing = self.missing.get(&(target, class)).cloned().unwrap_or_else(|| {
            let keys = class.env_keys(&target);
            vec![keys.client_id, keys.client_secret]
        });
        Err(missing_error((target, class), missing))
    }
}

fn missing_error((target, class): SchemaKey, missing: Vec<String>) -> CiamError {
    CiamError::MissingCredential { target: target.to_string(), class, missing }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ciam_domain::{Environment, Region};

    use super::*;

    fn us_qa() -> Target {
        Target::new(Region::Us, Environment::Qa)
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn resolves_complete_pairs() {
        let lookup = lookup_from(&[
            ("US_QA_GENERAL_CLIENT_ID", "gen-id"),
            ("US_QA_GENERAL_CLIENT_SECRET", "gen-secret"),
        ]);
        let store = EnvCredentialStore::require(&[(us_qa(), CredentialClass::General)], &lookup).unwrap();
        let credential = store.resolve(us_qa(), CredentialClass::General).unwrap();
        assert_eq!(credential.client_id(), "gen-id");
        assert_eq!(credential.client_secret(), "gen-secret");
    }

    #[test]
    fn require_fails_fast_on_blank_secret() {
        let lookup = lookup_from(&[
            ("US_QA_CLIENTOPS_CLIENT_ID", "ops-id"),
            ("US_QA_CLIENTOPS_CLIENT_SECRET", "   "),
        ]);
        let err = EnvCredentialStore::require(&[(us_qa(), CredentialClass::ClientOps)], &lookup).unwrap_err();
        match err {
            CiamError::MissingCredential { missing, class, .. } => {
                assert_eq!(class, CredentialClass::ClientOps);
                assert_eq!(missing, vec!["US_QA_CLIENTOPS_CLIENT_SECRET".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lenient_load_reports_missing_at_resolve() {
        let lookup = lookup_from(&[]);
        let store = EnvCredentialStore::load(&[(us_qa(), CredentialClass::General)], &lookup);
        let err = store.resolve(us_qa(), CredentialClass::General).unwrap_err();
        assert!(err.to_string().contains("US_QA_GENERAL_CLIENT_ID, US_QA_GENERAL_CLIENT_SECRET"));
    }

    #[test]
    fn pairs_outside_schema_are_missing() {
        let lookup = lookup_from(&[
            ("UK_PROD_GENERAL_CLIENT_ID", "id"),
            ("UK_PROD_GENERAL_CLIENT_SECRET", "secret"),
        ]);
        let store = EnvCredentialStore::load(&[], &lookup);
        let err = store
            .resolve(Target::new(Region::Uk, Environment::Prod), CredentialClass::General)
            .unwrap_err();
        assert!(matches!(err, CiamError::MissingCredential { .. }));
    }
}
