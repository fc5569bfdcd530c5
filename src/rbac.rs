use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::model::{Caller, Role, SessionToken};

#[derive(Debug, thiserror::Error)]
pub enum RbacError {
    #[error("failed to read roles file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse roles spec: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("role `{role}` inherits from unknown role `{parent}`")]
    UnknownParent { role: String, parent: String },

    #[error("role inheritance cycle through `{0}`")]
    Cycle(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleSpec {
    #[serde(default)]
    pub inherits: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolesSpec {
    #[serde(default)]
    pub roles: HashMap<String, RoleSpec>,
}

impl RolesSpec {
    pub fn from_yaml(source: &str) -> Result<Self, RbacError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RbacError> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&source)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rbac {
    resolved: HashMap<String, BTreeSet<String>>,
}

impl Rbac {
    pub fn setup(spec: RolesSpec) -> Result<Self, RbacError> {
        for (role, rule) in &spec.roles {
            if let Some(parent) = rule.inherits.iter().find(|p| !spec.roles.contains_key(*p)) {
                return Err(RbacError::UnknownParent {
                    role: role.clone(),
                    parent: parent.clone(),
                });
            }
        }

        let mut resolved = HashMap::with_capacity(spec.roles.len());
        for role in spec.roles.keys() {
            let mut visiting = Vec::new();
            let perms = flatten(&spec, role, &mut visiting)?;
            resolved.insert(role.clone(), perms);
        }

        tracing::debug!(roles = resolved.len(), "access control rules loaded");
        Ok(Rbac { resolved })
    }

    pub fn resolve(&self, role: &Role) -> BTreeSet<String> {
        self.resolved.get(role.as_str()).cloned().unwrap_or_default()
    }

    pub fn is_permitted(&self, role: &Role, permission: &str) -> bool {
        self.resolved
            .get(role.as_str())
            .map_or(false, |perms| perms.contains(permission))
    }
}

fn flatten(
    spec: &RolesSpec,
    role: &str,
    visiting: &mut Vec<String>,
) -> Result<BTreeSet<String>, RbacError> {
    if visiting.iter().any(|seen| seen == role) {
        return Err(RbacError::Cycle(role.to_owned()));
    }
    let Some(rule) = spec.roles.get(role) else {
        return Ok(BTreeSet::new());
    };

    visiting.push(role.to_owned());
    let mut perms: BTreeSet<String> = rule.permissions.iter().cloned().collect();
    for parent in &rule.inherits {
        perms.extend(flatten(spec, parent, visiting)?);
    }
    visiting.pop();
    Ok(perms)
}

pub trait RoleFetcher: Send + Sync {
    fn role(&self, session: Option<&SessionToken>) -> Role;

    fn caller(&self, session: Option<SessionToken>) -> Caller {
        Caller {
            role: self.role(session.as_ref()),
            session,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPresence;

impl RoleFetcher for SessionPresence {
    fn role(&self, session: Option<&SessionToken>) -> Role {
        match session {
            Some(_) => Role::member(),
            None => Role::anonym(),
        }
    }
}
