//! Static-credential login.
//!
//! Credentials come from the config file; this is role gating for a
//! single-operator tool, not an authentication system.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::models::{Role, Session};

pub fn parse_role(role: &str) -> Result<Role> {
    match role {
        "student" => Ok(Role::Student),
        "admin" => Ok(Role::Admin),
        other => bail!("Unknown role: '{}'. Must be student or admin.", other),
    }
}

/// Validate credentials for a role and produce a session.
pub fn login(config: &Config, role: Role, user: &str, pass: &str) -> Result<Session> {
    if user.trim().is_empty() || pass.trim().is_empty() {
        bail!("user and password are required");
    }

    let expected = match role {
        Role::Student => &config.credentials.student,
        Role::Admin => &config.credentials.admin,
    };

    if user != expected.user || pass != expected.pass {
        bail!("invalid credentials for role '{}'", role.as_str());
    }

    Ok(Session {
        role,
        name: user.to_string(),
    })
}
