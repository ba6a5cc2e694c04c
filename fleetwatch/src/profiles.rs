//! Named connection profiles: name -> { url, tls_ca }.
//! Stored at $XDG_CONFIG_HOME/fleetwatch/profiles.json
//! (fallback ~/.config/fleetwatch/profiles.json).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("fleetwatch")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fleetwatch")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// Missing or unreadable files yield an empty set.
pub fn load_profiles() -> ProfilesFile {
    match fs::read_to_string(profiles_path()) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// URL given on the command line (tls_ca alongside). Not yet persisted.
    Direct(String, Option<String>),
    /// Loaded from an existing profile entry.
    Loaded(String, Option<String>),
    /// Profile name given without a URL and no such profile exists.
    Missing(String),
    /// Nothing given; fall back to env / origin resolution.
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.profile_name, self.url) {
            (_, Some(url)) => ResolveProfile::Direct(url, self.tls_ca),
            (Some(name), None) => match pf.profiles.get(&name) {
                // a CLI --tls-ca wins over the stored one
                Some(entry) => ResolveProfile::Loaded(
                    entry.url.clone(),
                    self.tls_ca.or_else(|| entry.tls_ca.clone()),
                ),
                None => ResolveProfile::Missing(name),
            },
            (None, None) => ResolveProfile::None,
        }
    }
}

/// What to do with `entry` under `name` given the stored set.
#[derive(Debug, PartialEq, Eq)]
pub enum SaveDecision {
    Create,
    Unchanged,
    Overwrite,
    KeepExisting,
}

pub fn save_decision(
    pf: &ProfilesFile,
    name: &str,
    entry: &ProfileEntry,
    force: bool,
) -> SaveDecision {
    match pf.profiles.get(name) {
        None => SaveDecision::Create,
        Some(existing) if existing == entry => SaveDecision::Unchanged,
        Some(_) if force => SaveDecision::Overwrite,
        Some(_) => SaveDecision::KeepExisting,
    }
}
