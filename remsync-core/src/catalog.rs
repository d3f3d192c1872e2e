use crate::git::{
    GitProvider, Remote, RemoteBranch, validate_branch_name, validate_remote_name,
};
use anyhow::{Context, Result, bail};
use std::{collections::BTreeMap, time::Duration};

/// Configured remotes of the repository
pub struct RemoteCatalog<'a> {
    git: &'a dyn GitProvider,
}

impl<'a> RemoteCatalog<'a> {
    pub fn new(git: &'a dyn GitProvider) -> Self {
        Self { git }
    }

    /// Every remote with its fetch URL, in `git remote` order
    pub fn list(&self) -> Result<Vec<Remote>> {
        self.git
            .list_remotes()?
            .into_iter()
            .map(|name| {
                let url = self.git.remote_url(&name)?;
                Ok(Remote { name, url })
            })
            .collect()
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.git.list_remotes()?.iter().any(|r| r == name))
    }

    /// Add `name -> url` and return the remote as git now reports it
    pub fn add(&self, name: &str, url: &str) -> Result<Remote> {
        let name = name.trim();
        let url = url.trim();
        validate_remote_name(name)?;
        if url.is_empty() {
            bail!("remote URL cannot be empty");
        }
        if self.exists(name)? {
            bail!("remote '{name}' already exists");
        }
        self.git.add_remote(name, url)?;
        let url = self
            .git
            .remote_url(name)
            .context("remote was added but its URL could not be read back")?;
        log::info!("added remote {name} -> {url}");
        Ok(Remote {
            name: name.to_string(),
            url,
        })
    }
}

/// Branches advertised by a pair of remotes
pub struct BranchCatalog<'a> {
    git: &'a dyn GitProvider,
}

impl<'a> BranchCatalog<'a> {
    pub fn new(git: &'a dyn GitProvider) -> Self {
        Self { git }
    }

    pub fn list_on(&self, remote: &str) -> Result<Vec<String>> {
        self.git
            .list_heads(remote, None)
            .with_context(|| format!("failed to list branches on {remote}"))
    }

    /// Union of both remotes' branches, sorted by name. Names compare byte-wise.
    pub fn list_merged(&self, remote_a: &str, remote_b: &str) -> Result<Vec<RemoteBranch>> {
        let mut merged: BTreeMap<String, RemoteBranch> = BTreeMap::new();
        for name in self.list_on(remote_a)? {
            merged
                .entry(name.clone())
                .or_insert_with(|| RemoteBranch {
                    name,
                    on_a: false,
                    on_b: false,
                })
                .on_a = true;
        }
        for name in self.list_on(remote_b)? {
            merged
                .entry(name.clone())
                .or_insert_with(|| RemoteBranch {
                    name,
                    on_a: false,
                    on_b: false,
                })
                .on_b = true;
        }
        Ok(merged.into_values().collect())
    }

    pub fn exists(&self, remote: &str, branch: &str) -> Result<bool> {
        Ok(self
            .git
            .list_heads(remote, Some(branch))?
            .iter()
            .any(|name| name == branch))
    }

    /// Create `branch` on `target` by pushing `source_ref` to it
    pub fn create_on_remote(
        &self,
        target: &str,
        branch: &str,
        source_ref: &str,
        timeout: Duration,
    ) -> Result<()> {
        validate_branch_name(branch)?;
        log::info!("creating {branch} on {target} from {source_ref}");
        self.git.push(target, source_ref, branch, timeout)
    }
}
