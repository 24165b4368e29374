//! Utilities for configuration and build.
#![warn(missing_docs)]

use crate::error::Error;

/// build_version of program
pub fn build_version() -> String {
    let mut infos = vec![];
    if let Some(version) = option_env!("CARGO_PKG_VERSION") {
        infos.push(version);
    };
    if let Some(git_hash) = option_env!("GIT_SHORT_HASH") {
        infos.push(git_hash);
    }
    infos.join("-")
}

/// Expand path with "~" to absolute path.
pub fn expand_home<P>(path: P) -> Result<std::path::PathBuf, Error>
where P: AsRef<std::path::Path> {
    let Ok(stripped) = path.as_ref().strip_prefix("~") else {
        return Ok(path.as_ref().to_path_buf());
    };

    let Some(mut p) = home::home_dir() else {
        return Err(Error::HomeDirError);
    };

    p.push(stripped);

    Ok(p)
}

/// Create parent directory of a path if not exists.
pub fn ensure_parent_dir<P>(path: P) -> Result<(), Error>
where P: AsRef<std::path::Path> {
    let path = expand_home(path)?;
    let parent = path.parent().ok_or(Error::ParentDirError)?;
    if !parent.is_dir() {
        std::fs::create_dir_all(parent).map_err(|e| Error::CreateFileError(e.to_string()))?;
    };
    Ok(())
}

pub mod loader {
    //! A module to help user load resources from local file or remote url.

    use async_trait::async_trait;
    use floodkv_rpc::prelude::reqwest;
    use serde::de::DeserializeOwned;

    use crate::seed::Seed;

    /// Load a json resource from local file or remote url.
    /// To use this trait, derive DeserializeOwned then implement this trait.
    #[async_trait]
    pub trait ResourceLoader {
        /// Load from `source`, either a path on disk or a http(s) url.
        async fn load(source: &str) -> anyhow::Result<Self>
        where Self: Sized + DeserializeOwned {
            if source.starts_with("http://") || source.starts_with("https://") {
                let resp = reqwest::get(source)
                    .await
                    .map_err(|e| anyhow::anyhow!("failed to get resource from {source}: {e}"))?;
                resp.json()
                    .await
                    .map_err(|e| anyhow::anyhow!("failed to load resource from {source}: {e}"))
            } else {
                let path = crate::util::expand_home(source)?;
                let data = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("unable to read resource file: {e}"))?;
                serde_json::from_str(&data).map_err(|e| anyhow::anyhow!("{e}"))
            }
        }
    }

    impl ResourceLoader for Seed {}
}
