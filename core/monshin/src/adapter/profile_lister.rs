//! プロファイル一覧取得アダプタ（profiles.json + ビルトイン）

use std::sync::Arc;

use common::error::Error;
use common::llm::load_profiles_config;
use common::llm::resolver::list_profiles;
use common::ports::outbound::{EnvResolver, FileSystem};

use crate::ports::outbound::ProfileLister;

pub struct StdProfileLister {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl StdProfileLister {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }
}

impl ProfileLister for StdProfileLister {
    fn list_profiles(&self) -> Result<(Vec<String>, String), Error> {
        let home = self.env_resolver.resolve_home_dir()?;
        let cfg = load_profiles_config(self.fs.as_ref(), &home.profiles_config_path())?;
        Ok(list_profiles(cfg.as_ref()))
    }
}
