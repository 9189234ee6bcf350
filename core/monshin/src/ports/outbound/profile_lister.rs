//! プロファイル一覧取得 Outbound ポート

use common::error::Error;

/// 現在有効なプロファイル一覧を返す
pub trait ProfileLister: Send + Sync {
    /// プロファイル名リストと既定プロファイル名
    fn list_profiles(&self) -> Result<(Vec<String>, String), Error>;
}
