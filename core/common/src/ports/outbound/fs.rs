//! ファイルシステム Outbound ポート
//!
//! 設定（profiles.json / interview.json / テンプレート）の読み込み、
//! サマリー・診断メモの書き出し、JSONL ログの追記はこの trait を通す。

use crate::error::Error;
use std::io::Write;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String, Error>;
    /// 内容を丸ごと置き換える。途中で失敗しても既存ファイルを壊さない。
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    /// 追記用に開く（無ければ作る）
    fn open_append(&self, path: &Path) -> Result<Box<dyn Write + Send>, Error>;
}
