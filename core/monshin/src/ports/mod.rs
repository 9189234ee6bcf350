//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（生成バックエンド・待機・コンソール等）を使うための trait

pub mod inbound;
pub mod outbound;
