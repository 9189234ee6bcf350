//! monshin 共通ライブラリ
//!
//! エラー型、LLM プロバイダ、設定・ログ・ファイルシステムのポートと標準アダプタを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// LLMドライバーとプロバイダ
pub mod llm;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;
