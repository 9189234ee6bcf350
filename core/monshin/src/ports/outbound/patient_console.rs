//! 患者向けコンソール Outbound ポート
//!
//! 患者に見せるのは質問・固定メッセージ・案内文だけ。診断やエラーの詳細はログ側へ。

use common::error::Error;

pub trait PatientConsole {
    /// プロンプトを表示して 1 行読む。入力終端なら None。
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error>;

    /// アシスタントの発話を表示する
    fn say(&mut self, text: &str) -> Result<(), Error>;

    /// 案内文（操作説明・保存先など）を表示する
    fn notice(&mut self, text: &str) -> Result<(), Error>;
}
