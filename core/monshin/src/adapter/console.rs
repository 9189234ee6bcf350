//! 標準入出力のコンソール（PatientConsole の実装）

use std::io::{BufRead, Write};

use common::error::Error;

use crate::ports::outbound::PatientConsole;

/// BufRead / Write の組で動くコンソール。テストでは Cursor と Vec<u8> を渡す。
pub struct StdConsole<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> PatientConsole for StdConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.output, "アシスタント: {}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn notice(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.output, "[{}]", text)?;
        self.output.flush()?;
        Ok(())
    }
}
