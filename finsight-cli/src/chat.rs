use anyhow::Result;
use finsight_assistant::Assistant;
use finsight_core::Session;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

/// Appends each exchange to `~/.finsight/chat/<date>.md`
struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    fn open_today() -> Result<Self> {
        let dir = crate::state::chat_log_dir()?;
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        Ok(Self {
            path: dir.join(format!("{today}.md")),
        })
    }

    fn append(&self, user: &str, role: &str, msg: &str) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            f,
            "- {} [{}:{}] {}",
            chrono::Utc::now().to_rfc3339(),
            user,
            role,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

/// Line-oriented chat on stdin until EOF, `exit` or `quit`.
pub fn run_chat(session: &Session) -> Result<()> {
    let mut assistant = Assistant::new()?;
    let log = match ChatLog::open_today() {
        Ok(log) => Some(log),
        Err(e) => {
            warn!(error = %e, "chat transcript disabled");
            None
        }
    };

    println!("finsight chat for '{}' (type 'exit' to quit)\n", session.user_id());
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let msg = line.trim();
        if msg.is_empty() {
            continue;
        }
        if msg.eq_ignore_ascii_case("exit") || msg.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = assistant.reply(session, msg)?;
        println!("\n{reply}\n");

        if let Some(l) = log.as_ref() {
            if let Err(e) = l
                .append(session.user_id(), "user", msg)
                .and_then(|_| l.append(session.user_id(), "assistant", &reply))
            {
                warn!(error = %e, "could not write chat transcript");
            }
        }
    }
    Ok(())
}
