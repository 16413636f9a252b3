//! Handing a URL to the user's web browser.

use std::io;
use std::process::{Command, Stdio};

/// Opens a URL somewhere outside the terminal.
pub trait ExternalBrowser: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// The platform opener, or a named browser command.
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser {
    command: Option<String>,
}

impl SystemBrowser {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Program and leading arguments used to open `url`.
    pub fn invocation(&self, url: &str) -> (String, Vec<String>) {
        match &self.command {
            Some(cmd) => (cmd.clone(), vec![url.to_string()]),
            None => platform_opener(url),
        }
    }
}

impl ExternalBrowser for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        let (program, args) = self.invocation(url);
        tracing::info!(%program, url, "browser.open");
        // Not waited on; the browser outlives us.
        Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }
}

#[cfg(target_os = "macos")]
fn platform_opener(url: &str) -> (String, Vec<String>) {
    ("open".into(), vec![url.into()])
}

#[cfg(windows)]
fn platform_opener(url: &str) -> (String, Vec<String>) {
    ("cmd".into(), vec!["/C".into(), "start".into(), String::new(), url.into()])
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_opener(url: &str) -> (String, Vec<String>) {
    ("xdg-open".into(), vec![url.into()])
}
