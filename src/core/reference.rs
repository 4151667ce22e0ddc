//! Outbound links to the CWE reference pages

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// Default location of the CWE definition pages
pub const DEFAULT_REFERENCE_URL: &str = "https://cwe.mitre.org/data/definitions/";

/// Build `<base><cid>.html`, inserting a `/` when the base lacks one
#[must_use]
pub fn reference_url(base: &str, cid: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{cid}.html")
    } else {
        format!("{base}/{cid}.html")
    }
}

/// Something that can show a URL to the user in a new browsing context
pub trait Opener {
    /// Open `url`
    ///
    /// # Errors
    /// Returns an error if the URL could not be handed off
    fn open(&mut self, url: &str) -> io::Result<()>;
}

/// Hands URLs to the platform's default opener
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(url);
            command
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }

    /// Start `command` in the background and reap it once it exits
    fn launch(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(thread::spawn(move || child.wait()))
    }
}

impl Opener for SystemOpener {
    fn open(&mut self, url: &str) -> io::Result<()> {
        Self::launch(Self::command(url)).map(|_| ())
    }
}

/// Opener that only remembers what it was asked to open
#[derive(Debug, Default, Clone)]
pub struct RecordingOpener {
    /// URLs in the order they were opened
    pub opened: Vec<String>,
}

impl Opener for RecordingOpener {
    fn open(&mut self, url: &str) -> io::Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }
}
