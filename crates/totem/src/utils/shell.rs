use camino::Utf8Path;
use std::io;
use std::process::Command;

/// Open `path` in the platform's file browser.
pub fn open_in_file_browser(path: &Utf8Path) -> io::Result<()> {
    // Get the parent directory if it's a file
    let dir = if path.is_file() {
        path.parent().unwrap_or(path)
    } else {
        path
    };

    #[cfg(target_os = "windows")]
    {
        Command::new("explorer").arg(dir).spawn()?;
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(dir).spawn()?;
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open").arg(dir).spawn()?;
    }

    tracing::debug!("Opened {} in file browser", dir);
    Ok(())
}
