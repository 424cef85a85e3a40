use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Finds the rendered `<scene>.gif` anywhere below `media_dir`
pub fn find_render(media_dir: &Path, scene: &str) -> io::Result<PathBuf> {
    let file_name = format!("{}.gif", scene);
    find_file_recursive(media_dir, &file_name)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{}' not found under {}", file_name, media_dir.display()),
        )
    })
}

fn find_file_recursive(dir: &Path, file_name: &str) -> io::Result<Option<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    for path in &entries {
        if path.is_file() && path.file_name().and_then(|n| n.to_str()) == Some(file_name) {
            return Ok(Some(path.clone()));
        }
    }
    for path in entries.iter().filter(|p| p.is_dir()) {
        if let Some(found) = find_file_recursive(path, file_name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Hands the file to the desktop's default application
pub fn open_with_default_viewer(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        ));
    }
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .arg("/C")
            .arg("start")
            .arg("")
            .arg(path)
            .spawn()?;
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(path).spawn()?;
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open").arg(path).spawn()?;
    }

    Ok(())
}
