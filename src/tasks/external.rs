use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Pipe `text` into the platform clipboard command
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let (cmd, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("pbcopy", vec![])
    } else if cfg!(target_os = "windows") {
        ("clip", vec![])
    } else if Command::new("which")
        .arg("xclip")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
    {
        ("xclip", vec!["-selection", "clipboard"])
    } else {
        ("xsel", vec!["--clipboard", "--input"])
    };

    let mut child = Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to run {}", cmd))?;

    if let Some(ref mut stdin) = child.stdin {
        stdin.write_all(text.as_bytes())?;
    }
    // close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child.wait().context("Clipboard command failed")?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", cmd, status);
    }
    Ok(())
}

fn program_name(editor: &str) -> String {
    let program = editor.split_whitespace().next().unwrap_or_default();
    Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Editors that open their own window and leave the terminal alone
pub fn is_gui_editor(editor: &str) -> bool {
    let program = program_name(editor);
    program.contains("code") || program.contains("cursor") || program.contains("zed")
}

/// Arguments for opening `file` at `line` in `editor`
pub fn editor_args(editor: &str, repo_root: &str, file: &Path, line: usize) -> Vec<String> {
    let target = format!("{}:{}", file.display(), line);
    let program = program_name(editor);

    if program.contains("code") || program.contains("cursor") {
        vec![repo_root.to_string(), "-g".to_string(), target]
    } else if program.contains("zed") {
        vec![repo_root.to_string(), target]
    } else {
        vec![format!("+{}", line), file.display().to_string()]
    }
}

fn editor_command(editor: &str, repo_root: &str, path: &str, line: Option<usize>) -> Result<Command> {
    let file = Path::new(repo_root).join(path);
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("Editor command is empty")?;

    let mut cmd = Command::new(program);
    cmd.args(parts)
        .args(editor_args(program, repo_root, &file, line.unwrap_or(1)))
        .current_dir(repo_root);
    Ok(cmd)
}

/// Spawn a GUI editor without waiting for it
pub fn open_in_editor(editor: &str, repo_root: &str, path: &str, line: Option<usize>) -> Result<()> {
    editor_command(editor, repo_root, path, line)?
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to open editor {}", editor))?;
    Ok(())
}

/// Run a terminal editor on the inherited terminal and wait for it to exit.
/// The caller must have released raw mode and the alternate screen.
pub fn edit_in_terminal(editor: &str, repo_root: &str, path: &str, line: Option<usize>) -> Result<()> {
    let status = editor_command(editor, repo_root, path, line)?
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run editor {}", editor))?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", editor, status);
    }
    Ok(())
}
