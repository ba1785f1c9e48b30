//! Text, raw and lazy nodes, plus helpers that produce raw markup from files
//! and commands.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::rc::Rc;

use crate::error::{BuildError, Result};
use crate::escape::escape;
use crate::node::{Node, NodeFlags, NodeKind};
use crate::tree::Addable;

const TEXT_FLAGS: NodeFlags = NodeFlags {
    single: false,
    pretty: false,
    inline: true,
};

fn text_node(content: String) -> Node {
    Node::detached("text", NodeKind::Text(content.into()), TEXT_FLAGS)
        .construct(Addable::Many(Vec::new()))
}

/// A standalone, escaped text node. Unlike a plain string it joins the
/// innermost open scope, so it can be used inside [`Node::enter_scope`].
pub fn text(s: &str) -> Node {
    text_node(escape(s, true))
}

/// A text node rendered verbatim. The caller is responsible for the markup
/// being safe.
pub fn raw(s: &str) -> Node {
    text_node(s.to_string())
}

/// A node whose content is produced by `f` each time it is rendered. The
/// result is inserted unescaped.
///
/// `f` may edit the tree being rendered; each element's children are read
/// before any of them render, so the edits show up on the next render.
pub fn lazy<F, D>(f: F) -> Node
where
    F: Fn() -> D + 'static,
    D: Display,
{
    let func: Rc<dyn Fn() -> String> = Rc::new(move || f().to_string());
    Node::detached("lazy", NodeKind::Lazy(func), NodeFlags::default())
        .construct(Addable::Many(Vec::new()))
}

/// The contents of a file, as a raw text node.
pub fn include(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|e| BuildError::Include {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(raw(&data))
}

/// Run `cmd` through `sh -c`, feeding it `stdin`, and return its standard
/// output. The exit status is not checked.
pub fn system(cmd: &str, stdin: Option<&[u8]>) -> Result<String> {
    let fail = |message: String| BuildError::Command {
        command: cmd.to_string(),
        message,
    };

    debug!(cmd, "running command");
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| fail(e.to_string()))?;

    // Feed stdin from another thread so a chatty command cannot deadlock us.
    let writer = match (child.stdin.take(), stdin) {
        (Some(mut pipe), Some(data)) => {
            let data = data.to_vec();
            Some(std::thread::spawn(move || pipe.write_all(&data)))
        }
        _ => None,
    };

    let output = child.wait_with_output().map_err(|e| fail(e.to_string()))?;
    if let Some(writer) = writer {
        // The command may exit without reading its input.
        let _ = writer.join();
    }

    String::from_utf8(output.stdout).map_err(|e| fail(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use facet_testhelpers::test;

    #[test]
    fn test_text_and_raw() {
        let t = text("<b>");
        assert_eq!(t.node_type(), NodeType::Text);
        assert!(t.is_inline());
        assert!(!t.is_pretty());
        assert_eq!(t.to_string(), "&lt;b&gt;");
        assert_eq!(raw("<b>").to_string(), "<b>");
    }

    #[test]
    fn test_lazy_formats_display() {
        let n = lazy(|| 6 * 7);
        assert_eq!(n.node_type(), NodeType::Lazy);
        assert_eq!(n.to_string(), "42");
    }

    #[test]
    fn test_include_missing_file() {
        let err = include("/definitely/not/here.html").unwrap_err();
        assert!(matches!(
            err,
            BuildError::Include { ref path, .. } if path == "/definitely/not/here.html"
        ));
    }

    #[test]
    fn test_include_reads_file() {
        let path = std::env::temp_dir().join(format!("plated-include-{}.html", std::process::id()));
        std::fs::write(&path, "<p>from disk</p>").unwrap();
        let node = include(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(node.to_string(), "<p>from disk</p>");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_pipes_stdin() {
        let out = system("tr a-z A-Z", Some(b"shout")).unwrap();
        assert_eq!(out, "SHOUT");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_without_stdin() {
        assert_eq!(system("printf hi", None).unwrap(), "hi");
    }
}
