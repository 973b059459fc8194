//! Sectioned key-value store for Terminator-style config files.
//!
//! Terminator writes its configuration in an INI dialect where bracket depth
//! encodes nesting (`[profiles]` contains `[[default]]`). The file is owned
//! and rewritten by the terminal itself, so this store keeps every line it
//! does not touch verbatim, comments and blanks included, and only
//! regenerates the pairs whose values actually changed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub struct IniFile {
    path: PathBuf,
    root: Section,
}

#[derive(Default)]
struct Section {
    lines: Vec<Line>,
}

enum Line {
    /// Comment, blank, or otherwise unrecognized line, kept verbatim.
    Raw(String),
    Pair {
        indent: String,
        key: String,
        value: String,
        /// Original text of the line; cleared when the value changes.
        raw: Option<String>,
    },
    Sub {
        indent: String,
        name: String,
        raw: Option<String>,
        body: Section,
    },
}

impl IniFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            root: parse(&text)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks up `key` in the section addressed by `section_path`; an empty
    /// path addresses the root of the file.
    pub fn get(&self, section_path: &[&str], key: &str) -> Option<&str> {
        let mut section = &self.root;
        for name in section_path {
            section = section.child(name)?;
        }
        section.value(key)
    }

    pub fn contains_section(&self, section_path: &[&str]) -> bool {
        let mut section = &self.root;
        for name in section_path {
            match section.child(name) {
                Some(child) => section = child,
                None => return false,
            }
        }
        true
    }

    /// Updates an existing pair in place, or appends it to the section,
    /// creating missing sections along `section_path`.
    pub fn set(&mut self, section_path: &[&str], key: &str, value: &str) {
        let mut section = &mut self.root;
        for (depth, name) in section_path.iter().enumerate() {
            section = section.child_or_insert(name, depth + 1);
        }
        section.set_value(key, value, section_path.len());
    }

    /// Serializes the whole tree back to the file it was loaded from.
    pub fn write(&self) -> Result<()> {
        let mut out = String::new();
        self.root.render(0, &mut out);
        fs::write(&self.path, out)?;
        Ok(())
    }
}

impl Section {
    fn child(&self, name: &str) -> Option<&Section> {
        self.lines.iter().find_map(|line| match line {
            Line::Sub { name: n, body, .. } if n == name => Some(body),
            _ => None,
        })
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Pair { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    fn child_or_insert(&mut self, name: &str, depth: usize) -> &mut Section {
        let idx = self
            .lines
            .iter()
            .position(|line| matches!(line, Line::Sub { name: n, .. } if n == name));
        let idx = match idx {
            Some(idx) => idx,
            None => {
                self.lines.push(Line::Sub {
                    indent: "  ".repeat(depth - 1),
                    name: name.to_string(),
                    raw: None,
                    body: Section::default(),
                });
                self.lines.len() - 1
            }
        };
        match &mut self.lines[idx] {
            Line::Sub { body, .. } => body,
            _ => unreachable!("index points at a subsection"),
        }
    }

    fn set_value(&mut self, key: &str, value: &str, depth: usize) {
        for line in &mut self.lines {
            if let Line::Pair {
                key: k, value: v, raw, ..
            } = line
                && k.as_str() == key
            {
                *v = value.to_string();
                *raw = None;
                return;
            }
        }
        // New pairs go before any subsection, otherwise a re-parse would
        // attribute them to the last subsection instead of this one.
        let insert_at = self
            .lines
            .iter()
            .position(|line| matches!(line, Line::Sub { .. }))
            .unwrap_or(self.lines.len());
        self.lines.insert(
            insert_at,
            Line::Pair {
                indent: "  ".repeat(depth),
                key: key.to_string(),
                value: value.to_string(),
                raw: None,
            },
        );
    }

    fn render(&self, depth: usize, out: &mut String) {
        for line in &self.lines {
            match line {
                Line::Raw(raw) => out.push_str(raw),
                Line::Pair {
                    indent,
                    key,
                    value,
                    raw,
                } => match raw {
                    Some(raw) => out.push_str(raw),
                    None => {
                        out.push_str(indent);
                        out.push_str(key);
                        out.push_str(" = ");
                        out.push_str(value);
                    }
                },
                Line::Sub {
                    indent,
                    name,
                    raw,
                    body,
                } => {
                    match raw {
                        Some(raw) => out.push_str(raw),
                        None => {
                            out.push_str(indent);
                            out.push_str(&"[".repeat(depth + 1));
                            out.push_str(name);
                            out.push_str(&"]".repeat(depth + 1));
                        }
                    }
                    out.push('\n');
                    body.render(depth + 1, out);
                    continue;
                }
            }
            out.push('\n');
        }
    }
}

struct OpenSection {
    indent: String,
    name: String,
    raw: String,
    body: Section,
}

fn parse(text: &str) -> Result<Section> {
    let mut root = Section::default();
    // Currently open sections; the entry at index i sits at bracket depth
    // i + 1, so the top of the stack is always the deepest open section.
    let mut open: Vec<OpenSection> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') {
            let (depth, name) = parse_header(trimmed)?;
            while open.len() >= depth {
                close_top(&mut root, &mut open);
            }
            if open.len() + 1 != depth {
                return Err(Error::Config(format!(
                    "Section {trimmed} is nested deeper than its parent allows"
                )));
            }
            open.push(OpenSection {
                indent: leading_whitespace(line),
                name,
                raw: line.to_string(),
                body: Section::default(),
            });
            continue;
        }

        let target = current(&mut root, &mut open);
        if trimmed.is_empty() || trimmed.starts_with('#') {
            target.lines.push(Line::Raw(line.to_string()));
        } else {
            match trimmed.split_once('=') {
                Some((key, value)) => target.lines.push(Line::Pair {
                    indent: leading_whitespace(line),
                    key: key.trim().to_string(),
                    value: unquote(value.trim()).to_string(),
                    raw: Some(line.to_string()),
                }),
                None => target.lines.push(Line::Raw(line.to_string())),
            }
        }
    }

    while !open.is_empty() {
        close_top(&mut root, &mut open);
    }

    Ok(root)
}

fn current<'a>(root: &'a mut Section, open: &'a mut Vec<OpenSection>) -> &'a mut Section {
    match open.last_mut() {
        Some(section) => &mut section.body,
        None => root,
    }
}

fn close_top(root: &mut Section, open: &mut Vec<OpenSection>) {
    if let Some(OpenSection {
        indent,
        name,
        raw,
        body,
    }) = open.pop()
    {
        let parent = match open.last_mut() {
            Some(section) => &mut section.body,
            None => root,
        };
        parent.lines.push(Line::Sub {
            indent,
            name,
            raw: Some(raw),
            body,
        });
    }
}

fn parse_header(trimmed: &str) -> Result<(usize, String)> {
    let depth = trimmed.chars().take_while(|c| *c == '[').count();
    let closing = trimmed.chars().rev().take_while(|c| *c == ']').count();
    let name = trimmed[depth..trimmed.len() - closing].trim();
    if closing != depth || name.is_empty() {
        return Err(Error::Config(format!("Malformed section header: {trimmed}")));
    }
    Ok((depth, name.to_string()))
}

fn leading_whitespace(line: &str) -> String {
    line[..line.len() - line.trim_start().len()].to_string()
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = "\
# managed by terminator
[global_config]
  focus = system
[keybindings]
[profiles]
  [[default]]
    background_darkness = 0.85
    background_type = image
    background_image = /images/a.png
    background_image_mode = scale_and_fit
  [[secondary]]
    background_type = solid
[plugins]
";

    fn sample_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_get_nested_values() {
        let dir = tempfile::tempdir().unwrap();
        let ini = IniFile::load(&sample_file(&dir)).unwrap();

        assert_eq!(ini.get(&["global_config"], "focus"), Some("system"));
        assert_eq!(
            ini.get(&["profiles", "default"], "background_darkness"),
            Some("0.85")
        );
        assert_eq!(
            ini.get(&["profiles", "secondary"], "background_type"),
            Some("solid")
        );
        assert_eq!(ini.get(&["profiles", "default"], "missing"), None);
        assert_eq!(ini.get(&["profiles", "nope"], "background_type"), None);
    }

    #[test]
    fn test_contains_section() {
        let dir = tempfile::tempdir().unwrap();
        let ini = IniFile::load(&sample_file(&dir)).unwrap();

        assert!(ini.contains_section(&["profiles"]));
        assert!(ini.contains_section(&["profiles", "default"]));
        assert!(!ini.contains_section(&["profiles", "tertiary"]));
        assert!(!ini.contains_section(&["missing"]));
    }

    #[test]
    fn test_untouched_file_survives_rewrite_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(&dir);

        let ini = IniFile::load(&path).unwrap();
        ini.write().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_set_updates_pair_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_file(&dir);

        let mut ini = IniFile::load(&path).unwrap();
        ini.set(&["profiles", "default"], "background_image", "/images/b.png");
        ini.write().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("    background_image = /images/b.png\n"));
        assert!(!text.contains("/images/a.png"));
        // Everything else is untouched, the comment included.
        assert!(text.contains("# managed by terminator\n"));
        assert!(text.contains("  [[secondary]]\n"));
        assert!(text.contains("    background_darkness = 0.85\n"));
        // The updated key keeps its position between its neighbours.
        let type_at = text.find("background_type = image").unwrap();
        let image_at = text.find("background_image = /images/b.png").unwrap();
        let mode_at = text.find("background_image_mode").unwrap();
        assert!(type_at < image_at && image_at < mode_at);
    }

    #[test]
    fn test_set_creates_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "").unwrap();

        let mut ini = IniFile::load(&path).unwrap();
        ini.set(&["profiles", "default"], "background_type", "image");
        ini.set(&[], "image_folder", "/images");
        ini.write().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[profiles]\n"));
        assert!(text.contains("  [[default]]\n"));
        assert!(text.contains("    background_type = image\n"));
        assert!(text.contains("image_folder = /images\n"));

        let reread = IniFile::load(&path).unwrap();
        assert_eq!(reread.get(&["profiles", "default"], "background_type"), Some("image"));
        assert_eq!(reread.get(&[], "image_folder"), Some("/images"));
    }

    #[test]
    fn test_quoted_values_are_unwrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "name = \"quoted value\"\nother = 'single'\n").unwrap();

        let ini = IniFile::load(&path).unwrap();
        assert_eq!(ini.get(&[], "name"), Some("quoted value"));
        assert_eq!(ini.get(&[], "other"), Some("single"));
    }

    #[test]
    fn test_malformed_header_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[[broken]\n").unwrap();

        assert!(matches!(IniFile::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_orphan_subsection_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[[default]]\nkey = value\n").unwrap();

        assert!(matches!(IniFile::load(&path), Err(Error::Config(_))));
    }
}
