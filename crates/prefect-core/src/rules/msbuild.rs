//! Shared MSBuild file access for the .NET rules

use std::path::Path;

use prefect_fs::io;
use roxmltree::{Document, Node};

use crate::repo::{FilePattern, Files, Repo, Search};
use crate::{Error, Result};

/// Every `.csproj` in the repository.
pub(crate) fn project_files(repo: &Repo) -> Result<Files<'_>> {
    repo.files("", &FilePattern::new("*.csproj")?, Search::Recursive)
}

/// File name without the final extension.
pub(crate) fn file_stem(relative: &str) -> &str {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    match name.rfind('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

/// Read an MSBuild file without its byte order mark.
pub(crate) fn read(full: &Path) -> Result<String> {
    let text = io::read_text(full)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Read an MSBuild file folded to lowercase for case-insensitive queries.
pub(crate) fn read_lowercase(full: &Path) -> Result<String> {
    Ok(read(full)?.to_lowercase())
}

pub(crate) fn parse<'t>(text: &'t str, relative: &str) -> Result<Document<'t>> {
    Document::parse(text).map_err(|e| Error::Xml {
        path: relative.to_string(),
        message: e.to_string(),
    })
}

/// First element reached by following `path` from the document root, one
/// child name per step.
///
/// The first name must match the root element itself.
pub(crate) fn select<'a, 't>(doc: &'a Document<'t>, path: &[&str]) -> Option<Node<'a, 't>> {
    let (first, rest) = path.split_first()?;
    let root = doc.root_element();
    if root.tag_name().name() != *first {
        return None;
    }
    first_descendant_path(root, rest)
}

fn first_descendant_path<'a, 't>(node: Node<'a, 't>, path: &[&str]) -> Option<Node<'a, 't>> {
    let Some((name, rest)) = path.split_first() else {
        return Some(node);
    };
    node.children()
        .filter(|child| child.is_element() && child.tag_name().name() == *name)
        .find_map(|child| first_descendant_path(child, rest))
}

/// Value of `/Project/PropertyGroup/<name>`.
pub(crate) fn property(doc: &Document<'_>, name: &str) -> Option<String> {
    select(doc, &["Project", "PropertyGroup", name]).map(text)
}

/// Concatenated text content of an element.
pub(crate) fn text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

/// Every element named `name` anywhere in the document.
pub(crate) fn elements<'a, 't>(doc: &'a Document<'t>, name: &'a str) -> impl Iterator<Item = Node<'a, 't>> + 'a {
    doc.descendants()
        .filter(move |node| node.is_element() && node.tag_name().name() == name)
}

/// First direct element child named `name`.
pub(crate) fn child<'a, 't>(node: Node<'a, 't>, name: &str) -> Option<Node<'a, 't>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}
