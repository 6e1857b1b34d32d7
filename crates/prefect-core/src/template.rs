//! `$NAME$` interpolation for template paths and contents
//!
//! A hole is a `$`-delimited name made of ASCII letters, digits, `_` and `-`.
//! Anything else between two dollar signs is left alone, so MSBuild property
//! references like `$(TargetDir)` pass through untouched.

/// Variable holding the derived project name.
pub const PROJECT: &str = "PROJECT";

/// Variable holding the repository folder name.
pub const REPO_SLUG: &str = "REPO-SLUG";

/// Resolves interpolation holes for one repository.
#[derive(Debug, Clone, Copy)]
pub struct PathTemplate<'a> {
    project_name: &'a str,
    slug: &'a str,
}

impl<'a> PathTemplate<'a> {
    pub fn new(project_name: &'a str, slug: &'a str) -> Self {
        Self { project_name, slug }
    }

    /// Value of a recognized variable.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        match name {
            PROJECT => Some(self.project_name),
            REPO_SLUG => Some(self.slug),
            _ => None,
        }
    }

    /// Replace every hole in `text`.
    ///
    /// Unknown names are handed to `on_unknown`, whose return value is
    /// substituted in their place. This lets callers either tolerate them or
    /// collect every one of them as an error in a single scan.
    pub fn interpolate(&self, text: &str, mut on_unknown: impl FnMut(&str) -> String) -> String {
        let mut output = String::with_capacity(text.len());
        for segment in Segments::new(text) {
            match segment {
                Segment::Literal(literal) => output.push_str(literal),
                Segment::Hole(name) => match self.value(name) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(&on_unknown(name)),
                },
            }
        }
        output
    }

    /// Resolve a template-relative path, leaving unknown holes as written.
    pub fn resolve_path(&self, path: &str) -> String {
        self.interpolate(path, |name| format!("${name}$"))
    }
}

/// Names of every hole in `text`, in order of appearance.
pub fn holes(text: &str) -> Vec<&str> {
    Segments::new(text)
        .filter_map(|segment| match segment {
            Segment::Hole(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Check whether `text` contains a `$PROJECT$` hole.
pub fn uses_project_name(text: &str) -> bool {
    holes(text).contains(&PROJECT)
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'t> {
    Literal(&'t str),
    Hole(&'t str),
}

/// Splits text into literal runs and holes.
struct Segments<'t> {
    rest: &'t str,
}

impl<'t> Segments<'t> {
    fn new(text: &'t str) -> Self {
        Self { rest: text }
    }
}

impl<'t> Iterator for Segments<'t> {
    type Item = Segment<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let mut search = 0;
        loop {
            let Some(offset) = self.rest[search..].find('$') else {
                let literal = std::mem::take(&mut self.rest);
                return Some(Segment::Literal(literal));
            };

            let start = search + offset;
            let after = &self.rest[start + 1..];
            if let Some(end) = after.find('$') {
                let name = &after[..end];
                if is_variable_name(name) {
                    if start > 0 {
                        let literal = &self.rest[..start];
                        self.rest = &self.rest[start..];
                        return Some(Segment::Literal(literal));
                    }
                    self.rest = &after[end + 1..];
                    return Some(Segment::Hole(name));
                }
            }

            // Not a hole, the dollar sign stays literal
            search = start + 1;
        }
    }
}
