use std::collections::BTreeSet;

/// Packages whose members never need an import.
const IMPLICIT_PACKAGES: &[&str] = &["java.lang"];

/// Fully qualified names referenced by generated code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSet {
    names: BTreeSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite `type_id` with simple names, recording every qualified name it
    /// mentions.
    ///
    /// Type arguments and array suffixes are kept: `java.util.List<java.util.UUID>`
    /// becomes `List<UUID>` and records both `java.util.List` and `java.util.UUID`.
    pub fn simple_name(&mut self, type_id: &str) -> String {
        let mut out = String::with_capacity(type_id.len());
        let mut start = None;
        for (idx, ch) in type_id.char_indices() {
            let part_of_name = ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '.';
            match (part_of_name, start) {
                (true, None) => start = Some(idx),
                (false, Some(from)) => {
                    out.push_str(self.shorten(&type_id[from..idx]));
                    out.push(ch);
                    start = None;
                }
                (false, None) => out.push(ch),
                (true, Some(_)) => {}
            }
        }
        if let Some(from) = start {
            out.push_str(self.shorten(&type_id[from..]));
        }
        out
    }

    fn shorten<'a>(&mut self, qualified: &'a str) -> &'a str {
        let Some((package, simple)) = qualified.rsplit_once('.') else {
            return qualified;
        };
        if !IMPLICIT_PACKAGES.contains(&package) {
            self.names.insert(qualified.to_owned());
        }
        simple
    }

    pub fn insert(&mut self, qualified: impl Into<String>) {
        self.names.insert(qualified.into());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn into_set(self) -> BTreeSet<String> {
        self.names
    }
}

/// Value returned by a generated action body, `None` for `void`.
pub fn default_value(return_type: Option<&str>) -> Option<&'static str> {
    match return_type? {
        "void" => None,
        "boolean" => Some("false"),
        "byte" | "short" | "int" | "long" | "float" | "double" => Some("0"),
        "char" => Some("'\\0'"),
        _ => Some("null"),
    }
}
