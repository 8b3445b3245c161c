use std::collections::HashSet;

/// Lowercases `name` and collapses every run of non-alphanumeric characters into `_`.
/// Leading/trailing separators are dropped; an empty result becomes `part`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        out.push_str("part");
    }
    out
}

/// Hands out unique part identifiers. Repeated slugs get `_2`, `_3`, ... in encounter order.
#[derive(Debug, Default, Clone)]
pub struct PartNamer {
    taken: HashSet<String>,
}

impl PartNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, raw: &str) -> String {
        let base = slugify(raw);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
