//! Static path remapping rules for local (`@/`) specifiers.

/// Alias every local specifier starts with.
pub const ALIAS: &str = "@/";
/// Namespace segment inserted after the alias in the output tree.
pub const NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Swap a legacy prefix for a new one, keeping the tail.
    Prefix {
        from: &'static str,
        to: &'static str,
    },
    /// Map one specifier to its final form. No extension lookup follows.
    Exact {
        from: &'static str,
        to: &'static str,
    },
    /// Insert the namespace for specifiers under one of the given roots.
    Scoped { roots: &'static [&'static str] },
    /// Insert the namespace for any aliased specifier.
    Namespaced,
}

/// Result of applying the rule set to a local specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remap {
    /// Remapped path that still needs an extension.
    Resolve(String),
    /// Finished specifier.
    Final(String),
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    alias: &'static str,
    namespace_prefix: String,
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(
            ALIAS,
            NAMESPACE,
            vec![
                Rule::Prefix {
                    from: "@/registry/default/",
                    to: "@/default/",
                },
                // Checked ahead of the scoped roots so its output never
                // depends on the index.
                Rule::Exact {
                    from: "@/lib/utils",
                    to: "@/default/lib/utils.ts",
                },
                Rule::Scoped {
                    roots: &["lib", "hooks"],
                },
                Rule::Namespaced,
            ],
        )
    }
}

impl RuleSet {
    pub fn new(alias: &'static str, namespace: &str, rules: Vec<Rule>) -> Self {
        Self {
            alias,
            namespace_prefix: format!("{}{}/", alias, namespace),
            rules,
        }
    }

    pub fn is_local(&self, specifier: &str) -> bool {
        specifier.starts_with(self.alias)
    }

    /// Apply the first matching rule. `None` for non-local specifiers.
    pub fn remap(&self, specifier: &str) -> Option<Remap> {
        let rest = specifier.strip_prefix(self.alias)?;
        for rule in &self.rules {
            match rule {
                Rule::Prefix { from, to } => {
                    if let Some(tail) = specifier.strip_prefix(from) {
                        return Some(Remap::Resolve(format!("{}{}", to, tail)));
                    }
                }
                Rule::Exact { from, to } => {
                    if specifier == *from {
                        return Some(Remap::Final((*to).to_string()));
                    }
                }
                Rule::Scoped { roots } => {
                    let root = rest.split('/').next().unwrap_or_default();
                    if rest.contains('/') && roots.iter().any(|r| *r == root) {
                        return Some(Remap::Resolve(self.namespaced(rest)));
                    }
                }
                Rule::Namespaced => return Some(Remap::Resolve(self.namespaced(rest))),
            }
        }
        None
    }

    /// Index key for a remapped specifier: namespace or alias stripped.
    pub fn logical_path<'a>(&self, remapped: &'a str) -> &'a str {
        remapped
            .strip_prefix(self.namespace_prefix.as_str())
            .or_else(|| remapped.strip_prefix(self.alias))
            .unwrap_or(remapped)
    }

    fn namespaced(&self, rest: &str) -> String {
        format!("{}{}", self.namespace_prefix, rest)
    }
}
