use crate::imports::classify::ExternalPolicy;
use crate::imports::rules::{Remap, RuleSet};
use crate::imports::scanner::scan_import_sites;
use crate::index::FileIndex;

/// Path segment marking component files; unresolved paths under it are `.tsx`.
pub const UI_SEGMENT: &str = "ui";

const KNOWN_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "json", "css"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    /// Number of specifiers whose text changed.
    pub changed: usize,
}

/// Rewrites specifiers against a finished index. Performs no I/O.
pub struct Rewriter<'a> {
    rules: &'a RuleSet,
    index: &'a FileIndex,
    externals: &'a ExternalPolicy,
}

impl<'a> Rewriter<'a> {
    pub fn new(rules: &'a RuleSet, index: &'a FileIndex, externals: &'a ExternalPolicy) -> Self {
        Self {
            rules,
            index,
            externals,
        }
    }

    /// New text for one specifier, or `None` if it stays as is.
    pub fn rewrite_specifier(&self, specifier: &str) -> Option<String> {
        if !self.rules.is_local(specifier) {
            return self.externals.rewrite(specifier);
        }
        match self.rules.remap(specifier)? {
            Remap::Final(path) => Some(path),
            Remap::Resolve(path) => {
                let logical = self.rules.logical_path(&path);
                match resolve_extension(logical, self.index) {
                    Some(ext) => Some(format!("{}{}", path, ext)),
                    None => Some(path),
                }
            }
        }
    }

    /// Replace every rewritable specifier in `source`, leaving all other bytes intact.
    pub fn rewrite(&self, source: &str) -> Rewritten {
        let mut text = String::with_capacity(source.len() + 64);
        let mut last = 0usize;
        let mut changed = 0usize;

        for site in scan_import_sites(source) {
            let Some(replacement) = self.rewrite_specifier(&site.specifier) else {
                continue;
            };
            if replacement == site.specifier {
                continue;
            }
            tracing::trace!(
                kind = ?site.kind,
                from = %site.specifier,
                to = %replacement,
                "rewrite specifier"
            );
            text.push_str(&source[last..site.span.start]);
            text.push_str(&replacement);
            last = site.span.end;
            changed += 1;
        }
        text.push_str(&source[last..]);

        Rewritten { text, changed }
    }
}

/// Extension to append to a logical path.
///
/// Index hit wins; otherwise `.tsx` under a `ui` segment and `.ts` elsewhere.
/// `None` when the path already ends in a known extension.
pub fn resolve_extension<'i>(logical: &str, index: &'i FileIndex) -> Option<&'i str> {
    if let Some(ext) = index.extension(logical) {
        return Some(ext);
    }
    let last = logical.rsplit('/').next().unwrap_or(logical);
    if let Some((_, ext)) = last.rsplit_once('.') {
        if KNOWN_EXTENSIONS.iter().any(|known| *known == ext) {
            return None;
        }
    }
    if logical.split('/').any(|seg| seg == UI_SEGMENT) {
        Some(".tsx")
    } else {
        Some(".ts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn index_of(paths: &[&str]) -> FileIndex {
        let mut index = FileIndex::new();
        for p in paths {
            index.insert(Path::new(p));
        }
        index
    }

    fn rewrite_with(src: &str, index: &FileIndex, externals: &ExternalPolicy) -> String {
        let rules = RuleSet::default();
        Rewriter::new(&rules, index, externals).rewrite(src).text
    }

    fn rewrite(src: &str, index: &FileIndex) -> String {
        rewrite_with(src, index, &ExternalPolicy::default())
    }

    #[test]
    fn utils_import_end_to_end() {
        let index = FileIndex::new();
        assert_eq!(
            rewrite(r#"import { cn } from "@/lib/utils";"#, &index),
            r#"import { cn } from "@/default/lib/utils.ts";"#
        );
    }

    #[test]
    fn utils_shortcut_ignores_index() {
        let index = index_of(&["lib/utils.tsx"]);
        assert_eq!(
            rewrite(r#"import { cn } from "@/lib/utils";"#, &index),
            r#"import { cn } from "@/default/lib/utils.ts";"#
        );
    }

    #[test]
    fn registry_import_uses_index_extension() {
        let index = index_of(&["ui/button.tsx"]);
        assert_eq!(
            rewrite(
                r#"import { Button } from "@/registry/default/ui/button";"#,
                &index
            ),
            r#"import { Button } from "@/default/ui/button.tsx";"#
        );
    }

    #[test]
    fn index_extension_beats_heuristic() {
        // under ui/ but indexed as .ts
        let index = index_of(&["ui/chart-config.ts", "hooks/use-chart.tsx"]);
        assert_eq!(
            rewrite(r#"import x from "@/registry/default/ui/chart-config";"#, &index),
            r#"import x from "@/default/ui/chart-config.ts";"#
        );
        assert_eq!(
            rewrite(r#"import { useChart } from "@/hooks/use-chart";"#, &index),
            r#"import { useChart } from "@/default/hooks/use-chart.tsx";"#
        );
    }

    #[test]
    fn heuristic_when_not_indexed() {
        let index = FileIndex::new();
        assert_eq!(
            rewrite(r#"import { Card } from "@/registry/default/ui/card";"#, &index),
            r#"import { Card } from "@/default/ui/card.tsx";"#
        );
        assert_eq!(
            rewrite(r#"import { useToast } from "@/hooks/use-toast";"#, &index),
            r#"import { useToast } from "@/default/hooks/use-toast.ts";"#
        );
        assert_eq!(
            rewrite(r#"import { X } from "@/components/ui/x";"#, &index),
            r#"import { X } from "@/default/components/ui/x.tsx";"#
        );
    }

    #[test]
    fn ui_heuristic_matches_whole_segments() {
        let index = FileIndex::new();
        assert_eq!(resolve_extension("lib/builder", &index), Some(".ts"));
        assert_eq!(resolve_extension("uix/thing", &index), Some(".ts"));
        assert_eq!(resolve_extension("ui/thing", &index), Some(".tsx"));
    }

    #[test]
    fn explicit_extension_is_kept() {
        let index = FileIndex::new();
        assert_eq!(resolve_extension("lib/utils.ts", &index), None);
        assert_eq!(
            rewrite(r#"import "@/registry/default/ui/styles.css";"#, &index),
            r#"import "@/default/ui/styles.css";"#
        );
    }

    #[test]
    fn externals_untouched_by_default() {
        let index = FileIndex::new();
        let src = r#"import * as RadixUI from "@radix-ui/react-dialog";"#;
        assert_eq!(rewrite(src, &index), src);
        let src = r#"import * as React from "react";"#;
        assert_eq!(rewrite(src, &index), src);
    }

    #[test]
    fn externals_prefixed_when_enabled() {
        let index = FileIndex::new();
        let policy = ExternalPolicy {
            rewrite: true,
            ..ExternalPolicy::default()
        };
        assert_eq!(
            rewrite_with(
                r#"import * as RadixUI from "@radix-ui/react-dialog";"#,
                &index,
                &policy
            ),
            r#"import * as RadixUI from "npm:@radix-ui/react-dialog";"#
        );
        let core = r#"import * as React from "react";"#;
        assert_eq!(rewrite_with(core, &index, &policy), core);
    }

    #[test]
    fn multiline_clause_layout_is_preserved() {
        let index = index_of(&["ui/dialog.tsx"]);
        let src = "import {\n  Dialog,\n\tDialogContent,\n  DialogTitle,\n} from '@/registry/default/ui/dialog'\n\nexport function X() {}\n";
        let expected = "import {\n  Dialog,\n\tDialogContent,\n  DialogTitle,\n} from '@/default/ui/dialog.tsx'\n\nexport function X() {}\n";
        assert_eq!(rewrite(src, &index), expected);
    }

    #[test]
    fn commented_imports_are_not_rewritten() {
        let index = FileIndex::new();
        let src = "// import { cn } from \"@/lib/utils\"\nimport { cn } from \"@/lib/utils\"\n";
        let expected =
            "// import { cn } from \"@/lib/utils\"\nimport { cn } from \"@/default/lib/utils.ts\"\n";
        assert_eq!(rewrite(src, &index), expected);
    }

    #[test]
    fn change_count_and_no_op() {
        let rules = RuleSet::default();
        let index = FileIndex::new();
        let policy = ExternalPolicy::default();
        let rewriter = Rewriter::new(&rules, &index, &policy);

        let out = rewriter.rewrite(
            "import * as React from \"react\"\nimport { cn } from \"@/lib/utils\"\nimport { Label } from \"@/registry/default/ui/label\"\n",
        );
        assert_eq!(out.changed, 2);

        let plain = "const answer = 42;\n";
        let out = rewriter.rewrite(plain);
        assert_eq!(out.changed, 0);
        assert_eq!(out.text, plain);
    }
}
