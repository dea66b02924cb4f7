use crate::imports::{Category, ExternalPolicy, RuleSet, classify, scan_import_sites};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Occurrence counts per specifier, one map per category.
#[derive(Debug, Default, Clone)]
pub struct ImportReport {
    buckets: BTreeMap<Category, BTreeMap<String, usize>>,
}

#[derive(Debug, Serialize)]
pub struct ReportJson<'a> {
    pub sections: Vec<SectionJson<'a>>,
    pub distinct: usize,
}

#[derive(Debug, Serialize)]
pub struct SectionJson<'a> {
    pub category: Category,
    pub occurrences: usize,
    pub distinct: usize,
    pub specifiers: Vec<EntryJson<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EntryJson<'a> {
    pub specifier: &'a str,
    pub count: usize,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, specifier: &str) {
        *self
            .buckets
            .entry(category)
            .or_default()
            .entry(specifier.to_string())
            .or_insert(0) += 1;
    }

    /// Count every import occurrence in `source`. Returns how many were seen.
    pub fn record_source(
        &mut self,
        source: &str,
        rules: &RuleSet,
        externals: &ExternalPolicy,
    ) -> usize {
        let sites = scan_import_sites(source);
        for site in &sites {
            self.record(classify(&site.specifier, rules, externals), &site.specifier);
        }
        sites.len()
    }

    pub fn count(&self, specifier: &str) -> Option<usize> {
        self.buckets
            .values()
            .find_map(|bucket| bucket.get(specifier).copied())
    }

    /// Entries of one category, highest count first, ties alphabetical.
    pub fn entries(&self, category: Category) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .buckets
            .get(&category)
            .map(|bucket| bucket.iter().map(|(s, c)| (s.as_str(), *c)).collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn occurrences(&self, category: Category) -> usize {
        self.buckets
            .get(&category)
            .map(|bucket| bucket.values().sum())
            .unwrap_or(0)
    }

    /// Distinct specifiers across all categories.
    pub fn distinct(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }

    /// Sections to print: local and external always, core only when populated.
    fn sections(&self) -> Vec<Category> {
        let mut sections = vec![Category::Local];
        if self.buckets.contains_key(&Category::Core) {
            sections.push(Category::Core);
        }
        sections.push(Category::External);
        sections
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for category in self.sections() {
            let entries = self.entries(category);
            let _ = writeln!(
                out,
                "== {} imports ({}) ==",
                category.label(),
                entries.len()
            );
            for (specifier, count) in &entries {
                let _ = writeln!(out, "{:>6}  {}", count, specifier);
            }
            let _ = writeln!(
                out,
                "total: {} occurrences, {} distinct",
                self.occurrences(category),
                entries.len()
            );
            out.push('\n');
        }
        let _ = writeln!(out, "grand total: {} distinct specifiers", self.distinct());
        out
    }

    pub fn to_json(&self) -> ReportJson<'_> {
        let sections = self
            .sections()
            .into_iter()
            .map(|category| {
                let specifiers: Vec<EntryJson<'_>> = self
                    .entries(category)
                    .into_iter()
                    .map(|(specifier, count)| EntryJson { specifier, count })
                    .collect();
                SectionJson {
                    category,
                    occurrences: self.occurrences(category),
                    distinct: specifiers.len(),
                    specifiers,
                }
            })
            .collect();
        ReportJson {
            sections,
            distinct: self.distinct(),
        }
    }
}
