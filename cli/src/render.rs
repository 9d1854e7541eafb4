use searchcore::Document;

/// `Sonnet <id>: <title>`
pub fn heading(doc: &Document) -> String {
    format!("Sonnet {}: {}", doc.id(), doc.title())
}

/// Heading followed by the lines, one per row.
pub fn sonnet(doc: &Document) -> String {
    let mut out = heading(doc);
    out.push('\n');
    out.push_str(&doc.lines().join("\n"));
    out
}

/// The summary line for a query and its hits.
pub fn summary(query: &str, hits: &[&Document]) -> String {
    if hits.is_empty() {
        return format!("--> No results for '{query}'.");
    }
    let ids = hits.iter().map(|d| d.id().to_string()).collect::<Vec<_>>().join(", ");
    format!("--> Found {} sonnets for '{query}': {ids}", hits.len())
}

/// Summary plus every matched sonnet, separated by blank lines.
pub fn results(query: &str, hits: &[&Document]) -> String {
    let mut out = summary(query, hits);
    out.push('\n');
    for doc in hits {
        out.push('\n');
        out.push_str(&sonnet(doc));
        out.push('\n');
    }
    out
}
